use crate::error::{Error, Result};

/// Settings for [`KMeansDiscretizer`](super::discretizer::KMeansDiscretizer).
#[derive(Clone, Debug, PartialEq)]
pub struct DiscretizerParams {
    n_bins: usize,
    max_iter: usize,
    bin_labels: Vec<String>,
}

impl Default for DiscretizerParams {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscretizerParams {
    pub fn new() -> Self {
        Self {
            n_bins: 3,
            max_iter: 100,
            bin_labels: default_labels(3),
        }
    }

    /// Sets the number of bins and resets the bin labels to the defaults for that count.
    pub fn set_n_bins(&mut self, n_bins: usize) -> Result<()> {
        if n_bins < 2 {
            return Err(Error::Parameters(
                "the number of bins must be greater than 1".into(),
            ));
        }
        self.n_bins = n_bins;
        self.bin_labels = default_labels(n_bins);
        Ok(())
    }

    pub fn set_max_iter(&mut self, max_iter: usize) -> Result<()> {
        if max_iter < 1 {
            return Err(Error::Parameters(
                "the maximum number of iterations must be greater than 0".into(),
            ));
        }
        self.max_iter = max_iter;
        Ok(())
    }

    /// Labels for the bins, from the lowest centroid to the highest.
    pub fn set_bin_labels(&mut self, bin_labels: Vec<String>) -> Result<()> {
        if bin_labels.len() != self.n_bins {
            return Err(Error::Parameters(format!(
                "expected {} bin labels, got {}",
                self.n_bins,
                bin_labels.len()
            )));
        }
        self.bin_labels = bin_labels;
        Ok(())
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn bin_labels(&self) -> &[String] {
        &self.bin_labels
    }
}

fn default_labels(n_bins: usize) -> Vec<String> {
    match n_bins {
        3 => vec!["Low".into(), "Normal".into(), "High".into()],
        n => (0..n).map(|bin| format!("bin_{}", bin)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DiscretizerParams::new();
        assert_eq!(params.n_bins(), 3);
        assert_eq!(params.max_iter(), 100);
        assert_eq!(params.bin_labels(), &["Low", "Normal", "High"]);
    }

    #[test]
    fn test_set_n_bins() {
        let mut params = DiscretizerParams::new();
        assert!(params.set_n_bins(1).is_err());

        params.set_n_bins(2).unwrap();
        assert_eq!(params.bin_labels(), &["bin_0", "bin_1"]);
    }

    #[test]
    fn test_set_bin_labels() {
        let mut params = DiscretizerParams::new();
        assert!(params.set_bin_labels(vec!["a".into()]).is_err());

        params
            .set_bin_labels(vec!["young".into(), "adult".into(), "senior".into()])
            .unwrap();
        assert_eq!(params.bin_labels()[2], "senior");
    }

    #[test]
    fn test_set_max_iter() {
        let mut params = DiscretizerParams::new();
        assert!(params.set_max_iter(0).is_err());
        params.set_max_iter(5).unwrap();
        assert_eq!(params.max_iter(), 5);
    }
}
