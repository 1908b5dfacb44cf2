//! K-Means Discretization
use super::params::DiscretizerParams;
use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use num_traits::ToPrimitive;

/// Maps a continuous column onto a few symbolic bins with one-dimensional k-means.
///
/// Centroids are kept sorted, so the first bin label always belongs to the lowest values.
///
/// ```rust
/// use rusty_dtree::preprocessing::discretizer::KMeansDiscretizer;
///
/// let mut discretizer = KMeansDiscretizer::new();
/// let bins = discretizer
///     .fit_transform(&[1.0, 1.2, 5.0, 5.1, 9.8, 10.0])
///     .unwrap();
///
/// assert_eq!(bins, vec!["Low", "Low", "Normal", "Normal", "High", "High"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct KMeansDiscretizer {
    params: DiscretizerParams,
    centroids: Vec<f64>,
}

impl KMeansDiscretizer {
    pub fn new() -> Self {
        Self::with_params(DiscretizerParams::new())
    }

    pub fn with_params(params: DiscretizerParams) -> Self {
        Self {
            params,
            centroids: Vec::new(),
        }
    }

    pub fn params(&self) -> &DiscretizerParams {
        &self.params
    }

    /// Fitted centroids in ascending order, empty before `fit`.
    pub fn centroids(&self) -> &[f64] {
        &self.centroids
    }

    /// Runs Lloyd's algorithm on `values`.
    ///
    /// # Errors
    ///
    /// Fails with `Parameters` when a value isn't a finite number or there are
    /// fewer distinct values than bins.
    pub fn fit<F: ToPrimitive>(&mut self, values: &[F]) -> Result<&mut Self> {
        let values = to_f64(values)?;
        let n_bins = self.params.n_bins();

        let mut distinct = values.clone();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        if distinct.len() < n_bins {
            return Err(Error::Parameters(format!(
                "{} distinct values cannot fill {} bins",
                distinct.len(),
                n_bins
            )));
        }

        // start from evenly spaced quantiles of the distinct values
        let mut centroids: Vec<f64> = (0..n_bins)
            .map(|bin| distinct[bin * (distinct.len() - 1) / (n_bins - 1)])
            .collect();

        let mut assignments = vec![usize::MAX; values.len()];
        for _ in 0..self.params.max_iter() {
            let next: Vec<usize> = values
                .iter()
                .map(|&value| nearest(&centroids, value))
                .collect();
            if next == assignments {
                break;
            }
            assignments = next;

            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let (sum, count) = values
                    .iter()
                    .zip(&assignments)
                    .filter(|&(_, &assigned)| assigned == cluster)
                    .fold((0.0, 0usize), |(sum, count), (&value, _)| (sum + value, count + 1));
                // an emptied cluster keeps its previous centroid
                if count > 0 {
                    *centroid = sum / count as f64;
                }
            }
        }

        centroids.sort_by(f64::total_cmp);
        self.centroids = centroids;
        Ok(self)
    }

    /// Replaces each value by the label of its nearest centroid.
    pub fn transform<F: ToPrimitive>(&self, values: &[F]) -> Result<Vec<String>> {
        if self.centroids.is_empty() {
            return Err(Error::NotFitted);
        }
        let labels = self.params.bin_labels();

        Ok(to_f64(values)?
            .into_iter()
            .map(|value| labels[nearest(&self.centroids, value)].clone())
            .collect())
    }

    pub fn fit_transform<F: ToPrimitive>(&mut self, values: &[F]) -> Result<Vec<String>> {
        self.fit(values)?.transform(values)
    }

    /// Parses feature column `axis` as numbers and returns a copy of `dataset`
    /// with that column replaced by bin labels.
    pub fn discretize_column(
        &mut self,
        dataset: &Dataset<String>,
        axis: usize,
    ) -> Result<Dataset<String>> {
        let values = dataset
            .column(axis)?
            .map(|cell| {
                cell.parse::<f64>()
                    .map_err(|err| Error::Parse(format!("{:?} in column {}: {}", cell, axis, err)))
            })
            .collect::<Result<Vec<_>>>()?;

        let bins = self.fit_transform(&values)?;
        dataset.with_column(axis, bins)
    }
}

fn to_f64<F: ToPrimitive>(values: &[F]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|value| {
            value
                .to_f64()
                .filter(|value| value.is_finite())
                .ok_or_else(|| Error::Parameters("values must be finite numbers".into()))
        })
        .collect()
}

/// Index of the centroid closest to `value`; the lower index wins ties.
fn nearest(centroids: &[f64], value: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = (value - centroid).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_sorted_centroids() {
        let mut discretizer = KMeansDiscretizer::new();
        discretizer.fit(&[10.0, 1.0, 5.0, 9.8, 1.2, 5.1]).unwrap();

        let centroids = discretizer.centroids();
        assert_eq!(centroids.len(), 3);
        assert_relative_eq!(centroids[0], 1.1, epsilon = 1e-9);
        assert_relative_eq!(centroids[1], 5.05, epsilon = 1e-9);
        assert_relative_eq!(centroids[2], 9.9, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_integer_values() {
        let mut discretizer = KMeansDiscretizer::new();
        let bins = discretizer.fit_transform(&[20u8, 22, 47, 49, 70, 74]).unwrap();
        assert_eq!(bins, vec!["Low", "Low", "Normal", "Normal", "High", "High"]);
    }

    #[test]
    fn test_transform_unseen_values() {
        let mut discretizer = KMeansDiscretizer::new();
        discretizer.fit(&[1.0, 1.2, 5.0, 5.1, 9.8, 10.0]).unwrap();

        let bins = discretizer.transform(&[-3.0, 6.0, 100.0]).unwrap();
        assert_eq!(bins, vec!["Low", "Normal", "High"]);
    }

    #[test]
    fn test_transform_before_fit() {
        let discretizer = KMeansDiscretizer::new();
        assert!(matches!(discretizer.transform(&[1.0]), Err(Error::NotFitted)));
    }

    #[test]
    fn test_fit_too_few_distinct_values() {
        let mut discretizer = KMeansDiscretizer::new();
        let result = discretizer.fit(&[1.0, 1.0, 2.0, 2.0]);
        assert!(matches!(result, Err(Error::Parameters(_))));
    }

    #[test]
    fn test_fit_rejects_nan() {
        let mut discretizer = KMeansDiscretizer::new();
        assert!(discretizer.fit(&[1.0, f64::NAN, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_discretize_column() {
        let rows = vec![
            vec!["23", "F", "drugY"],
            vec!["25", "M", "drugY"],
            vec!["47", "M", "drugC"],
            vec!["49", "F", "drugC"],
            vec!["70", "F", "drugX"],
            vec!["72", "M", "drugX"],
        ];
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect();
        let dataset = Dataset::new(rows).unwrap();

        let binned = KMeansDiscretizer::new()
            .discretize_column(&dataset, 0)
            .unwrap();
        let ages: Vec<_> = binned.column(0).unwrap().cloned().collect();
        assert_eq!(ages, vec!["Low", "Low", "Normal", "Normal", "High", "High"]);
        assert_eq!(binned.label(4).map(String::as_str), Some("drugX"));
    }

    #[test]
    fn test_discretize_column_parse_error() {
        let rows = vec![
            vec!["old".to_string(), "yes".to_string()],
            vec!["1".to_string(), "no".to_string()],
        ];
        let dataset = Dataset::new(rows).unwrap();

        let result = KMeansDiscretizer::new().discretize_column(&dataset, 0);
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
