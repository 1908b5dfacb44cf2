use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

/// A symbolic feature or label value.
///
/// Values are opaque to the trees: only equality, hashing and ordering are used.
/// Ordering only fixes the order branches are built and printed in.
pub trait Symbol: Debug + Clone + Eq + Hash + Ord + Send + Sync + 'static {}

impl<T> Symbol for T where T: Debug + Clone + Eq + Hash + Ord + Send + Sync + 'static {}

/// Rows of symbols where the last column of every row is the class label.
#[derive(Clone, PartialEq, Eq)]
pub struct Dataset<T: Symbol> {
    rows: Vec<Vec<T>>,
    ncols: usize,
}

impl<T: Symbol> Debug for Dataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    rows: [\n")?;

        for row in &self.rows {
            write!(f, "        [")?;
            for value in row {
                write!(f, "{:?}, ", value)?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ]\n}}")
    }
}

impl<T: Symbol> Dataset<T> {
    /// Creates a dataset from rows whose last element is the label.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidDataset` when `rows` is empty, a row has no label, or rows
    /// differ in length. Use [`Dataset::empty`] for a dataset without rows.
    pub fn new(rows: Vec<Vec<T>>) -> Result<Self> {
        let ncols = match rows.first() {
            Some(row) => row.len(),
            None => {
                return Err(Error::InvalidDataset(
                    "cannot infer the row width of an empty dataset".into(),
                ))
            }
        };
        if ncols == 0 {
            return Err(Error::InvalidDataset("rows must hold at least a label".into()));
        }
        if let Some(index) = rows.iter().position(|row| row.len() != ncols) {
            return Err(Error::InvalidDataset(format!(
                "row {} has {} columns, expected {}",
                index,
                rows[index].len(),
                ncols
            )));
        }

        Ok(Self { rows, ncols })
    }

    /// Creates a dataset without rows whose rows would be `ncols` wide.
    pub fn empty(ncols: usize) -> Self {
        Self {
            rows: Vec::new(),
            ncols,
        }
    }

    /// Creates a dataset from a feature table and a parallel label column.
    pub fn from_parts(features: Vec<Vec<T>>, labels: Vec<T>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::InvalidDataset(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let rows = features
            .into_iter()
            .zip(labels)
            .map(|(mut row, label)| {
                row.push(label);
                row
            })
            .collect();
        Self::new(rows)
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[T]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Row width including the label column.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of feature columns, i.e. everything but the label.
    pub fn n_features(&self) -> usize {
        self.ncols.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Feature values of row `index`, without the label.
    pub fn features(&self, index: usize) -> Option<&[T]> {
        self.rows.get(index).map(|row| &row[..row.len() - 1])
    }

    pub fn label(&self, index: usize) -> Option<&T> {
        self.rows.get(index).and_then(|row| row.last())
    }

    pub fn labels(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter().filter_map(|row| row.last())
    }

    /// Values of feature column `axis` in row order.
    pub fn column(&self, axis: usize) -> Result<impl Iterator<Item = &T> + '_> {
        self.check_axis(axis)?;
        Ok(self.rows.iter().map(move |row| &row[axis]))
    }

    /// Distinct values of feature column `axis`, sorted.
    pub fn distinct_values(&self, axis: usize) -> Result<Vec<T>> {
        let values: BTreeSet<_> = self.column(axis)?.cloned().collect();
        Ok(values.into_iter().collect())
    }

    /// Selects the rows whose column `axis` equals `value` and drops that column.
    ///
    /// The label stays last and the remaining columns keep their relative order.
    /// No matching rows gives an empty dataset one column narrower.
    pub fn split_data(&self, axis: usize, value: &T) -> Result<Self> {
        self.check_axis(axis)?;

        let rows = self
            .rows
            .iter()
            .filter(|row| &row[axis] == value)
            .map(|row| {
                let mut reduced = Vec::with_capacity(self.ncols - 1);
                reduced.extend_from_slice(&row[..axis]);
                reduced.extend_from_slice(&row[axis + 1..]);
                reduced
            })
            .collect();

        Ok(Self {
            rows,
            ncols: self.ncols - 1,
        })
    }

    /// Returns a copy with feature column `axis` replaced by `values`.
    pub fn with_column(&self, axis: usize, values: Vec<T>) -> Result<Self> {
        self.check_axis(axis)?;
        if values.len() != self.nrows() {
            return Err(Error::InvalidDataset(format!(
                "replacement column has {} values for {} rows",
                values.len(),
                self.nrows()
            )));
        }

        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row[axis] = value;
                row
            })
            .collect();

        Ok(Self {
            rows,
            ncols: self.ncols,
        })
    }

    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(Error::Parameters(
                "train size should be between 0.0 and 1.0".into(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;

        let select = |indices: &[usize]| Self {
            rows: indices.iter().map(|&index| self.rows[index].clone()).collect(),
            ncols: self.ncols,
        };

        Ok((select(&indices[..train_size]), select(&indices[train_size..])))
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.n_features() {
            return Err(Error::FeatureIndexOutOfBounds {
                index: axis,
                n_features: self.n_features(),
            });
        }
        Ok(())
    }
}

/// Rejects feature names that appear more than once.
///
/// Trees find a node's column by name, so a repeated name would route rows through the
/// wrong column.
pub fn check_feature_names(feature_names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(feature_names.len());
    for name in feature_names {
        if !seen.insert(name) {
            return Err(Error::InvalidDataset(format!(
                "duplicate feature name {:?}",
                name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn weather() -> Dataset<&'static str> {
        Dataset::new(vec![
            vec!["sunny", "hot", "no"],
            vec!["sunny", "cool", "yes"],
            vec!["rain", "cool", "yes"],
        ])
        .unwrap()
    }

    #[test]
    fn test_dataset_new() {
        let dataset = weather();
        assert_eq!(dataset.nrows(), 3);
        assert_eq!(dataset.ncols(), 3);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.features(1), Some(&["sunny", "cool"][..]));
        assert_eq!(dataset.label(0), Some(&"no"));
    }

    #[test]
    fn test_dataset_new_ragged() {
        let result = Dataset::new(vec![vec![1, 2, 3], vec![1, 2]]);
        assert!(matches!(result, Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn test_dataset_new_empty() {
        assert!(matches!(
            Dataset::<u8>::new(vec![]),
            Err(Error::InvalidDataset(_))
        ));
        assert!(matches!(
            Dataset::<u8>::new(vec![vec![]]),
            Err(Error::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_dataset_from_parts() {
        let dataset =
            Dataset::from_parts(vec![vec![1, 2], vec![3, 4]], vec![5, 6]).unwrap();
        assert_eq!(dataset.rows(), &[vec![1, 2, 5], vec![3, 4, 6]]);

        let mismatched = Dataset::from_parts(vec![vec![1, 2]], vec![5, 6]);
        assert!(mismatched.is_err());
    }

    #[test]
    fn test_dataset_formatting() {
        let dataset = Dataset::new(vec![vec![1, 2, 5], vec![3, 4, 6]]).unwrap();

        let expected_str = "\
Dataset {
    rows: [
        [1, 2, 5, ],
        [3, 4, 6, ],
    ]
}";

        assert_eq!(format!("{:?}", dataset), expected_str);
    }

    #[test]
    fn test_dataset_distinct_values_sorted() {
        let dataset = weather();
        assert_eq!(dataset.distinct_values(0).unwrap(), vec!["rain", "sunny"]);
        assert_eq!(dataset.distinct_values(1).unwrap(), vec!["cool", "hot"]);
    }

    #[test]
    fn test_split_data() {
        let subset = weather().split_data(0, &"sunny").unwrap();
        assert_eq!(subset.rows(), &[vec!["hot", "no"], vec!["cool", "yes"]]);
        assert_eq!(subset.ncols(), 2);
    }

    #[test]
    fn test_split_data_no_match() {
        let subset = weather().split_data(1, &"mild").unwrap();
        assert!(subset.is_empty());
        assert_eq!(subset.ncols(), 2);
    }

    #[test]
    fn test_split_data_never_drops_label() {
        let result = weather().split_data(2, &"yes");
        assert!(matches!(
            result,
            Err(Error::FeatureIndexOutOfBounds {
                index: 2,
                n_features: 2
            })
        ));
    }

    #[test]
    fn test_with_column() {
        let dataset = weather()
            .with_column(1, vec!["high", "low", "low"])
            .unwrap();
        assert_eq!(dataset.row(0), Some(&["sunny", "high", "no"][..]));
        assert!(weather().with_column(1, vec!["high"]).is_err());
    }

    #[test]
    fn test_dataset_train_test_split() {
        let dataset = Dataset::new(vec![vec![1, 9], vec![2, 10], vec![3, 11], vec![4, 12]]).unwrap();

        let (train, test) = dataset.train_test_split(0.75, Some(42)).unwrap();
        assert_eq!(train.nrows(), 3);
        assert_eq!(test.nrows(), 1);
        assert!(dataset.train_test_split(1.5, None).is_err());
    }

    #[test]
    fn test_check_feature_names() {
        let unique = vec!["weather".to_string(), "temp".to_string()];
        assert!(check_feature_names(&unique).is_ok());
        assert!(check_feature_names(&[]).is_ok());

        let repeated = vec!["f".to_string(), "g".to_string(), "f".to_string()];
        assert!(matches!(
            check_feature_names(&repeated),
            Err(Error::InvalidDataset(message)) if message.contains("\"f\"")
        ));
    }

    proptest! {
        #[test]
        fn prop_split_data_keeps_only_matching_rows(
            rows in prop::collection::vec(prop::collection::vec(0u8..3, 4), 1..30),
            axis in 0usize..3,
            value in 0u8..3,
        ) {
            let dataset = Dataset::new(rows.clone()).unwrap();
            let subset = dataset.split_data(axis, &value).unwrap();

            let expected: Vec<Vec<u8>> = rows
                .iter()
                .filter(|row| row[axis] == value)
                .map(|row| {
                    let mut row = row.clone();
                    row.remove(axis);
                    row
                })
                .collect();

            prop_assert_eq!(subset.rows(), expected.as_slice());
            prop_assert_eq!(subset.ncols(), 3);
        }
    }
}
