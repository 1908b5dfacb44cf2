//! Gini impurity and information gain over symbolic datasets
use crate::data::dataset::{Dataset, Symbol};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Label frequencies kept in order of first appearance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelCounts<T: Symbol> {
    counts: Vec<(T, usize)>,
    total: usize,
}

impl<T: Symbol> LabelCounts<T> {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let mut positions: HashMap<&T, usize> = HashMap::new();
        let mut counts: Vec<(T, usize)> = Vec::new();
        let mut total = 0;

        for label in labels {
            total += 1;
            match positions.get(label) {
                Some(&position) => counts[position].1 += 1,
                None => {
                    positions.insert(label, counts.len());
                    counts.push((label.clone(), 1));
                }
            }
        }

        Self { counts, total }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(label, count)| (label, *count))
    }

    pub fn get(&self, label: &T) -> usize {
        self.counts
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map_or(0, |(_, count)| *count)
    }

    /// The only label present, if there is exactly one.
    pub fn single(&self) -> Option<&T> {
        match self.counts.as_slice() {
            [(label, _)] => Some(label),
            _ => None,
        }
    }

    /// Most frequent label. Ties go to the label that appeared first.
    pub fn majority(&self) -> Option<&T> {
        let mut best: Option<&(T, usize)> = None;
        for entry in &self.counts {
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn gini(&self) -> f64 {
        let counts: Vec<usize> = self.counts.iter().map(|(_, count)| *count).collect();
        gini_from_counts(&counts, self.total)
    }
}

/// Computes the Gini impurity `1 - Σ (c_k / n)²` of a node from its class counts.
///
/// Returns `0.0` for an empty node.
///
/// ```rust
/// use rusty_dtree::trees::impurity::gini_from_counts;
///
/// let gini = gini_from_counts(&[3, 1], 4);
/// assert!((gini - 0.375).abs() < 1e-12);
/// ```
pub fn gini_from_counts(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let sum_sq: f64 = counts
        .iter()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum();

    1.0 - sum_sq
}

/// Gini impurity of the label column.
pub fn gini<T: Symbol>(dataset: &Dataset<T>) -> Result<f64> {
    if dataset.is_empty() {
        return Err(Error::InvalidDataset(
            "impurity of an empty dataset".into(),
        ));
    }
    Ok(LabelCounts::from_labels(dataset.labels()).gini())
}

/// Impurity left after splitting on `axis`: each value subset's Gini weighted by its share of rows.
pub fn weighted_child_impurity<T: Symbol>(dataset: &Dataset<T>, axis: usize) -> Result<f64> {
    check_splittable(dataset)?;

    let mut subsets: BTreeMap<&T, Vec<&T>> = BTreeMap::new();
    for (value, row) in dataset.column(axis)?.zip(dataset.rows()) {
        if let Some(label) = row.last() {
            subsets.entry(value).or_default().push(label);
        }
    }

    let n = dataset.nrows() as f64;
    Ok(subsets
        .values()
        .map(|labels| {
            let counts = LabelCounts::from_labels(labels.iter().copied());
            counts.total() as f64 / n * counts.gini()
        })
        .sum())
}

pub fn information_gain<T: Symbol>(dataset: &Dataset<T>, axis: usize) -> Result<f64> {
    Ok(gini(dataset)? - weighted_child_impurity(dataset, axis)?)
}

/// Information gain of every feature column, in column order. The label column is never a candidate.
pub fn feature_gains<T: Symbol>(dataset: &Dataset<T>) -> Result<Vec<f64>> {
    check_splittable(dataset)?;

    let parent = gini(dataset)?;
    (0..dataset.n_features())
        .map(|axis| weighted_child_impurity(dataset, axis).map(|child| parent - child))
        .collect()
}

/// Index of the feature with the highest information gain.
///
/// A later feature must be strictly better to replace the current best, so ties go to
/// the lowest index.
pub fn choose_best_feature<T: Symbol>(dataset: &Dataset<T>) -> Result<usize> {
    Ok(argmax_first(&feature_gains(dataset)?))
}

fn argmax_first(gains: &[f64]) -> usize {
    let mut best_feature = 0;
    let mut best_gain = f64::NEG_INFINITY;
    for (axis, &gain) in gains.iter().enumerate() {
        if gain > best_gain {
            best_feature = axis;
            best_gain = gain;
        }
    }
    best_feature
}

fn check_splittable<T: Symbol>(dataset: &Dataset<T>) -> Result<()> {
    if dataset.is_empty() {
        return Err(Error::InvalidDataset("cannot split an empty dataset".into()));
    }
    if dataset.n_features() == 0 {
        return Err(Error::InvalidDataset(
            "no feature columns left to split on".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
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
    fn test_label_counts_first_appearance_order() {
        let labels = ["b", "a", "b", "c", "a"];
        let counts = LabelCounts::from_labels(labels.iter());

        let order: Vec<_> = counts.iter().collect();
        assert_eq!(order, vec![(&"b", 2), (&"a", 2), (&"c", 1)]);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.get(&"c"), 1);
        assert_eq!(counts.get(&"z"), 0);
    }

    #[test]
    fn test_majority_tie_goes_to_first_seen() {
        let labels = ["b", "a", "a", "b"];
        let counts = LabelCounts::from_labels(labels.iter());
        assert_eq!(counts.majority(), Some(&"b"));

        let labels = ["b", "a", "a"];
        let counts = LabelCounts::from_labels(labels.iter());
        assert_eq!(counts.majority(), Some(&"a"));
    }

    #[test]
    fn test_single() {
        let pure = ["x", "x"];
        assert_eq!(LabelCounts::from_labels(pure.iter()).single(), Some(&"x"));
        let mixed = ["x", "y"];
        assert_eq!(LabelCounts::from_labels(mixed.iter()).single(), None);
    }

    #[test]
    fn test_gini_from_counts() {
        assert_relative_eq!(gini_from_counts(&[3, 1], 4), 0.375);
        assert_relative_eq!(gini_from_counts(&[5], 5), 0.0);
        assert_relative_eq!(gini_from_counts(&[], 0), 0.0);
    }

    #[test]
    fn test_weather_gini_arithmetic() {
        let dataset = weather();

        assert_relative_eq!(gini(&dataset).unwrap(), 4.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(
            weighted_child_impurity(&dataset, 0).unwrap(),
            1.0 / 3.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            information_gain(&dataset, 0).unwrap(),
            1.0 / 9.0,
            epsilon = 1e-12
        );
        // temp separates the labels perfectly
        assert_relative_eq!(
            information_gain(&dataset, 1).unwrap(),
            4.0 / 9.0,
            epsilon = 1e-12
        );
        assert_eq!(choose_best_feature(&dataset).unwrap(), 1);
    }

    #[test]
    fn test_choose_best_feature_tie_takes_lowest_index() {
        let dataset = Dataset::new(vec![
            vec!["a", "a", "yes"],
            vec!["b", "b", "no"],
        ])
        .unwrap();
        assert_eq!(feature_gains(&dataset).unwrap(), vec![0.5, 0.5]);
        assert_eq!(choose_best_feature(&dataset).unwrap(), 0);
    }

    #[test]
    fn test_argmax_first_strict() {
        assert_eq!(argmax_first(&[0.25, 0.25 + 1e-15, 0.1]), 1);
        assert_eq!(argmax_first(&[0.25, 0.25, 0.1]), 0);
        assert_eq!(argmax_first(&[0.0, -0.0]), 0);
    }

    #[test]
    fn test_invalid_datasets() {
        let empty = Dataset::<&str>::empty(3);
        assert!(matches!(gini(&empty), Err(Error::InvalidDataset(_))));
        assert!(matches!(
            choose_best_feature(&empty),
            Err(Error::InvalidDataset(_))
        ));

        let labels_only = Dataset::new(vec![vec!["yes"], vec!["no"]]).unwrap();
        assert!(matches!(
            choose_best_feature(&labels_only),
            Err(Error::InvalidDataset(_))
        ));
    }

    fn synthetic_rows() -> impl Strategy<Value = Vec<Vec<u8>>> {
        (1usize..5).prop_flat_map(|width| {
            prop::collection::vec(prop::collection::vec(0u8..4, width + 1), 1..40)
        })
    }

    proptest! {
        #[test]
        fn prop_gini_bounded_by_distinct_labels(rows in synthetic_rows()) {
            let dataset = Dataset::new(rows).unwrap();
            let k = LabelCounts::from_labels(dataset.labels()).len() as f64;
            let impurity = gini(&dataset).unwrap();

            prop_assert!(impurity >= -1e-12);
            prop_assert!(impurity <= 1.0 - 1.0 / k + 1e-12);
        }

        #[test]
        fn prop_gain_never_negative(rows in synthetic_rows()) {
            let dataset = Dataset::new(rows).unwrap();
            for gain in feature_gains(&dataset).unwrap() {
                prop_assert!(gain >= -1e-9);
            }
        }

        #[test]
        fn prop_best_feature_has_maximal_gain(rows in synthetic_rows()) {
            let dataset = Dataset::new(rows).unwrap();
            let gains = feature_gains(&dataset).unwrap();
            let best = choose_best_feature(&dataset).unwrap();

            prop_assert!(best < dataset.n_features());
            for gain in &gains {
                prop_assert!(gains[best] >= *gain - 1e-9);
            }
        }
    }
}
