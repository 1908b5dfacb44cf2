//! Recursive tree induction
use super::impurity::{choose_best_feature, information_gain, LabelCounts};
use super::node::{DecisionTree, InternalNode};
use crate::data::dataset::{check_feature_names, Dataset, Symbol};
use crate::error::{Error, Result};
use colored::Colorize;

/// Decides whether a node should become a leaf.
///
/// Returns the label when every row carries the same one, or the majority label
/// (first seen wins ties) when only the label column is left. `None` means keep splitting.
pub fn stop_criteria<T: Symbol>(dataset: &Dataset<T>) -> Result<Option<T>> {
    if dataset.is_empty() {
        return Err(Error::InvalidDataset(
            "cannot assign a label to an empty dataset".into(),
        ));
    }

    let counts = LabelCounts::from_labels(dataset.labels());
    if let Some(label) = counts.single() {
        return Ok(Some(label.clone()));
    }
    if dataset.n_features() == 0 {
        return Ok(counts.majority().cloned());
    }
    Ok(None)
}

/// Builds a tree with default settings. See [`TreeBuilder::build`].
pub fn build_tree<T: Symbol>(
    dataset: &Dataset<T>,
    feature_names: &[String],
) -> Result<DecisionTree<T>> {
    TreeBuilder::new().build(dataset, feature_names)
}

/// Grows a [`DecisionTree`] by recursive Gini splits.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    verbose: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Print every split and leaf while growing.
    /// Default value is `false`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the tree for `dataset`, whose feature columns are named by `feature_names`.
    ///
    /// Each split consumes its feature, so the depth never exceeds the number of features.
    /// Branches are grown in sorted value order.
    ///
    /// # Errors
    ///
    /// * `InvalidDataset` if the dataset is empty, `feature_names` doesn't match its width
    ///   or repeats a name.
    /// * `EmptyPartition` if a branch would be grown from zero rows.
    pub fn build<T: Symbol>(
        &self,
        dataset: &Dataset<T>,
        feature_names: &[String],
    ) -> Result<DecisionTree<T>> {
        if feature_names.len() != dataset.n_features() {
            return Err(Error::InvalidDataset(format!(
                "{} feature names for {} feature columns",
                feature_names.len(),
                dataset.n_features()
            )));
        }
        check_feature_names(feature_names)?;
        self.grow(dataset, feature_names, 0)
    }

    fn grow<T: Symbol>(
        &self,
        dataset: &Dataset<T>,
        feature_names: &[String],
        depth: usize,
    ) -> Result<DecisionTree<T>> {
        if let Some(label) = stop_criteria(dataset)? {
            if self.verbose {
                self.report_leaf(depth, &label, dataset.nrows());
            }
            return Ok(DecisionTree::Leaf(label));
        }

        let best_feature = choose_best_feature(dataset)?;
        let feature_name = &feature_names[best_feature];
        if self.verbose {
            let gain = information_gain(dataset, best_feature)?;
            self.report_split(depth, feature_name, gain, dataset.nrows());
        }

        let mut sub_feature_names = feature_names.to_vec();
        sub_feature_names.remove(best_feature);

        let mut node = InternalNode::new(feature_name.clone());
        for value in dataset.distinct_values(best_feature)? {
            let subset = dataset.split_data(best_feature, &value)?;
            let child =
                self.grow_branch(&subset, feature_name, &value, &sub_feature_names, depth + 1)?;
            node.insert(value, child);
        }

        Ok(DecisionTree::Internal(node))
    }

    fn grow_branch<T: Symbol>(
        &self,
        subset: &Dataset<T>,
        feature: &str,
        value: &T,
        feature_names: &[String],
        depth: usize,
    ) -> Result<DecisionTree<T>> {
        if subset.is_empty() {
            return Err(Error::EmptyPartition {
                feature: feature.to_string(),
                value: format!("{:?}", value),
            });
        }
        self.grow(subset, feature_names, depth)
    }

    fn report_split(&self, depth: usize, feature: &str, gain: f64, n_rows: usize) {
        println!(
            "{:indent$}{}    {}    {}",
            "",
            format!("[split {}]", feature).bold().green(),
            format!("[GAIN {:.4}]", gain).bold().yellow(),
            format!("[ROWS {}]", n_rows).bold(),
            indent = depth * 2,
        );
    }

    fn report_leaf<T: Symbol>(&self, depth: usize, label: &T, n_rows: usize) {
        println!(
            "{:indent$}{}    {}",
            "",
            format!("[leaf {:?}]", label).bold().red(),
            format!("[ROWS {}]", n_rows).bold(),
            indent = depth * 2,
        );
    }
}
