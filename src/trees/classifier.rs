//! Decision Tree Classifier
use super::builder::TreeBuilder;
use super::node::DecisionTree;
use crate::data::dataset::{Dataset, Symbol};
use crate::error::{Error, Result};
use crate::metrics::confusion::ClassificationMetrics;
use rayon::prelude::*;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correct / incorrect prediction counts over a labeled dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PredictionTally {
    pub correct: usize,
    pub incorrect: usize,
}

impl PredictionTally {
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Share of correct predictions, `0.0` when nothing was predicted.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct as f64 / total as f64,
        }
    }

    /// Tallies predictions already made against the true labels, pairwise.
    pub fn from_predictions<T: PartialEq>(truth: &[T], predicted: &[T]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::InvalidDataset(format!(
                "{} labels for {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        Ok(truth
            .iter()
            .zip(predicted)
            .fold(Self::default(), |tally, (expected, actual)| {
                tally.record(expected == actual)
            }))
    }

    fn record(mut self, matched: bool) -> Self {
        if matched {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self
    }
}

impl fmt::Display for PredictionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Yes: {}, No: {}}}", self.correct, self.incorrect)
    }
}

/// Predicts the label of `row`, which is aligned with the training `feature_names`.
pub fn classify<T: Symbol>(tree: &DecisionTree<T>, feature_names: &[String], row: &[T]) -> Result<T> {
    tree.classify(feature_names, row).cloned()
}

/// Classifies every row of `dataset` and counts how many predictions match the row's label.
///
/// Stops at the first row that can't be classified.
pub fn evaluate<T: Symbol>(
    dataset: &Dataset<T>,
    feature_names: &[String],
    tree: &DecisionTree<T>,
) -> Result<PredictionTally> {
    dataset
        .rows()
        .iter()
        .try_fold(PredictionTally::default(), |tally, row| {
            let predicted = tree.classify(feature_names, row)?;
            Ok(tally.record(row.last() == Some(predicted)))
        })
}

/// A categorical decision tree classifier using the Gini criterion.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<T: Symbol> {
    root: Option<DecisionTree<T>>,
    feature_names: Vec<String>,
    builder: TreeBuilder,
}

impl<T: Symbol> Default for DecisionTreeClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Symbol> ClassificationMetrics<T> for DecisionTreeClassifier<T> {}

impl<T: Symbol> DecisionTreeClassifier<T> {
    pub fn new() -> Self {
        Self {
            root: None,
            feature_names: Vec::new(),
            builder: TreeBuilder::new(),
        }
    }

    /// Creates a classifier that prints its splits while fitting.
    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            builder: TreeBuilder::new().verbose(verbose),
            ..Self::new()
        }
    }

    pub fn tree(&self) -> Option<&DecisionTree<T>> {
        self.root.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Builds the tree from a dataset, replacing any previously fitted tree.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree couldn't be built.
    pub fn fit(&mut self, dataset: &Dataset<T>, feature_names: &[String]) -> Result<&DecisionTree<T>> {
        let tree = self.builder.build(dataset, feature_names)?;
        self.feature_names = feature_names.to_vec();
        Ok(self.root.insert(tree))
    }

    /// Predicts the label of a single row.
    pub fn predict(&self, row: &[T]) -> Result<T> {
        classify(self.fitted()?, &self.feature_names, row)
    }

    /// Predicts every row of `dataset` in parallel, in row order.
    pub fn predict_all(&self, dataset: &Dataset<T>) -> Result<Vec<T>> {
        let tree = self.fitted()?;
        dataset
            .rows()
            .par_iter()
            .map(|row| classify(tree, &self.feature_names, row))
            .collect()
    }

    pub fn evaluate(&self, dataset: &Dataset<T>) -> Result<PredictionTally> {
        evaluate(dataset, &self.feature_names, self.fitted()?)
    }

    fn fitted(&self) -> Result<&DecisionTree<T>> {
        self.root.as_ref().ok_or(Error::NotFitted)
    }
}
