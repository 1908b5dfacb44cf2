use crate::data::dataset::Symbol;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A categorical decision tree.
///
/// Every node owns its children. A tree is built once and never grown afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecisionTree<T: Symbol> {
    /// Predicts a single label for every row reaching it.
    Leaf(T),
    /// Splits on one feature.
    Internal(InternalNode<T>),
}

/// A decision node: the feature it tests and one subtree per value seen in training.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InternalNode<T: Symbol> {
    pub(crate) feature: String,
    pub(crate) branches: BTreeMap<T, DecisionTree<T>>,
}

impl<T: Symbol> InternalNode<T> {
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            branches: BTreeMap::new(),
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn branches(&self) -> &BTreeMap<T, DecisionTree<T>> {
        &self.branches
    }

    pub fn branch(&self, value: &T) -> Option<&DecisionTree<T>> {
        self.branches.get(value)
    }

    pub fn insert(&mut self, value: T, child: DecisionTree<T>) {
        self.branches.insert(value, child);
    }
}

impl<T: Symbol> DecisionTree<T> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, DecisionTree::Leaf(_))
    }

    pub fn label(&self) -> Option<&T> {
        match self {
            DecisionTree::Leaf(label) => Some(label),
            DecisionTree::Internal(_) => None,
        }
    }

    /// Number of decision nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            DecisionTree::Leaf(_) => 0,
            DecisionTree::Internal(node) => {
                1 + node
                    .branches
                    .values()
                    .map(DecisionTree::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.iter().filter(|node| node.is_leaf()).count()
    }

    pub fn n_nodes(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over all nodes, parents before children.
    pub fn iter(&self) -> NodeIter<'_, T> {
        NodeIter::new(vec![self])
    }

    /// Walks the tree for `row` and returns the label of the leaf it reaches.
    ///
    /// `row` is aligned with `feature_names`, the names the tree was trained with.
    /// Extra trailing values such as the row's own label are ignored.
    ///
    /// # Errors
    ///
    /// * `UnknownFeatureName` if a node tests a feature missing from `feature_names`.
    /// * `ClassifyNoMatch` if the row holds a value the node never saw in training.
    /// * `InvalidDataset` if `row` is shorter than `feature_names`.
    pub fn classify<'a>(&'a self, feature_names: &[String], row: &[T]) -> Result<&'a T> {
        if row.len() < feature_names.len() {
            return Err(Error::InvalidDataset(format!(
                "row has {} values for {} features",
                row.len(),
                feature_names.len()
            )));
        }

        let mut current = self;
        loop {
            match current {
                DecisionTree::Leaf(label) => return Ok(label),
                DecisionTree::Internal(node) => {
                    let index = feature_names
                        .iter()
                        .position(|name| name == &node.feature)
                        .ok_or_else(|| Error::UnknownFeatureName(node.feature.clone()))?;
                    let value = &row[index];
                    current = node.branch(value).ok_or_else(|| Error::ClassifyNoMatch {
                        feature: node.feature.clone(),
                        value: format!("{:?}", value),
                    })?;
                }
            }
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            DecisionTree::Leaf(label) => writeln!(f, "{:?}", label),
            DecisionTree::Internal(node) => {
                writeln!(f, "[{}]", node.feature)?;
                for (value, child) in &node.branches {
                    write!(f, "{:indent$}{:?} -> ", "", value, indent = (depth + 1) * 2)?;
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the tree one branch per line, children indented under their parent.
impl<T: Symbol> fmt::Display for DecisionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Level-order iterator over the nodes of a decision tree
pub struct NodeIter<'a, T: Symbol> {
    queue: std::collections::VecDeque<&'a DecisionTree<T>>,
}

impl<'a, T: Symbol> NodeIter<'a, T> {
    pub fn new(queue: Vec<&'a DecisionTree<T>>) -> Self {
        NodeIter {
            queue: queue.into(),
        }
    }
}

impl<'a, T: Symbol> Iterator for NodeIter<'a, T> {
    type Item = &'a DecisionTree<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front().map(|node| {
            if let DecisionTree::Internal(internal) = node {
                self.queue.extend(internal.branches.values());
            }
            node
        })
    }
}
