pub mod builder;
pub mod classifier;
pub mod impurity;
pub mod node;

pub use builder::{build_tree, stop_criteria, TreeBuilder};
pub use classifier::{classify, evaluate, DecisionTreeClassifier, PredictionTally};
pub use impurity::choose_best_feature;
pub use node::{DecisionTree, InternalNode};
