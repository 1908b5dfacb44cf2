//! # Rusty-dtree
//!
//! `rusty-dtree` induces categorical decision trees from labeled, discretized examples,
//! choosing every split by Gini impurity, and classifies new rows by walking the tree.
//! It also contains a small CSV loader, a k-means discretizer for continuous columns
//! and classification metrics.
//!
//! ## Getting Started
//!
//! To use `rusty-dtree`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-dtree = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_dtree::data::dataset::Dataset;
//! use rusty_dtree::trees::{build_tree, classify, evaluate};
//!
//! let dataset = Dataset::new(vec![
//!     vec!["sunny", "hot", "no"],
//!     vec!["sunny", "cool", "yes"],
//!     vec!["rain", "cool", "yes"],
//! ])
//! .unwrap();
//! let feature_names = vec!["weather".to_string(), "temp".to_string()];
//!
//! let tree = build_tree(&dataset, &feature_names).unwrap();
//!
//! assert_eq!(classify(&tree, &feature_names, &["rain", "hot"]).unwrap(), "no");
//! assert_eq!(evaluate(&dataset, &feature_names, &tree).unwrap().correct, 3);
//! ```

/// Datasets of symbols and loading them from files
pub mod data;
/// Error type shared by the whole crate
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Discretization of continuous columns
pub mod preprocessing;
/// Decision trees
pub mod trees;

pub use error::{Error, Result};
