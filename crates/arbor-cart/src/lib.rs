//! CART decision trees and random forests over mixed-type rows.
//!
//! Rows hold numeric or categorical feature values followed by a class
//! label. A single tree is grown by greedy impurity-gain maximisation and
//! then pruned by merging sibling leaves; a forest grows unpruned trees on
//! random row subsets and random feature-column subsets, in parallel via
//! rayon, and predicts by one-vote-per-tree majority.

mod config;
mod counts;
mod dataset;
mod error;
mod forest;
mod impurity;
mod node;
mod oob;
mod predict;
mod prune;
mod result;
mod split;
mod tree;
mod value;

pub use config::{MaxFeatures, OobMode, RandomForestConfig};
pub use counts::ClassCounts;
pub use error::CartError;
pub use forest::RandomForest;
pub use impurity::ImpurityMetric;
pub use node::Node;
pub use oob::OobScore;
pub use prune::{Pruning, prune};
pub use result::{RandomForestResult, TrainingMetadata};
pub use split::{SplitKind, SplitRule, split};
pub use tree::{DecisionTree, DecisionTreeConfig};
pub use value::{Row, Value};
