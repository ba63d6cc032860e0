//! Training result types for Random Forest.

use crate::forest::RandomForest;
use crate::oob::OobScore;

/// Metadata about the training run.
#[derive(Debug, Clone)]
pub struct TrainingMetadata {
    /// Number of trees trained.
    pub n_trees: usize,
    /// Number of feature columns in the dataset.
    pub n_features: usize,
    /// Number of training rows.
    pub n_rows: usize,
    /// Feature columns each tree was allowed to split on.
    pub max_features_resolved: usize,
    /// Rows drawn for each tree.
    pub sample_size: usize,
}

/// Result of Random Forest training.
///
/// Contains the fitted forest, optional OOB score, per-tree OOB indices,
/// and training metadata.
#[derive(Debug)]
pub struct RandomForestResult {
    forest: RandomForest,
    oob_score: Option<OobScore>,
    oob_indices_per_tree: Vec<Vec<usize>>,
    metadata: TrainingMetadata,
}

impl RandomForestResult {
    /// Create a new training result.
    pub(crate) fn new(
        forest: RandomForest,
        oob_score: Option<OobScore>,
        oob_indices_per_tree: Vec<Vec<usize>>,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            forest,
            oob_score,
            oob_indices_per_tree,
            metadata,
        }
    }

    /// Borrow the fitted forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Consume the result and return the fitted forest.
    #[must_use]
    pub fn into_forest(self) -> RandomForest {
        self.forest
    }

    /// Return the OOB score, if computed.
    #[must_use]
    pub fn oob_score(&self) -> Option<&OobScore> {
        self.oob_score.as_ref()
    }

    /// Return training metadata.
    #[must_use]
    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    /// Return, per tree, the indices of the rows it did not sample.
    #[must_use]
    pub fn oob_indices_per_tree(&self) -> &[Vec<usize>] {
        &self.oob_indices_per_tree
    }
}
