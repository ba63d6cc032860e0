//! Out-of-bag (OOB) evaluation for Random Forest.

use crate::counts::ClassCounts;
use crate::dataset::label;
use crate::error::CartError;
use crate::tree::DecisionTree;
use crate::value::Row;

/// Out-of-bag evaluation result.
#[derive(Debug, Clone)]
pub struct OobScore {
    /// OOB accuracy (fraction of correctly predicted OOB rows).
    pub accuracy: f64,
    /// Number of rows that were left out of at least one tree.
    pub n_oob_rows: usize,
}

/// Compute out-of-bag predictions and accuracy.
///
/// Each row is predicted by majority vote over the trees that did not
/// sample it, with the same one-vote-per-tree rule as
/// [`RandomForest::predict`](crate::RandomForest::predict). Rows that every
/// tree sampled are skipped.
pub(crate) fn compute_oob(
    trees: &[DecisionTree],
    rows: &[Row],
    oob_indices_per_tree: &[Vec<usize>],
) -> Result<OobScore, CartError> {
    let mut oob_votes: Vec<ClassCounts> = vec![ClassCounts::new(); rows.len()];

    for (tree, oob_indices) in trees.iter().zip(oob_indices_per_tree) {
        for &row_idx in oob_indices {
            if let Some(vote) = tree.root.route(&rows[row_idx]).majority() {
                oob_votes[row_idx].add(vote, 1);
            }
        }
    }

    let mut n_oob_rows = 0usize;
    let mut correct = 0usize;
    for (row, votes) in rows.iter().zip(&oob_votes) {
        let Some(predicted) = votes.majority() else {
            continue;
        };
        n_oob_rows += 1;
        if predicted == label(row) {
            correct += 1;
        }
    }

    if n_oob_rows == 0 {
        return Err(CartError::OobEvaluationFailed {
            reason: "no row was left out of any tree".to_string(),
        });
    }

    Ok(OobScore {
        accuracy: correct as f64 / n_oob_rows as f64,
        n_oob_rows,
    })
}
