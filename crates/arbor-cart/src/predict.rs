//! Prediction methods for the Random Forest ensemble.

use std::collections::BTreeMap;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::counts::ClassCounts;
use crate::dataset::label;
use crate::error::CartError;
use crate::forest::RandomForest;
use crate::value::{Row, Value};

/// Reject rows that do not cover every feature column.
pub(crate) fn check_row(row: &[Value], n_features: usize) -> Result<(), CartError> {
    if row.len() < n_features {
        return Err(CartError::RowTooShort {
            expected: n_features,
            got: row.len(),
        });
    }
    Ok(())
}

/// Fraction of labeled rows for which `predict` returns the row's label.
pub(crate) fn accuracy(
    rows: &[Row],
    n_features: usize,
    predict: impl Fn(&Row) -> Result<Value, CartError>,
) -> Result<f64, CartError> {
    if rows.is_empty() {
        return Err(CartError::EmptyDataset);
    }
    let mut correct = 0usize;
    for row in rows {
        // A labeled row carries one value past the features.
        check_row(row, n_features + 1)?;
        if predict(row)? == *label(row) {
            correct += 1;
        }
    }
    Ok(correct as f64 / rows.len() as f64)
}

impl RandomForest {
    /// Tally one vote per tree for `row`.
    ///
    /// Each tree votes for the majority label of the leaf `row` reaches.
    /// Labels appear in the order their first vote was cast, i.e. tree order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::RowTooShort`] when `row` is shorter than the feature count.
    pub fn votes(&self, row: &[Value]) -> Result<ClassCounts, CartError> {
        check_row(row, self.n_features)?;
        let mut votes = ClassCounts::new();
        for tree in &self.trees {
            if let Some(label) = tree.root.route(row).majority() {
                votes.add(label, 1);
            }
        }
        Ok(votes)
    }

    /// Predict the label with the most tree votes for `row`.
    ///
    /// Ties go to the label whose first vote came from the earliest tree.
    ///
    /// # Errors
    ///
    /// | Variant                    | When                                          |
    /// |----------------------------|-----------------------------------------------|
    /// | [`CartError::RowTooShort`] | `row` is shorter than the feature count       |
    /// | [`CartError::EmptyLeaf`]   | no tree produced a vote                       |
    pub fn predict(&self, row: &[Value]) -> Result<Value, CartError> {
        self.votes(row)?
            .majority()
            .cloned()
            .ok_or(CartError::EmptyLeaf)
    }

    /// Predict labels for a batch of rows in parallel, in input order.
    ///
    /// # Errors
    ///
    /// Returns the first error any row produces, see [`RandomForest::predict`].
    pub fn predict_batch(&self, rows: &[Row]) -> Result<Vec<Value>, CartError> {
        rows.into_par_iter().map(|row| self.predict(row)).collect()
    }

    /// Predict labels for rows tagged with a caller-supplied identifier.
    ///
    /// The identifier is usually a key column removed from the row before
    /// training. If a key repeats, the later row's prediction is kept.
    ///
    /// # Errors
    ///
    /// Returns the first error any row produces, see [`RandomForest::predict`].
    pub fn predict_keyed<K>(&self, rows: &[(K, Row)]) -> Result<BTreeMap<K, Value>, CartError>
    where
        K: Ord + Clone + Send + Sync,
    {
        let predictions: Vec<(K, Value)> = rows
            .into_par_iter()
            .map(|(key, row)| self.predict(row).map(|label| (key.clone(), label)))
            .collect::<Result<_, CartError>>()?;
        Ok(predictions.into_iter().collect())
    }

    /// Fraction of labeled `rows` whose label matches the forest's prediction.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyDataset`] for no rows,
    /// [`CartError::RowTooShort`] for a row without a label, and any error
    /// from [`RandomForest::predict`].
    pub fn score(&self, rows: &[Row]) -> Result<f64, CartError> {
        accuracy(rows, self.n_features, |row| self.predict(row))
    }
}
