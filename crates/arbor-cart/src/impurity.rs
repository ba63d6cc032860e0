use crate::counts::ClassCounts;
use crate::value::Row;

/// Measure of class disorder used to score splits and to decide pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImpurityMetric {
    /// Information entropy: -Σ(p_i · log2(p_i))
    #[default]
    Entropy,
    /// Gini impurity: 1 - Σ(p_i²)
    Gini,
}

impl ImpurityMetric {
    /// Compute the impurity of a set of class counts.
    ///
    /// Returns `0.0` for an empty set. Entropy is also `0.0` whenever a single
    /// label is present.
    #[must_use]
    pub fn impurity(&self, counts: &ClassCounts) -> f64 {
        let total = counts.total();
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        match self {
            ImpurityMetric::Entropy => -counts
                .iter()
                .map(|(_, c)| {
                    let p = c as f64 / n;
                    p * p.log2()
                })
                .sum::<f64>(),
            ImpurityMetric::Gini => {
                let sum_sq: f64 = counts
                    .iter()
                    .map(|(_, c)| {
                        let p = c as f64 / n;
                        p * p
                    })
                    .sum();
                1.0 - sum_sq
            }
        }
    }

    /// Compute the impurity of the labels of `rows`.
    ///
    /// # Panics
    ///
    /// Panics if a row is empty.
    #[must_use]
    pub fn of_rows<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> f64 {
        self.impurity(&ClassCounts::from_rows(rows))
    }
}
