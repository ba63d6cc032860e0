use std::fmt;

use crate::counts::ClassCounts;
use crate::impurity::ImpurityMetric;
use crate::value::{Row, Value};

/// How a split value is tested against a row cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// Matches when `cell >= value` (numeric threshold).
    Comparison,
    /// Matches when `cell == value` (categorical equality).
    Equality,
}

impl SplitKind {
    /// Numbers split by comparison, categories by equality.
    #[must_use]
    pub fn for_value(value: &Value) -> Self {
        if value.is_number() {
            SplitKind::Comparison
        } else {
            SplitKind::Equality
        }
    }
}

/// A binary test on one feature column, fixed when the split is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRule {
    column: usize,
    value: Value,
    kind: SplitKind,
}

impl SplitRule {
    /// Create a rule whose kind follows the type of `value`.
    #[must_use]
    pub fn new(column: usize, value: Value) -> Self {
        let kind = SplitKind::for_value(&value);
        Self {
            column,
            value,
            kind,
        }
    }

    /// Return the tested column index.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Return the split value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Return the test kind.
    #[must_use]
    pub fn kind(&self) -> SplitKind {
        self.kind
    }

    /// Return `true` if `row` belongs on the matching (true) side.
    ///
    /// A categorical cell never passes a numeric threshold, and a number
    /// never equals a category.
    #[must_use]
    pub fn matches(&self, row: &[Value]) -> bool {
        let cell = &row[self.column];
        match self.kind {
            SplitKind::Comparison => match (cell, &self.value) {
                (Value::Number(x), Value::Number(t)) => x >= t,
                _ => false,
            },
            SplitKind::Equality => *cell == self.value,
        }
    }
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            SplitKind::Comparison => ">=",
            SplitKind::Equality => "==",
        };
        write!(f, "col[{}] {op} {}", self.column, self.value)
    }
}

/// Partition `rows` into `(matching, non_matching)` under `rule`.
///
/// The partition is stable: each side keeps the input order, and rows are
/// borrowed rather than copied.
///
/// # Panics
///
/// Panics if a row is too short to hold `rule`'s column.
pub fn split<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    rule: &SplitRule,
) -> (Vec<&'a Row>, Vec<&'a Row>) {
    rows.into_iter().partition(|row| rule.matches(row))
}

/// The winning split at a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult<'a> {
    pub(crate) rule: SplitRule,
    pub(crate) gain: f64,
    pub(crate) matching: Vec<&'a Row>,
    pub(crate) non_matching: Vec<&'a Row>,
}

/// Distinct values of `column` in first-occurrence order.
fn candidate_values<'a>(rows: &[&'a Row], column: usize) -> Vec<&'a Value> {
    let mut seen: Vec<&Value> = Vec::new();
    for row in rows {
        let v = &row[column];
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

/// Find the split with the largest impurity gain.
///
/// Columns are scanned in the order given, candidate values in
/// first-occurrence order, and only a strictly larger gain replaces the
/// current best, so the scan is deterministic. Candidates equal to
/// `missing` are skipped. Returns `None` when no split has positive gain
/// with both sides non-empty.
pub(crate) fn find_best_split<'a>(
    rows: &[&'a Row],
    columns: &[usize],
    metric: ImpurityMetric,
    missing: Option<&Value>,
) -> Option<SplitResult<'a>> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    let base = metric.of_rows(rows.iter().copied());

    let mut best_gain = 0.0;
    let mut best: Option<SplitResult<'a>> = None;

    for &column in columns {
        for value in candidate_values(rows, column) {
            if missing.is_some_and(|m| m == value) {
                continue;
            }
            let rule = SplitRule::new(column, value.clone());
            let (matching, non_matching) = split(rows.iter().copied(), &rule);
            if matching.is_empty() || non_matching.is_empty() {
                continue;
            }

            let p = matching.len() as f64 / n;
            let weighted = p * metric.impurity(&ClassCounts::from_rows(matching.iter().copied()))
                + (1.0 - p) * metric.impurity(&ClassCounts::from_rows(non_matching.iter().copied()));
            let gain = base - weighted;

            if gain > best_gain {
                best_gain = gain;
                best = Some(SplitResult {
                    rule,
                    gain,
                    matching,
                    non_matching,
                });
            }
        }
    }

    best
}
