use crate::dataset::label;
use crate::value::{Row, Value};

/// Occurrence count per class label.
///
/// Labels are kept in first-insertion order, and that order is part of the
/// contract: [`ClassCounts::majority`] breaks ties in favour of the label
/// that was seen first. Every stored count is strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCounts {
    entries: Vec<(Value, usize)>,
}

impl ClassCounts {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the label (last value) of every row.
    ///
    /// # Panics
    ///
    /// Panics if a row is empty.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Self {
        let mut counts = Self::new();
        for row in rows {
            counts.add(label(row), 1);
        }
        counts
    }

    /// Add `count` occurrences of `label`. A zero count is ignored.
    pub fn add(&mut self, label: &Value, count: usize) {
        if count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, c)) => *c += count,
            None => self.entries.push((label.clone(), count)),
        }
    }

    /// Sum two mappings. Labels of `self` keep their position; labels only
    /// present in `other` follow in `other`'s order.
    #[must_use]
    pub fn merged(&self, other: &ClassCounts) -> ClassCounts {
        let mut out = self.clone();
        for (label, count) in &other.entries {
            out.add(label, *count);
        }
        out
    }

    /// Return the count recorded for `label` (zero if absent).
    #[must_use]
    pub fn get(&self, label: &Value) -> usize {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, c)| *c)
    }

    /// Total number of rows counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(label, count)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, usize)> {
        self.entries.iter().map(|(l, c)| (l, *c))
    }

    /// The label with the strictly highest count; the earliest label wins a tie.
    #[must_use]
    pub fn majority(&self) -> Option<&Value> {
        let mut best: Option<(&Value, usize)> = None;
        for (label, count) in self.iter() {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}
