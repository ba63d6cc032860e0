use tracing::{debug, instrument, trace};

use crate::{
    CartError,
    counts::ClassCounts,
    dataset,
    impurity::ImpurityMetric,
    node::Node,
    predict,
    prune::{Pruning, prune},
    split::find_best_split,
    value::{Row, Value},
};

/// Configuration for a single CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter        | Default                 |
/// |------------------|-------------------------|
/// | `criterion`      | `Entropy`               |
/// | `pruning`        | `MinGain(1.0)`          |
/// | `missing_marker` | `Some(Category("?"))`   |
///
/// Gini impurity never exceeds 1, so under the default `MinGain(1.0)` every
/// split of a Gini tree is merged away and the tree collapses to one leaf.
/// Pair [`ImpurityMetric::Gini`] with a smaller threshold or
/// [`Pruning::Disabled`].
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) criterion: ImpurityMetric,
    pub(crate) pruning: Pruning,
    pub(crate) missing_marker: Option<Value>,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: ImpurityMetric::Entropy,
            pruning: Pruning::default(),
            missing_marker: Some(Value::from("?")),
        }
    }

    /// Set the impurity metric used for split search and pruning.
    ///
    /// The pruning threshold is measured in the same metric's units.
    #[must_use]
    pub fn with_criterion(mut self, criterion: ImpurityMetric) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the post-pruning strategy.
    #[must_use]
    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Set the value that is never used as a split point. `None` allows all values.
    #[must_use]
    pub fn with_missing_marker(mut self, missing_marker: Option<Value>) -> Self {
        self.missing_marker = missing_marker;
        self
    }

    // --- Getters ---

    /// Return the impurity metric.
    #[must_use]
    pub fn criterion(&self) -> ImpurityMetric {
        self.criterion
    }

    /// Return the post-pruning strategy.
    #[must_use]
    pub fn pruning(&self) -> Pruning {
        self.pruning
    }

    /// Return the missing-value marker, if any.
    #[must_use]
    pub fn missing_marker(&self) -> Option<&Value> {
        self.missing_marker.as_ref()
    }

    /// Grow a tree on `rows` (features followed by label) and prune it.
    ///
    /// Every feature column is searched at every node.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                  |
    /// |-------------------------------------|---------------------------------------|
    /// | [`CartError::EmptyDataset`]         | `rows` is empty                       |
    /// | [`CartError::ZeroFeatures`]         | rows hold only a label                |
    /// | [`CartError::RowLengthMismatch`]    | rows have inconsistent lengths        |
    /// | [`CartError::NonFiniteValue`]       | a numeric cell is NaN or infinite     |
    /// | [`CartError::InvalidPruningGain`]   | the pruning threshold is not finite   |
    #[instrument(skip(self, rows), fields(n_rows = rows.len()))]
    pub fn fit(&self, rows: &[Row]) -> Result<DecisionTree, CartError> {
        let n_features = dataset::validate(rows)?;
        if let Pruning::MinGain(min_gain) = self.pruning
            && !min_gain.is_finite()
        {
            return Err(CartError::InvalidPruningGain { min_gain });
        }

        debug!(
            n_rows = rows.len(),
            n_features,
            criterion = ?self.criterion,
            "fitting decision tree"
        );

        let columns: Vec<usize> = (0..n_features).collect();
        let refs: Vec<&Row> = rows.iter().collect();
        let grown = grow(&refs, &columns, self.criterion, self.missing_marker.as_ref());
        let grown_nodes = grown.n_nodes();

        let root = match self.pruning {
            Pruning::MinGain(min_gain) => prune(grown, self.criterion, min_gain),
            Pruning::Disabled => grown,
        };

        debug!(
            grown_nodes,
            n_nodes = root.n_nodes(),
            depth = root.depth(),
            "decision tree built"
        );

        Ok(DecisionTree { root, n_features })
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively grow an unpruned tree, searching only `columns`.
pub(crate) fn grow(
    rows: &[&Row],
    columns: &[usize],
    criterion: ImpurityMetric,
    missing: Option<&Value>,
) -> Node {
    if rows.is_empty() {
        return Node::leaf(ClassCounts::new());
    }

    match find_best_split(rows, columns, criterion, missing) {
        Some(split) => {
            trace!(rule = %split.rule, gain = split.gain, n_rows = rows.len(), "split");
            let on_true = grow(&split.matching, columns, criterion, missing);
            let on_false = grow(&split.non_matching, columns, criterion, missing);
            Node::internal(split.rule, on_true, on_false)
        }
        None => Node::leaf(ClassCounts::from_rows(rows.iter().copied())),
    }
}

/// A fitted CART decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub(crate) root: Node,
    pub(crate) n_features: usize,
}

impl DecisionTree {
    /// Route `row` to a leaf and return its class counts.
    ///
    /// `row` may carry a trailing label; only feature columns are read.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::RowTooShort`] when `row` has fewer values than
    /// the tree has feature columns.
    pub fn classify(&self, row: &[Value]) -> Result<&ClassCounts, CartError> {
        predict::check_row(row, self.n_features)?;
        Ok(self.root.route(row))
    }

    /// Predict the majority label of the leaf `row` is routed to.
    ///
    /// # Errors
    ///
    /// | Variant                    | When                                     |
    /// |----------------------------|------------------------------------------|
    /// | [`CartError::RowTooShort`] | `row` is shorter than the feature count  |
    /// | [`CartError::EmptyLeaf`]   | the leaf reached holds no training rows  |
    pub fn predict(&self, row: &[Value]) -> Result<Value, CartError> {
        self.classify(row)?
            .majority()
            .cloned()
            .ok_or(CartError::EmptyLeaf)
    }

    /// Fraction of labeled `rows` whose label matches the prediction.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyDataset`] for no rows,
    /// [`CartError::RowTooShort`] for a row without a label, and any
    /// error from [`DecisionTree::predict`].
    pub fn score(&self, rows: &[Row]) -> Result<f64, CartError> {
        predict::accuracy(rows, self.n_features, |row| self.predict(row))
    }

    /// Borrow the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Return the number of feature columns the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the total number of nodes in the tree.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Return the maximum depth; a single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SplitRule;

    fn rows(data: &[(f64, &str)]) -> Vec<Row> {
        data.iter()
            .map(|&(x, l)| vec![Value::from(x), Value::from(l)])
            .collect()
    }

    fn leaf(label: &str, n: usize) -> Node {
        let mut counts = ClassCounts::new();
        counts.add(&Value::from(label), n);
        Node::leaf(counts)
    }

    #[test]
    fn empty_dataset_error() {
        let err = DecisionTreeConfig::new().fit(&[]).unwrap_err();
        assert!(matches!(err, CartError::EmptyDataset));
    }

    #[test]
    fn separable_numeric_column() {
        let data = rows(&[(1.0, "A"), (1.0, "A"), (5.0, "B"), (5.0, "B")]);
        let tree = DecisionTreeConfig::new()
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        let expected = Node::internal(SplitRule::new(0, 5.into()), leaf("B", 2), leaf("A", 2));
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn default_pruning_keeps_one_bit_split() {
        // delta equals the threshold exactly, which does not trigger a merge.
        let data = rows(&[(1.0, "A"), (1.0, "A"), (5.0, "B"), (5.0, "B")]);
        let tree = DecisionTreeConfig::new().fit(&data).unwrap();
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.predict(&[Value::from(6)]).unwrap(), Value::from("B"));
        assert_eq!(tree.predict(&[Value::from(0)]).unwrap(), Value::from("A"));
    }

    #[test]
    fn pure_dataset_single_leaf() {
        let data = rows(&[(1.0, "A"), (2.0, "A"), (3.0, "A")]);
        let tree = DecisionTreeConfig::new().fit(&data).unwrap();
        assert_eq!(tree.root(), &leaf("A", 3));
    }

    #[test]
    fn single_row_is_a_leaf() {
        let data = rows(&[(1.0, "A")]);
        let tree = DecisionTreeConfig::new().fit(&data).unwrap();
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn categorical_features_split_on_equality() {
        let data: Vec<Row> = vec![
            vec!["sunny".into(), "no".into()],
            vec!["rain".into(), "yes".into()],
            vec!["sunny".into(), "no".into()],
            vec!["overcast".into(), "yes".into()],
        ];
        let tree = DecisionTreeConfig::new()
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        assert_eq!(tree.predict(&["sunny".into()]).unwrap(), Value::from("no"));
        assert_eq!(tree.predict(&["rain".into()]).unwrap(), Value::from("yes"));
        // Never seen during training: falls through the equality test.
        assert_eq!(tree.predict(&["snow".into()]).unwrap(), Value::from("yes"));
    }

    #[test]
    fn xor_needs_depth_two() {
        let data: Vec<Row> = vec![
            vec![0.into(), 0.into(), "A".into()],
            vec![0.into(), 1.into(), "B".into()],
            vec![1.into(), 0.into(), "B".into()],
            vec![1.into(), 1.into(), "A".into()],
        ];
        // No single split lowers entropy, so the root stays a leaf.
        let tree = DecisionTreeConfig::new()
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().counts().unwrap().total(), 4);
    }

    #[test]
    fn gini_builds_the_same_stump() {
        let data = rows(&[(1.0, "A"), (2.0, "A"), (8.0, "B"), (9.0, "B")]);
        let tree = DecisionTreeConfig::new()
            .with_criterion(ImpurityMetric::Gini)
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.score(&data).unwrap(), 1.0);
    }

    #[test]
    fn pruning_merges_weak_split() {
        // The root split separates one stray "B", worth well under 1 bit.
        let data = rows(&[(1.0, "A"), (2.0, "A"), (3.0, "A"), (4.0, "A"), (9.0, "B")]);
        let unpruned = DecisionTreeConfig::new()
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        let pruned = DecisionTreeConfig::new().fit(&data).unwrap();
        assert_eq!(unpruned.n_nodes(), 3);
        assert!(pruned.n_nodes() < unpruned.n_nodes());
        assert_eq!(pruned.predict(&[Value::from(9)]).unwrap(), Value::from("A"));
    }

    #[test]
    fn prediction_row_too_short() {
        let data: Vec<Row> = vec![
            vec![1.into(), 2.into(), "A".into()],
            vec![3.into(), 4.into(), "B".into()],
        ];
        let tree = DecisionTreeConfig::new().fit(&data).unwrap();
        let err = tree.predict(&[Value::from(1)]).unwrap_err();
        assert!(matches!(err, CartError::RowTooShort { expected: 2, got: 1 }));
    }

    #[test]
    fn non_finite_pruning_gain_rejected() {
        let data = rows(&[(1.0, "A"), (2.0, "B")]);
        let err = DecisionTreeConfig::new()
            .with_pruning(Pruning::MinGain(f64::NAN))
            .fit(&data)
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidPruningGain { .. }));
    }

    #[test]
    fn missing_values_still_counted() {
        let data: Vec<Row> = vec![
            vec!["?".into(), "A".into()],
            vec!["x".into(), "B".into()],
            vec!["?".into(), "A".into()],
        ];
        let tree = DecisionTreeConfig::new()
            .with_pruning(Pruning::Disabled)
            .fit(&data)
            .unwrap();
        let expected = Node::internal(SplitRule::new(0, "x".into()), leaf("B", 1), leaf("A", 2));
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn gini_collapses_under_default_pruning() {
        let data = rows(&[(1.0, "A"), (1.0, "A"), (5.0, "B"), (5.0, "B")]);
        let gini = DecisionTreeConfig::new().with_criterion(ImpurityMetric::Gini);

        let pruned = gini.clone().fit(&data).unwrap();
        assert!(pruned.root().is_leaf());
        assert_eq!(pruned.root().counts().unwrap().total(), 4);

        let kept = gini
            .with_pruning(Pruning::MinGain(0.25))
            .fit(&data)
            .unwrap();
        assert_eq!(kept.n_leaves(), 2);
    }
}
