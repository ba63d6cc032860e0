use tracing::trace;

use crate::impurity::ImpurityMetric;
use crate::node::Node;

/// Post-pruning strategy for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pruning {
    /// Merge sibling leaves when undoing their split costs less than this
    /// much impurity.
    MinGain(f64),
    /// Keep the fully grown tree.
    Disabled,
}

impl Default for Pruning {
    fn default() -> Self {
        Pruning::MinGain(1.0)
    }
}

/// Merge sibling leaves whose split does not pay for itself.
///
/// Children are pruned before their parent, so a merge low in the tree can
/// make its parent eligible on the same pass. For an internal node with two
/// leaf children, `delta = I(true ∪ false) - (I(true) + I(false))` is taken
/// from the leaves' counts; when `delta < min_gain` the node is replaced by
/// one leaf with the summed counts.
#[must_use]
pub fn prune(node: Node, metric: ImpurityMetric, min_gain: f64) -> Node {
    let (rule, on_true, on_false) = match node {
        Node::Internal {
            rule,
            on_true,
            on_false,
        } => (rule, on_true, on_false),
        leaf @ Node::Leaf { .. } => return leaf,
    };

    let on_true = prune(*on_true, metric, min_gain);
    let on_false = prune(*on_false, metric, min_gain);

    if let (Node::Leaf { counts: t }, Node::Leaf { counts: f }) = (&on_true, &on_false) {
        let combined = t.merged(f);
        let delta = metric.impurity(&combined) - (metric.impurity(t) + metric.impurity(f));
        if delta < min_gain {
            trace!(%rule, delta, "merging sibling leaves");
            return Node::leaf(combined);
        }
    }

    Node::internal(rule, on_true, on_false)
}
