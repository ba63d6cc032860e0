use crate::counts::ClassCounts;
use crate::split::SplitRule;
use crate::value::Value;

/// A node of a decision tree.
///
/// Each internal node owns its two children outright. Nodes are never
/// mutated after construction; pruning builds a replacement [`Node::Leaf`]
/// instead of clearing fields on an existing node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior split node.
    Internal {
        /// Test applied to a row at this node.
        rule: SplitRule,
        /// Subtree for rows matching `rule`.
        on_true: Box<Node>,
        /// Subtree for rows not matching `rule`.
        on_false: Box<Node>,
    },
    /// A terminal leaf node.
    Leaf {
        /// Class counts of the training rows that reached this leaf.
        counts: ClassCounts,
    },
}

impl Node {
    /// Create a leaf.
    #[must_use]
    pub fn leaf(counts: ClassCounts) -> Self {
        Node::Leaf { counts }
    }

    /// Create an internal node.
    #[must_use]
    pub fn internal(rule: SplitRule, on_true: Node, on_false: Node) -> Self {
        Node::Internal {
            rule,
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the class counts if this node is a leaf.
    #[must_use]
    pub fn counts(&self) -> Option<&ClassCounts> {
        match self {
            Node::Leaf { counts } => Some(counts),
            Node::Internal { .. } => None,
        }
    }

    /// Route `row` to a leaf and return that leaf's class counts.
    ///
    /// At each internal node the stored rule picks the branch. A value the
    /// tree never saw simply fails an equality test and takes the false
    /// branch.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not reach a split column the path tests.
    /// [`DecisionTree::classify`](crate::DecisionTree::classify) checks the
    /// row length first.
    #[must_use]
    pub fn route(&self, row: &[Value]) -> &ClassCounts {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { counts } => return counts,
                Node::Internal {
                    rule,
                    on_true,
                    on_false,
                } => {
                    node = if rule.matches(row) { &**on_true } else { &**on_false };
                }
            }
        }
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal {
                on_true, on_false, ..
            } => 1 + on_true.n_nodes() + on_false.n_nodes(),
        }
    }

    /// Number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal {
                on_true, on_false, ..
            } => on_true.n_leaves() + on_false.n_leaves(),
        }
    }

    /// Depth of this subtree; a lone leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal {
                on_true, on_false, ..
            } => 1 + on_true.depth().max(on_false.depth()),
        }
    }
}
