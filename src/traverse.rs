//! Lazy pre-order traversal and the read-only views derived from it.
//!
//! One primitive, [`Traverse`], produces the full element sequence of a
//! tree: every branch key in insertion order, left to right, node before
//! children, with leaf values following the key that names them. Leaf
//! enumeration ([`Leaves`]), root-to-leaf extraction ([`LeafPaths`]), and
//! the element counts are all single passes over this one sequence, so
//! every derived operation observes the same order.
//!
//! Traversal is a pure read: the iterators borrow the tree for their whole
//! lifetime, so mutating while one is live is a compile error rather than a
//! runtime hazard.

use serde_json::Value;

use crate::node::{Branch, Node};
use crate::path::Key;

/// Marker distinguishing key elements from terminal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    Key,
    Leaf,
}

/// One element of the pre-order walk.
///
/// A `Key` element carries the node it names and the branch depth it was
/// found at (root entries are depth 0); the value of a leaf-valued key
/// follows immediately as a `Leaf` element at the same depth. The extra
/// position information is what lets every derived view stay a single pass
/// over this sequence instead of a separately-coded recursive walk.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Key {
        depth: usize,
        key: &'a Key,
        node: &'a Node,
    },
    Leaf {
        depth: usize,
        value: &'a Value,
    },
}

impl Visit<'_> {
    pub fn kind(&self) -> VisitKind {
        match self {
            Visit::Key { .. } => VisitKind::Key,
            Visit::Leaf { .. } => VisitKind::Leaf,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Visit::Key { depth, .. } | Visit::Leaf { depth, .. } => *depth,
        }
    }
}

/// Depth-first pre-order iterator over a branch.
///
/// Keys of a subtree appear interleaved directly after their parent key,
/// not grouped after siblings. An empty branch contributes only its own
/// key element at the parent level. The walk is lazy and restartable:
/// constructing a new `Traverse` always starts from the root.
pub struct Traverse<'a> {
    stack: Vec<indexmap::map::Iter<'a, Key, Node>>,
    pending: Option<(usize, &'a Value)>,
}

impl<'a> Traverse<'a> {
    pub(crate) fn new(root: &'a Branch) -> Self {
        Self {
            stack: vec![root.iter()],
            pending: None,
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((depth, value)) = self.pending.take() {
            return Some(Visit::Leaf { depth, value });
        }
        loop {
            let entry = self.stack.last_mut()?.next();
            match entry {
                Some((key, node)) => {
                    let depth = self.stack.len() - 1;
                    match node {
                        Node::Branch(branch) => self.stack.push(branch.iter()),
                        Node::Leaf(value) => self.pending = Some((depth, value)),
                    }
                    return Some(Visit::Key { depth, key, node });
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Leaf enumeration element: a terminal value, or the sentinel for an empty
/// sub-branch met during the walk (it has no leaf entries of its own to
/// speak for it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafItem<'a> {
    Value(&'a Value),
    EmptyBranch(&'a Branch),
}

/// Leaf-only view of the traversal, left to right.
pub struct Leaves<'a> {
    inner: Traverse<'a>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(root: &'a Branch) -> Self {
        Self {
            inner: Traverse::new(root),
        }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = LeafItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Visit::Key {
                    node: Node::Branch(branch),
                    ..
                } if branch.is_empty() => return Some(LeafItem::EmptyBranch(branch)),
                Visit::Leaf { value, .. } => return Some(LeafItem::Value(value)),
                _ => {}
            }
        }
    }
}

/// One root-to-leaf record: the key sequence from the root, plus the leaf
/// value, or `None` when the path terminates at an empty branch.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafPath<'a> {
    pub keys: Vec<&'a Key>,
    pub value: Option<&'a Value>,
}

impl LeafPath<'_> {
    /// Dotted rendering of the key sequence.
    pub fn dotted(&self) -> String {
        use itertools::Itertools;
        self.keys.iter().join(".")
    }
}

/// Root-to-leaf records in traversal order.
///
/// A single pass: the running trail of keys is truncated to each new key's
/// depth, which is exactly the prefix shared with the previous record.
pub struct LeafPaths<'a> {
    inner: Traverse<'a>,
    trail: Vec<&'a Key>,
}

impl<'a> LeafPaths<'a> {
    pub(crate) fn new(root: &'a Branch) -> Self {
        Self {
            inner: Traverse::new(root),
            trail: Vec::new(),
        }
    }
}

impl<'a> Iterator for LeafPaths<'a> {
    type Item = LeafPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Visit::Key { depth, key, node } => {
                    self.trail.truncate(depth);
                    self.trail.push(key);
                    if let Node::Branch(branch) = node {
                        if branch.is_empty() {
                            return Some(LeafPath {
                                keys: self.trail.clone(),
                                value: None,
                            });
                        }
                    }
                }
                Visit::Leaf { value, .. } => {
                    return Some(LeafPath {
                        keys: self.trail.clone(),
                        value: Some(value),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Branch {
        // a -> {b -> "1", c -> "2"}, d -> "3"
        let mut inner = Branch::new();
        inner.insert("b", "1");
        inner.insert("c", "2");
        let mut root = Branch::new();
        root.insert("a", inner);
        root.insert("d", "3");
        root
    }

    #[test]
    fn given_nested_branch_when_traversing_then_preorder_interleaved() {
        let root = sample();
        let rendered: Vec<String> = Traverse::new(&root)
            .map(|visit| match visit {
                Visit::Key { key, .. } => format!("k:{}", key),
                Visit::Leaf { value, .. } => format!("l:{}", value),
            })
            .collect();
        assert_eq!(
            rendered,
            vec!["k:a", "k:b", "l:\"1\"", "k:c", "l:\"2\"", "k:d", "l:\"3\""]
        );
    }

    #[test]
    fn given_leaf_valued_key_when_traversing_then_leaf_shares_depth() {
        let root = sample();
        for window in Traverse::new(&root).collect::<Vec<_>>().windows(2) {
            if let [Visit::Key { depth, node, .. }, next] = window {
                if node.is_leaf() {
                    assert_eq!(next.kind(), VisitKind::Leaf);
                    assert_eq!(next.depth(), *depth);
                }
            }
        }
    }

    #[test]
    fn given_empty_branch_when_traversing_then_only_key_marker() {
        let mut root = Branch::new();
        root.insert("a", Branch::new());
        let visits: Vec<VisitKind> = Traverse::new(&root).map(|v| v.kind()).collect();
        assert_eq!(visits, vec![VisitKind::Key]);
    }

    #[test]
    fn given_sibling_after_subtree_when_extracting_paths_then_prefix_is_kept() {
        let root = sample();
        let dotted: Vec<String> = LeafPaths::new(&root).map(|p| p.dotted()).collect();
        assert_eq!(dotted, vec!["a.b", "a.c", "d"]);
    }

    #[test]
    fn given_empty_branch_when_enumerating_leaves_then_sentinel_yielded() {
        let mut root = Branch::new();
        root.insert("a", Branch::new());
        root.insert("b", "x");
        let items: Vec<LeafItem> = Leaves::new(&root).collect();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], LeafItem::EmptyBranch(b) if b.is_empty()));
        assert!(matches!(items[1], LeafItem::Value(v) if v.as_str() == Some("x")));
    }

    #[test]
    fn given_same_branch_when_traversing_twice_then_sequences_match() {
        let root = sample();
        let first: Vec<VisitKind> = Traverse::new(&root).map(|v| v.kind()).collect();
        let second: Vec<VisitKind> = Traverse::new(&root).map(|v| v.kind()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn given_empty_branch_when_extracting_paths_then_record_has_no_value() {
        let mut root = Branch::new();
        root.insert("x", Branch::new());
        let records: Vec<LeafPath> = LeafPaths::new(&root).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dotted(), "x");
        assert_eq!(records[0].value, None);
    }

    #[test]
    fn given_key_after_empty_branch_when_extracting_paths_then_trail_resets() {
        // x -> {}, y -> "v": the empty-branch record must not leak `x`
        // into the following record's prefix.
        let mut root = Branch::new();
        root.insert("x", Branch::new());
        root.insert("y", "v");
        let dotted: Vec<String> = LeafPaths::new(&root).map(|p| p.dotted()).collect();
        assert_eq!(dotted, vec!["x", "y"]);
    }

    #[test]
    fn given_leaf_item_when_matching_kind_then_counts_exclude_sentinels() {
        let mut root = Branch::new();
        root.insert("a", Branch::new());
        root.insert("b", "x");
        let leaf_kind = Traverse::new(&root)
            .filter(|v| v.kind() == VisitKind::Leaf)
            .count();
        assert_eq!(leaf_kind, 1);
        assert_eq!(Leaves::new(&root).count(), 2);
    }
}
