//! The tree container: path resolution, mutation, and derived reads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::node::{value_summary, Branch, Node};
use crate::path::{IntoTreePath, Key, TreePath};
use crate::traverse::{LeafPaths, Leaves, Traverse, Visit, VisitKind};

/// Auto-vivifying, path-addressable nested container.
///
/// A `Tree` owns a single root [`Branch`]. Paths address nodes either as
/// dotted strings (`"a.b.c"`) or explicit key sequences; strict lookups
/// ([`get`](Tree::get)) fail on a missing segment without mutating, while
/// permissive operations ([`get_or_create`](Tree::get_or_create),
/// [`set`](Tree::set)) materialize every missing segment as an empty
/// branch.
///
/// Iterating a `&Tree` yields the full pre-order traversal sequence of
/// [`Visit`] elements, keys and leaf values alike -- deliberately not the
/// root branch's direct keys, as plain-map iteration would. Use
/// `tree.root().keys()` for the conventional view.
///
/// ```
/// use vivtree::Tree;
///
/// let mut tree = Tree::new();
/// tree.set("gender.sex", "Female")?;
/// let node = tree.get("gender.sex")?;
/// assert_eq!(node.as_leaf().and_then(|v| v.as_str()), Some("Female"));
/// # Ok::<(), vivtree::TreeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    root: Branch,
}

impl Tree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-convert a JSON-like mapping into a tree: every nested object
    /// becomes a branch, everything else a leaf.
    ///
    /// A non-mapping root fails with [`TreeError::TypeConflict`].
    pub fn from_value(value: Value) -> TreeResult<Self> {
        match Node::from(value) {
            Node::Branch(root) => Ok(Self { root }),
            Node::Leaf(other) => Err(TreeError::TypeConflict {
                at: String::from("tree root"),
                found: value_summary(&other),
            }),
        }
    }

    /// Plain-mapping conversion, the inverse of [`Tree::from_value`].
    /// Round-trips value-equal for any acyclic input mapping.
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    /// The root branch.
    pub fn root(&self) -> &Branch {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Branch {
        &mut self.root
    }

    /// True iff the root branch has no direct entries. O(1), no traversal.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Total element count of the full traversal: every key plus every
    /// leaf value, across all levels. Not the number of direct entries.
    pub fn len(&self) -> usize {
        self.traverse().count()
    }

    /// Number of leaf values. Counts `Leaf`-kind traversal elements only;
    /// empty branches contribute nothing here.
    pub fn leaf_count(&self) -> usize {
        self.traverse()
            .filter(|visit| visit.kind() == VisitKind::Leaf)
            .count()
    }

    /// Strict lookup. Walks the branch chain and returns the terminal node;
    /// a missing segment fails with [`TreeError::PathNotFound`] and a leaf
    /// on the interior of the path fails with [`TreeError::TypeConflict`].
    /// Performs no mutation.
    ///
    /// The dotted form is the string-call sugar: `tree.get("a.b.c")` is
    /// `tree.get(["a", "b", "c"])`.
    #[instrument(level = "trace", skip(self, path))]
    pub fn get<P: IntoTreePath>(&self, path: P) -> TreeResult<&Node> {
        let path = path.into_tree_path()?;
        let (last, init) = path.split()?;
        let mut current = &self.root;
        for (idx, key) in init.iter().enumerate() {
            let node = current
                .get(key)
                .ok_or_else(|| not_found(&path, idx, current))?;
            current = node
                .as_branch()
                .ok_or_else(|| descend_conflict(&path, idx, node.summary()))?;
        }
        current
            .get(last)
            .ok_or_else(|| not_found(&path, path.depth() - 1, current))
    }

    /// Strict mutable lookup; same failure contract as [`Tree::get`].
    #[instrument(level = "trace", skip(self, path))]
    pub fn get_mut<P: IntoTreePath>(&mut self, path: P) -> TreeResult<&mut Node> {
        let path = path.into_tree_path()?;
        let (last, init) = path.split()?;
        let mut current = &mut self.root;
        for (idx, key) in init.iter().enumerate() {
            if !current.contains_key(key) {
                return Err(not_found(&path, idx, current));
            }
            // The key is present, so this never vivifies.
            let node = current.child_or_vivify(key);
            current = match node {
                Node::Branch(branch) => branch,
                Node::Leaf(leaf) => {
                    return Err(descend_conflict(&path, idx, value_summary(leaf)))
                }
            };
        }
        if !current.contains_key(last) {
            return Err(not_found(&path, path.depth() - 1, current));
        }
        Ok(current.child_or_vivify(last))
    }

    /// Permissive lookup: every missing key on the walk, including the
    /// terminal one, is inserted as a new empty branch, and the walk
    /// continues. Reading a non-existent path thereby materializes it.
    ///
    /// Never fails with `PathNotFound`; an existing leaf where the walk
    /// must descend fails with [`TreeError::TypeConflict`].
    #[instrument(level = "trace", skip(self, path))]
    pub fn get_or_create<P: IntoTreePath>(&mut self, path: P) -> TreeResult<&mut Node> {
        let path = path.into_tree_path()?;
        let (last, init) = path.split()?;
        let mut current = &mut self.root;
        for (idx, key) in init.iter().enumerate() {
            let node = current.child_or_vivify(key);
            current = match node {
                Node::Branch(branch) => branch,
                Node::Leaf(leaf) => {
                    return Err(descend_conflict(&path, idx, value_summary(leaf)))
                }
            };
        }
        Ok(current.child_or_vivify(last))
    }

    /// Assign `value` at `path`, vivifying every missing intermediate
    /// segment.
    ///
    /// The terminal assignment overwrites whatever was there; overwriting a
    /// non-empty branch with a leaf silently discards the whole subtree.
    /// `Value::Object` payloads are deep-converted into branches, so a leaf
    /// never holds a mapping.
    #[instrument(level = "trace", skip(self, path, value))]
    pub fn set<P: IntoTreePath, V: Into<Node>>(&mut self, path: P, value: V) -> TreeResult<()> {
        let path = path.into_tree_path()?;
        let (last, init) = path.split()?;
        let mut current = &mut self.root;
        for (idx, key) in init.iter().enumerate() {
            let node = current.child_or_vivify(key);
            current = match node {
                Node::Branch(branch) => branch,
                Node::Leaf(leaf) => {
                    return Err(descend_conflict(&path, idx, value_summary(leaf)))
                }
            };
        }
        current.insert(last.clone(), value.into());
        Ok(())
    }

    /// Permissive single-level deletion at the root branch: an absent key
    /// is a no-op returning `None`.
    #[instrument(level = "trace", skip(self, key))]
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Node> {
        self.root.remove(&key.into())
    }

    /// Strict single-level deletion at the root branch: an absent key
    /// fails with [`TreeError::PathNotFound`].
    #[instrument(level = "trace", skip(self, key))]
    pub fn remove_strict(&mut self, key: impl Into<Key>) -> TreeResult<Node> {
        self.root.remove_strict(&key.into())
    }

    /// The full pre-order traversal sequence. Lazy and restartable; each
    /// call starts a fresh walk from the root.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(&self.root)
    }

    /// Leaf values left to right, with empty sub-branches yielded as
    /// sentinels.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.root)
    }

    /// Root-to-leaf records in traversal order.
    pub fn leaf_paths(&self) -> LeafPaths<'_> {
        LeafPaths::new(&self.root)
    }
}

fn not_found(path: &TreePath, idx: usize, at: &Branch) -> TreeError {
    TreeError::PathNotFound {
        path: path.clone(),
        segment: path.keys()[idx].clone(),
        subtree: at.summary(),
    }
}

fn descend_conflict(path: &TreePath, idx: usize, found: String) -> TreeError {
    TreeError::TypeConflict {
        at: path.prefix(idx + 1),
        found,
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = Visit<'a>;
    type IntoIter = Traverse<'a>;

    /// Default iteration is the full traversal sequence, not the root
    /// branch's direct keys.
    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}

impl From<serde_json::Map<String, Value>> for Tree {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        let mut root = Branch::new();
        for (k, v) in map {
            root.insert(Key::Text(k), Node::from(v));
        }
        Self { root }
    }
}

impl From<Branch> for Tree {
    fn from(root: Branch) -> Self {
        Self { root }
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Branch(tree.root)
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Tree::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_fresh_tree_when_setting_key_sequence_then_dotted_get_finds_it() {
        let mut tree = Tree::new();
        tree.set(["gender", "sex"], "Female").unwrap();
        let node = tree.get("gender.sex").unwrap();
        assert_eq!(node.as_leaf().and_then(|v| v.as_str()), Some("Female"));
    }

    #[test]
    fn given_integer_key_when_setting_then_text_segment_does_not_alias() {
        let mut tree = Tree::new();
        tree.set(1i64, "by-index").unwrap();
        assert!(tree.get(1i64).is_ok());
        // `"1"` parses as a text key and addresses a different slot.
        assert!(matches!(
            tree.get("1"),
            Err(TreeError::PathNotFound { .. })
        ));
    }

    #[test]
    fn given_leaf_on_interior_when_setting_then_type_conflict() {
        let mut tree = Tree::from_value(json!({"name": "Alice"})).unwrap();
        let result = tree.set("name.pid", "x");
        assert!(matches!(result, Err(TreeError::TypeConflict { .. })));
    }

    #[test]
    fn given_non_mapping_root_when_constructing_then_type_conflict() {
        let result = Tree::from_value(json!([1, 2, 3]));
        assert!(matches!(result, Err(TreeError::TypeConflict { .. })));
    }
}
