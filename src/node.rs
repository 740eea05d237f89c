//! Branch and leaf nodes.
//!
//! A [`Node`] is a tagged value: an interior [`Branch`] holding an
//! insertion-ordered mapping of children, or a terminal leaf carrying an
//! opaque [`Value`]. The kind lives in the tag and is never inferred from
//! the payload, so an empty branch stays a branch. A leaf never holds a
//! mapping: every `Value::Object` written into a tree is deep-converted
//! into a branch subtree at insertion time. Arrays stay leaf payloads.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
pub use serde_json::Value;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::path::{Key, TreePath};

/// A tree node: interior branch or terminal leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Branch(Branch),
    Leaf(Value),
}

impl Node {
    /// Fresh empty branch node.
    pub fn branch() -> Self {
        Node::Branch(Branch::new())
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Branch(branch) => Some(branch),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_branch_mut(&mut self) -> Option<&mut Branch> {
        match self {
            Node::Branch(branch) => Some(branch),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Branch(_) => None,
            Node::Leaf(value) => Some(value),
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Value> {
        match self {
            Node::Branch(_) => None,
            Node::Leaf(value) => Some(value),
        }
    }

    /// Deep conversion back to a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Branch(branch) => branch.to_value(),
            Node::Leaf(value) => value.clone(),
        }
    }

    /// Compact one-line rendering for error messages. Never fails.
    pub(crate) fn summary(&self) -> String {
        match self {
            Node::Branch(branch) => branch.summary(),
            Node::Leaf(value) => value_summary(value),
        }
    }
}

/// Compact one-line rendering of a leaf payload. Never fails.
pub(crate) fn value_summary(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("<unprintable>"))
}

impl From<Value> for Node {
    /// Deep conversion: every nested object becomes a branch, everything
    /// else (scalars, arrays, null) a leaf.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let mut branch = Branch::new();
                for (k, v) in map {
                    branch.insert(Key::Text(k), Node::from(v));
                }
                Node::Branch(branch)
            }
            other => Node::Leaf(other),
        }
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Node::Branch(branch)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Leaf(Value::from(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Leaf(Value::from(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Leaf(Value::from(i))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Leaf(Value::from(x))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Leaf(Value::from(b))
    }
}

/// Insertion-ordered children of a branch.
///
/// Keys are unique; insertion order is the canonical traversal order and is
/// never re-sorted in storage. Children are owned by value, so no node can
/// become an ancestor of itself: moving a subtree elsewhere removes it from
/// its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    children: IndexMap<Key, Node>,
}

impl Branch {
    pub fn new() -> Self {
        Self {
            children: IndexMap::new(),
        }
    }

    /// Number of direct entries. See [`Tree::len`](crate::Tree::len) for the
    /// whole-subtree count.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.children.contains_key(key)
    }

    pub fn get(&self, key: &Key) -> Option<&Node> {
        self.children.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    /// Insert a child, returning the previous node under `key` if any.
    ///
    /// A new key goes to the end of the insertion order; overwriting an
    /// existing key keeps its position.
    #[instrument(level = "trace", skip(self, key, node))]
    pub fn insert(&mut self, key: impl Into<Key>, node: impl Into<Node>) -> Option<Node> {
        self.children.insert(key.into(), node.into())
    }

    /// Existing child, or a freshly vivified empty branch under `key`.
    ///
    /// The single-level auto-vivification primitive; the tree-level walks
    /// are built on it.
    pub fn child_or_vivify(&mut self, key: &Key) -> &mut Node {
        self.children
            .entry(key.clone())
            .or_insert_with(Node::branch)
    }

    /// Permissive removal: an absent key is a no-op returning `None`.
    /// The insertion order of the remaining entries is preserved.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, key: &Key) -> Option<Node> {
        self.children.shift_remove(key)
    }

    /// Strict removal: an absent key fails with
    /// [`TreeError::PathNotFound`].
    #[instrument(level = "trace", skip(self))]
    pub fn remove_strict(&mut self, key: &Key) -> TreeResult<Node> {
        match self.children.shift_remove(key) {
            Some(node) => Ok(node),
            None => Err(TreeError::PathNotFound {
                path: TreePath::single(key.clone()),
                segment: key.clone(),
                subtree: self.summary(),
            }),
        }
    }

    /// Direct child entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Node> {
        self.children.iter()
    }

    /// Direct keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Node> {
        self.children.keys()
    }

    /// Deep conversion to a plain JSON object. Integer keys render as their
    /// decimal strings.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (key, node) in &self.children {
            map.insert(key.to_string(), node.to_value());
        }
        Value::Object(map)
    }

    /// A new branch with the `front` keys first, in the given order,
    /// followed by the remaining keys sorted.
    ///
    /// The receiver is untouched; callers wanting in-place semantics
    /// reassign the result themselves. A requested key that is absent fails
    /// with [`TreeError::PathNotFound`].
    #[instrument(level = "trace", skip(self, front))]
    pub fn reorder(&self, front: &[Key]) -> TreeResult<Branch> {
        let mut reordered = IndexMap::new();
        for key in front {
            let node = self.children.get(key).ok_or_else(|| TreeError::PathNotFound {
                path: TreePath::single(key.clone()),
                segment: key.clone(),
                subtree: self.summary(),
            })?;
            reordered.insert(key.clone(), node.clone());
        }
        let mut rest: Vec<&Key> = self
            .children
            .keys()
            .filter(|k| !reordered.contains_key(*k))
            .collect();
        rest.sort();
        for key in rest {
            reordered.insert(key.clone(), self.children[key].clone());
        }
        Ok(Branch {
            children: reordered,
        })
    }

    /// Compact one-line rendering for error messages. Never fails.
    pub(crate) fn summary(&self) -> String {
        serde_json::to_string(&self.to_value()).unwrap_or_else(|_| String::from("<unprintable>"))
    }
}

impl<'a> IntoIterator for &'a Branch {
    type Item = (&'a Key, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, Key, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl FromIterator<(Key, Node)> for Branch {
    fn from_iter<I: IntoIterator<Item = (Key, Node)>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Branch(branch) => branch.serialize(serializer),
            Node::Leaf(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Branch {
    /// Serializes as a map in insertion order; integer keys become their
    /// decimal strings so the output stays a valid JSON object.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (key, node) in &self.children {
            map.serialize_entry(&key.to_string(), node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from(value))
    }
}
