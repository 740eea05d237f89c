//! Keys and paths addressing positions in a tree.
//!
//! A path is either a dotted string (`"a.b.c"`) or an explicit sequence of
//! keys; every path-taking operation accepts both through [`IntoTreePath`].

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::{TreeError, TreeResult};

/// A single branch key: text or integer.
///
/// Dotted path strings always parse into text keys, so `"1"` and `1` never
/// alias each other; integer keys are addressable only when constructed
/// explicitly. The `Ord` impl exists for display-time sorting and never
/// affects storage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Text(String),
    Index(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(s) => f.write_str(s),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

/// A non-empty sequence of keys leading from the root towards a node.
///
/// Displays in dotted form (`a.b.c`). Resolving `[a, b, c]` is resolving
/// `a`, then `[b, c]` inside the node found at `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath(Vec<Key>);

impl TreePath {
    /// Build a path from an explicit key sequence.
    ///
    /// Fails with [`TreeError::InvalidPath`] when `keys` is empty.
    pub fn new(keys: Vec<Key>) -> TreeResult<Self> {
        if keys.is_empty() {
            return Err(TreeError::invalid_path("empty key sequence"));
        }
        Ok(Self(keys))
    }

    pub(crate) fn single(key: Key) -> Self {
        Self(vec![key])
    }

    /// The key sequence, root-first.
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Terminal segment and the segments before it.
    pub(crate) fn split(&self) -> TreeResult<(&Key, &[Key])> {
        self.0
            .split_last()
            .ok_or_else(|| TreeError::invalid_path("empty key sequence"))
    }

    /// Dotted rendering of the first `len` segments.
    pub(crate) fn prefix(&self, len: usize) -> String {
        self.0[..len.min(self.0.len())].iter().join(".")
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl FromStr for TreePath {
    type Err = TreeError;

    /// Parse a dotted path string. The empty string and empty segments
    /// (`"a..b"`, leading or trailing dots) are invalid.
    fn from_str(s: &str) -> TreeResult<Self> {
        if s.is_empty() {
            return Err(TreeError::invalid_path("empty path string"));
        }
        let mut keys = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(TreeError::invalid_path(format!(
                    "empty segment in `{}`",
                    s
                )));
            }
            keys.push(Key::Text(segment.to_string()));
        }
        Ok(Self(keys))
    }
}

/// Conversion accepted by every path-taking operation.
///
/// Strings are parsed as dotted paths; sequence forms treat each element as
/// exactly one key, with no further splitting.
pub trait IntoTreePath {
    fn into_tree_path(self) -> TreeResult<TreePath>;
}

impl IntoTreePath for TreePath {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        Ok(self)
    }
}

impl IntoTreePath for &TreePath {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        Ok(self.clone())
    }
}

impl IntoTreePath for &str {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        self.parse()
    }
}

impl IntoTreePath for String {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        self.as_str().parse()
    }
}

impl IntoTreePath for &String {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        self.as_str().parse()
    }
}

impl IntoTreePath for Key {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        Ok(TreePath::single(self))
    }
}

impl IntoTreePath for i64 {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        Ok(TreePath::single(Key::Index(self)))
    }
}

impl IntoTreePath for Vec<Key> {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        TreePath::new(self)
    }
}

impl IntoTreePath for &[Key] {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        TreePath::new(self.to_vec())
    }
}

impl<const N: usize> IntoTreePath for [Key; N] {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        TreePath::new(self.into())
    }
}

impl<const N: usize> IntoTreePath for [&str; N] {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        TreePath::new(self.iter().map(|s| Key::from(*s)).collect())
    }
}

impl IntoTreePath for Vec<&str> {
    fn into_tree_path(self) -> TreeResult<TreePath> {
        TreePath::new(self.into_iter().map(Key::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a", vec!["a"])]
    #[case("a.b.c", vec!["a", "b", "c"])]
    #[case("gender.sex", vec!["gender", "sex"])]
    fn given_dotted_string_when_parsing_then_splits_into_text_keys(
        #[case] input: &str,
        #[case] expected: Vec<&str>,
    ) {
        let path: TreePath = input.parse().unwrap();
        let keys: Vec<Key> = expected.into_iter().map(Key::from).collect();
        assert_eq!(path.keys(), keys.as_slice());
    }

    #[rstest]
    #[case("")]
    #[case("a..b")]
    #[case(".a")]
    #[case("a.")]
    fn given_malformed_string_when_parsing_then_invalid_path(#[case] input: &str) {
        let result: TreeResult<TreePath> = input.parse();
        assert!(matches!(result, Err(TreeError::InvalidPath { .. })));
    }

    #[test]
    fn given_empty_key_sequence_when_building_then_invalid_path() {
        let result = TreePath::new(Vec::new());
        assert!(matches!(result, Err(TreeError::InvalidPath { .. })));
    }

    #[test]
    fn given_path_when_displaying_then_renders_dotted_form() {
        let path = TreePath::new(vec![
            Key::from("a"),
            Key::Index(3),
            Key::from("b"),
        ])
        .unwrap();
        assert_eq!(path.to_string(), "a.3.b");
    }

    #[test]
    fn given_sequence_form_when_converting_then_elements_are_not_split() {
        let path = ["a.b", "c"].into_tree_path().unwrap();
        assert_eq!(path.depth(), 2);
        assert_eq!(path.keys()[0], Key::Text("a.b".to_string()));
    }
}
