//! Rendering: deterministic pretty-printing and box-drawing trees.
//!
//! Presentation never fails; a payload that cannot be labeled falls back to
//! a best-effort textual form. Display-time key sorting is a rendering
//! concern only and leaves the branches' insertion order untouched.

use std::fmt;

use itertools::Itertools;

use crate::node::{value_summary, Branch, Node};
use crate::tree::Tree;

const INDENT: usize = 4;

fn write_branch(f: &mut fmt::Formatter<'_>, branch: &Branch, level: usize) -> fmt::Result {
    if branch.is_empty() {
        return f.write_str("{}");
    }
    writeln!(f, "{{")?;
    // Sorted at display time only; storage keeps insertion order.
    for key in branch.keys().sorted() {
        write!(f, "{:width$}{}: ", "", key, width = (level + 1) * INDENT)?;
        match branch.get(key) {
            Some(Node::Branch(child)) => write_branch(f, child, level + 1)?,
            Some(Node::Leaf(value)) => f.write_str(&value_summary(value))?,
            None => f.write_str("<missing>")?,
        }
        writeln!(f)?;
    }
    write!(f, "{:width$}}}", "", width = level * INDENT)
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_branch(f, self.root(), 0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Branch(branch) => write_branch(f, branch, 0),
            Node::Leaf(value) => f.write_str(&value_summary(value)),
        }
    }
}

fn branch_to_termtree(label: String, branch: &Branch) -> termtree::Tree<String> {
    let leaves: Vec<termtree::Tree<String>> = branch
        .iter()
        .map(|(key, node)| match node {
            Node::Branch(child) => branch_to_termtree(key.to_string(), child),
            Node::Leaf(value) => termtree::Tree::new(key.to_string())
                .with_leaves(vec![termtree::Tree::new(value_summary(value))]),
        })
        .collect();
    termtree::Tree::new(label).with_leaves(leaves)
}

impl Tree {
    /// Box-drawing rendering of the whole tree, in insertion order. The
    /// anonymous root is labeled `.`; each leaf value hangs beneath the
    /// key that names it.
    pub fn to_termtree(&self) -> termtree::Tree<String> {
        branch_to_termtree(String::from("."), self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_unsorted_insertion_when_displaying_then_keys_are_sorted() {
        let tree = Tree::from_value(json!({"b": "2", "a": "1"})).unwrap();
        let rendered = tree.to_string();
        let expected = "{\n    a: \"1\"\n    b: \"2\"\n}";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn given_empty_tree_when_displaying_then_braces_only() {
        assert_eq!(Tree::new().to_string(), "{}");
    }

    #[test]
    fn given_display_pass_when_traversing_after_then_storage_order_unchanged() {
        let tree = Tree::from_value(json!({"b": "2", "a": "1"})).unwrap();
        let _ = tree.to_string();
        let keys: Vec<String> = tree.root().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
