//! Auto-vivifying, path-addressable nested tree container.
//!
//! A [`Tree`] is a recursive key-value structure: interior [`Branch`] nodes
//! hold insertion-ordered children, terminal leaves hold opaque JSON-like
//! values. Missing intermediate keys are transparently created as empty
//! branches by the permissive operations ([`Tree::get_or_create`],
//! [`Tree::set`]), while strict lookups ([`Tree::get`]) fail without
//! mutating. Paths are addressed step by step, as key sequences, or as a
//! single dotted string.
//!
//! ```
//! use serde_json::json;
//! use vivtree::Tree;
//!
//! let mut tree = Tree::from_value(json!({"l1": {"k3": "v3"}}))?;
//! tree.set("l1.l2.l3a.k1", "v1")?;
//!
//! let records: Vec<String> = tree.leaf_paths().map(|p| p.dotted()).collect();
//! assert_eq!(records, vec!["l1.k3", "l1.l2.l3a.k1"]);
//! # Ok::<(), vivtree::TreeError>(())
//! ```
//!
//! # Iteration contract
//!
//! Iterating a `&Tree` yields the **full traversal sequence** -- every key
//! and every leaf value in pre-order, not merely the root branch's direct
//! keys. Callers expecting plain-map iteration should use
//! `tree.root().keys()` or `tree.root().iter()` instead.
//!
//! # Concurrency
//!
//! All operations are synchronous, bounded in-memory walks with no I/O.
//! The structure is not thread-safe for concurrent mutation; callers
//! sharing a tree across threads must supply external mutual exclusion.
//! Traversal iterators borrow the tree, so mutation during a walk is
//! rejected at compile time.

pub mod display;
pub mod errors;
pub mod node;
pub mod path;
pub mod traverse;
pub mod tree;
pub mod util;

pub use errors::{TreeError, TreeResult};
pub use node::{Branch, Node, Value};
pub use path::{IntoTreePath, Key, TreePath};
pub use traverse::{LeafItem, LeafPath, LeafPaths, Leaves, Traverse, Visit, VisitKind};
pub use tree::Tree;
