//! Red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`], ordered collections with the
//! familiar shape of the standard library's `BTreeMap` and `BTreeSet`, backed by an
//! arena-allocated red-black tree:
//!
//! - [`insert`](RBTreeMap::insert) - Keep-first insertion that never overwrites an
//!   existing entry
//! - [`insert_or_assign`](RBTreeMap::insert_or_assign) - Classic insert-or-update
//! - [`merge`](RBTreeMap::merge) - Combine two collections while keeping existing
//!   entries
//!
//! # Example
//!
//! ```
//! use aka_tree::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard BTreeMap operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // A duplicate key keeps the entry that is already present
//! assert_eq!(scores.insert("Bob", 0), false);
//! assert_eq!(scores[&"Bob"], 85);
//!
//! // Overwriting is a separate, explicit operation
//! assert_eq!(scores.insert_or_assign("Bob", 90), Some(85));
//! assert_eq!(scores[&"Bob"], 90);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap`/`BTreeSet`, with
//!   first-wins insertion semantics
//! - **Arena storage** - Nodes live in a handle-indexed arena, so removing an entry
//!   never moves another one and dropping the tree is a flat deallocation
//!
//! # Implementation
//!
//! The collections are implemented as a classic red-black tree whose nodes are stored
//! in a growable arena and linked by compact handles instead of pointers. Values live
//! in a second arena addressed by the same handles, keeping structural bookkeeping
//! apart from value memory during mutable iteration.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: We have to allow unsafe code in order to performantly match BTreeMap and BTreeSet's functionality.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
