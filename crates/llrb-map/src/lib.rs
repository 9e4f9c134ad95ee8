//! Ordered map on a left-leaning red-black tree.
//!
//! Nodes live in a `Vec` arena, links are `Option<u32>` indices, and the
//! tree algorithms are free functions over the arena. [`LlrbMap`] wraps
//! them with key validation and arena bookkeeping.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`LlrbNode`], comparator helpers |
//! | [`util`] | rotations, color flips, insert/delete recursion, order statistics |
//! | [`check`] | whole-tree consistency predicates |
//! | [`print`] | debug printer |
//! | [`map`] | [`LlrbMap`] and its iterator |
//! | [`error`] | [`MapError`] |

pub mod check;
pub mod error;
pub mod map;
pub mod print;
pub mod types;
pub mod util;

pub use check::assert_llrb_tree;
pub use error::{MapError, Result};
pub use map::{Iter, LlrbMap};
pub use types::{default_comparator, LlrbNode};
