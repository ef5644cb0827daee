//! Index structures.
//!
//! - [`btree`] - Instrumented B*-style tree over integer keys

pub mod btree;

pub use btree::BStarTree;
