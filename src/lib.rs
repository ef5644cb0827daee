//! bstarindex - An instrumented B*-style tree index over integer keys.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           bstarindex                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Service Layer (service/)                   │   │
//! │  │   IndexService: one lock, timing, serializable views     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                 ↓                              ↓                │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐  │
//! │  │   Index Layer (index/)    │  │  Storage Layer (storage/) │  │
//! │  │  BStarTree: keys only,    │  │  RecordStore: payloads    │  │
//! │  │  split/rotate/merge,      │  │  Memory | JSON file       │  │
//! │  │  comparisons + paths      │  │                           │  │
//! │  └───────────────────────────┘  └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Key, NodeId, Error, config)
//! - [`index`] - The tree engine
//! - [`storage`] - Records and record stores
//! - [`service`] - Tree and store kept in step behind one lock
//!
//! # Quick Start
//! ```
//! use bstarindex::BStarTree;
//!
//! let mut tree = BStarTree::new(3);
//! for key in [40, 20, 60, 10, 30, 50, 70, 5, 15] {
//!     tree.insert(key);
//! }
//!
//! let outcome = tree.delete(20);
//! assert!(outcome.deleted);
//! println!("{} comparisons via {:?}", outcome.comparisons, outcome.path);
//!
//! let snapshot = tree.snapshot();
//! assert_eq!(snapshot.key_count, 8);
//! ```

pub mod common;
pub mod index;
pub mod service;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{IndexConfig, DEFAULT_MIN_DEGREE, MIN_DEGREE};
pub use common::{Error, Key, NodeId, NodeIdGenerator, Result};

pub use index::btree::{
    BStarTree, DeleteOutcome, InsertOutcome, InvariantViolation, NodeKind, NodeSnapshot,
    OperationStats, SearchOutcome, TreeSnapshot,
};
pub use service::{IndexService, Metrics, MutationResponse, SearchResponse, TreeView};
pub use storage::{JsonRecordStore, MemoryRecordStore, Record, RecordStore};
