//! Common types and utilities shared across bstarindex.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`IndexConfig`](config::IndexConfig)
//! - Error types
//! - Identifiers ([`NodeId`]) and the [`Key`] type

pub mod config;
pub mod error;
mod node_id;

pub use error::{Error, Result};
pub use node_id::{NodeId, NodeIdGenerator};

/// Keys indexed by the tree (roll numbers in the record store).
pub type Key = i64;
