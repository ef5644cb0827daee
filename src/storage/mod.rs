//! Storage layer - record persistence.
//!
//! This module holds the payloads indexed by the tree:
//! - [`Record`] - A roll number with its name and department
//! - [`RecordStore`] - The store interface the service writes through
//! - [`MemoryRecordStore`] - In-memory store
//! - [`JsonRecordStore`] - File-backed store

mod json_record_store;
mod record;
mod record_store;

pub use json_record_store::JsonRecordStore;
pub use record::Record;
pub use record_store::{MemoryRecordStore, RecordStore};
