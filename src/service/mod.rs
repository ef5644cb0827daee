//! Index service - the tree and the record store behind one lock.
//!
//! The [`IndexService`] is what a request layer calls. It:
//! - Rebuilds the tree from the record store on open
//! - Keeps tree and store in step on every mutation
//! - Times each engine call and reports comparisons and the visited path
//! - Returns serializable responses with a fresh tree view

mod metrics;

use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;

use crate::common::config::IndexConfig;
use crate::common::{Key, NodeId, Result};
use crate::index::btree::{BStarTree, TreeSnapshot};
use crate::storage::{Record, RecordStore};

pub use metrics::Metrics;
use metrics::timed;

/// A tree snapshot plus the ideal comparison cost for its size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeView {
    #[serde(flatten)]
    pub snapshot: TreeSnapshot,
    /// `log2(max(1, keyCount))`.
    pub complexity: f64,
}

impl TreeView {
    fn of(tree: &BStarTree) -> Self {
        let snapshot = tree.snapshot();
        let complexity = snapshot.complexity();
        Self {
            snapshot,
            complexity,
        }
    }
}

/// Response to an insert or delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Insert: always true once the record is stored.
    /// Delete: whether the key was present.
    pub ok: bool,
    #[serde(flatten)]
    pub view: TreeView,
    pub metrics: Metrics,
    pub path: Vec<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_key: Option<Key>,
}

/// Response to a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub record: Option<Record>,
    pub found: bool,
    pub path: Vec<NodeId>,
    pub metrics: Metrics,
}

struct Inner<S> {
    tree: BStarTree,
    store: S,
}

/// One tree and one record store, serialized behind a single mutex.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │                 IndexService                 │
/// │  ┌────────────────────────────────────────┐  │
/// │  │            Mutex<Inner<S>>             │  │
/// │  │  ┌──────────────┐   ┌───────────────┐  │  │
/// │  │  │  BStarTree   │   │ S: RecordStore│  │  │
/// │  │  │ (keys only)  │   │  (payloads)   │  │  │
/// │  │  └──────────────┘   └───────────────┘  │  │
/// │  └────────────────────────────────────────┘  │
/// └──────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// The tree passes through inconsistent states while it rebalances, so
/// every call, reads included, takes the same exclusive lock. The service
/// is `Sync` whenever the store is `Send` and can be shared through an
/// `Arc`.
///
/// # Usage
/// ```
/// use bstarindex::common::config::IndexConfig;
/// use bstarindex::service::IndexService;
/// use bstarindex::storage::{MemoryRecordStore, Record};
///
/// let service = IndexService::open(MemoryRecordStore::new(), &IndexConfig::default());
/// service.insert(Record::new(42, "Ada", "CS")).unwrap();
///
/// let response = service.search(42);
/// assert!(response.found);
/// assert_eq!(response.record.unwrap().name, "Ada");
/// ```
pub struct IndexService<S: RecordStore> {
    inner: Mutex<Inner<S>>,
}

impl<S: RecordStore> IndexService<S> {
    /// Build the tree from every record in `store`.
    pub fn open(store: S, config: &IndexConfig) -> Self {
        let mut tree = BStarTree::new(config.effective_min_degree());
        tree.rebuild(store.records().into_iter().map(|record| record.roll_no));

        info!(
            "index opened: {} records, height {}, min degree {}",
            store.len(),
            tree.height(),
            tree.min_degree()
        );

        Self {
            inner: Mutex::new(Inner { tree, store }),
        }
    }

    /// Index `record.roll_no` and store the record.
    ///
    /// A key that is already indexed leaves the tree alone, but the stored
    /// record is still replaced with the new payload.
    ///
    /// # Errors
    /// - `Error::InvalidRecord` if the name or department is blank
    /// - Store errors; the tree insert is undone in that case
    pub fn insert(&self, record: Record) -> Result<MutationResponse> {
        record.validate()?;

        let mut inner = self.inner.lock();
        let key = record.roll_no;

        let (outcome, time_ms) = timed(|| inner.tree.insert(key));
        if let Err(err) = inner.store.upsert(record) {
            if outcome.inserted {
                inner.tree.delete(key);
            }
            return Err(err);
        }

        Ok(MutationResponse {
            ok: true,
            view: TreeView::of(&inner.tree),
            metrics: Metrics {
                time_ms,
                comparisons: outcome.comparisons,
            },
            path: outcome.path,
            removed_key: None,
        })
    }

    /// Look up `key` and fetch its record.
    pub fn search(&self, key: Key) -> SearchResponse {
        let inner = self.inner.lock();

        let (outcome, time_ms) = timed(|| inner.tree.search(key));
        let record = inner.store.get(key);

        SearchResponse {
            record,
            found: outcome.found,
            path: outcome.path,
            metrics: Metrics {
                time_ms,
                comparisons: outcome.comparisons,
            },
        }
    }

    /// Remove `key` from the tree and, if it was there, its record.
    ///
    /// # Errors
    /// Store errors; the key is put back into the tree in that case.
    pub fn delete(&self, key: Key) -> Result<MutationResponse> {
        let mut inner = self.inner.lock();

        let (outcome, time_ms) = timed(|| inner.tree.delete(key));
        if outcome.deleted {
            if let Err(err) = inner.store.remove(key) {
                inner.tree.insert(key);
                return Err(err);
            }
        }

        Ok(MutationResponse {
            ok: outcome.deleted,
            view: TreeView::of(&inner.tree),
            metrics: Metrics {
                time_ms,
                comparisons: outcome.comparisons,
            },
            path: outcome.path,
            removed_key: outcome.removed_key,
        })
    }

    /// Empty both the tree and the store.
    ///
    /// # Errors
    /// Store errors; the tree is rebuilt from whatever the store still holds.
    pub fn reset(&self) -> Result<TreeView> {
        let mut inner = self.inner.lock();
        let Inner { tree, store } = &mut *inner;

        tree.reset();
        if let Err(err) = store.clear() {
            warn!("record store clear failed, rebuilding index: {}", err);
            tree.rebuild(store.records().into_iter().map(|record| record.roll_no));
            return Err(err);
        }

        Ok(TreeView::of(tree))
    }

    /// Current tree view.
    pub fn tree(&self) -> TreeView {
        TreeView::of(&self.inner.lock().tree)
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.inner.lock().store.len()
    }
}
