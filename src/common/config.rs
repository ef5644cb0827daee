//! Configuration for the bstarindex engine and service.

/// Smallest usable minimum degree.
///
/// With `t = 2` every non-root node holds 1 to 3 keys, which makes the
/// tree a 2-3-4 tree. Anything lower cannot split a full node into two
/// valid halves, so smaller requests are clamped to this value.
pub const MIN_DEGREE: usize = 2;

/// Minimum degree used when none is configured.
///
/// # Occupancy
/// With `t = 3`:
/// - Non-root nodes hold 2 to 5 keys
/// - Internal nodes have 3 to 6 children
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Settings consumed by [`IndexService::open`](crate::service::IndexService::open).
///
/// # Example
/// ```
/// use bstarindex::common::config::IndexConfig;
///
/// let config = IndexConfig::default().with_min_degree(4);
/// assert_eq!(config.min_degree, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Fanout parameter `t` of the tree. Values below [`MIN_DEGREE`] are
    /// clamped when the tree is built.
    pub min_degree: usize,
}

impl IndexConfig {
    /// Set the minimum degree.
    pub fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    /// The minimum degree the tree will actually use.
    #[inline]
    pub fn effective_min_degree(&self) -> usize {
        self.min_degree.max(MIN_DEGREE)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
        }
    }
}
