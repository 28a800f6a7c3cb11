/// Tuning parameters for a [Router](crate::Router).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// The maximum number of node state tables kept for reuse.
    /// Tables released while the pool is full are dropped.
    pub pool_capacity: usize,
    /// The maximum number of nodes a single search may expand before giving up,
    /// or `None` to search until the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 16,
            max_expansions: None,
        }
    }
}
