use super::state::{Generation, NodeStateTable, FIRST_GENERATION};
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A shared pool of [NodeStateTable]s, so that each search doesn't have to
/// allocate and clear a table the size of the whole network.
#[derive(Debug)]
pub struct NodeStateTablePool {
    /// The maximum number of tables kept.
    capacity: usize,
    inner: Mutex<PoolInner>,
}

#[derive(Debug, Default)]
struct PoolInner {
    /// The tables available for reuse.
    tables: Vec<NodeStateTable>,
    /// The generation the next run on each table must use.
    next_generations: Vec<Generation>,
}

/// A table on loan from a [NodeStateTablePool], returned when dropped.
pub(crate) struct TableLease<'a> {
    pool: &'a NodeStateTablePool,
    table: NodeStateTable,
    generation: Generation,
}

impl NodeStateTablePool {
    /// Creates an empty pool which keeps at most `capacity` tables.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Default::default(),
        }
    }

    /// Takes a table from the pool, or creates one if the pool is empty.
    ///
    /// The returned generation must be used for every read and write of the table
    /// until it is released.
    pub(crate) fn acquire(&self) -> (NodeStateTable, Generation) {
        let mut inner = self.lock();
        match (inner.tables.pop(), inner.next_generations.pop()) {
            (Some(table), Some(generation)) => (table, generation),
            _ => (NodeStateTable::new(), FIRST_GENERATION),
        }
    }

    /// Returns a table to the pool. The table must not be used afterwards.
    pub(crate) fn release(&self, generation: Generation, table: NodeStateTable) {
        let Some(next) = generation.checked_add(1) else {
            log::warn!("Node state table exhausted its generations, discarding it");
            return;
        };
        let mut inner = self.lock();
        if inner.tables.len() < self.capacity {
            inner.tables.push(table);
            inner.next_generations.push(next);
        }
    }

    /// Discards every pooled table.
    /// Must be called whenever the node IDs of the road network change.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.tables.clear();
        inner.next_generations.clear();
    }

    /// The number of tables available for reuse.
    pub fn len(&self) -> usize {
        self.lock().tables.len()
    }

    /// Whether there are no tables available for reuse.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of tables kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes a table which is released automatically once the lease is dropped.
    pub(crate) fn lease(&self) -> TableLease<'_> {
        let (table, generation) = self.acquire();
        TableLease {
            pool: self,
            table,
            generation,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner> {
        // The pooled tables remain valid even if a holder of the lock panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TableLease<'_> {
    /// The generation of the current run.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl Deref for TableLease<'_> {
    type Target = NodeStateTable;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl DerefMut for TableLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.table
    }
}

impl Drop for TableLease<'_> {
    fn drop(&mut self) {
        let table = std::mem::take(&mut self.table);
        self.pool.release(self.generation, table);
    }
}
