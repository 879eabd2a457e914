//! In-memory session store: one record per completed block, append-only.

use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::tasks::iat::BlockResult;

#[derive(Debug, Clone, Serialize)]
pub struct BlockRecord<T> {
    pub id: String,
    /// Position of the block in the submitted session order.
    pub index: usize,
    pub completed_at: String,
    pub result: BlockResult<T>,
}

impl<T> BlockRecord<T> {
    pub fn new(index: usize, result: BlockResult<T>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            index,
            completed_at: now_rfc3339(),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStore<T> {
    records: Vec<BlockRecord<T>>,
}

impl<T> SessionStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, index: usize, result: BlockResult<T>) -> &BlockRecord<T> {
        self.records.push(BlockRecord::new(index, result));
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[BlockRecord<T>] {
        &self.records
    }

    /// Block results in completion order.
    pub fn results(&self) -> impl Iterator<Item = &BlockResult<T>> {
        self.records.iter().map(|record| &record.result)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order_with_unique_ids() {
        let mut store: SessionStore<String> = SessionStore::new();
        store.append(0, BlockResult::default());
        store.append(1, BlockResult::default());

        assert_eq!(store.len(), 2);
        let indices: Vec<_> = store.records().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_ne!(store.records()[0].id, store.records()[1].id);
        assert!(OffsetDateTime::parse(&store.records()[0].completed_at, &Rfc3339).is_ok());
    }
}
