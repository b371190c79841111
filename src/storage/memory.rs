//! In-process record store.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::check::CheckRecord;
use crate::storage::{RecordSink, StorageError};

/// Keeps the newest `capacity` records ordered by timestamp.
#[derive(Debug)]
pub struct MemoryRecordSink {
    capacity: usize,
    records: Mutex<VecDeque<CheckRecord>>,
}

impl MemoryRecordSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CheckRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordSink for MemoryRecordSink {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn add_record(&self, record: &CheckRecord) -> Result<bool, StorageError> {
        let mut records = self.lock();

        let first_same_ts = records.partition_point(|r| r.timestamp < record.timestamp);
        let duplicate = records
            .range(first_same_ts..)
            .take_while(|r| r.timestamp == record.timestamp)
            .any(|r| r.url == record.url);
        if duplicate {
            return Ok(false);
        }

        let position = records.partition_point(|r| r.timestamp <= record.timestamp);
        records.insert(position, record.clone());
        while records.len() > self.capacity {
            records.pop_front();
        }
        Ok(true)
    }

    async fn get_last(&self, limit: usize) -> Result<Vec<CheckRecord>, StorageError> {
        let records = self.lock();
        let skip = records.len().saturating_sub(limit);
        Ok(records.iter().skip(skip).cloned().collect())
    }
}
