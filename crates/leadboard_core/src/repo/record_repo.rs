//! Record mirror repository.
//!
//! The mirror only ever learns about upserts from the lifecycle engine;
//! `remove` exists for the cascading retention policy.

use crate::model::record::{Collection, Record, RecordSet};
use crate::store::kv_store::{load_json, save_json, KvStore, StoreResult, RECORDS_KEY};
use log::{debug, error};

/// Read/write access to the deals and orders record collections.
pub trait RecordRepository {
    fn records(&self) -> &RecordSet;
    /// Upserts `record` into the collection of its stage.
    fn upsert(&mut self, record: Record) -> StoreResult<Collection>;
    /// Removes `id` from both collections; returns how many rows were dropped.
    fn remove(&mut self, id: &str) -> StoreResult<usize>;
}

/// Record mirror persisted whole under [`RECORDS_KEY`].
pub struct StoredRecordRepository<S: KvStore> {
    store: S,
    records: RecordSet,
}

impl<S: KvStore> StoredRecordRepository<S> {
    pub fn load(store: S) -> StoreResult<Self> {
        let records = load_json(&store, RECORDS_KEY)?.unwrap_or_default();
        Ok(Self { store, records })
    }

    fn persist(&self) -> StoreResult<()> {
        save_json(&self.store, RECORDS_KEY, &self.records).map_err(|err| {
            error!("event=records_persist module=repo status=error error={err}");
            err
        })
    }
}

impl<S: KvStore> RecordRepository for StoredRecordRepository<S> {
    fn records(&self) -> &RecordSet {
        &self.records
    }

    fn upsert(&mut self, record: Record) -> StoreResult<Collection> {
        let snapshot = self.records.clone();
        let id = record.id.clone();
        let collection = self.records.upsert(record);
        if let Err(err) = self.persist() {
            self.records = snapshot;
            return Err(err);
        }
        debug!(
            "event=record_upsert module=repo status=ok card_id={} collection={:?}",
            id, collection
        );
        Ok(collection)
    }

    fn remove(&mut self, id: &str) -> StoreResult<usize> {
        let snapshot = self.records.clone();
        let removed = self.records.remove(id);
        if removed == 0 {
            return Ok(0);
        }
        if let Err(err) = self.persist() {
            self.records = snapshot;
            return Err(err);
        }
        Ok(removed)
    }
}
