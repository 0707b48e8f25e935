//! Core engine for the leadboard sales pipeline.
//! This crate owns every card lifecycle invariant; front ends only emit
//! intents and render outcomes.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, MirrorRetention};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{board_of, Board, ORDERS_INTAKE_LIST_ID};
pub use model::card::{Card, CardFields, CardId, Priority};
pub use model::checklist::{ChecklistItem, ChecklistProgress};
pub use model::record::{Collection, OrderProgress, Record, RecordSet};
pub use repo::card_repo::{CardRepository, StoredCardRepository};
pub use repo::record_repo::{RecordRepository, StoredRecordRepository};
pub use service::dispatch::{Intent, Outcome};
pub use service::export::{ExportDocument, ExportError};
pub use service::lifecycle::{
    LifecycleEngine, LifecycleError, LifecycleResult, MoveOutcome, ToggleOutcome, Transition,
};
pub use store::kv_store::{KvStore, SqliteKvStore, StoreError, StoreResult};

/// Engine wired to a SQLite-backed store.
pub type SqliteEngine<'conn, K> = LifecycleEngine<
    StoredCardRepository<SqliteKvStore<'conn>>,
    StoredRecordRepository<SqliteKvStore<'conn>>,
    K,
>;

/// Loads both repositories from `conn` and bootstraps an engine.
pub fn open_engine<K: Clock>(
    conn: &rusqlite::Connection,
    clock: K,
    config: EngineConfig,
) -> LifecycleResult<SqliteEngine<'_, K>> {
    let store = SqliteKvStore::new(conn);
    let cards = StoredCardRepository::load(store)?;
    let records = StoredRecordRepository::load(store)?;
    LifecycleEngine::bootstrap(cards, records, clock, config)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
