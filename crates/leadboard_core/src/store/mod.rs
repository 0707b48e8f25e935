//! Persistent key-value store holding the board's top-level blobs.
//!
//! # Responsibility
//! - Persist named JSON blobs (card map, record mirror) across restarts.
//! - Keep SQL details out of repositories.
//!
//! # Invariants
//! - A `put` replaces the whole value stored under a key.
//! - A failed write surfaces as `StoreError`; nothing is retried.

pub mod kv_store;
