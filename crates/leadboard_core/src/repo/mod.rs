//! Repository layer over the board store.
//!
//! # Responsibility
//! - Hold the in-memory card map and record mirror.
//! - Write every mutation through to the store as a whole snapshot.
//!
//! # Invariants
//! - After any successful call, memory equals what a fresh load would read.
//! - After a failed write, memory is rolled back to its prior state.

pub mod card_repo;
pub mod record_repo;
