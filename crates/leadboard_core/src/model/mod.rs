//! Pipeline board domain model.
//!
//! # Responsibility
//! - Define cards, checklists, boards and their flattened records.
//! - Own the pure derivations (board classification, progress, projection).
//!
//! # Invariants
//! - A card's board is always derived from its list id.
//! - A checklist is only ever built in full.

pub mod board;
pub mod card;
pub mod checklist;
pub mod record;
