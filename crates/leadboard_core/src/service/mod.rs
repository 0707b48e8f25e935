//! Board use-case services.
//!
//! # Responsibility
//! - Run card lifecycle operations against injected repositories.
//! - Translate typed user intents into lifecycle calls.
//! - Produce export documents and first-run sample data.
//!
//! # Invariants
//! - No operation completes without writing both the card map and the
//!   record mirror.

pub mod dispatch;
pub mod export;
pub mod lifecycle;
pub mod seed;
