//! Engine configuration.

/// What happens to mirrored records when their card is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorRetention {
    /// Records outlive their card; the mirror never sees deletions.
    #[default]
    Retain,
    /// Deleting a card also drops its records from both collections.
    Cascade,
}

/// Startup and policy knobs for [`crate::LifecycleEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub mirror_retention: MirrorRetention,
    /// Populate sample cards when the store holds no cards at startup.
    pub seed_when_empty: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mirror_retention: MirrorRetention::Retain,
            seed_when_empty: true,
        }
    }
}
