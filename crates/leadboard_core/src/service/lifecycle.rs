//! Card lifecycle engine.
//!
//! # Responsibility
//! - Create, edit, move, duplicate, toggle and delete cards.
//! - Keep the record mirror converged with the card map.
//!
//! # Invariants
//! - `card.board() == board_of(card.list_id())` after every operation.
//! - Moving to the current list and toggling a missing step write nothing.
//! - `duplicate_to_orders` never mutates its source card.
//! - A failed mirror write rolls the card map back to its prior state.

use crate::clock::Clock;
use crate::config::{EngineConfig, MirrorRetention};
use crate::model::board::{Board, ORDERS_INTAKE_LIST_ID};
use crate::model::card::{generate_card_id, Card, CardFields, CardId};
use crate::model::record::{project, RecordSet};
use crate::repo::card_repo::CardRepository;
use crate::repo::record_repo::RecordRepository;
use crate::store::kv_store::StoreError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Lifecycle operation failure.
#[derive(Debug)]
pub enum LifecycleError {
    /// The referenced card is not in the repository.
    NotFound(CardId),
    /// The durable write failed. Not retried.
    Storage(StoreError),
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "card not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Board change reported to the caller for a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Board,
    pub to: Board,
}

/// Result of [`LifecycleEngine::move_card`].
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Target list equals the current list; nothing was written.
    Unchanged,
    Moved { card: Card, transition: Transition },
}

/// Result of [`LifecycleEngine::toggle_checklist_item`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Toggled(Card),
    /// No checklist or no such step; nothing was written.
    Ignored,
}

/// Application state for one board: repositories, clock and policy.
pub struct LifecycleEngine<C, R, K>
where
    C: CardRepository,
    R: RecordRepository,
    K: Clock,
{
    cards: C,
    records: R,
    clock: K,
    config: EngineConfig,
}

impl<C, R, K> LifecycleEngine<C, R, K>
where
    C: CardRepository,
    R: RecordRepository,
    K: Clock,
{
    pub fn new(cards: C, records: R, clock: K, config: EngineConfig) -> Self {
        Self {
            cards,
            records,
            clock,
            config,
        }
    }

    /// Builds the engine and seeds sample cards when configured and empty.
    pub fn bootstrap(cards: C, records: R, clock: K, config: EngineConfig) -> LifecycleResult<Self> {
        let mut engine = Self::new(cards, records, clock, config);
        if config.seed_when_empty {
            engine.seed_if_empty()?;
        }
        Ok(engine)
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn cards(&self) -> Vec<&Card> {
        self.cards.all()
    }

    pub fn records(&self) -> &RecordSet {
        self.records.records()
    }

    pub(crate) fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Creates a card on `list_id`.
    pub fn create(&mut self, fields: CardFields, list_id: &str) -> LifecycleResult<Card> {
        let now = self.clock.now_ms();
        let card = Card::new(generate_card_id(now), fields, list_id, now);
        self.write_through(card.clone(), "card_create")?;
        info!(
            "event=card_create module=lifecycle status=ok card_id={} board={} list_id={}",
            card.id(),
            card.board(),
            card.list_id()
        );
        Ok(card)
    }

    /// Replaces the editable fields of an existing card.
    pub fn edit(&mut self, id: &str, fields: CardFields) -> LifecycleResult<Card> {
        let mut card = self.require(id, "card_edit")?.clone();
        card.replace_fields(fields);
        card.touch(self.clock.now_ms());
        self.write_through(card.clone(), "card_edit")?;
        info!(
            "event=card_edit module=lifecycle status=ok card_id={} board={}",
            card.id(),
            card.board()
        );
        Ok(card)
    }

    /// Moves a card to `new_list_id`, reclassifying its board.
    pub fn move_card(&mut self, id: &str, new_list_id: &str) -> LifecycleResult<MoveOutcome> {
        let current = self.require(id, "card_move")?;
        if current.list_id() == new_list_id {
            info!("event=card_move module=lifecycle status=noop card_id={id}");
            return Ok(MoveOutcome::Unchanged);
        }

        let mut card = current.clone();
        let from = card.board();
        card.relocate(new_list_id);
        card.touch(self.clock.now_ms());
        let transition = Transition {
            from,
            to: card.board(),
        };
        self.write_through(card.clone(), "card_move")?;
        info!(
            "event=card_move module=lifecycle status=ok card_id={} from={} to={} list_id={}",
            card.id(),
            transition.from,
            transition.to,
            card.list_id()
        );
        Ok(MoveOutcome::Moved { card, transition })
    }

    /// Spawns an independent copy of a card on the orders intake list.
    pub fn duplicate_to_orders(&mut self, id: &str) -> LifecycleResult<Card> {
        let fields = self.require(id, "card_duplicate")?.fields.clone();
        let now = self.clock.now_ms();
        let copy = Card::new(generate_card_id(now), fields, ORDERS_INTAKE_LIST_ID, now);
        self.write_through(copy.clone(), "card_duplicate")?;
        info!(
            "event=card_duplicate module=lifecycle status=ok source_id={} card_id={}",
            id,
            copy.id()
        );
        Ok(copy)
    }

    /// Flips one checklist step. Missing checklists or steps are ignored.
    pub fn toggle_checklist_item(&mut self, id: &str, item_id: u32) -> LifecycleResult<ToggleOutcome> {
        let mut card = self.require(id, "checklist_toggle")?.clone();
        if !card.toggle_step(item_id) {
            info!(
                "event=checklist_toggle module=lifecycle status=noop card_id={id} item_id={item_id}"
            );
            return Ok(ToggleOutcome::Ignored);
        }
        card.touch(self.clock.now_ms());
        self.write_through(card.clone(), "checklist_toggle")?;
        let progress = card.checklist_progress();
        info!(
            "event=checklist_toggle module=lifecycle status=ok card_id={} item_id={} completed={} total={}",
            card.id(),
            item_id,
            progress.completed,
            progress.total
        );
        Ok(ToggleOutcome::Toggled(card))
    }

    /// Removes a card. Returns whether one was present.
    ///
    /// Mirrored records are kept unless the retention policy is `Cascade`.
    pub fn delete(&mut self, id: &str) -> LifecycleResult<bool> {
        let Some(removed) = self.cards.remove(id)? else {
            info!("event=card_delete module=lifecycle status=noop card_id={id}");
            return Ok(false);
        };

        if self.config.mirror_retention == MirrorRetention::Cascade {
            if let Err(err) = self.records.remove(id) {
                error!(
                    "event=card_delete module=lifecycle status=error card_id={id} error_code=mirror_write_failed error={err}"
                );
                // Restore the card so the map and mirror agree.
                if let Err(rollback_err) = self.cards.upsert(removed) {
                    log_rollback_failure("card_delete", id, &rollback_err);
                }
                return Err(err.into());
            }
        }

        info!(
            "event=card_delete module=lifecycle status=ok card_id={} retention={:?}",
            id, self.config.mirror_retention
        );
        Ok(true)
    }

    /// Persists `card` and its projection, or neither.
    pub(crate) fn write_through(&mut self, card: Card, event: &'static str) -> LifecycleResult<()> {
        let id = card.id().to_string();
        let previous = self.cards.get(&id).cloned();
        let record = project(&card);

        if let Err(err) = self.cards.upsert(card) {
            error!(
                "event={event} module=lifecycle status=error card_id={id} error_code=card_write_failed error={err}"
            );
            return Err(err.into());
        }

        if let Err(err) = self.records.upsert(record) {
            error!(
                "event={event} module=lifecycle status=error card_id={id} error_code=mirror_write_failed error={err}"
            );
            // Restore the previous card so the map and mirror agree.
            let rollback = match previous {
                Some(previous) => self.cards.upsert(previous),
                None => self.cards.remove(&id).map(|_| ()),
            };
            if let Err(rollback_err) = rollback {
                log_rollback_failure(event, &id, &rollback_err);
            }
            return Err(err.into());
        }

        Ok(())
    }

    fn require(&self, id: &str, event: &'static str) -> LifecycleResult<&Card> {
        self.cards.get(id).ok_or_else(|| {
            info!("event={event} module=lifecycle status=error card_id={id} error_code=not_found");
            LifecycleError::NotFound(id.to_string())
        })
    }
}

fn log_rollback_failure(event: &str, id: &str, err: &StoreError) {
    error!(
        "event={event} module=lifecycle status=error card_id={id} error_code=rollback_failed error={err}"
    );
}
