//! Typed user intents and the single `handle` entry point.

use crate::clock::Clock;
use crate::model::card::{Card, CardFields, CardId};
use crate::repo::card_repo::CardRepository;
use crate::repo::record_repo::RecordRepository;
use crate::service::lifecycle::{
    LifecycleEngine, LifecycleResult, MoveOutcome, ToggleOutcome, Transition,
};

/// A user action emitted by a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateCard { fields: CardFields, list_id: String },
    EditCard { id: CardId, fields: CardFields },
    MoveCard { id: CardId, list_id: String },
    DuplicateCard { id: CardId },
    ToggleChecklistItem { id: CardId, item_id: u32 },
    DeleteCard { id: CardId },
}

/// What the front end should re-render or announce after an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(Card),
    Edited(Card),
    Moved { card: Card, transition: Transition },
    /// Move onto the card's current list.
    Unchanged,
    Duplicated(Card),
    Toggled(Card),
    /// Toggle referenced a missing checklist or step.
    Ignored,
    Deleted { id: CardId, existed: bool },
}

impl<C, R, K> LifecycleEngine<C, R, K>
where
    C: CardRepository,
    R: RecordRepository,
    K: Clock,
{
    /// Applies one intent.
    pub fn handle(&mut self, intent: Intent) -> LifecycleResult<Outcome> {
        match intent {
            Intent::CreateCard { fields, list_id } => {
                self.create(fields, &list_id).map(Outcome::Created)
            }
            Intent::EditCard { id, fields } => self.edit(&id, fields).map(Outcome::Edited),
            Intent::MoveCard { id, list_id } => {
                Ok(match self.move_card(&id, &list_id)? {
                    MoveOutcome::Unchanged => Outcome::Unchanged,
                    MoveOutcome::Moved { card, transition } => Outcome::Moved { card, transition },
                })
            }
            Intent::DuplicateCard { id } => self.duplicate_to_orders(&id).map(Outcome::Duplicated),
            Intent::ToggleChecklistItem { id, item_id } => {
                Ok(match self.toggle_checklist_item(&id, item_id)? {
                    ToggleOutcome::Toggled(card) => Outcome::Toggled(card),
                    ToggleOutcome::Ignored => Outcome::Ignored,
                })
            }
            Intent::DeleteCard { id } => {
                let existed = self.delete(&id)?;
                Ok(Outcome::Deleted { id, existed })
            }
        }
    }
}
