//! Card domain model.
//!
//! # Invariants
//! - `board` always equals `board_of(list_id)`; the only way to change
//!   either is [`Card::relocate`].
//! - `created_at` never changes after construction.
//! - `updated_at` never moves backwards.
//! - A checklist, once attached, is never detached.

use crate::model::board::{board_of, Board};
use crate::model::checklist::{new_order_checklist, ChecklistItem, ChecklistProgress};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque, globally unique card identifier.
pub type CardId = String;

const CARD_ID_PREFIX: &str = "card_";
const CARD_ID_ENTROPY_CHARS: usize = 9;

/// Deal priority shown on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "bassa")]
    Low,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "critica")]
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parses canonical or legacy priority names, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "bassa" => Some(Self::Low),
            "medium" | "media" => Some(Self::Medium),
            "high" | "alta" => Some(Self::High),
            "critical" | "critica" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// User-editable card fields, as submitted by the card form.
///
/// No field is validated: any string and any finite deal value is accepted.
/// Non-finite deal values (NaN, infinities) are stored as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFields {
    pub client_name: String,
    pub client_company: String,
    pub client_phone: String,
    pub client_email: String,
    #[serde(deserialize_with = "deserialize_deal_value")]
    pub deal_value: f64,
    pub deal_description: String,
    pub priority: Priority,
    pub comments: String,
}

impl CardFields {
    /// Replaces a non-finite deal value with 0.
    pub fn normalized(mut self) -> Self {
        self.deal_value = finite_or_zero(self.deal_value);
        self
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// JSON has no NaN: serde_json writes it as `null`, so read `null` back as 0.
pub(crate) fn deserialize_deal_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map_or(0.0, finite_or_zero))
}

/// A client/deal tracked through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    #[serde(flatten)]
    pub fields: CardFields,
    list_id: String,
    board: Board,
    created_at: i64,
    updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checklist: Option<Vec<ChecklistItem>>,
}

impl Card {
    /// Builds a card placed on `list_id`, timestamped at `now_ms`.
    ///
    /// Cards born on the orders board get a fresh checklist.
    pub fn new(id: CardId, fields: CardFields, list_id: impl Into<String>, now_ms: i64) -> Self {
        let list_id = list_id.into();
        let board = board_of(&list_id);
        Self {
            id,
            fields: fields.normalized(),
            list_id,
            board,
            created_at: now_ms,
            updated_at: now_ms,
            checklist: board.is_orders().then(new_order_checklist),
        }
    }

    /// Rebuilds a card from known history (seed data, imports).
    ///
    /// The board is still derived from `list_id`; `updated_at` is clamped to
    /// be no earlier than `created_at`.
    pub fn restore(
        id: CardId,
        fields: CardFields,
        list_id: impl Into<String>,
        created_at: i64,
        updated_at: i64,
        checklist: Option<Vec<ChecklistItem>>,
    ) -> Self {
        let list_id = list_id.into();
        Self {
            id,
            fields: fields.normalized(),
            board: board_of(&list_id),
            list_id,
            created_at,
            updated_at: updated_at.max(created_at),
            checklist,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn checklist(&self) -> Option<&[ChecklistItem]> {
        self.checklist.as_deref()
    }

    pub fn checklist_progress(&self) -> ChecklistProgress {
        ChecklistProgress::of(self.checklist().unwrap_or(&[]))
    }

    /// Moves the card to `list_id`, reclassifying its board.
    ///
    /// Entering the orders board without a checklist attaches a fresh one;
    /// an existing checklist is kept as-is.
    pub fn relocate(&mut self, list_id: impl Into<String>) {
        self.list_id = list_id.into();
        self.board = board_of(&self.list_id);
        if self.board.is_orders() && self.checklist.is_none() {
            self.checklist = Some(new_order_checklist());
        }
    }

    /// Flips one checklist step. Returns `false` when there is no checklist
    /// or no step with `item_id`.
    pub fn toggle_step(&mut self, item_id: u32) -> bool {
        let Some(item) = self
            .checklist
            .as_mut()
            .and_then(|items| items.iter_mut().find(|item| item.id == item_id))
        else {
            return false;
        };
        item.completed = !item.completed;
        true
    }

    /// Records a mutation at `now_ms`. Earlier readings are ignored.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = self.updated_at.max(now_ms);
    }

    /// Replaces the editable fields, keeping identity, placement and checklist.
    pub fn replace_fields(&mut self, fields: CardFields) {
        self.fields = fields.normalized();
    }

    /// Re-derives `board` from `list_id`, repairs timestamp ordering and
    /// zeroes non-finite deal values.
    ///
    /// Applied to every card loaded from storage so hand-edited or legacy
    /// snapshots cannot break the board invariant.
    pub(crate) fn normalize(&mut self) {
        self.fields.deal_value = finite_or_zero(self.fields.deal_value);
        self.board = board_of(&self.list_id);
        self.updated_at = self.updated_at.max(self.created_at);
    }
}

/// Generates a fresh card id: `card_<epoch-ms>_<9 random chars>`.
pub fn generate_card_id(now_ms: i64) -> CardId {
    let entropy = Uuid::new_v4().simple().to_string();
    format!(
        "{CARD_ID_PREFIX}{now_ms}_{}",
        &entropy[..CARD_ID_ENTROPY_CHARS]
    )
}

#[cfg(test)]
mod tests {
    use super::{generate_card_id, Card, CardFields, Priority};
    use crate::model::board::Board;

    #[test]
    fn card_on_goals_has_no_checklist() {
        let card = Card::new("c1".into(), CardFields::default(), "obj-milano", 10);
        assert_eq!(card.board(), Board::Goals);
        assert!(card.checklist().is_none());
        assert_eq!(card.created_at(), 10);
        assert_eq!(card.updated_at(), 10);
    }

    #[test]
    fn relocate_into_orders_attaches_checklist_once() {
        let mut card = Card::new("c1".into(), CardFields::default(), "tra-pmi", 10);
        card.relocate("ord-in-lavorazione");
        assert!(card.toggle_step(1));

        card.relocate("obj-milano");
        assert_eq!(card.board(), Board::Goals);
        card.relocate("ord-spediti");
        let checklist = card.checklist().unwrap();
        assert!(checklist[0].completed);
    }

    #[test]
    fn toggle_unknown_step_reports_false() {
        let mut card = Card::new("c1".into(), CardFields::default(), "ord-x", 1);
        assert!(!card.toggle_step(11));
        let mut plain = Card::new("c2".into(), CardFields::default(), "obj-x", 1);
        assert!(!plain.toggle_step(1));
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut card = Card::new("c1".into(), CardFields::default(), "obj-x", 100);
        card.touch(50);
        assert_eq!(card.updated_at(), 100);
        card.touch(150);
        assert_eq!(card.updated_at(), 150);
    }

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let first = generate_card_id(1_700_000_000_000);
        let second = generate_card_id(1_700_000_000_000);
        assert!(first.starts_with("card_1700000000000_"));
        assert_eq!(first.len(), "card_1700000000000_".len() + 9);
        assert_ne!(first, second);
    }

    #[test]
    fn non_finite_deal_values_become_zero() {
        let fields = CardFields {
            deal_value: f64::NAN,
            ..CardFields::default()
        };
        let mut card = Card::new("c1".into(), fields, "obj-x", 1);
        assert_eq!(card.fields.deal_value, 0.0);

        card.replace_fields(CardFields {
            deal_value: f64::INFINITY,
            ..CardFields::default()
        });
        assert_eq!(card.fields.deal_value, 0.0);

        card.replace_fields(CardFields {
            deal_value: -250.5,
            ..CardFields::default()
        });
        assert_eq!(card.fields.deal_value, -250.5);
    }

    #[test]
    fn null_deal_value_deserializes_as_zero() {
        let json = r#"{
            "id": "c1",
            "deal_value": null,
            "list_id": "obj-x",
            "board": "goals",
            "created_at": 1,
            "updated_at": 1
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.fields.deal_value, 0.0);
    }

    #[test]
    fn priority_accepts_legacy_names() {
        assert_eq!(Priority::parse("Alta"), Some(Priority::High));
        assert_eq!(Priority::parse("critical"), Some(Priority::Critical));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn stored_board_is_rederived_on_normalize() {
        let json = r#"{
            "id": "c9",
            "client_name": "Anna",
            "list_id": "tra-napoli",
            "board": "orders",
            "created_at": 20,
            "updated_at": 10
        }"#;
        let mut card: Card = serde_json::from_str(json).unwrap();
        card.normalize();
        assert_eq!(card.board(), Board::Negotiations);
        assert_eq!(card.updated_at(), 20);
        assert_eq!(card.fields.priority, Priority::Medium);
    }
}
