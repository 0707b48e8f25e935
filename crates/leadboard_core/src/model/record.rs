//! Flattened spreadsheet-shaped projection of cards.
//!
//! # Invariants
//! - A collection holds at most one record per card id.
//! - `completion_percent` is within `0..=100` and is 0 for an empty checklist.

use crate::model::board::Board;
use crate::model::card::{deserialize_deal_value, Card, CardId, Priority};
use serde::{Deserialize, Serialize};

/// One spreadsheet row derived from a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: CardId,
    pub client: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_deal_value")]
    pub value: f64,
    pub description: String,
    pub priority: Priority,
    pub stage: Board,
    pub list: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Present on orders records only; flattened into the row.
    #[serde(flatten)]
    pub progress: Option<OrderProgress>,
}

/// Checklist-derived columns of an orders record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProgress {
    pub completed_steps: u32,
    pub total_steps: u32,
    pub completion_percent: u32,
}

/// Which record collection a projection lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Deals,
    Orders,
}

impl Collection {
    pub fn for_board(board: Board) -> Self {
        if board.is_orders() {
            Self::Orders
        } else {
            Self::Deals
        }
    }
}

/// Projects a card into its flattened record.
pub fn project(card: &Card) -> Record {
    let progress = card.board().is_orders().then(|| {
        let progress = card.checklist_progress();
        OrderProgress {
            completed_steps: progress.completed,
            total_steps: progress.total,
            completion_percent: progress.percent(),
        }
    });

    Record {
        id: card.id().to_string(),
        client: card.fields.client_name.clone(),
        company: card.fields.client_company.clone(),
        phone: card.fields.client_phone.clone(),
        email: card.fields.client_email.clone(),
        value: card.fields.deal_value,
        description: card.fields.deal_description.clone(),
        priority: card.fields.priority,
        stage: card.board(),
        list: card.list_id().to_string(),
        created_at: card.created_at(),
        updated_at: card.updated_at(),
        progress,
    }
}

/// Both record collections, as persisted and exported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    #[serde(alias = "trattative")]
    pub deals: Vec<Record>,
    #[serde(alias = "ordini")]
    pub orders: Vec<Record>,
}

impl RecordSet {
    pub fn collection(&self, collection: Collection) -> &[Record] {
        match collection {
            Collection::Deals => &self.deals,
            Collection::Orders => &self.orders,
        }
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Deals => &mut self.deals,
            Collection::Orders => &mut self.orders,
        }
    }

    /// Replaces the record with the same id in the stage's collection, or
    /// appends it. The other collection is left untouched.
    pub fn upsert(&mut self, record: Record) -> Collection {
        let collection = Collection::for_board(record.stage);
        let records = self.collection_mut(collection);
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        collection
    }

    /// Drops every record for `id` from both collections.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.deals.len() + self.orders.len();
        self.deals.retain(|record| record.id != id);
        self.orders.retain(|record| record.id != id);
        before - (self.deals.len() + self.orders.len())
    }

    pub fn find(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.collection(collection)
            .iter()
            .find(|record| record.id == id)
    }
}
