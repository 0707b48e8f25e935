//! Card repository contract and its store-backed implementation.

use crate::model::card::{Card, CardId};
use crate::store::kv_store::{load_json, save_json, KvStore, StoreResult, CARDS_KEY};
use log::{error, info};
use std::collections::BTreeMap;

/// Read/write access to the card map.
pub trait CardRepository {
    fn get(&self, id: &str) -> Option<&Card>;
    /// Inserts or replaces `card`, keyed by its id.
    fn upsert(&mut self, card: Card) -> StoreResult<()>;
    /// Removes `id`, returning the removed card. Absent ids are a no-op.
    fn remove(&mut self, id: &str) -> StoreResult<Option<Card>>;
    /// All cards ordered by id.
    fn all(&self) -> Vec<&Card>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Card map kept in memory and persisted whole under [`CARDS_KEY`].
pub struct StoredCardRepository<S: KvStore> {
    store: S,
    cards: BTreeMap<CardId, Card>,
}

impl<S: KvStore> StoredCardRepository<S> {
    /// Loads the persisted card map, or starts empty on first run.
    pub fn load(store: S) -> StoreResult<Self> {
        let mut cards: BTreeMap<CardId, Card> = load_json(&store, CARDS_KEY)?.unwrap_or_default();
        for card in cards.values_mut() {
            card.normalize();
        }
        info!(
            "event=cards_load module=repo status=ok card_count={}",
            cards.len()
        );
        Ok(Self { store, cards })
    }

    fn persist(&self) -> StoreResult<()> {
        save_json(&self.store, CARDS_KEY, &self.cards).map_err(|err| {
            error!(
                "event=cards_persist module=repo status=error card_count={} error={}",
                self.cards.len(),
                err
            );
            err
        })
    }
}

impl<S: KvStore> CardRepository for StoredCardRepository<S> {
    fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    fn upsert(&mut self, card: Card) -> StoreResult<()> {
        let id = card.id().to_string();
        let previous = self.cards.insert(id.clone(), card);
        if let Err(err) = self.persist() {
            match previous {
                Some(previous) => self.cards.insert(id, previous),
                None => self.cards.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StoreResult<Option<Card>> {
        let Some(removed) = self.cards.remove(id) else {
            return Ok(None);
        };
        if let Err(err) = self.persist() {
            self.cards.insert(id.to_string(), removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    fn all(&self) -> Vec<&Card> {
        self.cards.values().collect()
    }

    fn len(&self) -> usize {
        self.cards.len()
    }
}
