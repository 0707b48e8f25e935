//! First-run sample cards.

use crate::clock::Clock;
use crate::model::board::board_of;
use crate::model::card::{Card, CardFields, Priority};
use crate::model::checklist::new_order_checklist;
use crate::repo::card_repo::CardRepository;
use crate::repo::record_repo::RecordRepository;
use crate::service::lifecycle::{LifecycleEngine, LifecycleResult};
use log::info;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const SAMPLE_COMPLETED_STEPS: usize = 3;

struct Sample {
    id: &'static str,
    client_name: &'static str,
    client_company: &'static str,
    client_phone: &'static str,
    client_email: &'static str,
    deal_value: f64,
    deal_description: &'static str,
    priority: Priority,
    comments: &'static str,
    list_id: &'static str,
    created_days_ago: i64,
    updated_days_ago: i64,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        id: "sample_1",
        client_name: "Mario Rossi",
        client_company: "Rossi Costruzioni SRL",
        client_phone: "+39 02 1234567",
        client_email: "mario.rossi@rossiconstruzioni.it",
        deal_value: 150_000.0,
        deal_description: "HVAC supply and installation for a new commercial building",
        priority: Priority::High,
        comments: "Very interested. Detailed quote requested by month end.",
        list_id: "obj-milano",
        created_days_ago: 7,
        updated_days_ago: 2,
    },
    Sample {
        id: "sample_2",
        client_name: "Laura Bianchi",
        client_company: "TechSolutions SpA",
        client_phone: "+39 06 9876543",
        client_email: "l.bianchi@techsolutions.com",
        deal_value: 85_000.0,
        deal_description: "Security and access control upgrade for headquarters",
        priority: Priority::Medium,
        comments: "Waiting on board budget approval. Follow-up meeting next week.",
        list_id: "tra-napoli",
        created_days_ago: 5,
        updated_days_ago: 1,
    },
    Sample {
        id: "sample_3",
        client_name: "Giuseppe Verdi",
        client_company: "Verdi Manifatture SNC",
        client_phone: "+39 011 5555555",
        client_email: "g.verdi@verdimanifatture.it",
        deal_value: 45_000.0,
        deal_description: "Automation system for a textile production line",
        priority: Priority::Critical,
        comments: "URGENT: current system down. Quote already approved.",
        list_id: "ord-in-lavorazione",
        created_days_ago: 3,
        updated_days_ago: 0,
    },
    Sample {
        id: "sample_4",
        client_name: "Anna Ferrari",
        client_company: "Ferrari Logistics",
        client_phone: "+39 02 7777777",
        client_email: "a.ferrari@ferrarilogistics.com",
        deal_value: 220_000.0,
        deal_description: "Complete automated warehouse management system",
        priority: Priority::High,
        comments: "Reference customer. Pilot could lead to three more sites.",
        list_id: "obj-grandi-clienti",
        created_days_ago: 10,
        updated_days_ago: 3,
    },
    Sample {
        id: "sample_5",
        client_name: "Marco Neri",
        client_company: "Neri Alimentari SRL",
        client_phone: "+39 081 3333333",
        client_email: "m.neri@nerialimentari.it",
        deal_value: 32_000.0,
        deal_description: "Refrigeration system for a new store",
        priority: Priority::Low,
        comments: "Early stage. Client is comparing other suppliers.",
        list_id: "tra-pmi",
        created_days_ago: 2,
        updated_days_ago: 1,
    },
];

/// Builds the sample cards relative to `now_ms`.
///
/// The orders sample starts with its first three steps completed.
pub fn sample_cards(now_ms: i64) -> Vec<Card> {
    SAMPLES
        .iter()
        .map(|sample| {
            let fields = CardFields {
                client_name: sample.client_name.to_string(),
                client_company: sample.client_company.to_string(),
                client_phone: sample.client_phone.to_string(),
                client_email: sample.client_email.to_string(),
                deal_value: sample.deal_value,
                deal_description: sample.deal_description.to_string(),
                priority: sample.priority,
                comments: sample.comments.to_string(),
            };
            let checklist = board_of(sample.list_id).is_orders().then(|| {
                let mut steps = new_order_checklist();
                for step in steps.iter_mut().take(SAMPLE_COMPLETED_STEPS) {
                    step.completed = true;
                }
                steps
            });
            Card::restore(
                sample.id.to_string(),
                fields,
                sample.list_id,
                now_ms - sample.created_days_ago * DAY_MS,
                now_ms - sample.updated_days_ago * DAY_MS,
                checklist,
            )
        })
        .collect()
}

impl<C, R, K> LifecycleEngine<C, R, K>
where
    C: CardRepository,
    R: RecordRepository,
    K: Clock,
{
    /// Writes the sample cards when the card map is empty.
    ///
    /// Returns how many cards were inserted.
    pub fn seed_if_empty(&mut self) -> LifecycleResult<usize> {
        if self.card_count() > 0 {
            return Ok(0);
        }

        let samples = sample_cards(self.now_ms());
        let count = samples.len();
        for card in samples {
            self.write_through(card, "seed")?;
        }
        info!("event=seed module=service status=ok card_count={count}");
        Ok(count)
    }
}
