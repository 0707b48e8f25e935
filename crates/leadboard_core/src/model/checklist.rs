//! Order fulfillment checklist.

use serde::{Deserialize, Serialize};

/// Canned fulfillment steps, in checklist order.
pub const ORDER_STEPS: [&str; 10] = [
    "Order confirmation received",
    "Technical analysis completed",
    "Materials ordered",
    "Production started",
    "Quality check",
    "Packaging completed",
    "Shipment scheduled",
    "Delivery completed",
    "Installation completed",
    "Final acceptance test",
];

/// One fulfillment step. `id` is the 1-based step position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: u32,
    #[serde(alias = "text")]
    pub label: String,
    pub completed: bool,
}

/// Builds the full order checklist with every step incomplete.
pub fn new_order_checklist() -> Vec<ChecklistItem> {
    ORDER_STEPS
        .iter()
        .zip(1_u32..)
        .map(|(label, id)| ChecklistItem {
            id,
            label: (*label).to_string(),
            completed: false,
        })
        .collect()
}

/// Completion summary for a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: u32,
    pub total: u32,
}

impl ChecklistProgress {
    pub fn of(items: &[ChecklistItem]) -> Self {
        let completed = items.iter().filter(|item| item.completed).count();
        Self {
            completed: saturating_u32(completed),
            total: saturating_u32(items.len()),
        }
    }

    /// Rounded completion percentage in `0..=100`; 0 for an empty checklist.
    pub fn percent(self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let completed = u64::from(self.completed.min(self.total));
        let total = u64::from(self.total);
        // Integer round-half-up of 100 * completed / total.
        ((completed * 200 + total) / (total * 2)) as u32
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
