//! Board stages and the list-id classifier.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// List that receives cards duplicated into the orders board.
pub const ORDERS_INTAKE_LIST_ID: &str = "ord-in-lavorazione";

const GOALS_PREFIX: &str = "obj-";
const NEGOTIATIONS_PREFIX: &str = "tra-";
const ORDERS_PREFIX: &str = "ord-";

/// One of the three fixed pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    #[serde(alias = "obiettivi")]
    Goals,
    #[serde(alias = "trattative")]
    Negotiations,
    #[serde(alias = "ordini")]
    Orders,
}

impl Board {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::Negotiations => "negotiations",
            Self::Orders => "orders",
        }
    }

    pub fn is_orders(self) -> bool {
        self == Self::Orders
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a list id to the board that owns it.
///
/// Unrecognized prefixes fall back to [`Board::Goals`].
pub fn board_of(list_id: &str) -> Board {
    if list_id.starts_with(GOALS_PREFIX) {
        Board::Goals
    } else if list_id.starts_with(NEGOTIATIONS_PREFIX) {
        Board::Negotiations
    } else if list_id.starts_with(ORDERS_PREFIX) {
        Board::Orders
    } else {
        Board::Goals
    }
}

#[cfg(test)]
mod tests {
    use super::{board_of, Board, ORDERS_INTAKE_LIST_ID};

    #[test]
    fn known_prefixes_map_to_their_board() {
        assert_eq!(board_of("obj-milano"), Board::Goals);
        assert_eq!(board_of("tra-napoli"), Board::Negotiations);
        assert_eq!(board_of("ord-consegnati"), Board::Orders);
        assert_eq!(board_of(ORDERS_INTAKE_LIST_ID), Board::Orders);
    }

    #[test]
    fn unknown_prefixes_default_to_goals() {
        assert_eq!(board_of(""), Board::Goals);
        assert_eq!(board_of("archive"), Board::Goals);
        assert_eq!(board_of("ORD-upper"), Board::Goals);
        assert_eq!(board_of("ord"), Board::Goals);
    }

    #[test]
    fn legacy_board_names_deserialize() {
        let board: Board = serde_json::from_str("\"ordini\"").unwrap();
        assert_eq!(board, Board::Orders);
        assert_eq!(serde_json::to_string(&Board::Negotiations).unwrap(), "\"negotiations\"");
    }
}
