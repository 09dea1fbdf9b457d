//! Collection lifecycle states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Where an account sits in the collections lifecycle.
///
/// The first seven variants form the aging path, ordered by days past due.
/// `Paid` and `WrittenOff` are terminal: `WrittenOff` has no outgoing
/// transitions at all, and `Paid` only closes through the
/// `CLOSE_ACCOUNT` action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionState {
    Current,
    #[serde(rename = "PAST_DUE_30")]
    PastDue30,
    #[serde(rename = "PAST_DUE_60")]
    PastDue60,
    #[serde(rename = "PAST_DUE_90")]
    PastDue90,
    #[serde(rename = "PAST_DUE_120")]
    PastDue120,
    PreCollection,
    CollectionAgency,
    BadDebt,
    Paid,
    WrittenOff,
}

impl CollectionState {
    /// Every state, in lifecycle order.
    pub const ALL: [CollectionState; 10] = [
        CollectionState::Current,
        CollectionState::PastDue30,
        CollectionState::PastDue60,
        CollectionState::PastDue90,
        CollectionState::PastDue120,
        CollectionState::PreCollection,
        CollectionState::CollectionAgency,
        CollectionState::BadDebt,
        CollectionState::Paid,
        CollectionState::WrittenOff,
    ];

    /// The canonical aging path. Dunning intensity is non-decreasing
    /// along this sequence.
    pub const AGING_PATH: [CollectionState; 7] = [
        CollectionState::Current,
        CollectionState::PastDue30,
        CollectionState::PastDue60,
        CollectionState::PastDue90,
        CollectionState::PastDue120,
        CollectionState::PreCollection,
        CollectionState::CollectionAgency,
    ];

    /// Terminal states accept no further aging.
    pub fn is_terminal(self) -> bool {
        matches!(self, CollectionState::Paid | CollectionState::WrittenOff)
    }

    /// The wire token for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionState::Current => "CURRENT",
            CollectionState::PastDue30 => "PAST_DUE_30",
            CollectionState::PastDue60 => "PAST_DUE_60",
            CollectionState::PastDue90 => "PAST_DUE_90",
            CollectionState::PastDue120 => "PAST_DUE_120",
            CollectionState::PreCollection => "PRE_COLLECTION",
            CollectionState::CollectionAgency => "COLLECTION_AGENCY",
            CollectionState::BadDebt => "BAD_DEBT",
            CollectionState::Paid => "PAID",
            CollectionState::WrittenOff => "WRITTEN_OFF",
        }
    }
}

impl fmt::Display for CollectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| DomainError::UnknownState {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tokens_round_trip() {
        for state in CollectionState::ALL {
            assert_eq!(state.as_str().parse::<CollectionState>(), Ok(state));
        }
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&CollectionState::PastDue30).unwrap();
        assert_eq!(json, "\"PAST_DUE_30\"");
        let back: CollectionState = serde_json::from_str("\"PRE_COLLECTION\"").unwrap();
        assert_eq!(back, CollectionState::PreCollection);
    }

    #[test]
    fn unknown_state_is_a_typed_error() {
        let err = "PAST_DUE_31".parse::<CollectionState>().unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownState {
                value: "PAST_DUE_31".to_string()
            }
        );
    }

    #[test]
    fn only_paid_and_written_off_are_terminal() {
        let terminal: Vec<_> = CollectionState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![CollectionState::Paid, CollectionState::WrittenOff]
        );
    }
}
