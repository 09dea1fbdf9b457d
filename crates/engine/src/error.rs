//! Rulebook integrity errors.

use recoup_core::{AccountType, CollectionAction, CollectionState, PaymentActivity};

/// Defects detected while building a rulebook from explicit tables.
///
/// These are data-integrity failures in the supplied rule set, caught
/// once at construction. They never occur at query time: a registry or
/// cadence book that constructed successfully answers every lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulebookError {
    #[error("no state config supplied for {state}")]
    MissingStateConfig { state: CollectionState },

    #[error("auto action {action} on {state} is not among its allowed actions")]
    AutoActionNotAllowed {
        state: CollectionState,
        action: CollectionAction,
    },

    #[error("dunning intensity {intensity} on {state} is outside 0-10")]
    IntensityOutOfRange {
        state: CollectionState,
        intensity: u8,
    },

    #[error("duplicate transition {from} -> {to} (activity {activity:?})")]
    DuplicateTransition {
        from: CollectionState,
        to: CollectionState,
        activity: Option<PaymentActivity>,
    },

    #[error("no dunning sequence supplied for {account_type}")]
    MissingSequence { account_type: AccountType },

    #[error("dunning sequence for {account_type} has steps out of day order")]
    UnorderedSequence { account_type: AccountType },

    #[error("dunning sequence for {account_type} has a negative day offset {day}")]
    NegativeDayOffset { account_type: AccountType, day: i64 },

    #[error("dunning sequence for {account_type} has a negative minimum balance")]
    NegativeThreshold { account_type: AccountType },
}
