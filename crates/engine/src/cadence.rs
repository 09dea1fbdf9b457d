//! Dunning cadence tables: one ordered action sequence and one
//! minimum-balance threshold per account type.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use recoup_core::{AccountType, CollectionAction, DunningChannel};

use crate::error::RulebookError;
use crate::standard;

/// One template entry in a dunning sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningStep {
    /// Day offset from the account's due date.
    pub day: i64,
    pub action: CollectionAction,
    pub template_id: String,
    pub channel: DunningChannel,
    /// Mandatory steps fire regardless of channel preferences. Regulated
    /// notices (demand letters, final notices) are mandatory.
    pub mandatory: bool,
}

/// The cadence for one account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningSequence {
    pub account_type: AccountType,
    /// Balances below this are not worth dunning.
    pub minimum_balance: Decimal,
    pub steps: Vec<DunningStep>,
}

/// Immutable cadence tables keyed by account type, validated at
/// construction.
#[derive(Debug, Clone)]
pub struct CadenceBook {
    sequences: BTreeMap<AccountType, DunningSequence>,
}

impl CadenceBook {
    /// Build a cadence book from explicit sequences, checking integrity:
    /// a sequence for every account type, non-negative thresholds,
    /// non-negative day offsets in non-decreasing order.
    pub fn new(sequences: Vec<DunningSequence>) -> Result<Self, RulebookError> {
        let sequences: BTreeMap<AccountType, DunningSequence> = sequences
            .into_iter()
            .map(|s| (s.account_type, s))
            .collect();
        for account_type in AccountType::ALL {
            let sequence = sequences
                .get(&account_type)
                .ok_or(RulebookError::MissingSequence { account_type })?;
            if sequence.minimum_balance < Decimal::ZERO {
                return Err(RulebookError::NegativeThreshold { account_type });
            }
            let mut previous = 0;
            for step in &sequence.steps {
                if step.day < 0 {
                    return Err(RulebookError::NegativeDayOffset {
                        account_type,
                        day: step.day,
                    });
                }
                if step.day < previous {
                    return Err(RulebookError::UnorderedSequence { account_type });
                }
                previous = step.day;
            }
        }
        Ok(Self { sequences })
    }

    /// The production cadences compiled into the engine. Integrity is
    /// asserted by test, so construction here does not re-validate.
    pub fn standard() -> Self {
        Self {
            sequences: standard::cadences()
                .into_iter()
                .map(|s| (s.account_type, s))
                .collect(),
        }
    }

    /// Lookup never fails: construction guarantees a sequence per type.
    pub fn sequence(&self, account_type: AccountType) -> &DunningSequence {
        &self.sequences[&account_type]
    }

    /// Minimum balance below which dunning is skipped for this type.
    pub fn minimum_balance(&self, account_type: AccountType) -> Decimal {
        self.sequence(account_type).minimum_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_cadences_pass_validation() {
        CadenceBook::new(standard::cadences())
            .expect("standard cadences must be internally consistent");
    }

    #[test]
    fn every_account_type_has_a_sequence() {
        let book = CadenceBook::standard();
        for account_type in AccountType::ALL {
            assert!(
                !book.sequence(account_type).steps.is_empty(),
                "empty sequence for {}",
                account_type
            );
        }
    }

    #[test]
    fn missing_sequence_is_rejected() {
        let partial: Vec<DunningSequence> = standard::cadences()
            .into_iter()
            .filter(|s| s.account_type != AccountType::Charity)
            .collect();
        let err = CadenceBook::new(partial).unwrap_err();
        assert_eq!(
            err,
            RulebookError::MissingSequence {
                account_type: AccountType::Charity
            }
        );
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut sequences = standard::cadences();
        for sequence in &mut sequences {
            if sequence.account_type == AccountType::SelfPay {
                sequence.steps.swap(0, 1);
            }
        }
        let err = CadenceBook::new(sequences).unwrap_err();
        assert_eq!(
            err,
            RulebookError::UnorderedSequence {
                account_type: AccountType::SelfPay
            }
        );
    }
}
