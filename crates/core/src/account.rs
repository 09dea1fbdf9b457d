//! Account types, skip conditions, and the inbound account snapshot.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::action::{CollectionAction, DunningChannel};
use crate::error::DomainError;
use crate::state::CollectionState;

/// Financial class of an account. Selects the dunning sequence and the
/// minimum-balance threshold below which dunning is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    SelfPay,
    Insurance,
    WorkersComp,
    Charity,
    PaymentPlan,
    Hardship,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::SelfPay,
        AccountType::Insurance,
        AccountType::WorkersComp,
        AccountType::Charity,
        AccountType::PaymentPlan,
        AccountType::Hardship,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::SelfPay => "SELF_PAY",
            AccountType::Insurance => "INSURANCE",
            AccountType::WorkersComp => "WORKERS_COMP",
            AccountType::Charity => "CHARITY",
            AccountType::PaymentPlan => "PAYMENT_PLAN",
            AccountType::Hardship => "HARDSHIP",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAccountType {
                value: s.to_string(),
            })
    }
}

/// Kind of a dunning suppression flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipConditionKind {
    RecentPayment,
    PromiseToPay,
    Hardship,
    Dispute,
    Bankruptcy,
    Deceased,
    PaymentPlan,
    MinimumBalance,
}

impl SkipConditionKind {
    pub const ALL: [SkipConditionKind; 8] = [
        SkipConditionKind::RecentPayment,
        SkipConditionKind::PromiseToPay,
        SkipConditionKind::Hardship,
        SkipConditionKind::Dispute,
        SkipConditionKind::Bankruptcy,
        SkipConditionKind::Deceased,
        SkipConditionKind::PaymentPlan,
        SkipConditionKind::MinimumBalance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkipConditionKind::RecentPayment => "RECENT_PAYMENT",
            SkipConditionKind::PromiseToPay => "PROMISE_TO_PAY",
            SkipConditionKind::Hardship => "HARDSHIP",
            SkipConditionKind::Dispute => "DISPUTE",
            SkipConditionKind::Bankruptcy => "BANKRUPTCY",
            SkipConditionKind::Deceased => "DECEASED",
            SkipConditionKind::PaymentPlan => "PAYMENT_PLAN",
            SkipConditionKind::MinimumBalance => "MINIMUM_BALANCE",
        }
    }
}

impl fmt::Display for SkipConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkipConditionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkipConditionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::UnknownSkipCondition {
                value: s.to_string(),
            })
    }
}

/// A dunning suppression flag raised by an external workflow (legal hold,
/// bankruptcy filing, bereavement).
///
/// This is plain data: the planner, not the condition, decides whether the
/// flag currently applies (active + inside its effective window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningSkipCondition {
    #[serde(rename = "type")]
    pub kind: SkipConditionKind,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Key of a dunning action the caller has already executed, as persisted
/// in its execution log: `(day offset, action)` within one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedAction {
    pub day: i64,
    pub action: CollectionAction,
}

/// The account snapshot supplied by the persistence collaborator.
///
/// The engine holds no state of its own; every planning and transition
/// call is a pure function of one of these values plus "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_id: String,
    pub account_type: AccountType,
    pub current_state: CollectionState,
    pub balance: Decimal,
    pub due_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promise_to_pay_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promise_to_pay_amount: Option<Decimal>,
    #[serde(default)]
    pub has_hardship: bool,
    #[serde(default)]
    pub on_payment_plan: bool,
    /// `None` means no preference: every channel is acceptable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_channels: Option<Vec<DunningChannel>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_conditions: Vec<DunningSkipCondition>,
    /// The caller's execution log, consulted when the planner is
    /// configured to require confirmation of past-dated actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executed_actions: Vec<ExecutedAction>,
}

impl AccountSnapshot {
    /// Days past due relative to `today`, clamped at zero. A due date in
    /// the future is a stale-clock artifact, not an error.
    pub fn days_past_due(&self, today: Date) -> i64 {
        (today - self.due_date).whole_days().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn snapshot_deserializes_from_camel_case_wire_json() {
        let json = r#"{
            "accountId": "acct-1001",
            "accountType": "SELF_PAY",
            "currentState": "PAST_DUE_60",
            "balance": "432.50",
            "dueDate": "2026-05-01",
            "lastPaymentDate": "2026-03-15",
            "hasHardship": false,
            "preferredChannels": ["EMAIL", "SMS"],
            "skipConditions": [
                {"type": "DISPUTE", "active": true, "expirationDate": "2026-09-01"}
            ]
        }"#;
        let snapshot: AccountSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.account_type, AccountType::SelfPay);
        assert_eq!(snapshot.current_state, CollectionState::PastDue60);
        assert_eq!(snapshot.balance, Decimal::new(43250, 2));
        assert_eq!(snapshot.due_date, date!(2026 - 05 - 01));
        assert_eq!(
            snapshot.preferred_channels,
            Some(vec![DunningChannel::Email, DunningChannel::Sms])
        );
        assert_eq!(snapshot.skip_conditions.len(), 1);
        assert_eq!(
            snapshot.skip_conditions[0].kind,
            SkipConditionKind::Dispute
        );
        // Omitted optionals take their defaults.
        assert!(!snapshot.on_payment_plan);
        assert!(snapshot.executed_actions.is_empty());
        assert_eq!(snapshot.promise_to_pay_date, None);
    }

    #[test]
    fn days_past_due_clamps_future_due_dates() {
        let snapshot = AccountSnapshot {
            account_id: "acct-1".to_string(),
            account_type: AccountType::SelfPay,
            current_state: CollectionState::Current,
            balance: Decimal::new(10000, 2),
            due_date: date!(2026 - 07 - 01),
            last_payment_date: None,
            last_payment_amount: None,
            promise_to_pay_date: None,
            promise_to_pay_amount: None,
            has_hardship: false,
            on_payment_plan: false,
            preferred_channels: None,
            skip_conditions: Vec::new(),
            executed_actions: Vec::new(),
        };
        assert_eq!(snapshot.days_past_due(date!(2026 - 06 - 01)), 0);
        assert_eq!(snapshot.days_past_due(date!(2026 - 07 - 31)), 30);
    }

    #[test]
    fn unknown_enum_token_fails_deserialization() {
        let json = r#"{
            "accountId": "acct-2",
            "accountType": "CRYPTO",
            "currentState": "CURRENT",
            "balance": "5.00",
            "dueDate": "2026-05-01"
        }"#;
        assert!(serde_json::from_str::<AccountSnapshot>(json).is_err());
    }
}
