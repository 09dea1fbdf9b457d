//! Payment activity events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Payment event reported by the caller alongside an account snapshot.
///
/// Acts as the trigger key correlating an external event to a transition
/// edge in the state registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentActivity {
    FullPayment,
    PartialPayment,
    PromiseToPay,
    PaymentPlanStarted,
    PaymentPlanDefault,
    NoActivity,
    ReturnedPayment,
    Dispute,
}

impl PaymentActivity {
    pub const ALL: [PaymentActivity; 8] = [
        PaymentActivity::FullPayment,
        PaymentActivity::PartialPayment,
        PaymentActivity::PromiseToPay,
        PaymentActivity::PaymentPlanStarted,
        PaymentActivity::PaymentPlanDefault,
        PaymentActivity::NoActivity,
        PaymentActivity::ReturnedPayment,
        PaymentActivity::Dispute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentActivity::FullPayment => "FULL_PAYMENT",
            PaymentActivity::PartialPayment => "PARTIAL_PAYMENT",
            PaymentActivity::PromiseToPay => "PROMISE_TO_PAY",
            PaymentActivity::PaymentPlanStarted => "PAYMENT_PLAN_STARTED",
            PaymentActivity::PaymentPlanDefault => "PAYMENT_PLAN_DEFAULT",
            PaymentActivity::NoActivity => "NO_ACTIVITY",
            PaymentActivity::ReturnedPayment => "RETURNED_PAYMENT",
            PaymentActivity::Dispute => "DISPUTE",
        }
    }
}

impl fmt::Display for PaymentActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentActivity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentActivity::ALL
            .into_iter()
            .find(|activity| activity.as_str() == s)
            .ok_or_else(|| DomainError::UnknownActivity {
                value: s.to_string(),
            })
    }
}
