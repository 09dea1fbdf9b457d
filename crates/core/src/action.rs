//! Collection actions and outreach channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Everything the collections workflow can do to an account.
///
/// Outreach actions appear in dunning sequences; administrative actions
/// (`ReportToCredit`, `SendToAgency`, `WriteOff`, `CloseAccount`) are
/// gated by the per-state configuration and executed by other subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionAction {
    SendStatement,
    SendReminder,
    SendSms,
    MakeCall,
    SendFinalNotice,
    SendDemandLetter,
    OfferPaymentPlan,
    OfferSettlement,
    VerifyInsurance,
    ReviewAccount,
    ReportToCredit,
    SendToAgency,
    WriteOff,
    CloseAccount,
}

impl CollectionAction {
    pub const ALL: [CollectionAction; 14] = [
        CollectionAction::SendStatement,
        CollectionAction::SendReminder,
        CollectionAction::SendSms,
        CollectionAction::MakeCall,
        CollectionAction::SendFinalNotice,
        CollectionAction::SendDemandLetter,
        CollectionAction::OfferPaymentPlan,
        CollectionAction::OfferSettlement,
        CollectionAction::VerifyInsurance,
        CollectionAction::ReviewAccount,
        CollectionAction::ReportToCredit,
        CollectionAction::SendToAgency,
        CollectionAction::WriteOff,
        CollectionAction::CloseAccount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionAction::SendStatement => "SEND_STATEMENT",
            CollectionAction::SendReminder => "SEND_REMINDER",
            CollectionAction::SendSms => "SEND_SMS",
            CollectionAction::MakeCall => "MAKE_CALL",
            CollectionAction::SendFinalNotice => "SEND_FINAL_NOTICE",
            CollectionAction::SendDemandLetter => "SEND_DEMAND_LETTER",
            CollectionAction::OfferPaymentPlan => "OFFER_PAYMENT_PLAN",
            CollectionAction::OfferSettlement => "OFFER_SETTLEMENT",
            CollectionAction::VerifyInsurance => "VERIFY_INSURANCE",
            CollectionAction::ReviewAccount => "REVIEW_ACCOUNT",
            CollectionAction::ReportToCredit => "REPORT_TO_CREDIT",
            CollectionAction::SendToAgency => "SEND_TO_AGENCY",
            CollectionAction::WriteOff => "WRITE_OFF",
            CollectionAction::CloseAccount => "CLOSE_ACCOUNT",
        }
    }
}

impl fmt::Display for CollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAction {
                value: s.to_string(),
            })
    }
}

/// Medium an outreach action travels over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DunningChannel {
    Email,
    Sms,
    Call,
    Letter,
}

impl DunningChannel {
    pub const ALL: [DunningChannel; 4] = [
        DunningChannel::Email,
        DunningChannel::Sms,
        DunningChannel::Call,
        DunningChannel::Letter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DunningChannel::Email => "EMAIL",
            DunningChannel::Sms => "SMS",
            DunningChannel::Call => "CALL",
            DunningChannel::Letter => "LETTER",
        }
    }
}

impl fmt::Display for DunningChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DunningChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DunningChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| DomainError::UnknownChannel {
                value: s.to_string(),
            })
    }
}
