//! The production rulebook: state configurations, the transition graph,
//! and the per-account-type dunning cadences.
//!
//! Kept as plain constructor functions so tests can take these tables,
//! perturb them, and build alternate registries without touching any
//! process-wide state.

use rust_decimal::Decimal;

use recoup_core::{AccountType, CollectionAction, CollectionState, DunningChannel, PaymentActivity};

use crate::cadence::{DunningSequence, DunningStep};
use crate::registry::{StateConfig, StateTransition};

use CollectionAction::*;
use CollectionState::*;
use DunningChannel::*;

/// Per-state configuration table.
pub fn state_configs() -> Vec<StateConfig> {
    vec![
        StateConfig {
            state: Current,
            display_name: "Current".to_string(),
            description: "Account within terms, nothing past due.".to_string(),
            allowed_actions: vec![SendStatement, VerifyInsurance],
            auto_actions: vec![],
            dunning_intensity: 0,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: PastDue30,
            display_name: "Past due 1-30 days".to_string(),
            description: "Early collections: courtesy reminders and first statements.".to_string(),
            allowed_actions: vec![SendStatement, SendReminder, SendSms, OfferPaymentPlan],
            auto_actions: vec![SendReminder],
            dunning_intensity: 2,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: PastDue60,
            display_name: "Past due 31-60 days".to_string(),
            description: "Second statement cycle with live outreach.".to_string(),
            allowed_actions: vec![
                SendStatement,
                SendReminder,
                SendSms,
                MakeCall,
                OfferPaymentPlan,
            ],
            auto_actions: vec![SendReminder],
            dunning_intensity: 4,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: PastDue90,
            display_name: "Past due 61-90 days".to_string(),
            description: "Escalated outreach before final notices.".to_string(),
            allowed_actions: vec![
                SendStatement,
                SendReminder,
                MakeCall,
                SendFinalNotice,
                OfferPaymentPlan,
                OfferSettlement,
            ],
            auto_actions: vec![SendFinalNotice],
            dunning_intensity: 5,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: PastDue120,
            display_name: "Past due 91-120 days".to_string(),
            description: "Final internal statement cycle; credit reporting opens.".to_string(),
            allowed_actions: vec![
                SendFinalNotice,
                SendDemandLetter,
                MakeCall,
                OfferSettlement,
                ReportToCredit,
            ],
            auto_actions: vec![SendDemandLetter],
            dunning_intensity: 6,
            can_report_to_credit: true,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: PreCollection,
            display_name: "Pre-collection".to_string(),
            description: "Last internal window before agency referral.".to_string(),
            allowed_actions: vec![
                SendDemandLetter,
                MakeCall,
                OfferSettlement,
                ReportToCredit,
                SendToAgency,
                ReviewAccount,
            ],
            auto_actions: vec![SendDemandLetter],
            dunning_intensity: 8,
            can_report_to_credit: true,
            can_send_to_agency: true,
            can_write_off: true,
        },
        StateConfig {
            state: CollectionAgency,
            display_name: "At collection agency".to_string(),
            description: "Placed with an outside agency; internal outreach stops.".to_string(),
            allowed_actions: vec![ReviewAccount, ReportToCredit, OfferSettlement, WriteOff],
            auto_actions: vec![ReportToCredit],
            dunning_intensity: 9,
            can_report_to_credit: true,
            can_send_to_agency: true,
            can_write_off: true,
        },
        StateConfig {
            state: BadDebt,
            display_name: "Bad debt".to_string(),
            description: "Returned uncollectable; awaiting write-off decision.".to_string(),
            allowed_actions: vec![ReviewAccount, WriteOff, OfferSettlement],
            auto_actions: vec![],
            dunning_intensity: 10,
            can_report_to_credit: true,
            can_send_to_agency: false,
            can_write_off: true,
        },
        StateConfig {
            state: Paid,
            display_name: "Paid".to_string(),
            description: "Balance satisfied; closes through account closure.".to_string(),
            allowed_actions: vec![CloseAccount, SendStatement],
            auto_actions: vec![],
            dunning_intensity: 0,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
        StateConfig {
            state: WrittenOff,
            display_name: "Written off".to_string(),
            description: "Balance written off; terminal.".to_string(),
            allowed_actions: vec![ReviewAccount],
            auto_actions: vec![],
            dunning_intensity: 0,
            can_report_to_credit: false,
            can_send_to_agency: false,
            can_write_off: false,
        },
    ]
}

/// The lifecycle transition graph.
pub fn state_transitions() -> Vec<StateTransition> {
    fn edge(
        from: CollectionState,
        to: CollectionState,
        min_days_in_state: Option<u32>,
        payment_activity: Option<PaymentActivity>,
        requires_approval: bool,
        description: &str,
    ) -> StateTransition {
        StateTransition {
            from,
            to,
            min_days_in_state,
            payment_activity,
            requires_approval,
            description: description.to_string(),
        }
    }

    use PaymentActivity::*;
    vec![
        // Out of CURRENT
        edge(Current, PastDue30, None, None, false, "payment missed, account enters early collections"),
        edge(Current, PastDue30, None, Some(ReturnedPayment), false, "returned payment re-opens collections"),
        edge(Current, PastDue30, None, Some(PaymentPlanDefault), false, "defaulted payment plan re-enters collections"),
        edge(Current, Paid, None, Some(FullPayment), false, "balance paid in full"),
        // Out of PAST_DUE_30
        edge(PastDue30, PastDue60, Some(30), None, false, "aged past 30 days without payment"),
        edge(PastDue30, Paid, None, Some(FullPayment), false, "balance paid in full"),
        edge(PastDue30, Current, None, Some(PartialPayment), false, "partial payment returns the account to current"),
        edge(PastDue30, Current, None, Some(PaymentPlanStarted), false, "payment plan supersedes aging"),
        // Out of PAST_DUE_60
        edge(PastDue60, PastDue90, Some(30), None, false, "aged past 60 days without payment"),
        edge(PastDue60, Paid, None, Some(FullPayment), false, "balance paid in full"),
        edge(PastDue60, PastDue30, None, Some(PartialPayment), false, "partial payment steps the account back"),
        edge(PastDue60, Current, None, Some(PaymentPlanStarted), false, "payment plan supersedes aging"),
        // Out of PAST_DUE_90
        edge(PastDue90, PastDue120, Some(30), None, false, "aged past 90 days without payment"),
        edge(PastDue90, Paid, None, Some(FullPayment), false, "balance paid in full"),
        edge(PastDue90, PastDue60, None, Some(PartialPayment), false, "partial payment steps the account back"),
        edge(PastDue90, Current, None, Some(PaymentPlanStarted), false, "payment plan supersedes aging"),
        // Out of PAST_DUE_120
        edge(PastDue120, PreCollection, Some(30), None, false, "statement cycle exhausted, final internal window"),
        edge(PastDue120, Paid, None, Some(FullPayment), false, "balance paid in full"),
        edge(PastDue120, PastDue90, None, Some(PartialPayment), false, "partial payment steps the account back"),
        edge(PastDue120, Current, None, Some(PaymentPlanStarted), false, "payment plan supersedes aging"),
        // Out of PRE_COLLECTION
        edge(PreCollection, CollectionAgency, Some(14), None, true, "refer to outside collection agency"),
        edge(PreCollection, Paid, None, Some(FullPayment), false, "balance paid in full"),
        edge(PreCollection, PastDue120, None, Some(PartialPayment), false, "partial payment defers agency referral"),
        edge(PreCollection, Current, None, Some(PaymentPlanStarted), false, "payment plan supersedes aging"),
        edge(PreCollection, WrittenOff, None, None, true, "write off a qualifying balance"),
        // Out of COLLECTION_AGENCY
        edge(CollectionAgency, BadDebt, Some(90), None, true, "agency returned the account uncollectable"),
        edge(CollectionAgency, Paid, None, Some(FullPayment), false, "agency recovered the balance in full"),
        edge(CollectionAgency, Current, None, Some(PaymentPlanStarted), true, "recall from agency onto a payment plan"),
        // Out of BAD_DEBT
        edge(BadDebt, WrittenOff, None, None, true, "write off bad debt"),
        edge(BadDebt, Paid, None, Some(FullPayment), false, "recovery payment on bad debt"),
        // PAID and WRITTEN_OFF have no outgoing edges: PAID closes through
        // the CLOSE_ACCOUNT action, WRITTEN_OFF is terminal.
    ]
}

/// Per-account-type dunning cadences with minimum-balance thresholds.
pub fn cadences() -> Vec<DunningSequence> {
    fn step(
        day: i64,
        action: CollectionAction,
        template_id: &str,
        channel: DunningChannel,
        mandatory: bool,
    ) -> DunningStep {
        DunningStep {
            day,
            action,
            template_id: template_id.to_string(),
            channel,
            mandatory,
        }
    }

    vec![
        DunningSequence {
            account_type: AccountType::SelfPay,
            minimum_balance: Decimal::new(2500, 2),
            steps: vec![
                step(1, SendStatement, "self_pay_first_statement", Letter, true),
                step(14, SendReminder, "self_pay_reminder_email", Email, false),
                step(30, SendStatement, "self_pay_second_statement", Letter, true),
                step(35, SendSms, "self_pay_text_nudge", Sms, false),
                step(45, MakeCall, "self_pay_courtesy_call", Call, false),
                step(60, SendFinalNotice, "self_pay_final_notice", Letter, true),
                step(75, MakeCall, "self_pay_escalation_call", Call, false),
                step(90, SendDemandLetter, "self_pay_demand_letter", Letter, true),
                step(105, OfferSettlement, "self_pay_settlement_offer", Email, false),
                step(120, SendFinalNotice, "self_pay_agency_warning", Letter, true),
            ],
        },
        DunningSequence {
            account_type: AccountType::Insurance,
            minimum_balance: Decimal::new(10000, 2),
            steps: vec![
                step(30, VerifyInsurance, "insurance_claim_follow_up", Call, false),
                step(45, SendStatement, "insurance_patient_responsibility", Letter, true),
                step(75, SendReminder, "insurance_balance_reminder", Email, false),
                step(105, MakeCall, "insurance_patient_call", Call, false),
                step(135, SendDemandLetter, "insurance_demand_letter", Letter, true),
            ],
        },
        DunningSequence {
            account_type: AccountType::WorkersComp,
            minimum_balance: Decimal::new(25000, 2),
            steps: vec![
                step(60, VerifyInsurance, "workers_comp_carrier_follow_up", Call, false),
                step(120, SendStatement, "workers_comp_statement", Letter, true),
                step(180, MakeCall, "workers_comp_status_call", Call, false),
            ],
        },
        DunningSequence {
            account_type: AccountType::Charity,
            minimum_balance: Decimal::new(50000, 2),
            steps: vec![
                step(30, SendStatement, "charity_residual_statement", Letter, false),
                step(90, SendReminder, "charity_gentle_reminder", Email, false),
            ],
        },
        DunningSequence {
            account_type: AccountType::PaymentPlan,
            minimum_balance: Decimal::new(1000, 2),
            steps: vec![
                step(1, SendStatement, "plan_schedule_statement", Letter, true),
                step(30, SendReminder, "plan_installment_reminder", Email, false),
                step(60, SendSms, "plan_installment_text", Sms, false),
                step(90, MakeCall, "plan_missed_installment_call", Call, false),
            ],
        },
        DunningSequence {
            account_type: AccountType::Hardship,
            minimum_balance: Decimal::new(10000, 2),
            steps: vec![
                step(45, SendStatement, "hardship_statement", Letter, false),
                step(135, SendReminder, "hardship_reminder", Email, false),
            ],
        },
    ]
}
