//! Dunning planner: turns an account snapshot into a time-ordered
//! outreach schedule.
//!
//! Every operation is a pure function of its arguments and the immutable
//! cadence/registry tables. "Now" is always supplied by the caller and
//! read once per call; batch jobs snapshot one instant per run so
//! completion boundaries stay consistent across accounts. The planner
//! never mutates its inputs: schedule adjustments return new values.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};

use recoup_core::{
    AccountSnapshot, AccountType, DunningSkipCondition, SkipConditionKind,
};

use crate::cadence::{CadenceBook, DunningStep};
use crate::registry::StateRegistry;
use crate::schedule::{
    ActionStatus, DunningExecutionResult, DunningMetrics, DunningSchedule, ScheduledDunningAction,
};

/// Re-review horizon for paused or exhausted schedules.
const REVIEW_INTERVAL_DAYS: i64 = 30;

/// Payments newer than this suppress dunning.
const RECENT_PAYMENT_WINDOW_DAYS: i64 = 14;

// ──────────────────────────────────────────────
// Skip decisions
// ──────────────────────────────────────────────

/// Why dunning is suppressed for an account. The `Display` text is the
/// stable reason string surfaced to callers and stored as the pause
/// reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SkipReason {
    MinimumBalance { threshold: Decimal },
    RecentPayment,
    PromiseToPay,
    Hardship,
    Dispute,
    Bankruptcy,
    Deceased,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MinimumBalance { threshold } => {
                write!(f, "balance below minimum dunning threshold of {}", threshold)
            }
            SkipReason::RecentPayment => {
                write!(f, "payment received within the last 14 days")
            }
            SkipReason::PromiseToPay => write!(f, "active promise to pay on file"),
            SkipReason::Hardship => write!(f, "hardship status on file"),
            SkipReason::Dispute => write!(f, "balance is under dispute"),
            SkipReason::Bankruptcy => write!(f, "bankruptcy filing on file"),
            SkipReason::Deceased => write!(f, "patient is deceased"),
        }
    }
}

/// Outcome of [`DunningPlanner::should_skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipDecision {
    pub skip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl SkipDecision {
    fn suppress(reason: SkipReason) -> Self {
        Self {
            skip: true,
            reason: Some(reason),
        }
    }

    fn proceed() -> Self {
        Self {
            skip: false,
            reason: None,
        }
    }
}

/// How past-dated actions acquire their status.
///
/// The optimistic default infers completion purely from the calendar. A
/// deployment that keeps a reliable execution log can require
/// confirmation instead, in which case unlogged past actions surface as
/// `UNCONFIRMED` for review rather than silently completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    #[default]
    AssumeCompleted,
    RequireConfirmation,
}

// ──────────────────────────────────────────────
// Planner
// ──────────────────────────────────────────────

/// The dunning planner. Holds the immutable rule tables and the
/// completion policy; all methods are pure queries over them.
#[derive(Debug, Clone)]
pub struct DunningPlanner {
    registry: StateRegistry,
    cadences: CadenceBook,
    completion: CompletionPolicy,
}

impl DunningPlanner {
    pub fn new(registry: StateRegistry, cadences: CadenceBook) -> Self {
        Self {
            registry,
            cadences,
            completion: CompletionPolicy::default(),
        }
    }

    /// Planner over the production rulebook.
    pub fn standard() -> Self {
        Self::new(StateRegistry::standard(), CadenceBook::standard())
    }

    pub fn with_completion_policy(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    /// The registry this planner consults for intensity lookups.
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// Decide whether dunning is suppressed for this account. Rules run
    /// in fixed order and the first match wins:
    ///
    /// 1. balance below the account type's minimum threshold;
    /// 2. payment within the last 14 days;
    /// 3. promise to pay dated today or later;
    /// 4. the snapshot's hardship flag;
    /// 5. the skip-condition list, in declaration order -- bankruptcy and
    ///    deceased are absolute stops, a `PAYMENT_PLAN` condition never
    ///    stops (it only switches the cadence).
    pub fn should_skip(&self, account: &AccountSnapshot, now: OffsetDateTime) -> SkipDecision {
        let today = now.date();
        let threshold = self.cadences.minimum_balance(account.account_type);
        if account.balance < threshold {
            return SkipDecision::suppress(SkipReason::MinimumBalance { threshold });
        }
        if let Some(last) = account.last_payment_date {
            if (today - last).whole_days() <= RECENT_PAYMENT_WINDOW_DAYS {
                return SkipDecision::suppress(SkipReason::RecentPayment);
            }
        }
        if let Some(promised) = account.promise_to_pay_date {
            if promised >= today {
                return SkipDecision::suppress(SkipReason::PromiseToPay);
            }
        }
        if account.has_hardship {
            return SkipDecision::suppress(SkipReason::Hardship);
        }
        for condition in &account.skip_conditions {
            if !condition_applies(condition, today) {
                continue;
            }
            let reason = match condition.kind {
                SkipConditionKind::Bankruptcy => Some(SkipReason::Bankruptcy),
                SkipConditionKind::Deceased => Some(SkipReason::Deceased),
                SkipConditionKind::Dispute => Some(SkipReason::Dispute),
                SkipConditionKind::Hardship => Some(SkipReason::Hardship),
                SkipConditionKind::PromiseToPay => Some(SkipReason::PromiseToPay),
                SkipConditionKind::RecentPayment => Some(SkipReason::RecentPayment),
                SkipConditionKind::MinimumBalance => {
                    Some(SkipReason::MinimumBalance { threshold })
                }
                // Signals cadence substitution, not suppression.
                SkipConditionKind::PaymentPlan => None,
            };
            if let Some(reason) = reason {
                return SkipDecision::suppress(reason);
            }
        }
        SkipDecision::proceed()
    }

    /// Compute the outreach schedule for an account as of `now`.
    ///
    /// A suppressed account gets a paused, empty schedule with a 30-day
    /// re-review date. Otherwise the account type's cadence applies --
    /// substituted by the payment-plan cadence whenever the account is on
    /// a plan, regardless of its nominal type.
    pub fn generate_plan(&self, account: &AccountSnapshot, now: OffsetDateTime) -> DunningSchedule {
        let today = now.date();
        let days_past_due = account.days_past_due(today);

        let decision = self.should_skip(account, now);
        if decision.skip {
            return DunningSchedule {
                account_id: account.account_id.clone(),
                account_type: account.account_type,
                state: account.current_state,
                balance: account.balance,
                due_date: account.due_date,
                days_past_due,
                actions: Vec::new(),
                next_action_date: today + Duration::days(REVIEW_INTERVAL_DAYS),
                is_paused: true,
                pause_reason: decision.reason.map(|r| r.to_string()),
                pause_end_date: None,
            };
        }

        let cadence_type = if account.on_payment_plan {
            AccountType::PaymentPlan
        } else {
            account.account_type
        };
        let sequence = self.cadences.sequence(cadence_type);

        let actions: Vec<ScheduledDunningAction> = sequence
            .steps
            .iter()
            .map(|step| {
                let scheduled_date = account.due_date + Duration::days(step.day);
                let (status, status_reason) = self.step_status(step, scheduled_date, today, account);
                ScheduledDunningAction {
                    day: step.day,
                    action: step.action,
                    template_id: step.template_id.clone(),
                    channel: step.channel,
                    mandatory: step.mandatory,
                    scheduled_date,
                    status,
                    status_reason,
                }
            })
            .collect();

        let next_action_date = actions
            .iter()
            .filter(|a| a.status == ActionStatus::Pending)
            .map(|a| a.scheduled_date)
            .min()
            .unwrap_or(today + Duration::days(REVIEW_INTERVAL_DAYS));

        DunningSchedule {
            account_id: account.account_id.clone(),
            account_type: account.account_type,
            state: account.current_state,
            balance: account.balance,
            due_date: account.due_date,
            days_past_due,
            actions,
            next_action_date,
            is_paused: false,
            pause_reason: None,
            pause_end_date: None,
        }
    }

    /// Status of one cadence step. Channel suppression is decided first:
    /// a non-mandatory step on a channel the patient excluded never
    /// fires, past-dated or not. Past-dated steps then complete per the
    /// completion policy; everything else is pending.
    fn step_status(
        &self,
        step: &DunningStep,
        scheduled_date: Date,
        today: Date,
        account: &AccountSnapshot,
    ) -> (ActionStatus, Option<String>) {
        if !step.mandatory {
            if let Some(preferred) = &account.preferred_channels {
                if !preferred.contains(&step.channel) {
                    return (
                        ActionStatus::Skipped,
                        Some("Channel not in patient preferences".to_string()),
                    );
                }
            }
        }
        if scheduled_date < today {
            return match self.completion {
                CompletionPolicy::AssumeCompleted => (ActionStatus::Completed, None),
                CompletionPolicy::RequireConfirmation => {
                    let confirmed = account
                        .executed_actions
                        .iter()
                        .any(|logged| logged.day == step.day && logged.action == step.action);
                    if confirmed {
                        (ActionStatus::Completed, None)
                    } else {
                        (
                            ActionStatus::Unconfirmed,
                            Some("no execution record for past-dated action".to_string()),
                        )
                    }
                }
            };
        }
        (ActionStatus::Pending, None)
    }

    /// First pending action due as of `now`. `None` while paused or when
    /// nothing is due yet.
    pub fn next_action<'a>(
        &self,
        schedule: &'a DunningSchedule,
        now: OffsetDateTime,
    ) -> Option<&'a ScheduledDunningAction> {
        if schedule.is_paused {
            return None;
        }
        let today = now.date();
        schedule
            .actions
            .iter()
            .find(|a| a.status == ActionStatus::Pending && a.scheduled_date <= today)
    }

    /// Every pending action due as of `now`, in cadence order. Supports
    /// executing several overdue steps in one batch pass.
    pub fn pending_actions<'a>(
        &self,
        schedule: &'a DunningSchedule,
        now: OffsetDateTime,
    ) -> Vec<&'a ScheduledDunningAction> {
        if schedule.is_paused {
            return Vec::new();
        }
        let today = now.date();
        schedule
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Pending && a.scheduled_date <= today)
            .collect()
    }

    /// Produce the structured execution record for one action. Delivery
    /// is the communication gateway's job; this only builds the record
    /// the caller persists and forwards.
    pub fn execute_action(
        &self,
        account_id: &str,
        action: &ScheduledDunningAction,
        now: OffsetDateTime,
    ) -> DunningExecutionResult {
        DunningExecutionResult {
            account_id: account_id.to_string(),
            action: action.action,
            channel: action.channel,
            message: format!(
                "{} dispatched via {} using template {}",
                action.action, action.channel, action.template_id
            ),
            timestamp: now,
            success: true,
        }
    }

    /// Aggregate counts and progress for a schedule.
    pub fn metrics(&self, schedule: &DunningSchedule, now: OffsetDateTime) -> DunningMetrics {
        let count =
            |status: ActionStatus| schedule.actions.iter().filter(|a| a.status == status).count();
        let total = schedule.actions.len();
        let completed = count(ActionStatus::Completed);
        let completion_percentage = if total == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(completed as u64) / Decimal::from(total as u64)
                * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven)
        };
        let next_action_in_days = if schedule.is_paused {
            None
        } else {
            Some((schedule.next_action_date - now.date()).whole_days().max(0))
        };
        DunningMetrics {
            total_actions: total,
            pending_actions: count(ActionStatus::Pending),
            completed_actions: completed,
            skipped_actions: count(ActionStatus::Skipped),
            failed_actions: count(ActionStatus::Failed),
            unconfirmed_actions: count(ActionStatus::Unconfirmed),
            completion_percentage,
            next_action_in_days,
        }
    }

    /// Rescale the remaining cadence toward a target intensity (1-10).
    ///
    /// Pending steps are rescheduled from the due date with their day
    /// offsets scaled by `current / target` (a higher target compresses
    /// the cadence), never earlier than today. Completed and skipped
    /// history is untouched, and each action keeps its original `day`
    /// offset so the caller's execution-log keys stay valid.
    pub fn adjust_intensity(
        &self,
        schedule: &DunningSchedule,
        target_intensity: u8,
        now: OffsetDateTime,
    ) -> DunningSchedule {
        let today = now.date();
        let current = i64::from(self.registry.dunning_intensity(schedule.state));
        let target = i64::from(target_intensity.clamp(1, 10));
        if current == 0 {
            return schedule.clone();
        }
        let mut adjusted = schedule.clone();
        for action in adjusted
            .actions
            .iter_mut()
            .filter(|a| a.status == ActionStatus::Pending)
        {
            // Integer round-half-up rescale of the day offset.
            let scaled = (action.day * current + target / 2) / target;
            let rescheduled = schedule.due_date + Duration::days(scaled);
            action.scheduled_date = rescheduled.max(today);
        }
        if let Some(earliest) = adjusted
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Pending)
            .map(|a| a.scheduled_date)
            .min()
        {
            adjusted.next_action_date = earliest;
        }
        adjusted
    }

    /// Pause a schedule for `days` days. Pausing only toggles metadata;
    /// the actions and their statuses are left as computed.
    pub fn pause(
        &self,
        schedule: &DunningSchedule,
        reason: &str,
        days: i64,
        now: OffsetDateTime,
    ) -> DunningSchedule {
        let mut paused = schedule.clone();
        paused.is_paused = true;
        paused.pause_reason = Some(reason.to_string());
        paused.pause_end_date = Some(now.date() + Duration::days(days));
        paused
    }

    /// Clear the pause metadata. Resuming does not recompute the
    /// schedule; callers regenerate the plan to pick up elapsed time.
    pub fn resume(&self, schedule: &DunningSchedule) -> DunningSchedule {
        let mut resumed = schedule.clone();
        resumed.is_paused = false;
        resumed.pause_reason = None;
        resumed.pause_end_date = None;
        resumed
    }
}

/// Whether a suppression flag currently applies: it must be active and
/// today must fall inside its effective window. The planner owns expiry;
/// an expired condition is simply ignored.
fn condition_applies(condition: &DunningSkipCondition, today: Date) -> bool {
    if !condition.active {
        return false;
    }
    if let Some(start) = condition.effective_date {
        if start > today {
            return false;
        }
    }
    if let Some(end) = condition.expiration_date {
        if end < today {
            return false;
        }
    }
    true
}
