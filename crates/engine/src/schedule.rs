//! Planner output value objects.
//!
//! A schedule is recomputed on every planning call from the account
//! snapshot plus the static cadence tables. It is never the source of
//! truth for what actually happened: the caller's execution log is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use recoup_core::{AccountType, CollectionAction, CollectionState, DunningChannel};

/// Status of one scheduled action, derived at planning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Pending,
    Completed,
    Skipped,
    Failed,
    /// Past-dated with no execution record, under the
    /// confirmation-requiring completion policy.
    Unconfirmed,
}

/// A cadence step resolved against a concrete account and clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDunningAction {
    /// Day offset from the due date; with the action, this is the
    /// caller's execution-log key.
    pub day: i64,
    pub action: CollectionAction,
    pub template_id: String,
    pub channel: DunningChannel,
    pub mandatory: bool,
    pub scheduled_date: Date,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
}

/// The planner's output: a time-ordered outreach schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningSchedule {
    pub account_id: String,
    pub account_type: AccountType,
    pub state: CollectionState,
    pub balance: Decimal,
    pub due_date: Date,
    pub days_past_due: i64,
    pub actions: Vec<ScheduledDunningAction>,
    /// Earliest pending action date, or a 30-day re-review date when
    /// nothing remains (or dunning is skipped).
    pub next_action_date: Date,
    pub is_paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_end_date: Option<Date>,
}

/// Structured record of one executed action, handed to the communication
/// gateway collaborator. Delivery itself happens outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningExecutionResult {
    pub account_id: String,
    pub action: CollectionAction,
    pub channel: DunningChannel,
    pub message: String,
    pub timestamp: OffsetDateTime,
    pub success: bool,
}

/// Aggregate view of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DunningMetrics {
    pub total_actions: usize,
    pub pending_actions: usize,
    pub completed_actions: usize,
    pub skipped_actions: usize,
    pub failed_actions: usize,
    pub unconfirmed_actions: usize,
    /// Completed over total, as a percentage rounded to one decimal
    /// place. Zero for an empty schedule.
    pub completion_percentage: Decimal,
    /// Days until the next action, floored at zero. Absent while the
    /// schedule is paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action_in_days: Option<i64>,
}
