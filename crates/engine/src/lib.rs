//! recoup-engine: collection lifecycle state machine and dunning planner.
//!
//! The engine decides, for a past-due patient account, which collection
//! state it should move to next and which outreach actions should fire
//! and when. It is stateless and side-effect-free: every operation is a
//! pure function of the supplied account snapshot, an explicit "now", and
//! the immutable rule tables. Persistence, delivery, and approval
//! enforcement belong to the caller and its collaborators; the engine
//! only computes and explains.
//!
//! # Public API
//!
//! - [`StateRegistry`] -- transition graph queries ([`StateRegistry::validate_transition`],
//!   [`StateRegistry::next_state`])
//! - [`DunningPlanner`] -- skip evaluation, schedule generation, metrics,
//!   intensity and pause controls
//! - [`recommend`] / [`plan`] / [`assess`] -- one-call conveniences over
//!   the standard rulebook
//!
//! Callers that need alternate rule sets build their own
//! [`StateRegistry`] and [`CadenceBook`] from explicit tables; both
//! validate integrity at construction.

pub mod cadence;
pub mod error;
pub mod planner;
pub mod registry;
pub mod schedule;
pub mod standard;

use serde::Serialize;
use time::OffsetDateTime;

use recoup_core::{AccountSnapshot, PaymentActivity};

pub use cadence::{CadenceBook, DunningSequence, DunningStep};
pub use error::RulebookError;
pub use planner::{CompletionPolicy, DunningPlanner, SkipDecision, SkipReason};
pub use registry::{
    StateConfig, StateRegistry, StateTransition, StateTransitionResult, TransitionValidation,
};
pub use schedule::{
    ActionStatus, DunningExecutionResult, DunningMetrics, DunningSchedule, ScheduledDunningAction,
};

/// Combined output of one engine pass over an account: the recommended
/// state transition and the recomputed outreach schedule. The two are
/// computed independently; the caller executes either through its
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAssessment {
    pub transition: StateTransitionResult,
    pub schedule: DunningSchedule,
}

/// Recommend a state transition for an account under the standard
/// rulebook.
pub fn recommend(
    account: &AccountSnapshot,
    activity: PaymentActivity,
    now: OffsetDateTime,
) -> StateTransitionResult {
    StateRegistry::standard().next_state(
        account.current_state,
        account.days_past_due(now.date()),
        activity,
        account.balance,
    )
}

/// Compute an account's dunning schedule under the standard rulebook.
pub fn plan(account: &AccountSnapshot, now: OffsetDateTime) -> DunningSchedule {
    DunningPlanner::standard().generate_plan(account, now)
}

/// Run both components in one call.
pub fn assess(
    account: &AccountSnapshot,
    activity: PaymentActivity,
    now: OffsetDateTime,
) -> AccountAssessment {
    let planner = DunningPlanner::standard();
    let transition = planner.registry().next_state(
        account.current_state,
        account.days_past_due(now.date()),
        activity,
        account.balance,
    );
    let schedule = planner.generate_plan(account, now);
    AccountAssessment {
        transition,
        schedule,
    }
}
