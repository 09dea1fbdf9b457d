//! Collection state registry -- the directed graph of legal lifecycle
//! transitions plus the per-state action and intensity configuration.
//!
//! The registry is immutable after construction and every query is a pure,
//! total function over the closed `CollectionState` set. "No legal
//! transition" is an ordinary `valid = false` outcome the caller branches
//! on, never an error. `requires_approval` is informational: the engine
//! surfaces the flag, the caller's authorization layer enforces it.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use recoup_core::{CollectionAction, CollectionState, PaymentActivity};

use crate::error::RulebookError;
use crate::standard;

// ──────────────────────────────────────────────
// Rule table rows
// ──────────────────────────────────────────────

/// Per-state configuration: what may happen while an account sits in a
/// state, and how hard the dunning cadence pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateConfig {
    pub state: CollectionState,
    pub display_name: String,
    pub description: String,
    pub allowed_actions: Vec<CollectionAction>,
    /// Fired automatically on entry. Must be a subset of `allowed_actions`.
    #[serde(default)]
    pub auto_actions: Vec<CollectionAction>,
    /// 0-10, non-decreasing along the aging path.
    pub dunning_intensity: u8,
    pub can_report_to_credit: bool,
    pub can_send_to_agency: bool,
    pub can_write_off: bool,
}

/// A directed edge in the lifecycle graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTransition {
    pub from: CollectionState,
    pub to: CollectionState,
    /// Dwell time: minimum days the account must have spent in `from`
    /// before this edge is eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_days_in_state: Option<u32>,
    /// Payment event that triggers this edge. `None` is an untriggered
    /// (aging) edge, eligible under any activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_activity: Option<PaymentActivity>,
    #[serde(default)]
    pub requires_approval: bool,
    pub description: String,
}

// ──────────────────────────────────────────────
// Query result types
// ──────────────────────────────────────────────

/// Outcome of [`StateRegistry::validate_transition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionValidation {
    pub valid: bool,
    pub reason: String,
    pub requires_approval: bool,
}

/// Recommendation from [`StateRegistry::next_state`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTransitionResult {
    pub next_state: CollectionState,
    pub should_transition: bool,
    pub reason: String,
    /// Days until the account ages into the next band, when it is holding
    /// a state on the aging path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_auto_transition: Option<i64>,
    pub recommended_actions: Vec<CollectionAction>,
}

// ──────────────────────────────────────────────
// Aging bands
// ──────────────────────────────────────────────

/// Target state implied purely by days past due.
///
/// `PRE_COLLECTION` and `COLLECTION_AGENCY` escalate on their own
/// timers; every other state follows the fixed bands, holding where
/// no band applies (ages above 150 without a modeled escalation).
fn aging_target(current: CollectionState, age_days: i64) -> CollectionState {
    use CollectionState::*;
    match current {
        CollectionAgency if age_days > 330 => BadDebt,
        CollectionAgency => CollectionAgency,
        PreCollection if age_days > 164 => CollectionAgency,
        PreCollection => PreCollection,
        _ if age_days <= 0 => Current,
        _ => match age_days {
            1..=30 => PastDue30,
            31..=60 => PastDue60,
            61..=90 => PastDue90,
            91..=120 => PastDue120,
            121..=150 => PreCollection,
            _ => current,
        },
    }
}

/// Days until `current` crosses its next aging boundary, if it has one
/// ahead of it.
fn days_until_next_band(current: CollectionState, age_days: i64) -> Option<i64> {
    use CollectionState::*;
    let boundary = match current {
        Current => 1,
        PastDue30 => 31,
        PastDue60 => 61,
        PastDue90 => 91,
        PastDue120 => 121,
        PreCollection => 165,
        CollectionAgency => 331,
        _ => return None,
    };
    (age_days < boundary).then_some(boundary - age_days)
}

// ──────────────────────────────────────────────
// Registry
// ──────────────────────────────────────────────

/// Immutable lifecycle rule tables, validated at construction.
#[derive(Debug, Clone)]
pub struct StateRegistry {
    configs: BTreeMap<CollectionState, StateConfig>,
    transitions: Vec<StateTransition>,
}

impl StateRegistry {
    /// Build a registry from explicit tables, checking integrity: a config
    /// for every state, auto actions within allowed actions, intensity in
    /// range, and at most one edge per `(from, to, activity)` triple.
    pub fn new(
        configs: Vec<StateConfig>,
        transitions: Vec<StateTransition>,
    ) -> Result<Self, RulebookError> {
        let configs: BTreeMap<CollectionState, StateConfig> =
            configs.into_iter().map(|c| (c.state, c)).collect();
        for state in CollectionState::ALL {
            let config = configs
                .get(&state)
                .ok_or(RulebookError::MissingStateConfig { state })?;
            if config.dunning_intensity > 10 {
                return Err(RulebookError::IntensityOutOfRange {
                    state,
                    intensity: config.dunning_intensity,
                });
            }
            for action in &config.auto_actions {
                if !config.allowed_actions.contains(action) {
                    return Err(RulebookError::AutoActionNotAllowed {
                        state,
                        action: *action,
                    });
                }
            }
        }
        let mut seen = BTreeSet::new();
        for t in &transitions {
            if !seen.insert((t.from, t.to, t.payment_activity)) {
                return Err(RulebookError::DuplicateTransition {
                    from: t.from,
                    to: t.to,
                    activity: t.payment_activity,
                });
            }
        }
        Ok(Self {
            configs,
            transitions,
        })
    }

    /// The production rulebook compiled into the engine. Integrity of the
    /// standard tables is asserted by test, so construction here does not
    /// re-validate.
    pub fn standard() -> Self {
        Self {
            configs: standard::state_configs()
                .into_iter()
                .map(|c| (c.state, c))
                .collect(),
            transitions: standard::state_transitions(),
        }
    }

    /// Lookup never fails: construction guarantees a config per state.
    pub fn state_config(&self, state: CollectionState) -> &StateConfig {
        &self.configs[&state]
    }

    /// Dunning intensity of a state (0-10).
    pub fn dunning_intensity(&self, state: CollectionState) -> u8 {
        self.state_config(state).dunning_intensity
    }

    /// All edges leaving `from`.
    pub fn allowed_transitions(&self, from: CollectionState) -> Vec<&StateTransition> {
        self.transitions.iter().filter(|t| t.from == from).collect()
    }

    /// Edge existence test. With an activity, the edge's trigger must
    /// match it or the edge must be untriggered; without one, any edge
    /// between the two states counts.
    pub fn is_transition_allowed(
        &self,
        from: CollectionState,
        to: CollectionState,
        activity: Option<PaymentActivity>,
    ) -> bool {
        match activity {
            Some(_) => self.matching_edge(from, to, activity).is_some(),
            None => self.transitions.iter().any(|t| t.from == from && t.to == to),
        }
    }

    /// The most specific edge for `(from, to)` under `activity`: an edge
    /// triggered by that activity wins over an untriggered edge. An edge
    /// triggered by a different activity never matches.
    fn matching_edge(
        &self,
        from: CollectionState,
        to: CollectionState,
        activity: Option<PaymentActivity>,
    ) -> Option<&StateTransition> {
        if activity.is_some() {
            if let Some(edge) = self
                .transitions
                .iter()
                .find(|t| t.from == from && t.to == to && t.payment_activity == activity)
            {
                return Some(edge);
            }
        }
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to && t.payment_activity.is_none())
    }

    /// Edge existence plus the dwell-time check. A missing `days_in_state`
    /// skips the dwell check: the caller opted out of supplying it.
    pub fn validate_transition(
        &self,
        from: CollectionState,
        to: CollectionState,
        days_in_state: Option<i64>,
        activity: Option<PaymentActivity>,
    ) -> TransitionValidation {
        // Without an activity the check is trigger-agnostic: any edge
        // between the two states is eligible.
        let edge = self.matching_edge(from, to, activity).or_else(|| match activity {
            None => self.transitions.iter().find(|t| t.from == from && t.to == to),
            Some(_) => None,
        });
        let Some(edge) = edge else {
            // Distinguish a missing edge from an edge gated on a
            // different payment event, so the caller's rejection message
            // names the actual obstacle.
            let reason = match (
                activity,
                self.transitions.iter().find(|t| t.from == from && t.to == to),
            ) {
                (Some(act), Some(other)) => format!(
                    "transition from {} to {} is triggered by {}, not {}",
                    from,
                    to,
                    other.payment_activity.map(|t| t.as_str()).unwrap_or("aging"),
                    act
                ),
                (Some(act), None) => {
                    format!("no transition defined from {} to {} for {}", from, to, act)
                }
                (None, _) => format!("no transition defined from {} to {}", from, to),
            };
            return TransitionValidation {
                valid: false,
                reason,
                requires_approval: false,
            };
        };
        if let (Some(min), Some(days)) = (edge.min_days_in_state, days_in_state) {
            if days < i64::from(min) {
                return TransitionValidation {
                    valid: false,
                    reason: format!(
                        "{} requires {} days in state before moving to {}, account has {}",
                        from, min, to, days
                    ),
                    requires_approval: edge.requires_approval,
                };
            }
        }
        TransitionValidation {
            valid: true,
            reason: edge.description.clone(),
            requires_approval: edge.requires_approval,
        }
    }

    /// Recommend the next state for an account, in priority order:
    ///
    /// 1. a satisfied balance or a full payment closes to `PAID`;
    /// 2. a payment-plan start or a partial payment follows its triggered
    ///    edge out of the current state, when one is defined;
    /// 3. otherwise the aging bands pick a target, accepted only when an
    ///    edge reaches it -- an unreachable target is surfaced in the
    ///    reason for human review, without a transition.
    ///
    /// A zero or negative balance probes edges as a full payment, so
    /// zero-balance accounts reach `PAID` through the same edges.
    pub fn next_state(
        &self,
        current: CollectionState,
        age_days: i64,
        activity: PaymentActivity,
        balance: Decimal,
    ) -> StateTransitionResult {
        use CollectionState::Paid;

        let settled = balance <= Decimal::ZERO || activity == PaymentActivity::FullPayment;
        if settled {
            if current == Paid {
                return self.hold(current, "account already settled".to_string(), None);
            }
            if self.is_transition_allowed(current, Paid, Some(PaymentActivity::FullPayment)) {
                let reason = if activity == PaymentActivity::FullPayment {
                    "full payment received, account is paid".to_string()
                } else {
                    "balance satisfied, account is paid".to_string()
                };
                return self.advance(Paid, reason);
            }
            return self.hold(
                current,
                format!(
                    "balance satisfied, but no transition is defined from {} to {}",
                    current, Paid
                ),
                None,
            );
        }

        if matches!(
            activity,
            PaymentActivity::PaymentPlanStarted | PaymentActivity::PartialPayment
        ) {
            if let Some(edge) = self
                .transitions
                .iter()
                .find(|t| t.from == current && t.payment_activity == Some(activity))
            {
                let to = edge.to;
                let reason = edge.description.clone();
                return self.advance(to, reason);
            }
        }

        let target = aging_target(current, age_days);
        if target == current {
            return self.hold(
                current,
                format!("no state change at {} days past due", age_days),
                days_until_next_band(current, age_days),
            );
        }
        if self.is_transition_allowed(current, target, Some(activity)) {
            self.advance(
                target,
                format!("account is {} days past due, aging into {}", age_days, target),
            )
        } else {
            self.hold(
                current,
                format!(
                    "aging suggests {}, but no transition is defined from {}",
                    target, current
                ),
                None,
            )
        }
    }

    /// Actions to take in `state`: its auto actions, or its first two
    /// allowed actions when no auto actions are configured.
    pub fn recommended_actions(&self, state: CollectionState) -> Vec<CollectionAction> {
        let config = self.state_config(state);
        if config.auto_actions.is_empty() {
            config.allowed_actions.iter().take(2).copied().collect()
        } else {
            config.auto_actions.clone()
        }
    }

    fn advance(&self, to: CollectionState, reason: String) -> StateTransitionResult {
        StateTransitionResult {
            next_state: to,
            should_transition: true,
            reason,
            days_until_auto_transition: None,
            recommended_actions: self.recommended_actions(to),
        }
    }

    fn hold(
        &self,
        current: CollectionState,
        reason: String,
        days_until_auto_transition: Option<i64>,
    ) -> StateTransitionResult {
        StateTransitionResult {
            next_state: current,
            should_transition: false,
            reason,
            days_until_auto_transition,
            recommended_actions: self.recommended_actions(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CollectionState::*;
    use PaymentActivity::*;

    fn registry() -> StateRegistry {
        StateRegistry::standard()
    }

    #[test]
    fn standard_tables_pass_validation() {
        StateRegistry::new(standard::state_configs(), standard::state_transitions())
            .expect("standard rulebook must be internally consistent");
    }

    #[test]
    fn intensity_is_monotonic_along_the_aging_path() {
        let registry = registry();
        let mut previous = 0;
        for state in CollectionState::AGING_PATH {
            let intensity = registry.dunning_intensity(state);
            assert!(
                intensity >= previous,
                "intensity dropped from {} to {} at {}",
                previous,
                intensity,
                state
            );
            previous = intensity;
        }
    }

    #[test]
    fn written_off_has_no_outgoing_transitions() {
        assert!(registry().allowed_transitions(WrittenOff).is_empty());
    }

    #[test]
    fn dwell_time_gates_validation() {
        let registry = registry();
        let early = registry.validate_transition(PastDue30, PastDue60, Some(10), None);
        assert!(!early.valid);
        assert!(early.reason.contains("30 days in state"));

        let ready = registry.validate_transition(PastDue30, PastDue60, Some(30), None);
        assert!(ready.valid);

        // Omitting the day count opts out of the dwell check.
        let unchecked = registry.validate_transition(PastDue30, PastDue60, None, None);
        assert!(unchecked.valid);
    }

    #[test]
    fn validation_reports_missing_edges() {
        let result = registry().validate_transition(Current, BadDebt, None, None);
        assert!(!result.valid);
        assert_eq!(
            result.reason,
            "no transition defined from CURRENT to BAD_DEBT"
        );
        assert!(!result.requires_approval);
    }

    #[test]
    fn agency_referral_requires_approval() {
        let result = registry().validate_transition(PreCollection, CollectionAgency, Some(20), None);
        assert!(result.valid);
        assert!(result.requires_approval);
    }

    #[test]
    fn triggered_edge_rejects_mismatched_activity() {
        // PAST_DUE_60 -> PAST_DUE_30 only fires on a partial payment.
        let result = registry().validate_transition(PastDue60, PastDue30, None, Some(NoActivity));
        assert!(!result.valid);
        assert!(result.reason.contains("PARTIAL_PAYMENT"));
    }

    #[test]
    fn full_payment_clears_any_collectible_state() {
        let registry = registry();
        let balance = Decimal::new(50000, 2);
        for state in [PastDue30, PastDue60, PastDue90, PastDue120, PreCollection] {
            let result = registry.next_state(state, 75, FullPayment, balance);
            assert_eq!(result.next_state, Paid, "from {}", state);
            assert!(result.should_transition, "from {}", state);
        }
    }

    #[test]
    fn zero_balance_reaches_paid_without_a_payment_event() {
        let result = registry().next_state(PastDue90, 75, NoActivity, Decimal::ZERO);
        assert_eq!(result.next_state, Paid);
        assert!(result.should_transition);
        assert_eq!(result.reason, "balance satisfied, account is paid");
    }

    #[test]
    fn terminal_states_never_age_out() {
        let registry = registry();
        let balance = Decimal::new(12000, 2);

        let from_written_off = registry.next_state(WrittenOff, 400, NoActivity, balance);
        assert!(!from_written_off.should_transition);
        assert_eq!(from_written_off.next_state, WrittenOff);

        // Even a settled balance cannot leave WRITTEN_OFF.
        let settled = registry.next_state(WrittenOff, 400, FullPayment, balance);
        assert!(!settled.should_transition);

        let from_paid = registry.next_state(Paid, 40, NoActivity, Decimal::ZERO);
        assert!(!from_paid.should_transition);
        assert_eq!(from_paid.reason, "account already settled");
    }

    #[test]
    fn aging_bands_advance_states() {
        let registry = registry();
        let balance = Decimal::new(30000, 2);

        let result = registry.next_state(PastDue30, 45, NoActivity, balance);
        assert_eq!(result.next_state, PastDue60);
        assert!(result.should_transition);

        let result = registry.next_state(PastDue90, 95, NoActivity, balance);
        assert_eq!(result.next_state, PastDue120);
        assert!(result.should_transition);
    }

    #[test]
    fn pre_collection_escalates_past_164_days() {
        let registry = registry();
        let balance = Decimal::new(30000, 2);

        let holding = registry.next_state(PreCollection, 164, NoActivity, balance);
        assert!(!holding.should_transition);
        assert_eq!(holding.next_state, PreCollection);
        assert_eq!(holding.days_until_auto_transition, Some(1));

        let escalating = registry.next_state(PreCollection, 165, NoActivity, balance);
        assert!(escalating.should_transition);
        assert_eq!(escalating.next_state, CollectionAgency);
    }

    #[test]
    fn collection_agency_escalates_to_bad_debt_past_330_days() {
        let registry = registry();
        let balance = Decimal::new(30000, 2);

        let holding = registry.next_state(CollectionAgency, 330, NoActivity, balance);
        assert!(!holding.should_transition);
        assert_eq!(holding.days_until_auto_transition, Some(1));

        let escalating = registry.next_state(CollectionAgency, 331, NoActivity, balance);
        assert!(escalating.should_transition);
        assert_eq!(escalating.next_state, BadDebt);
    }

    #[test]
    fn partial_payment_steps_back_through_its_edge() {
        let registry = registry();
        let result = registry.next_state(PastDue60, 45, PartialPayment, Decimal::new(20000, 2));
        assert_eq!(result.next_state, PastDue30);
        assert!(result.should_transition);
    }

    #[test]
    fn payment_plan_start_returns_account_to_current() {
        let registry = registry();
        let result =
            registry.next_state(PastDue120, 110, PaymentPlanStarted, Decimal::new(20000, 2));
        assert_eq!(result.next_state, Current);
        assert!(result.should_transition);
    }

    #[test]
    fn holding_reports_days_until_next_band() {
        let result = registry().next_state(PastDue30, 20, NoActivity, Decimal::new(20000, 2));
        assert!(!result.should_transition);
        assert_eq!(result.days_until_auto_transition, Some(11));
    }

    #[test]
    fn recommended_actions_fall_back_to_first_two_allowed() {
        let registry = registry();
        // CURRENT configures no auto actions.
        let config = registry.state_config(Current);
        assert!(config.auto_actions.is_empty());
        let recommended = registry.recommended_actions(Current);
        assert_eq!(
            recommended,
            config
                .allowed_actions
                .iter()
                .take(2)
                .copied()
                .collect::<Vec<_>>()
        );

        // PRE_COLLECTION recommends its auto actions.
        let recommended = registry.recommended_actions(PreCollection);
        assert_eq!(recommended, registry.state_config(PreCollection).auto_actions);
    }

    #[test]
    fn duplicate_edges_are_rejected_at_construction() {
        let mut transitions = standard::state_transitions();
        transitions.push(StateTransition {
            from: Current,
            to: PastDue30,
            min_days_in_state: None,
            payment_activity: None,
            requires_approval: false,
            description: "duplicate".to_string(),
        });
        let err = StateRegistry::new(standard::state_configs(), transitions).unwrap_err();
        assert_eq!(
            err,
            RulebookError::DuplicateTransition {
                from: Current,
                to: PastDue30,
                activity: None,
            }
        );
    }

    #[test]
    fn stray_auto_action_is_rejected_at_construction() {
        let mut configs = standard::state_configs();
        for config in &mut configs {
            if config.state == Current {
                config.auto_actions.push(CollectionAction::WriteOff);
            }
        }
        let err = StateRegistry::new(configs, standard::state_transitions()).unwrap_err();
        assert_eq!(
            err,
            RulebookError::AutoActionNotAllowed {
                state: Current,
                action: CollectionAction::WriteOff,
            }
        );
    }
}
