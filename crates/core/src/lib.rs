//! recoup-core: shared domain types for the collections lifecycle engine.
//!
//! Every vocabulary type here is a closed enum. Downstream code matches
//! exhaustively, so adding a variant is a compile-time-visible change
//! everywhere it must be handled. Wire contracts use camelCase field names
//! and SCREAMING_SNAKE_CASE variant names to match the JSON exchanged with
//! the surrounding services.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root:
//!
//! - [`CollectionState`] -- where an account sits in the lifecycle
//! - [`CollectionAction`] / [`DunningChannel`] -- what can be done, and how
//! - [`PaymentActivity`] -- payment events that trigger transitions
//! - [`AccountType`] -- selects the dunning cadence
//! - [`AccountSnapshot`] -- the inbound account contract from persistence
//! - [`DunningSkipCondition`] -- suppression flags consulted by the planner
//! - [`DomainError`] -- typed rejection for out-of-domain input strings

pub mod account;
pub mod action;
pub mod activity;
pub mod error;
pub mod state;

pub use account::{
    AccountSnapshot, AccountType, DunningSkipCondition, ExecutedAction, SkipConditionKind,
};
pub use action::{CollectionAction, DunningChannel};
pub use activity::PaymentActivity;
pub use error::DomainError;
pub use state::CollectionState;
