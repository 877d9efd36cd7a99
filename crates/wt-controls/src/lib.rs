//! Operator actions, conditional rules and attacks for wtsim.
//!
//! This crate holds everything that mutates component state *before* the
//! hydraulic step of a tick. It is separate from the physics: nothing here
//! moves water.
//!
//! # Architecture
//!
//! - Schedules are plain serde records: timed control actions, conditional
//!   rules re-evaluated every tick, and one-shot attack scenarios
//! - Actions and rules share one dispatcher, so a rule target behaves
//!   exactly like the same timed action
//! - Sensor reads go through [`Readout`], which honours data-poisoning
//!   overrides without touching the physical value
//! - A `stuck` component ignores every control and rule effect for the rest
//!   of the run
//!
//! Missing components and wrong-kind targets are silent no-ops at run time;
//! [`validate_schedules`] reports them up front instead.

pub mod actions;
pub mod attacks;
pub mod error;
pub mod params;
pub mod poisoning;
pub mod rules;
pub mod schedule;
pub mod validate;

pub use actions::{apply_command, apply_timed_control};
pub use attacks::{apply_attack, describe_attack};
pub use error::{ControlError, ControlResult};
pub use params::{ParamValue, Params};
pub use poisoning::{Readout, clear_expired_poisoning, get_current_value};
pub use rules::{Operator, apply_conditional_actions};
pub use schedule::{
    ActionKind, AttackKind, AttackScenario, ChemicalType, ConditionalRule, ControlAction,
    DamageType, RuleCondition, RuleSource, RuleTarget, Schedules,
};
pub use validate::validate_schedules;
