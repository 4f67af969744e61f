//! Site monitoring engine.
//!
//! This module provides:
//! - The status transition rule ([`evaluate`], [`Evaluation`], [`Transition`])
//! - One sweep over every tracked site ([`SweepRunner`], [`SweepReport`])
//! - The "run one sweep now" entry point ([`Trigger`], [`TriggerResponse`])

mod status;
mod sweep;
mod trigger;

#[cfg(test)]
mod test_fixtures;

pub use status::{Evaluation, Transition, evaluate};
pub use sweep::{SiteError, SiteFailure, SweepError, SweepReport, SweepRunner};
pub use trigger::{SiteFailureSummary, SweepSummary, Trigger, TriggerResponse};
