//! Maintenance mode for an ALB listener with a Lambda-backed forward rule.
//!
//! The listener carries a forward rule and a maintenance (fixed response)
//! rule. Switching modes reorders their priorities so exactly one of them
//! wins. The switch runs as a CloudFormation custom resource
//! (`Custom::MaintenanceModeOn` / `Custom::MaintenanceModeOff`).

mod error;

pub mod resources;
pub use resources::*;

pub mod reconciler;
pub use reconciler::{MaintenanceToggle, PriorityWriter, RuleResolver};

pub mod lifecycle;
pub mod response;
