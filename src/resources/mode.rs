use std::fmt;

use super::*;

/// Which of the two rules should receive traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Maintenance,
}

impl Direction {
    pub fn from_forward_active(forward_active: bool) -> Self {
        if forward_active {
            Direction::Forward
        } else {
            Direction::Maintenance
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Maintenance => f.write_str("maintenance"),
        }
    }
}

/// Desired state of one maintenance switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRequest {
    pub forward_rule: RuleRef,
    pub maintenance_rule: RuleRef,
    pub forward_active: bool,
}

impl ModeRequest {
    pub fn new(forward_rule: RuleRef, maintenance_rule: RuleRef, forward_active: bool) -> Self {
        Self { forward_rule, maintenance_rule, forward_active }
    }

    pub fn direction(&self) -> Direction {
        Direction::from_forward_active(self.forward_active)
    }

    /// both rules must be different rules of the same stack.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.forward_rule == self.maintenance_rule {
            return Err(ReconcileError::InvalidRequest(format!(
                "forward and maintenance rule are both {}",
                self.forward_rule
            )));
        }
        if self.forward_rule.stack_id() != self.maintenance_rule.stack_id() {
            return Err(ReconcileError::InvalidRequest(format!(
                "forward rule {} and maintenance rule {} belong to different stacks",
                self.forward_rule, self.maintenance_rule
            )));
        }
        Ok(())
    }
}
