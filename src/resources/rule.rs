use std::fmt;

use super::*;

/// CloudFormation logical ids: 1 to 255 characters, `[A-Za-z0-9]` only.
pub fn verify_logical_name(logical_name: &str) -> Option<String> {
    if logical_name.len() > 255 {
        return Some(format!("Invalid logical name {:?}\nmust be at most 255 characters", logical_name));
    }
    if logical_name.is_empty() {
        return Some(format!("Invalid logical name {:?}\nMust contain at least 1 character", logical_name));
    }
    if !logical_name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(format!("Invalid logical name {:?}\nMust contain only alphanumeric characters [A-Za-z0-9]", logical_name));
    }
    None
}

/// A listener rule as named in a stack's template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleRef {
    stack_id: String,
    logical_name: String,
}

impl RuleRef {
    pub fn new(stack_id: impl Into<String>, logical_name: impl Into<String>) -> Result<Self, ReconcileError> {
        let stack_id = stack_id.into();
        let logical_name = logical_name.into();
        if stack_id.trim().is_empty() {
            return Err(ReconcileError::InvalidRequest(format!("missing stack id for rule {:?}", logical_name)));
        }
        if let Some(err) = verify_logical_name(&logical_name) {
            return Err(ReconcileError::InvalidRequest(err));
        }
        Ok(Self { stack_id, logical_name })
    }

    pub fn stack_id(&self) -> &str {
        &self.stack_id
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stack_id, self.logical_name)
    }
}

/// Provider-assigned id of a rule (the rule ARN for ALB).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicalRuleId(String);

impl PhysicalRuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhysicalRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhysicalRuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A resolved rule together with the priority it is meant to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalRule {
    pub id: PhysicalRuleId,
    pub priority: u32,
}
