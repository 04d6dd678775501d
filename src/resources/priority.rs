use super::*;

/// Lowest and highest priority an ALB listener rule may carry.
pub const MIN_RULE_PRIORITY: u32 = 1;
pub const MAX_RULE_PRIORITY: u32 = 50000;

/// The priority values the switch moves the two rules between.
///
/// `active` wins (lower is evaluated first). The parking slots are only
/// touched when the writer cannot update both rules atomically; each rule has
/// its own slot so a parked rule never collides with the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityPlan {
    pub active: u32,
    pub standby: u32,
    pub park_forward: u32,
    pub park_maintenance: u32,
}

impl Default for PriorityPlan {
    fn default() -> Self {
        Self {
            active: 1,
            standby: 10,
            park_forward: 11,
            park_maintenance: 12,
        }
    }
}

impl PriorityPlan {
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.active, self.standby, self.park_forward, self.park_maintenance];
        for p in all {
            if !(MIN_RULE_PRIORITY..=MAX_RULE_PRIORITY).contains(&p) {
                return Err(format!("Invalid priority {p}\nMust be between {MIN_RULE_PRIORITY} and {MAX_RULE_PRIORITY}"));
            }
        }
        for (i, a) in all.iter().enumerate() {
            if all[i + 1..].contains(a) {
                return Err(format!("Priority {a} is used twice in {:?}\nactive, standby and parking priorities must all differ", self));
            }
        }
        if self.active >= self.standby {
            return Err(format!("active priority {} must be lower than standby priority {}", self.active, self.standby));
        }
        Ok(())
    }

    /// (forward, maintenance) priorities for the given direction.
    pub fn targets(&self, direction: Direction) -> (u32, u32) {
        match direction {
            Direction::Forward => (self.active, self.standby),
            Direction::Maintenance => (self.standby, self.active),
        }
    }

    pub fn classify(&self, forward: u32, maintenance: u32) -> SwitchState {
        if (forward, maintenance) == self.targets(Direction::Forward) {
            SwitchState::ForwardActive
        } else if (forward, maintenance) == self.targets(Direction::Maintenance) {
            SwitchState::MaintenanceActive
        } else {
            SwitchState::Indeterminate
        }
    }
}

/// Externally observed state of a rule pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    ForwardActive,
    MaintenanceActive,
    Indeterminate,
}

/// Target priorities for both rules of one switch, forward rule first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityAssignment {
    pub forward: PhysicalRule,
    pub maintenance: PhysicalRule,
}

impl PriorityAssignment {
    pub fn new(forward: PhysicalRuleId, maintenance: PhysicalRuleId, plan: &PriorityPlan, direction: Direction) -> Self {
        let (fp, mp) = plan.targets(direction);
        Self {
            forward: PhysicalRule { id: forward, priority: fp },
            maintenance: PhysicalRule { id: maintenance, priority: mp },
        }
    }

    /// the single batch handed to an atomic writer.
    pub fn pairs(&self) -> Vec<(PhysicalRuleId, u32)> {
        vec![
            (self.forward.id.clone(), self.forward.priority),
            (self.maintenance.id.clone(), self.maintenance.priority),
        ]
    }

    pub fn priority_of(&self, id: &PhysicalRuleId) -> Option<u32> {
        [&self.forward, &self.maintenance]
            .into_iter()
            .find(|r| &r.id == id)
            .map(|r| r.priority)
    }
}
