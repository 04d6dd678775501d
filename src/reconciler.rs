//! Listener-priority maintenance switch.
//!
//! `apply` resolves both rules before it writes anything, so a failed lookup
//! (or a future dropped during lookup) never leaves a half-written pair.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::resources::*;

/// Maps a logical rule name within a stack to its current physical id.
#[async_trait]
pub trait RuleResolver: Send + Sync {
    async fn resolve(&self, rule: &RuleRef) -> Result<PhysicalRuleId, ResolveError>;
}

/// Writes new priorities to the listener's rules.
#[async_trait]
pub trait PriorityWriter: Send + Sync {
    async fn set_priorities(&self, assignments: &[(PhysicalRuleId, u32)]) -> Result<(), ProviderError>;

    /// true when one `set_priorities` call applies every pair or none.
    fn atomic_batches(&self) -> bool {
        true
    }
}

pub struct MaintenanceToggle<R, W> {
    resolver: R,
    writer: W,
    plan: PriorityPlan,
}

impl<R: RuleResolver, W: PriorityWriter> MaintenanceToggle<R, W> {
    pub fn new(resolver: R, writer: W) -> Self {
        Self { resolver, writer, plan: PriorityPlan::default() }
    }

    /// Rejects a plan whose priorities could put both rules in front or
    /// collide while parking.
    pub fn with_plan(resolver: R, writer: W, plan: PriorityPlan) -> Result<Self, ReconcileError> {
        plan.validate().map_err(ReconcileError::InvalidRequest)?;
        Ok(Self { resolver, writer, plan })
    }

    pub fn plan(&self) -> &PriorityPlan {
        &self.plan
    }

    pub async fn apply(&self, request: &ModeRequest) -> Result<PriorityAssignment, ReconcileError> {
        request.validate()?;
        let stack_id = request.forward_rule.stack_id();
        let forward_name = request.forward_rule.logical_name();
        let maintenance_name = request.maintenance_rule.logical_name();
        let direction = request.direction();

        let forward = self.resolve(request, &request.forward_rule).await?;
        let maintenance = self.resolve(request, &request.maintenance_rule).await?;
        if forward == maintenance {
            return Err(ReconcileError::InvalidRequest(format!(
                "forward rule '{forward_name}' and maintenance rule '{maintenance_name}' resolve to the same rule {forward}"
            )));
        }
        debug!(stack_id, %forward, %maintenance, "resolved rule pair");

        let assignment = PriorityAssignment::new(forward, maintenance, &self.plan, direction);
        let result = if self.writer.atomic_batches() {
            self.writer.set_priorities(&assignment.pairs()).await.map_err(|e| (0, e))
        } else {
            self.apply_in_steps(&assignment, direction).await
        };
        if let Err((completed_steps, source)) = result {
            warn!(stack_id, forward = forward_name, maintenance = maintenance_name, completed_steps, error = %source, "failed to set rule priorities");
            return Err(ReconcileError::ApplyFailed {
                stack_id: stack_id.to_string(),
                forward: forward_name.to_string(),
                maintenance: maintenance_name.to_string(),
                completed_steps,
                source,
            });
        }

        info!(
            stack_id,
            forward = forward_name,
            maintenance = maintenance_name,
            %direction,
            "maintenance switch applied"
        );
        Ok(assignment)
    }

    async fn resolve(&self, request: &ModeRequest, rule: &RuleRef) -> Result<PhysicalRuleId, ReconcileError> {
        self.resolver.resolve(rule).await.map_err(|source| {
            warn!(rule = %rule, error = %source, "failed to resolve rule");
            ReconcileError::ResolutionFailed {
                stack_id: rule.stack_id().to_string(),
                logical_name: rule.logical_name().to_string(),
                forward: request.forward_rule.logical_name().to_string(),
                maintenance: request.maintenance_rule.logical_name().to_string(),
                source,
            }
        })
    }

    /// Park the rule being switched off on its own slot, promote the other
    /// one, then settle the parked rule on standby. Every intermediate
    /// state has distinct priorities and re-running from any of them
    /// converges.
    async fn apply_in_steps(&self, assignment: &PriorityAssignment, direction: Direction) -> Result<(), (usize, ProviderError)> {
        let (on, off, park) = match direction {
            Direction::Forward => (&assignment.forward, &assignment.maintenance, self.plan.park_maintenance),
            Direction::Maintenance => (&assignment.maintenance, &assignment.forward, self.plan.park_forward),
        };
        let steps = [
            (off.id.clone(), park),
            (on.id.clone(), on.priority),
            (off.id.clone(), off.priority),
        ];
        for (done, step) in steps.into_iter().enumerate() {
            debug!(rule = %step.0, priority = step.1, step = done + 1, "setting rule priority");
            self.writer
                .set_priorities(std::slice::from_ref(&step))
                .await
                .map_err(|e| (done, e))?;
        }
        Ok(())
    }
}
