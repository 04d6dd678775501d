use alb_maintenance::{PhysicalRuleId, PriorityWriter, ProviderError};
use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::types::{Rule, RulePriorityPair};
use tracing::debug;

/// Writes listener rule priorities with `SetRulePriorities`, which applies
/// every pair of one request or none of them.
#[derive(Clone)]
pub struct ElbPriorityWriter {
    client: aws_sdk_elasticloadbalancingv2::Client,
}

impl ElbPriorityWriter {
    pub fn new(shared_config: &aws_config::SdkConfig) -> Self {
        Self::from_client(aws_sdk_elasticloadbalancingv2::Client::new(shared_config))
    }

    pub fn from_client(client: aws_sdk_elasticloadbalancingv2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriorityWriter for ElbPriorityWriter {
    async fn set_priorities(&self, assignments: &[(PhysicalRuleId, u32)]) -> Result<(), ProviderError> {
        let pairs = priority_pairs(assignments)?;
        debug!(rules = pairs.len(), "setting rule priorities");
        let out = self.client
            .set_rule_priorities()
            .set_rule_priorities(Some(pairs))
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("{:#?}", e)))?;
        verify_applied(assignments, out.rules().unwrap_or_default())
    }
}

pub fn priority_pairs(assignments: &[(PhysicalRuleId, u32)]) -> Result<Vec<RulePriorityPair>, ProviderError> {
    let mut out = Vec::with_capacity(assignments.len());
    for (id, priority) in assignments {
        let priority = i32::try_from(*priority)
            .map_err(|_| ProviderError::new(format!("Invalid priority {priority} for rule {id}")))?;
        out.push(RulePriorityPair::builder().rule_arn(id.as_str()).priority(priority).build());
    }
    Ok(out)
}

/// The API echoes the updated rules; make sure each one landed where we asked.
pub fn verify_applied(assignments: &[(PhysicalRuleId, u32)], rules: &[Rule]) -> Result<(), ProviderError> {
    for (id, priority) in assignments {
        let applied = rules
            .iter()
            .find(|r| r.rule_arn() == Some(id.as_str()))
            .and_then(|r| r.priority());
        match applied {
            Some(p) if p == priority.to_string() => {}
            Some(p) => {
                return Err(ProviderError::new(format!("rule {id} has priority {p} after update, expected {priority}")));
            }
            None => {
                return Err(ProviderError::new(format!("rule {id} missing from SetRulePriorities response")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignments() -> Vec<(PhysicalRuleId, u32)> {
        vec![(PhysicalRuleId::new("arn:F"), 1), (PhysicalRuleId::new("arn:M"), 10)]
    }

    fn rule(arn: &str, priority: &str) -> Rule {
        Rule::builder().rule_arn(arn).priority(priority).build()
    }

    #[test]
    fn pairs_keep_order_and_values() {
        let pairs = priority_pairs(&assignments()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].rule_arn(), Some("arn:F"));
        assert_eq!(pairs[0].priority(), Some(1));
        assert_eq!(pairs[1].rule_arn(), Some("arn:M"));
        assert_eq!(pairs[1].priority(), Some(10));
    }

    #[test]
    fn oversized_priority_is_rejected() {
        let err = priority_pairs(&[(PhysicalRuleId::new("arn:F"), u32::MAX)]).unwrap_err();
        assert!(err.message.contains("Invalid priority"));
    }

    #[test]
    fn echoed_rules_must_match() {
        let ok = [rule("arn:M", "10"), rule("arn:F", "1")];
        assert_eq!(verify_applied(&assignments(), &ok), Ok(()));

        let wrong = [rule("arn:F", "1"), rule("arn:M", "11")];
        assert!(verify_applied(&assignments(), &wrong).unwrap_err().message.contains("expected 10"));

        let missing = [rule("arn:F", "1")];
        assert!(verify_applied(&assignments(), &missing).unwrap_err().message.contains("missing"));
    }
}
