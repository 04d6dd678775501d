use alb_maintenance::{PhysicalRuleId, ResolveError, RuleRef, RuleResolver};
use async_trait::async_trait;
use aws_sdk_cloudformation::types::StackResourceDetail;
use tracing::debug;

/// Resolves rule logical ids through `DescribeStackResource`.
#[derive(Clone)]
pub struct CfnRuleResolver {
    client: aws_sdk_cloudformation::Client,
}

impl CfnRuleResolver {
    pub fn new(shared_config: &aws_config::SdkConfig) -> Self {
        Self::from_client(aws_sdk_cloudformation::Client::new(shared_config))
    }

    pub fn from_client(client: aws_sdk_cloudformation::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RuleResolver for CfnRuleResolver {
    async fn resolve(&self, rule: &RuleRef) -> Result<PhysicalRuleId, ResolveError> {
        debug!(stack = rule.stack_id(), logical_resource_id = rule.logical_name(), "describing stack resource");
        match self.client
            .describe_stack_resource()
            .stack_name(rule.stack_id())
            .logical_resource_id(rule.logical_name())
            .send()
            .await
        {
            Ok(out) => physical_id(rule, out.stack_resource_detail()),
            Err(e) => Err(lookup_error(rule, format!("{:#?}", e))),
        }
    }
}

/// A resource still being created has no physical id yet; treat it as
/// missing so the caller retries later.
pub fn physical_id(rule: &RuleRef, detail: Option<&StackResourceDetail>) -> Result<PhysicalRuleId, ResolveError> {
    match detail.and_then(|d| d.physical_resource_id()) {
        Some(id) if !id.is_empty() => Ok(PhysicalRuleId::new(id)),
        _ => Err(not_found(rule)),
    }
}

/// CloudFormation reports unknown stacks and logical ids as a ValidationError
/// saying the thing "does not exist".
pub fn lookup_error(rule: &RuleRef, e_str: String) -> ResolveError {
    if e_str.contains("does not exist") {
        return not_found(rule);
    }
    ResolveError::Provider(e_str)
}

fn not_found(rule: &RuleRef) -> ResolveError {
    ResolveError::NotFound {
        stack_id: rule.stack_id().to_string(),
        logical_name: rule.logical_name().to_string(),
    }
}
