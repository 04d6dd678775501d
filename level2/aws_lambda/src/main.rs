use alb_maintenance::lifecycle::{failure_for_raw, handle_event, CustomResourceEvent, CustomResourceResponse, RequestType};
use alb_maintenance::response::send_response;
use alb_maintenance::{MaintenanceToggle, PriorityWriter, ReconcileError, RuleResolver};
use aws_cfn_stack::CfnRuleResolver;
use aws_elbv2::ElbPriorityWriter;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
use config::Config;

type Toggle = MaintenanceToggle<CfnRuleResolver, ElbPriorityWriter>;

/// Works out the answer for one raw event. `toggle` is `Err` when the
/// function started with a configuration it cannot run with; such events
/// are still answered so CloudFormation does not wait out its timeout.
async fn respond_to<R, W>(toggle: Result<&MaintenanceToggle<R, W>, &str>, raw: Value) -> Result<(String, CustomResourceResponse), serde_json::Error>
where
    R: RuleResolver,
    W: PriorityWriter,
{
    let event: CustomResourceEvent = match serde_json::from_value(raw.clone()) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "could not decode custom resource event");
            return failure_for_raw(&raw, format!("malformed custom resource event: {e}")).ok_or(e);
        }
    };
    info!(
        request_type = ?event.request_type,
        resource_type = %event.resource_type,
        logical_resource_id = %event.logical_resource_id,
        "received custom resource event"
    );
    let response = match toggle {
        Ok(toggle) => handle_event(&event, toggle).await,
        // a delete never touches the rules, so a broken config must not block it
        Err(_) if event.request_type == RequestType::Delete => event.deleted(),
        Err(reason) => event.failed(format!("maintenance switch is misconfigured: {reason}")),
    };
    Ok((event.response_url, response))
}

async fn service_func(toggle: Result<&Toggle, &str>, event: LambdaEvent<Value>) -> Result<(), Error> {
    let (raw, context) = event.into_parts();
    info!(request_id = %context.request_id, "invoked");
    let (url, response) = respond_to(toggle, raw).await?;

    // cloudformation waits on this PUT, not on our return value
    let delivered = tokio::task::spawn_blocking(move || send_response(&url, &response)).await?;
    if let Err(e) = delivered {
        error!(error = %e, "failed to deliver custom resource response");
        return Err(e.into());
    }
    Ok(())
}

async fn make_toggle(config: &Config) -> Result<Toggle, ReconcileError> {
    let mut loader = aws_config::from_env();
    if let Some(region) = &config.region {
        loader = loader.region(aws_types::region::Region::new(region.clone()));
    }
    let shared_config = loader.load().await;
    MaintenanceToggle::with_plan(
        CfnRuleResolver::new(&shared_config),
        ElbPriorityWriter::new(&shared_config),
        config.plan,
    )
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .with_ansi(false)
        .without_time()
        .init();

    let toggle = match Config::from_env() {
        Ok(config) => {
            info!(region = ?config.region, plan = ?config.plan, "starting maintenance switch");
            make_toggle(&config).await.map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    };
    if let Err(reason) = &toggle {
        error!(%reason, "invalid configuration, every create and update will be answered FAILED");
    }
    let toggle = toggle.as_ref().map_err(String::as_str);
    run(service_fn(move |event| async move { service_func(toggle, event).await })).await
}

#[cfg(test)]
mod tests {
    use alb_maintenance::lifecycle::ResponseStatus;
    use alb_maintenance::{PhysicalRuleId, ProviderError, ResolveError, RuleRef};
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// stands in for both AWS clients; any call fails the test.
    struct Unreachable;

    #[async_trait]
    impl RuleResolver for Unreachable {
        async fn resolve(&self, rule: &RuleRef) -> Result<PhysicalRuleId, ResolveError> {
            panic!("resolved {rule} without a usable config")
        }
    }

    #[async_trait]
    impl PriorityWriter for Unreachable {
        async fn set_priorities(&self, _assignments: &[(PhysicalRuleId, u32)]) -> Result<(), ProviderError> {
            panic!("wrote priorities without a usable config")
        }
    }

    const MISCONFIGURED: Result<&MaintenanceToggle<Unreachable, Unreachable>, &str> = Err("MAINTENANCE_ACTIVE_PRIORITY: \"one\" is not a priority");

    fn raw_event(request_type: &str) -> Value {
        json!({
            "RequestType": request_type,
            "ResponseURL": "https://example.invalid/response",
            "StackId": "arn:aws:cloudformation:us-west-1:123:stack/app/guid",
            "RequestId": "req-9",
            "LogicalResourceId": "Maintenance",
            "ResourceType": "Custom::MaintenanceModeOn",
            "ResourceProperties": { "Stack": "app", "FRule": "ForwardRule", "MRule": "MaintenanceRule" }
        })
    }

    #[tokio::test]
    async fn misconfigured_create_is_answered_failed() {
        let (url, resp) = respond_to(MISCONFIGURED, raw_event("Create")).await.unwrap();

        assert_eq!(url, "https://example.invalid/response");
        assert_eq!(resp.status, ResponseStatus::Failed);
        assert!(resp.reason.contains("MAINTENANCE_ACTIVE_PRIORITY"), "{}", resp.reason);
        assert_eq!(resp.request_id, "req-9");
    }

    #[tokio::test]
    async fn misconfigured_delete_still_succeeds() {
        let mut raw = raw_event("Delete");
        raw["PhysicalResourceId"] = json!("switch-1");

        let (_, resp) = respond_to(MISCONFIGURED, raw).await.unwrap();

        assert_eq!(resp.status, ResponseStatus::Success);
        assert_eq!(resp.physical_resource_id, "switch-1");
    }

    #[tokio::test]
    async fn undecodable_event_with_url_is_answered_failed() {
        let toggle = MaintenanceToggle::new(Unreachable, Unreachable);
        let mut raw = raw_event("Create");
        raw["RequestType"] = json!(42);

        let (url, resp) = respond_to(Ok(&toggle), raw).await.unwrap();

        assert_eq!(url, "https://example.invalid/response");
        assert_eq!(resp.status, ResponseStatus::Failed);
        assert!(resp.reason.starts_with("malformed custom resource event"), "{}", resp.reason);
    }

    #[tokio::test]
    async fn undecodable_event_without_url_is_an_error() {
        let toggle = MaintenanceToggle::new(Unreachable, Unreachable);

        assert!(respond_to(Ok(&toggle), json!({ "hello": "world" })).await.is_err());
    }
}
