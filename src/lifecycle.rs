//! CloudFormation custom resource glue for `Custom::MaintenanceModeOn` and
//! `Custom::MaintenanceModeOff`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::reconciler::{MaintenanceToggle, PriorityWriter, RuleResolver};
use crate::resources::*;

pub const RESOURCE_TYPE_PREFIX: &str = "Custom::MaintenanceMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Properties declared on the custom resource in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceProperties {
    #[serde(rename = "Stack")]
    pub stack: Option<String>,
    #[serde(rename = "FRule")]
    pub forward_rule: Option<String>,
    #[serde(rename = "MRule")]
    pub maintenance_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub resource_type: String,
    pub logical_resource_id: String,
    /// absent on Create.
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: MaintenanceProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Body PUT back to CloudFormation's pre-signed response URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: HashMap<String, String>,
}

impl CustomResourceEvent {
    /// `...On` puts the maintenance rule in front, `...Off` the forward rule.
    pub fn forward_active(&self) -> Result<bool, ReconcileError> {
        match self.resource_type.strip_prefix(RESOURCE_TYPE_PREFIX) {
            Some("On") => Ok(false),
            Some("Off") => Ok(true),
            _ => Err(ReconcileError::InvalidRequest(format!(
                "unsupported resource type '{}', expected Custom::MaintenanceModeOn or Custom::MaintenanceModeOff",
                self.resource_type
            ))),
        }
    }

    pub fn mode_request(&self) -> Result<ModeRequest, ReconcileError> {
        let forward_active = self.forward_active()?;
        let props = &self.resource_properties;
        let stack = required(&props.stack, "Stack")?;
        let forward = required(&props.forward_rule, "FRule")?;
        let maintenance = required(&props.maintenance_rule, "MRule")?;
        Ok(ModeRequest::new(
            RuleRef::new(stack, forward)?,
            RuleRef::new(stack, maintenance)?,
            forward_active,
        ))
    }

    /// Keeps the id CloudFormation already knows; on Create derives one from
    /// the switch's own identity so updates do not replace it.
    pub fn switch_id(&self) -> String {
        let props = &self.resource_properties;
        switch_id(
            self.physical_resource_id.as_deref(),
            &self.logical_resource_id,
            props.forward_rule.as_deref(),
            props.maintenance_rule.as_deref(),
        )
    }

    /// SUCCESS for a Delete; the rules belong to the stack, not the switch.
    pub fn deleted(&self) -> CustomResourceResponse {
        self.respond(ResponseStatus::Success, "deleted".into(), HashMap::new())
    }

    pub fn failed(&self, reason: impl Into<String>) -> CustomResourceResponse {
        self.respond(ResponseStatus::Failed, reason.into(), HashMap::new())
    }

    fn respond(&self, status: ResponseStatus, reason: String, data: HashMap<String, String>) -> CustomResourceResponse {
        CustomResourceResponse {
            status,
            reason,
            physical_resource_id: self.switch_id(),
            stack_id: self.stack_id.clone(),
            request_id: self.request_id.clone(),
            logical_resource_id: self.logical_resource_id.clone(),
            no_echo: false,
            data,
        }
    }
}

/// Runs one lifecycle event through the toggle and builds the response.
/// Never fails itself: every error becomes a FAILED response.
pub async fn handle_event<R, W>(event: &CustomResourceEvent, toggle: &MaintenanceToggle<R, W>) -> CustomResourceResponse
where
    R: RuleResolver,
    W: PriorityWriter,
{
    let request_type = event.request_type;
    if request_type == RequestType::Delete {
        info!(?request_type, logical_resource_id = %event.logical_resource_id, "nothing to reconcile on delete");
        return event.deleted();
    }

    match toggle_from_event(event, toggle).await {
        Ok(forward_active) => {
            let mut data = HashMap::new();
            data.insert("ForwardActive".to_string(), forward_active.to_string());
            event.respond(ResponseStatus::Success, format!("forward_active={forward_active}"), data)
        }
        Err(e) => {
            error!(?request_type, logical_resource_id = %event.logical_resource_id, error = %e, "maintenance switch failed");
            event.failed(e.to_string())
        }
    }
}

async fn toggle_from_event<R, W>(event: &CustomResourceEvent, toggle: &MaintenanceToggle<R, W>) -> Result<bool, ReconcileError>
where
    R: RuleResolver,
    W: PriorityWriter,
{
    let request = event.mode_request()?;
    toggle.apply(&request).await?;
    Ok(request.forward_active)
}

/// FAILED response for a payload that does not decode as a custom resource
/// event. `None` when there is no ResponseURL to answer on.
pub fn failure_for_raw(raw: &Value, reason: impl Into<String>) -> Option<(String, CustomResourceResponse)> {
    let field = |name: &str| raw.get(name).and_then(Value::as_str);
    let prop = |name: &str| raw.get("ResourceProperties").and_then(|p| p.get(name)).and_then(Value::as_str);
    let url = field("ResponseURL").filter(|u| !u.is_empty())?;
    let logical_resource_id = field("LogicalResourceId").unwrap_or_default();
    let response = CustomResourceResponse {
        status: ResponseStatus::Failed,
        reason: reason.into(),
        physical_resource_id: switch_id(field("PhysicalResourceId"), logical_resource_id, prop("FRule"), prop("MRule")),
        stack_id: field("StackId").unwrap_or_default().to_string(),
        request_id: field("RequestId").unwrap_or_default().to_string(),
        logical_resource_id: logical_resource_id.to_string(),
        no_echo: false,
        data: HashMap::new(),
    };
    Some((url.to_string(), response))
}

fn required<'a>(prop: &'a Option<String>, name: &str) -> Result<&'a str, ReconcileError> {
    prop.as_deref().ok_or_else(|| ReconcileError::InvalidRequest(format!("missing resource property '{name}'")))
}

fn switch_id(physical: Option<&str>, logical: &str, forward: Option<&str>, maintenance: Option<&str>) -> String {
    match physical {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}-{}-{}", logical, forward.unwrap_or_default(), maintenance.unwrap_or_default()),
    }
}
