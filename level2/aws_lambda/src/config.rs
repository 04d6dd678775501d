use alb_maintenance::PriorityPlan;
use thiserror::Error;

pub const REGION_VAR: &str = "MAINTENANCE_REGION";
pub const ACTIVE_PRIORITY_VAR: &str = "MAINTENANCE_ACTIVE_PRIORITY";
pub const STANDBY_PRIORITY_VAR: &str = "MAINTENANCE_STANDBY_PRIORITY";
pub const PARK_PRIORITIES_VAR: &str = "MAINTENANCE_PARK_PRIORITIES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
    #[error(transparent)]
    Region(#[from] aws_regions::InvalidRegion),
    #[error("invalid priority plan: {0}")]
    Plan(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// when unset the SDK's default region chain applies (AWS_REGION in Lambda).
    pub region: Option<String>,
    pub plan: PriorityPlan,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(region) = non_empty(lookup(REGION_VAR)) {
            config.region = Some(aws_regions::parse_region(&region)?);
        }
        if let Some(v) = non_empty(lookup(ACTIVE_PRIORITY_VAR)) {
            config.plan.active = parse_priority(ACTIVE_PRIORITY_VAR, &v)?;
        }
        if let Some(v) = non_empty(lookup(STANDBY_PRIORITY_VAR)) {
            config.plan.standby = parse_priority(STANDBY_PRIORITY_VAR, &v)?;
        }
        if let Some(v) = non_empty(lookup(PARK_PRIORITIES_VAR)) {
            let (forward, maintenance) = v.split_once(',').ok_or_else(|| ConfigError::Invalid {
                var: PARK_PRIORITIES_VAR,
                message: format!("expected two comma separated priorities, got {v:?}"),
            })?;
            config.plan.park_forward = parse_priority(PARK_PRIORITIES_VAR, forward)?;
            config.plan.park_maintenance = parse_priority(PARK_PRIORITIES_VAR, maintenance)?;
        }
        config.plan.validate().map_err(ConfigError::Plan)?;
        Ok(config)
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_priority(var: &'static str, v: &str) -> Result<u32, ConfigError> {
    v.trim().parse().map_err(|e| ConfigError::Invalid {
        var,
        message: format!("{v:?} is not a priority: {e}"),
    })
}
