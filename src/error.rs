use thiserror::Error;

/// Failure to map a logical rule name to its physical id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("logical resource '{logical_name}' does not exist in stack '{stack_id}'")]
    NotFound {
        stack_id: String,
        logical_name: String,
    },
    /// transport or API failure while looking the rule up.
    #[error("lookup failed: {0}")]
    Provider(String),
}

/// A priority write was rejected by the provider, or never reached it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// caller bug: identical rules, empty names, rules from different stacks.
    /// Never retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing was written. Safe to retry.
    #[error("failed to resolve rule '{logical_name}' in stack '{stack_id}' (forward '{forward}', maintenance '{maintenance}'): {source}")]
    ResolutionFailed {
        stack_id: String,
        logical_name: String,
        forward: String,
        maintenance: String,
        #[source]
        source: ResolveError,
    },

    /// The write failed after both rules resolved. `completed_steps > 0`
    /// means a two-phase update stopped half way and the pair may be
    /// indeterminate until the next apply.
    #[error("failed to set priorities in stack '{stack_id}' (forward '{forward}', maintenance '{maintenance}', {completed_steps} step(s) applied): {source}")]
    ApplyFailed {
        stack_id: String,
        forward: String,
        maintenance: String,
        completed_steps: usize,
        #[source]
        source: ProviderError,
    },
}

impl ReconcileError {
    /// true for errors a caller may retry by re-running the same request.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ReconcileError::InvalidRequest(_))
    }
}
