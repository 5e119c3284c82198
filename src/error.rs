use thiserror::Error;

/// Failures reported by the planner. No partial result accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlanError::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PlanError::Internal(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PlanError::InvalidInput(_))
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            PlanError::InvalidInput(msg) | PlanError::Internal(msg) => msg,
        }
    }
}
