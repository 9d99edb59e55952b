//! Adapter error types

use crate::action::ActionType;
use stateflow_wait::{RetryError, SpecError, WaitError};
use std::time::Duration;
use thiserror::Error;

/// Adapter errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{} {service} {resource} ({id}): {source}", action.gerund())]
    Submit {
        service: String,
        resource: String,
        id: String,
        action: ActionType,
        #[source]
        source: anyhow::Error,
    },

    #[error("waiting for {service} {resource} ({id}) {}: {source}", action.noun())]
    Waiting {
        service: String,
        resource: String,
        id: String,
        action: ActionType,
        #[source]
        source: WaitFailure,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] stateflow_config::ConfigError),
}

impl CloudError {
    /// The wait failure, if this error came from a lifecycle wait
    pub fn wait_failure(&self) -> Option<&WaitFailure> {
        match self {
            CloudError::Waiting { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Why a lifecycle wait failed, with the probed object reduced to a reason
#[derive(Error, Debug)]
pub enum WaitFailure {
    #[error(
        "timeout after {elapsed:?} (last state: {})",
        last_state.as_deref().unwrap_or("none")
    )]
    Timeout {
        elapsed: Duration,
        last_state: Option<String>,
    },

    #[error("resource not found")]
    NotFound,

    #[error("unexpected state {state:?}{}", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    FailureState {
        state: String,
        reason: Option<String>,
    },

    #[error("{0}")]
    Probe(#[source] anyhow::Error),

    #[error("cancelled")]
    Cancelled,

    #[error("invalid wait specification: {0}")]
    InvalidSpec(#[from] SpecError),
}

impl WaitFailure {
    /// Reduce a poller error, extracting a failure reason from the object
    /// when the remote reported a failure state.
    pub fn from_wait<T, F>(err: WaitError<T>, reason: F) -> Self
    where
        F: FnOnce(&T) -> Option<String>,
    {
        match err {
            WaitError::Timeout {
                elapsed,
                last_state,
                ..
            } => WaitFailure::Timeout {
                elapsed,
                last_state,
            },
            WaitError::NotFoundExhausted { .. } => WaitFailure::NotFound,
            WaitError::TerminalFailure { state, object } => WaitFailure::FailureState {
                reason: reason(&object),
                state,
            },
            WaitError::Probe(cause) => WaitFailure::Probe(cause),
            WaitError::Cancelled => WaitFailure::Cancelled,
        }
    }
}

/// Error reported by a remote API, identified by its error code
///
/// Adapters wrap SDK errors in this type so retry predicates can match on
/// the code instead of the message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether any error in the chain is an [`ApiError`] with `code`
    pub fn has_code(err: &anyhow::Error, code: &str) -> bool {
        err.chain()
            .filter_map(|cause| cause.downcast_ref::<ApiError>())
            .any(|api| api.code == code)
    }
}

/// Collapse a mutation retry failure into its cause
pub(crate) fn retry_cause(err: RetryError<anyhow::Error>) -> anyhow::Error {
    match err {
        RetryError::Failed(e) => e,
        RetryError::Exhausted { attempts, last } => {
            last.context(format!("still failing after {attempts} attempts"))
        }
        RetryError::NotFound { attempts } => {
            anyhow::anyhow!("resource not found after {attempts} attempts")
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_message() {
        let err = CloudError::Waiting {
            service: "Organizations".to_string(),
            resource: "Account".to_string(),
            id: "car-1234".to_string(),
            action: ActionType::Create,
            source: WaitFailure::FailureState {
                state: "FAILED".to_string(),
                reason: Some("EMAIL_ALREADY_EXISTS".to_string()),
            },
        };
        assert_eq!(
            err.to_string(),
            "waiting for Organizations Account (car-1234) creation: unexpected state \"FAILED\": EMAIL_ALREADY_EXISTS"
        );
    }

    #[test]
    fn test_submit_message() {
        let err = CloudError::Submit {
            service: "Rekognition".to_string(),
            resource: "Stream Processor".to_string(),
            id: "cam-1".to_string(),
            action: ActionType::Update,
            source: anyhow::anyhow!("ResourceInUseException"),
        };
        assert_eq!(
            err.to_string(),
            "updating Rekognition Stream Processor (cam-1): ResourceInUseException"
        );
    }

    #[test]
    fn test_from_wait_drops_object() {
        let err: WaitError<&str> = WaitError::TerminalFailure {
            state: "FAILED".to_string(),
            object: "INVALID_EMAIL",
        };
        let failure = WaitFailure::from_wait(err, |o| Some(o.to_string()));
        assert_eq!(failure.to_string(), "unexpected state \"FAILED\": INVALID_EMAIL");

        let failure = WaitFailure::from_wait::<(), _>(WaitError::Cancelled, |_| None);
        assert!(matches!(failure, WaitFailure::Cancelled));
    }

    #[test]
    fn test_api_error_code_matching() {
        let err = anyhow::Error::new(ApiError::new("ThrottlingException", "slow down"))
            .context("CreateAccount");
        assert!(ApiError::has_code(&err, "ThrottlingException"));
        assert!(!ApiError::has_code(&err, "AccessDeniedException"));

        // a message that only mentions the code is not a match
        let err = anyhow::anyhow!("ThrottlingException seen earlier, now AccessDenied");
        assert!(!ApiError::has_code(&err, "ThrottlingException"));
    }

    #[test]
    fn test_retry_cause_keeps_last_error() {
        let cause = retry_cause(RetryError::Exhausted {
            attempts: 4,
            last: anyhow::anyhow!("FinalizingOrganizationException"),
        });
        assert_eq!(cause.to_string(), "still failing after 4 attempts");
        assert_eq!(
            cause.root_cause().to_string(),
            "FinalizingOrganizationException"
        );
    }
}
