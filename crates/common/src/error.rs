use thiserror::Error;

/// Invalid or missing process configuration. Always fatal, raised before
/// any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_B_URL not set")]
    MissingDestinationUrl,

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failure fetching users from the source API. Fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API A: request failed: {0}")]
    Transport(String),

    #[error("API A: non-OK status: {0}")]
    Status(u16),

    #[error("API A: failed to decode users: {0}")]
    Decode(String),
}

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("non-2xx status: {status}, body: {body}")]
    Status { status: u16, body: String },
}

/// Failure delivering one payload to the destination API. Never fatal to
/// the run; the dispatcher logs it and moves on.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("API B: failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: AttemptFailure },

    #[error("API B: cancelled while waiting to retry after {attempts} attempts")]
    Cancelled { attempts: u32 },

    #[error("API B: failed to encode payload: {0}")]
    Encode(String),
}

impl DeliveryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeliveryError::Cancelled { .. })
    }

    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryError::Exhausted { attempts, .. } | DeliveryError::Cancelled { attempts } => {
                *attempts
            }
            DeliveryError::Encode(_) => 0,
        }
    }
}

/// Run-level error: anything that aborts a processing pass.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_wraps_last_failure() {
        let err = DeliveryError::Exhausted {
            attempts: 3,
            last: AttemptFailure::Status {
                status: 500,
                body: "boom".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "API B: failed after 3 attempts: non-2xx status: 500, body: boom"
        );
        assert_eq!(err.attempts(), 3);
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_is_distinct() {
        let err = DeliveryError::Cancelled { attempts: 1 };
        assert!(err.is_cancelled());
        assert_eq!(err.attempts(), 1);
    }

    #[test]
    fn test_relay_error_from_fetch() {
        let err: RelayError = FetchError::Status(503).into();
        assert!(matches!(err, RelayError::Fetch(FetchError::Status(503))));
        assert_eq!(err.to_string(), "Fetch error: API A: non-OK status: 503");
    }
}
