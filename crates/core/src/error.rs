//! Error types shared across crates

use thiserror::Error;

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// The send primitive failed or its completion reported an error
    #[error("Send failure: {0}")]
    SendFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Errors raised by the timestamp accumulator
///
/// None of these modify the utterance anchor; they abort the current
/// word (or `start` call) only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// `record` called before `start`
    #[error("Word '{word}' recorded before timestamps were started")]
    NotStarted { word: String },

    /// Negative, non-finite, or out-of-range relative offset
    #[error("Malformed offset for word '{word}': {detail}")]
    MalformedOffset { word: String, detail: String },

    /// Enforced anchoring: the clock has not moved past the previous utterance
    #[error("Clock at {now_ns}ns has not advanced past last timestamp {last_ns}ns")]
    AnchorRegression { now_ns: u64, last_ns: u64 },
}

impl Error {
    /// Whether the error came from the transport side
    pub fn is_send_failure(&self) -> bool {
        matches!(self, Error::SendFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_error_converts() {
        let err: Error = TimestampError::NotStarted {
            word: "hi".into(),
        }
        .into();
        assert!(matches!(err, Error::Timestamp(TimestampError::NotStarted { .. })));
        assert!(!err.is_send_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = TimestampError::MalformedOffset {
            word: "là".into(),
            detail: "negative offset -5ns".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed offset for word 'là': negative offset -5ns"
        );

        let err = Error::SendFailure("session closed".into());
        assert!(err.is_send_failure());
        assert_eq!(err.to_string(), "Send failure: session closed");
    }
}
