//! Error types shared across the scheduler

use thiserror::Error;

/// Errors that can occur while scheduling, validating or applying feedback
#[derive(Debug, Error)]
pub enum SrsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid: {0}")]
    Invalid(String),

    /// The content generator failed to produce an artifact
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A damaged input was replaced by a clean default
    #[error("Recovered: {0}")]
    Recovered(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Outcome category of an [`SrsError`], for callers that only care which
/// kind of failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Recovered,
    Io,
}

impl SrsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Invalid(_) | Self::Config(_) | Self::Generation(_) => ErrorKind::Invalid,
            Self::Recovered(_) | Self::Json(_) => ErrorKind::Recovered,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, SrsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(SrsError::NotFound("day 3".into()).kind(), ErrorKind::NotFound);
        assert_eq!(SrsError::Invalid("x".into()).kind(), ErrorKind::Invalid);
        assert_eq!(SrsError::Recovered("x".into()).kind(), ErrorKind::Recovered);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(SrsError::from(io).kind(), ErrorKind::Io);

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(SrsError::from(json).kind(), ErrorKind::Recovered);
    }

    #[test]
    fn test_display() {
        let err = SrsError::NotFound("No story file found for day 4".into());
        assert_eq!(err.to_string(), "Not found: No story file found for day 4");
        assert!(err.is_not_found());
    }
}
