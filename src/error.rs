use thiserror::Error;

pub type CleanerResult<T> = Result<T, CleanerError>;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The diagnostic did not name a single repository URL
    #[error("Could not disable repos: empty URL sequence was provided")]
    EmptyUrlSet,

    /// URLs were found but none of them belongs to a configured source
    #[error("No repos were disabled even though {0} URLs were provided")]
    NoMatchableRepository(usize),

    #[error("Interrupted by operator")]
    Interrupted,
}

impl From<tempfile::PersistError> for CleanerError {
    fn from(err: tempfile::PersistError) -> Self {
        CleanerError::Io(err.error)
    }
}

impl CleanerError {
    pub fn is_disable_failure(&self) -> bool {
        matches!(
            self,
            CleanerError::EmptyUrlSet | CleanerError::NoMatchableRepository(_)
        )
    }

    pub fn is_interruption(&self) -> bool {
        matches!(self, CleanerError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_failure_messages() {
        assert_eq!(
            CleanerError::EmptyUrlSet.to_string(),
            "Could not disable repos: empty URL sequence was provided"
        );
        assert_eq!(
            CleanerError::NoMatchableRepository(3).to_string(),
            "No repos were disabled even though 3 URLs were provided"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(CleanerError::EmptyUrlSet.is_disable_failure());
        assert!(CleanerError::NoMatchableRepository(1).is_disable_failure());
        assert!(!CleanerError::Interrupted.is_disable_failure());
        assert!(CleanerError::Interrupted.is_interruption());
        assert!(!CleanerError::CommandFailed("apt-get".into()).is_interruption());
    }
}
