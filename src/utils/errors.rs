use thiserror::Error;

/// Failures of the remote classifier boundary
///
/// Cloneable so one in-flight outcome can be handed to every coalesced caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier rejected credentials: {0}")]
    Auth(String),

    #[error("Classifier returned an unreadable response: {0}")]
    BadResponse(String),
}

impl ClassifierError {
    /// Short cause name shown in notifications
    pub fn cause(&self) -> &'static str {
        match self {
            ClassifierError::Unavailable(_) => "ClassifierUnavailable",
            ClassifierError::Auth(_) => "ClassifierAuthError",
            ClassifierError::BadResponse(_) => "ClassifierBadResponse",
        }
    }
}

/// Main error type for complexity-lens
#[derive(Error, Debug)]
pub enum LensError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}
