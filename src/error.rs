//! Error types for review-robot

use thiserror::Error;

/// Errors surfaced by the engine and its platform collaborators
///
/// Policy outcomes (missing labels, frozen branches, denied commenters) are not
/// errors; they are reported through `MergeVerdict` and comments.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure talking to the code hosting platform
    #[error("platform error: {0}")]
    Platform(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// No usable platform token
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid or missing bot configuration
    #[error("config error: {0}")]
    Config(String),

    /// Fetched content could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Inbound event payload is malformed
    #[error("event error: {0}")]
    Event(String),

    /// One or more independent handlers failed
    #[error("{} handler(s) failed: {}", .0.len(), summarize(.0))]
    Handlers(Vec<Error>),
}

fn summarize(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Collects errors from handlers that must all run
///
/// Every handler is executed; failures are recorded rather than returned
/// early, and `finish` folds them into a single result.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<Error>,
}

impl ErrorCollector {
    /// Create an empty collector
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record the outcome of one handler
    pub fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.errors.push(e);
        }
    }

    /// Number of failures recorded so far
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no failure has been recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold the recorded failures into one result
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Handlers(self.errors))
        }
    }
}
