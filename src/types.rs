//! Core types for review-robot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Organization or user owning the repository
    pub org: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }

    /// Reference to PR `number` in this repository
    pub fn pr(&self, number: u64) -> PrRef {
        PrRef {
            org: self.org.clone(),
            repo: self.repo.clone(),
            number,
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// A pull request addressed by org, repo and number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrRef {
    /// Organization or user owning the repository
    pub org: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
}

impl PrRef {
    /// The repository this PR belongs to
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.org, &self.repo)
    }
}

impl std::fmt::Display for PrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.org, self.repo, self.number)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Snapshot of a pull request as needed by the merge checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Current state of the PR
    pub state: PrState,
    /// Whether the platform reports the PR as cleanly mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (still computing)
    pub mergeable: Option<bool>,
    /// Base branch name
    pub base_ref: String,
    /// Login of the PR author
    pub author: String,
    /// Label names in platform order
    pub labels: Vec<String>,
    /// Logins of assignees
    pub assignees: Vec<String>,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequestDetails {
    /// Whether the PR is open
    pub fn is_open(&self) -> bool {
        self.state == PrState::Open
    }

    /// Whether the platform has confirmed the PR merges cleanly
    pub fn is_mergeable(&self) -> bool {
        self.mergeable == Some(true)
    }
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Comment body text
    pub body: String,
    /// Login of the comment author
    pub author: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last edited (equal to `created_at` if never edited)
    pub updated_at: DateTime<Utc>,
}

impl PrComment {
    /// Whether the comment was never edited after creation
    pub fn is_unedited(&self) -> bool {
        self.created_at == self.updated_at
    }
}

/// Kind of a timeline event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelEventKind {
    /// A label was added
    Labeled,
    /// A label was removed
    Unlabeled,
    /// Any other timeline event
    Other(String),
}

impl LabelEventKind {
    /// Map a platform event name to a kind
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "labeled" => Self::Labeled,
            "unlabeled" => Self::Unlabeled,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One entry of the PR operation log (timeline)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEvent {
    /// Event kind
    pub kind: LabelEventKind,
    /// Label name (empty for non-label events)
    pub label: String,
    /// Login of the actor, if the platform recorded one
    pub actor: Option<String>,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}

/// File content fetched from a repository, still base64 encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Path within the repository
    pub path: String,
    /// Base64 encoded content as returned by the platform
    pub encoded: String,
}

/// Permission level of a user on a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoPermission {
    /// Full administrative access
    Admin,
    /// Push access
    Write,
    /// Read-only access
    Read,
    /// No access
    None,
}

impl RepoPermission {
    /// Parse the platform's permission string
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "write" | "maintain" => Self::Write,
            "read" | "triage" => Self::Read,
            _ => Self::None,
        }
    }

    /// Whether the level allows running maintainer commands
    pub const fn can_write(&self) -> bool {
        matches!(self, Self::Admin | Self::Write)
    }
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
    /// Strategy named by a `merge/<name>` label that is not one of the above
    Other(String),
}

impl MergeMethod {
    /// Parse a configured merge method; only the three platform methods are accepted
    pub fn from_config(s: &str) -> Option<Self> {
        match s {
            "merge" => Some(Self::Merge),
            "squash" => Some(Self::Squash),
            "rebase" => Some(Self::Rebase),
            _ => None,
        }
    }
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}
