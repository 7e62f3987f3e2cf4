//! Inbound webhook payloads
//!
//! Only the fields the handlers read are modeled; everything else in the
//! platform payload is ignored.

use crate::error::{Error, Result};
use crate::types::{PrRef, PrState, PullRequestDetails, RepoRef};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// PR action fired when the source branch receives new commits
pub const ACTION_SYNCHRONIZE: &str = "synchronize";
/// PR action fired when a label is added
pub const ACTION_LABELED: &str = "labeled";
/// PR action fired when a PR is opened
pub const ACTION_OPENED: &str = "opened";
/// Comment action fired for new comments
pub const ACTION_CREATED: &str = "created";

const STATE_OPEN: &str = "open";

/// A platform account
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Login
    pub login: String,
}

/// A label as carried by payloads
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// Repository the event belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Repository name
    pub name: String,
    /// Owning organization or user
    pub owner: User,
}

impl Repository {
    /// Reference to this repository
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.owner.login, &self.name)
    }
}

/// Base branch of a PR
#[derive(Debug, Clone, Deserialize)]
pub struct BaseRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// PR as carried by a pull request event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    /// PR number
    pub number: u64,
    /// `open` or `closed`
    pub state: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    pub body: Option<String>,
    /// Whether the PR merges cleanly, if already computed
    pub mergeable: Option<bool>,
    /// Whether the PR was merged
    #[serde(default)]
    pub merged: bool,
    /// Base branch
    pub base: BaseRef,
    /// Author
    pub user: User,
    /// Labels in platform order
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Web URL
    #[serde(default)]
    pub html_url: String,
}

impl PullRequestPayload {
    /// Whether the PR is open
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    /// Label names in platform order
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    /// Snapshot used by the merge engine
    pub fn to_details(&self) -> PullRequestDetails {
        let state = match (self.state.as_str(), self.merged) {
            (_, true) => PrState::Merged,
            (STATE_OPEN, false) => PrState::Open,
            _ => PrState::Closed,
        };

        PullRequestDetails {
            number: self.number,
            title: self.title.clone(),
            body: self.body.clone(),
            state,
            mergeable: self.mergeable,
            base_ref: self.base.ref_name.clone(),
            author: self.user.login.clone(),
            labels: self.label_names(),
            assignees: self.assignees.iter().map(|a| a.login.clone()).collect(),
            html_url: self.html_url.clone(),
        }
    }
}

/// Pull request event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// Action such as `opened`, `synchronize` or `labeled`
    pub action: String,
    /// The PR
    pub pull_request: PullRequestPayload,
    /// Repository
    pub repository: Repository,
}

impl PullRequestEvent {
    /// The PR this event is about
    pub fn pr_ref(&self) -> PrRef {
        self.repository.repo_ref().pr(self.pull_request.number)
    }
}

/// Comment as carried by a comment event
#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    /// Comment ID
    pub id: u64,
    /// Body
    #[serde(default)]
    pub body: String,
    /// Author
    pub user: User,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

/// Issue the comment was made on; PRs are issues with a `pull_request` link
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    /// Issue or PR number
    pub number: u64,
    /// `open` or `closed`
    pub state: String,
    /// Author
    pub user: User,
    /// Labels in platform order
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present when the issue is a PR
    pub pull_request: Option<serde_json::Value>,
}

/// Issue comment event
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    /// Action such as `created` or `edited`
    pub action: String,
    /// The comment
    pub comment: CommentPayload,
    /// The issue or PR commented on
    pub issue: IssuePayload,
    /// Repository
    pub repository: Repository,
}

impl IssueCommentEvent {
    /// The PR this event is about
    pub fn pr_ref(&self) -> PrRef {
        self.repository.repo_ref().pr(self.issue.number)
    }

    /// Whether this is a new comment on an open PR
    pub fn is_new_comment_on_open_pr(&self) -> bool {
        self.issue.pull_request.is_some()
            && self.issue.state == STATE_OPEN
            && self.action == ACTION_CREATED
    }

    /// Label names of the PR at comment time
    pub fn label_names(&self) -> Vec<String> {
        self.issue.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// A decoded webhook delivery
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    /// `pull_request`
    PullRequest(Box<PullRequestEvent>),
    /// `issue_comment`
    IssueComment(Box<IssueCommentEvent>),
}

impl WebhookEvent {
    /// Decode a payload given the platform's event name
    pub fn parse(kind: &str, payload: &str) -> Result<Self> {
        match kind {
            "pull_request" => serde_json::from_str(payload)
                .map(|e| Self::PullRequest(Box::new(e)))
                .map_err(|e| Error::Event(format!("invalid pull_request payload: {e}"))),
            "issue_comment" => serde_json::from_str(payload)
                .map(|e| Self::IssueComment(Box::new(e)))
                .map_err(|e| Error::Event(format!("invalid issue_comment payload: {e}"))),
            other => Err(Error::Event(format!("unsupported event type: {other}"))),
        }
    }

    /// Repository the event belongs to
    pub fn repo_ref(&self) -> RepoRef {
        match self {
            Self::PullRequest(e) => e.repository.repo_ref(),
            Self::IssueComment(e) => e.repository.repo_ref(),
        }
    }
}
