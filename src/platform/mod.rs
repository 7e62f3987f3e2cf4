//! Platform services
//!
//! The engine never performs HTTP itself; everything it reads or mutates on the
//! hosting platform goes through [`PlatformService`].

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    FileContent, LabelEvent, MergeMethod, MergeResult, PrComment, PrRef, PullRequestDetails,
    RepoPermission, RepoRef,
};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// Calls are independent and uncached: if the engine needs the same file twice
/// within one evaluation it asks twice.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get full PR details including labels, body and mergeability
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails>;

    /// Fetch the current label names of a PR
    async fn get_pr_labels(&self, pr: &PrRef) -> Result<Vec<String>>;

    /// Fetch the operation log (timeline) of a PR
    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<LabelEvent>>;

    /// List comments on a PR
    async fn list_pr_comments(&self, pr: &PrRef) -> Result<Vec<PrComment>>;

    /// List paths of files changed by a PR
    async fn list_pr_files(&self, pr: &PrRef) -> Result<Vec<String>>;

    /// Fetch a file, base64 encoded
    async fn get_path_content(&self, repo: &RepoRef, path: &str, branch: &str)
    -> Result<FileContent>;

    /// List every blob path in a branch, recursively
    async fn get_directory_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<String>>;

    /// Permission level of `user` on a repository
    async fn get_user_permission(&self, repo: &RepoRef, user: &str) -> Result<RepoPermission>;

    /// List label names defined in a repository
    async fn list_repo_labels(&self, repo: &RepoRef) -> Result<Vec<String>>;

    /// Create a label in a repository
    async fn create_repo_label(&self, repo: &RepoRef, label: &str) -> Result<()>;

    /// Add a label to a PR
    async fn add_pr_label(&self, pr: &PrRef, label: &str) -> Result<()>;

    /// Remove a label from a PR
    async fn remove_pr_label(&self, pr: &PrRef, label: &str) -> Result<()>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()>;

    /// Merge a PR with the given commit message and method
    async fn merge_pr(&self, pr: &PrRef, message: &str, method: &MergeMethod)
    -> Result<MergeResult>;
}
