//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use review_robot::content::encode_base64;
use review_robot::error::{Error, Result};
use review_robot::platform::PlatformService;
use review_robot::types::{
    FileContent, LabelEvent, MergeMethod, MergeResult, PrComment, PrRef, PullRequestDetails,
    RepoPermission, RepoRef,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for label mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCall {
    pub pr: PrRef,
    pub label: String,
}

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr: PrRef,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr: PrRef,
    pub message: String,
    pub method: MergeMethod,
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetPrDetails,
    GetPrLabels,
    ListOperationLogs,
    ListPrComments,
    ListPrFiles,
    GetPathContent,
    GetDirectoryTree,
    GetUserPermission,
    ListRepoLabels,
    CreateRepoLabel,
    AddPrLabel,
    RemovePrLabel,
    CreatePrComment,
    MergePr,
}

fn file_key(repo: &RepoRef, branch: &str, path: &str) -> String {
    format!("{repo}@{branch}:{path}")
}

fn tree_key(repo: &RepoRef, branch: &str) -> String {
    format!("{repo}@{branch}")
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall.
///
/// Features:
/// - Configurable responses per PR, file and user
/// - Repository files stored as plain text, returned base64 encoded
/// - Call tracking for verification
/// - Error injection per operation
#[derive(Default)]
pub struct MockPlatformService {
    pr_details: Mutex<HashMap<PrRef, PullRequestDetails>>,
    pr_labels: Mutex<HashMap<PrRef, Vec<String>>>,
    operation_logs: Mutex<HashMap<PrRef, Vec<LabelEvent>>>,
    comments: Mutex<HashMap<PrRef, Vec<PrComment>>>,
    pr_files: Mutex<HashMap<PrRef, Vec<String>>>,
    files: Mutex<HashMap<String, String>>,
    trees: Mutex<HashMap<String, Vec<String>>>,
    permissions: Mutex<HashMap<String, RepoPermission>>,
    repo_labels: Mutex<Vec<String>>,
    merge_response: Mutex<Option<MergeResult>>,
    // Call tracking
    added_labels: Mutex<Vec<LabelCall>>,
    removed_labels: Mutex<Vec<LabelCall>>,
    created_repo_labels: Mutex<Vec<String>>,
    created_comments: Mutex<Vec<CreateCommentCall>>,
    merge_calls: Mutex<Vec<MergePrCall>>,
    content_requests: Mutex<Vec<String>>,
    label_fetches: Mutex<Vec<PrRef>>,
    // Error injection
    failures: Mutex<HashMap<Op, String>>,
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    // === Error injection methods ===

    /// Make `op` return an error
    pub fn fail(&self, op: Op, msg: &str) {
        self.failures.lock().unwrap().insert(op, msg.to_string());
    }

    fn check(&self, op: Op) -> Result<()> {
        match self.failures.lock().unwrap().get(&op) {
            Some(msg) => Err(Error::Platform(msg.clone())),
            None => Ok(()),
        }
    }

    // === Response setup methods ===

    /// Set the PR returned by `get_pr_details` (and its labels for `get_pr_labels`)
    pub fn set_pr(&self, pr: &PrRef, details: PullRequestDetails) {
        self.pr_labels
            .lock()
            .unwrap()
            .insert(pr.clone(), details.labels.clone());
        self.pr_details.lock().unwrap().insert(pr.clone(), details);
    }

    /// Override the labels returned by `get_pr_labels`
    pub fn set_pr_labels(&self, pr: &PrRef, labels: &[&str]) {
        self.pr_labels.lock().unwrap().insert(
            pr.clone(),
            labels.iter().map(ToString::to_string).collect(),
        );
    }

    /// Set the operation log of a PR
    pub fn set_operation_logs(&self, pr: &PrRef, events: Vec<LabelEvent>) {
        self.operation_logs.lock().unwrap().insert(pr.clone(), events);
    }

    /// Set the comments of a PR
    pub fn set_comments(&self, pr: &PrRef, comments: Vec<PrComment>) {
        self.comments.lock().unwrap().insert(pr.clone(), comments);
    }

    /// Set the changed files of a PR
    pub fn set_pr_files(&self, pr: &PrRef, files: &[&str]) {
        self.pr_files.lock().unwrap().insert(
            pr.clone(),
            files.iter().map(ToString::to_string).collect(),
        );
    }

    /// Store a repository file as plain text
    pub fn set_file(&self, repo: &RepoRef, branch: &str, path: &str, text: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(file_key(repo, branch, path), text.to_string());
    }

    /// Set the blob paths of a branch
    pub fn set_tree(&self, repo: &RepoRef, branch: &str, paths: &[&str]) {
        self.trees.lock().unwrap().insert(
            tree_key(repo, branch),
            paths.iter().map(ToString::to_string).collect(),
        );
    }

    /// Set the permission of a user on every repository
    pub fn set_permission(&self, user: &str, permission: RepoPermission) {
        self.permissions
            .lock()
            .unwrap()
            .insert(user.to_string(), permission);
    }

    /// Set the labels defined in repositories
    pub fn set_repo_labels(&self, labels: &[&str]) {
        *self.repo_labels.lock().unwrap() = labels.iter().map(ToString::to_string).collect();
    }

    /// Set the result returned by `merge_pr`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = Some(result);
    }

    // === Call inspection methods ===

    pub fn added_labels(&self) -> Vec<String> {
        self.added_labels
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.label.clone())
            .collect()
    }

    pub fn removed_labels(&self) -> Vec<String> {
        self.removed_labels
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.label.clone())
            .collect()
    }

    pub fn created_repo_labels(&self) -> Vec<String> {
        self.created_repo_labels.lock().unwrap().clone()
    }

    pub fn comment_bodies(&self) -> Vec<String> {
        self.created_comments
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.body.clone())
            .collect()
    }

    pub fn merge_calls(&self) -> Vec<MergePrCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Paths requested through `get_path_content`, in order
    pub fn content_requests(&self) -> Vec<String> {
        self.content_requests.lock().unwrap().clone()
    }

    /// PRs whose labels were fetched through `get_pr_labels`
    pub fn label_fetches(&self) -> Vec<PrRef> {
        self.label_fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails> {
        self.check(Op::GetPrDetails)?;
        let mut details = self
            .pr_details
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("PR {pr} not found")))?;
        if let Some(labels) = self.pr_labels.lock().unwrap().get(pr) {
            details.labels.clone_from(labels);
        }
        Ok(details)
    }

    async fn get_pr_labels(&self, pr: &PrRef) -> Result<Vec<String>> {
        self.label_fetches.lock().unwrap().push(pr.clone());
        self.check(Op::GetPrLabels)?;
        Ok(self
            .pr_labels
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<LabelEvent>> {
        self.check(Op::ListOperationLogs)?;
        Ok(self
            .operation_logs
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_pr_comments(&self, pr: &PrRef) -> Result<Vec<PrComment>> {
        self.check(Op::ListPrComments)?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_pr_files(&self, pr: &PrRef) -> Result<Vec<String>> {
        self.check(Op::ListPrFiles)?;
        Ok(self
            .pr_files
            .lock()
            .unwrap()
            .get(pr)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_path_content(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<FileContent> {
        self.content_requests
            .lock()
            .unwrap()
            .push(path.to_string());
        self.check(Op::GetPathContent)?;
        let text = self
            .files
            .lock()
            .unwrap()
            .get(&file_key(repo, branch, path))
            .cloned()
            .ok_or_else(|| Error::Platform(format!("404: {path} not found in {repo}")))?;
        Ok(FileContent {
            path: path.to_string(),
            encoded: encode_base64(&text),
        })
    }

    async fn get_directory_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<String>> {
        self.check(Op::GetDirectoryTree)?;
        self.trees
            .lock()
            .unwrap()
            .get(&tree_key(repo, branch))
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no tree for {repo}@{branch}")))
    }

    async fn get_user_permission(&self, _repo: &RepoRef, user: &str) -> Result<RepoPermission> {
        self.check(Op::GetUserPermission)?;
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or(RepoPermission::None))
    }

    async fn list_repo_labels(&self, _repo: &RepoRef) -> Result<Vec<String>> {
        self.check(Op::ListRepoLabels)?;
        Ok(self.repo_labels.lock().unwrap().clone())
    }

    async fn create_repo_label(&self, _repo: &RepoRef, label: &str) -> Result<()> {
        self.check(Op::CreateRepoLabel)?;
        self.created_repo_labels
            .lock()
            .unwrap()
            .push(label.to_string());
        self.repo_labels.lock().unwrap().push(label.to_string());
        Ok(())
    }

    async fn add_pr_label(&self, pr: &PrRef, label: &str) -> Result<()> {
        self.check(Op::AddPrLabel)?;
        self.added_labels.lock().unwrap().push(LabelCall {
            pr: pr.clone(),
            label: label.to_string(),
        });
        let mut labels = self.pr_labels.lock().unwrap();
        let current = labels.entry(pr.clone()).or_default();
        if !current.iter().any(|l| l == label) {
            current.push(label.to_string());
        }
        Ok(())
    }

    async fn remove_pr_label(&self, pr: &PrRef, label: &str) -> Result<()> {
        self.check(Op::RemovePrLabel)?;
        self.removed_labels.lock().unwrap().push(LabelCall {
            pr: pr.clone(),
            label: label.to_string(),
        });
        if let Some(current) = self.pr_labels.lock().unwrap().get_mut(pr) {
            current.retain(|l| l != label);
        }
        Ok(())
    }

    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()> {
        self.check(Op::CreatePrComment)?;
        self.created_comments
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr: pr.clone(),
                body: body.to_string(),
            });
        Ok(())
    }

    async fn merge_pr(
        &self,
        pr: &PrRef,
        message: &str,
        method: &MergeMethod,
    ) -> Result<MergeResult> {
        self.merge_calls.lock().unwrap().push(MergePrCall {
            pr: pr.clone(),
            message: message.to_string(),
            method: method.clone(),
        });
        self.check(Op::MergePr)?;
        Ok(self
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some("abc123".to_string()),
                message: None,
            }))
    }
}
