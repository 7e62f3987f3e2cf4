//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    FileContent, LabelEvent, LabelEventKind, MergeMethod, MergeResult, PrComment, PrRef, PrState,
    PullRequestDetails, RepoPermission, RepoRef,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const PER_PAGE: usize = 100;

/// Color given to labels the robot creates
const NEW_LABEL_COLOR: &str = "0e8a16";

// REST response types for endpoints used through raw requests

#[derive(Deserialize)]
struct TimelineEvent {
    event: Option<String>,
    actor: Option<Account>,
    label: Option<NamedLabel>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Account {
    login: String,
}

#[derive(Deserialize)]
struct NamedLabel {
    name: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    path: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct PermissionResponse {
    permission: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (timeline, contents, trees, permissions)
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service talking to an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("review-robot")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{path}", self.api_base))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GET {path} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse response of GET {path}: {e}")))
    }

    /// Fetch every page of a list endpoint
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let batch: Vec<T> = self
                .get_json(
                    path,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                )
                .await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                return Ok(items);
            }
            page += 1;
        }
    }

    async fn send_expecting_success(&self, builder: RequestBuilder, what: &str) -> Result<()> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("{what} failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::GitHubApi(format!(
                "{what} returned {}",
                response.status()
            )))
        }
    }
}

/// Percent-encode each segment of a repository path, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Helper to convert octocrab PR to our `PullRequestDetails` type
fn details_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestDetails {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    PullRequestDetails {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        state,
        mergeable: pr.mergeable,
        base_ref: pr.base.ref_field.clone(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        assignees: pr
            .assignees
            .as_ref()
            .map(|users| users.iter().map(|u| u.login.clone()).collect())
            .unwrap_or_default(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails> {
        debug!(%pr, "getting PR details");
        let raw = self.client.pulls(&pr.org, &pr.repo).get(pr.number).await?;
        let details = details_from_octocrab(&raw);
        debug!(%pr, state = %details.state, mergeable = ?details.mergeable, "got PR details");
        Ok(details)
    }

    async fn get_pr_labels(&self, pr: &PrRef) -> Result<Vec<String>> {
        debug!(%pr, "listing PR labels");
        let page = self
            .client
            .issues(&pr.org, &pr.repo)
            .list_labels_for_issue(pr.number)
            .per_page(100)
            .send()
            .await?;
        let labels = self.client.all_pages(page).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<LabelEvent>> {
        debug!(%pr, "listing operation logs");
        let path = format!("/repos/{}/{}/issues/{}/timeline", pr.org, pr.repo, pr.number);
        let events: Vec<TimelineEvent> = self.get_all_pages(&path).await?;

        let result: Vec<LabelEvent> = events
            .into_iter()
            .filter_map(|e| {
                // Events without a timestamp (e.g. commits) carry no label history
                let created_at = e.created_at?;
                Some(LabelEvent {
                    kind: LabelEventKind::from_event_name(e.event.as_deref().unwrap_or_default()),
                    label: e.label.map(|l| l.name).unwrap_or_default(),
                    actor: e.actor.map(|a| a.login),
                    created_at,
                })
            })
            .collect();
        debug!(%pr, count = result.len(), "listed operation logs");
        Ok(result)
    }

    async fn list_pr_comments(&self, pr: &PrRef) -> Result<Vec<PrComment>> {
        debug!(%pr, "listing PR comments");
        let page = self
            .client
            .issues(&pr.org, &pr.repo)
            .list_comments(pr.number)
            .per_page(100)
            .send()
            .await?;
        let comments = self.client.all_pages(page).await?;

        let result: Vec<PrComment> = comments
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                body: c.body.unwrap_or_default(),
                author: c.user.login,
                created_at: c.created_at,
                updated_at: c.updated_at.unwrap_or(c.created_at),
            })
            .collect();
        debug!(%pr, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn list_pr_files(&self, pr: &PrRef) -> Result<Vec<String>> {
        debug!(%pr, "listing PR files");
        let page = self
            .client
            .pulls(&pr.org, &pr.repo)
            .list_files(pr.number)
            .await?;
        let files = self.client.all_pages(page).await?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn get_path_content(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<FileContent> {
        debug!(%repo, path, branch, "fetching file content");
        let url = format!("/repos/{}/{}/contents/{}", repo.org, repo.repo, encode_path(path));
        let response: ContentResponse = self.get_json(&url, &[("ref", branch.to_string())]).await?;

        let encoded = response.content.ok_or_else(|| {
            Error::GitHubApi(format!("{path} in {repo} is not a file"))
        })?;
        Ok(FileContent {
            path: response.path,
            encoded,
        })
    }

    async fn get_directory_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<String>> {
        debug!(%repo, branch, "fetching directory tree");
        let url = format!(
            "/repos/{}/{}/git/trees/{}",
            repo.org,
            repo.repo,
            urlencoding::encode(branch)
        );
        let response: TreeResponse = self.get_json(&url, &[("recursive", "1".to_string())]).await?;

        if response.truncated {
            debug!(%repo, branch, "directory tree truncated by the platform");
        }

        Ok(response
            .tree
            .into_iter()
            .filter(|e| e.kind == "blob")
            .map(|e| e.path)
            .collect())
    }

    async fn get_user_permission(&self, repo: &RepoRef, user: &str) -> Result<RepoPermission> {
        debug!(%repo, user, "fetching user permission");
        let url = format!(
            "/repos/{}/{}/collaborators/{}/permission",
            repo.org,
            repo.repo,
            urlencoding::encode(user)
        );
        let response: PermissionResponse = self.get_json(&url, &[]).await?;
        Ok(RepoPermission::parse(&response.permission))
    }

    async fn list_repo_labels(&self, repo: &RepoRef) -> Result<Vec<String>> {
        debug!(%repo, "listing repository labels");
        let url = format!("/repos/{}/{}/labels", repo.org, repo.repo);
        let labels: Vec<NamedLabel> = self.get_all_pages(&url).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn create_repo_label(&self, repo: &RepoRef, label: &str) -> Result<()> {
        debug!(%repo, label, "creating repository label");
        let url = format!("/repos/{}/{}/labels", repo.org, repo.repo);
        let builder = self
            .request(Method::POST, &url)
            .json(&serde_json::json!({ "name": label, "color": NEW_LABEL_COLOR }));
        self.send_expecting_success(builder, &format!("create label {label}"))
            .await
    }

    async fn add_pr_label(&self, pr: &PrRef, label: &str) -> Result<()> {
        debug!(%pr, label, "adding PR label");
        self.client
            .issues(&pr.org, &pr.repo)
            .add_labels(pr.number, &[label.to_string()])
            .await?;
        Ok(())
    }

    async fn remove_pr_label(&self, pr: &PrRef, label: &str) -> Result<()> {
        debug!(%pr, label, "removing PR label");
        let url = format!(
            "/repos/{}/{}/issues/{}/labels/{}",
            pr.org,
            pr.repo,
            pr.number,
            urlencoding::encode(label)
        );
        self.send_expecting_success(
            self.request(Method::DELETE, &url),
            &format!("remove label {label}"),
        )
        .await
    }

    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()> {
        debug!(%pr, "creating PR comment");
        self.client
            .issues(&pr.org, &pr.repo)
            .create_comment(pr.number, body)
            .await?;
        debug!(%pr, "created PR comment");
        Ok(())
    }

    async fn merge_pr(
        &self,
        pr: &PrRef,
        message: &str,
        method: &MergeMethod,
    ) -> Result<MergeResult> {
        debug!(%pr, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
            MergeMethod::Other(name) => {
                return Err(Error::Platform(format!(
                    "merge method '{name}' is not supported by GitHub"
                )));
            }
        };

        let result = self
            .client
            .pulls(&pr.org, &pr.repo)
            .merge(pr.number)
            .method(octocrab_method)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            %pr,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }
}
