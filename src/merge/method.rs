//! Merge method resolution
//!
//! A `merge/<strategy>` label on the PR decides. Without one, the sig named by a
//! `sig/<name>` label may declare a per-repository method in the community repo.

use crate::config::CommunityRepo;
use crate::content::decode_yaml;
use crate::labels::{MERGE_STRATEGY_PREFIX, SIG_PREFIX};
use crate::platform::PlatformService;
use crate::types::{MergeMethod, RepoRef};
use serde::Deserialize;
use tracing::{info, warn};

/// Per-repository declaration in the community repo
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryDeclaration {
    /// Declared merge method
    #[serde(default)]
    pub merge_method: String,
}

/// What the PR labels say about the merge method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelHint {
    /// A `merge/<strategy>` label decides
    Strategy(MergeMethod),
    /// No strategy label; the named sig may declare one
    Sig(String),
    /// Nothing to go on
    None,
}

/// Scan labels in PR order
///
/// The first strategy label wins. `squash` is recognized in any casing; other
/// names are kept verbatim. The sig is the last `sig/` label seen before that.
pub fn label_hint<S: AsRef<str>>(labels: &[S]) -> LabelHint {
    let mut sig = None;

    for label in labels {
        let label = label.as_ref();
        if let Some(strategy) = label.strip_prefix(MERGE_STRATEGY_PREFIX) {
            let strategy = strategy.split('/').next().unwrap_or_default();
            let method = if strategy.eq_ignore_ascii_case("squash") {
                MergeMethod::Squash
            } else {
                match strategy {
                    "rebase" => MergeMethod::Rebase,
                    "merge" => MergeMethod::Merge,
                    other => MergeMethod::Other(other.to_string()),
                }
            };
            return LabelHint::Strategy(method);
        }
        if let Some(name) = label.strip_prefix(SIG_PREFIX) {
            sig = Some(name.split('/').next().unwrap_or_default().to_string());
        }
    }

    sig.map_or(LabelHint::None, LabelHint::Sig)
}

/// Path of the per-repository declaration of `repo` in sig `sig`
pub fn declaration_path(sig: &str, repo: &RepoRef) -> String {
    let initial: String = repo
        .repo
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default();
    format!("sig/{sig}/{}/{initial}/{}.yaml", repo.org, repo.repo)
}

/// Method honored from a declaration: only `rebase` and `squash` override the default
pub fn declared_method(declaration: &RepositoryDeclaration) -> MergeMethod {
    match declaration.merge_method.as_str() {
        "rebase" => MergeMethod::Rebase,
        "squash" => MergeMethod::Squash,
        _ => MergeMethod::Merge,
    }
}

/// Resolve the merge method for a PR; never fails
pub async fn resolve_merge_method<S: AsRef<str> + Sync>(
    platform: &dyn PlatformService,
    community: &CommunityRepo,
    repo: &RepoRef,
    labels: &[S],
) -> MergeMethod {
    let sig = match label_hint(labels) {
        LabelHint::Strategy(method) => return method,
        LabelHint::Sig(sig) => sig,
        LabelHint::None => return MergeMethod::default(),
    };

    let path = declaration_path(&sig, repo);
    let community_repo = RepoRef::new(&community.owner, &community.repo);
    let file = match platform
        .get_path_content(&community_repo, &path, &community.branch)
        .await
    {
        Ok(file) => file,
        Err(e) => {
            info!(%repo, path = %path, error = %e, "repository declaration unavailable, using merge");
            return MergeMethod::default();
        }
    };

    match decode_yaml::<RepositoryDeclaration>(&file) {
        Ok(declaration) => declared_method(&declaration),
        Err(e) => {
            warn!(%repo, path = %path, error = %e, "repository declaration unreadable, using merge");
            MergeMethod::default()
        }
    }
}
