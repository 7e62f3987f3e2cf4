//! Ownership resolver
//!
//! Sig directories carry an ownership declaration that names who may act as
//! maintainer or committer for the directory. A commenter is authorized for a
//! PR only when every sig directory the PR touches declares them.
//!
//! Two declaration shapes exist, told apart by file name:
//! - `OWNERS`: `{maintainers: [login], committers: [login]}`
//! - `sig-info.yaml`: maintainers with name/email, plus per-repository committers

use crate::content::decode_yaml;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{FileContent, PrRef, RepoRef};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, error};

/// File name of the plain ownership declaration
pub const OWNERS_FILE: &str = "OWNERS";

/// File name of the structured sig declaration
pub const SIG_INFO_FILE: &str = "sig-info.yaml";

/// Branch ownership declarations are read from
const OWNERSHIP_BRANCH: &str = "master";

/// Plain ownership list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnersFile {
    /// Maintainer logins
    #[serde(default)]
    pub maintainers: Vec<String>,
    /// Committer logins
    #[serde(default)]
    pub committers: Vec<String>,
}

/// A person listed in `sig-info.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigMember {
    /// Platform login
    #[serde(default)]
    pub gitee_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
}

/// Committers of a group of repositories in `sig-info.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigRepository {
    /// Repositories covered by this entry
    #[serde(default)]
    pub repo: Vec<String>,
    /// Committers of those repositories
    #[serde(default)]
    pub committers: Vec<SigMember>,
}

/// Structured sig declaration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigInfo {
    /// Sig name
    #[serde(default)]
    pub name: String,
    /// Sig maintainers
    #[serde(default)]
    pub maintainers: Vec<SigMember>,
    /// Per-repository committers
    #[serde(default)]
    pub repositories: Vec<SigRepository>,
}

impl SigInfo {
    /// Every listed member: maintainers first, then committers of each repository group
    pub fn members(&self) -> impl Iterator<Item = &SigMember> {
        self.maintainers
            .iter()
            .chain(self.repositories.iter().flat_map(|r| r.committers.iter()))
    }
}

/// An ownership declaration, resolved by file name
#[derive(Debug, Clone)]
pub enum OwnershipDeclaration {
    /// Contents of an `OWNERS` file
    Owners(OwnersFile),
    /// Contents of a `sig-info.yaml` file
    SigInfo(SigInfo),
}

/// Which declaration shape a file name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// `OWNERS`
    Owners,
    /// `sig-info.yaml`
    SigInfo,
}

impl DeclarationKind {
    /// Kind of a declaration file, by its final path component
    pub fn from_path(path: &str) -> Option<Self> {
        match path.rsplit('/').next()? {
            OWNERS_FILE => Some(Self::Owners),
            SIG_INFO_FILE => Some(Self::SigInfo),
            _ => None,
        }
    }
}

impl OwnershipDeclaration {
    /// Decode a fetched declaration of the given kind
    pub fn decode(kind: DeclarationKind, file: &FileContent) -> Result<Self> {
        Ok(match kind {
            DeclarationKind::Owners => Self::Owners(decode_yaml(file)?),
            DeclarationKind::SigInfo => Self::SigInfo(decode_yaml(file)?),
        })
    }

    /// Lower-cased logins this declaration authorizes
    ///
    /// `OWNERS` authorizes maintainers and committers; `sig-info.yaml`
    /// authorizes its maintainers.
    pub fn authorized(&self) -> HashSet<String> {
        match self {
            Self::Owners(owners) => owners
                .maintainers
                .iter()
                .chain(&owners.committers)
                .map(|id| id.to_lowercase())
                .collect(),
            Self::SigInfo(info) => info
                .maintainers
                .iter()
                .map(|m| m.gitee_id.to_lowercase())
                .collect(),
        }
    }

    /// Whether `login` is authorized, compared case-insensitively
    pub fn authorizes(&self, login: &str) -> bool {
        self.authorized().contains(&login.to_lowercase())
    }
}

/// A declaration file found in the directory tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeclarationPath {
    /// Shape of the file
    pub kind: DeclarationKind,
    /// Directory the file governs
    pub dir: String,
    /// Full path of the file
    pub path: String,
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or(".", |i| &path[..i])
}

/// Directories touched by a PR, if every changed file lies in the ownership area
///
/// A file qualifies when it sits under `<sigs_dir>/` and at most two levels
/// deep (`sig/<name>/<file>`). Returns `None` if any file does not qualify or
/// no file changed.
pub fn affected_dirs(changed: &[String], sigs_dir: &str) -> Option<BTreeSet<String>> {
    if changed.is_empty() {
        return None;
    }

    let prefix = format!("{}/", sigs_dir.trim_end_matches('/'));
    let mut dirs = BTreeSet::new();
    for file in changed {
        if !file.starts_with(&prefix) || file.matches('/').count() > 2 {
            return None;
        }
        dirs.insert(parent_dir(file).to_string());
    }
    Some(dirs)
}

/// Ownership declaration files under `sigs_dir`, `OWNERS` files first
pub fn declaration_paths(tree: &[String], sigs_dir: &str) -> Vec<DeclarationPath> {
    let mut found: Vec<DeclarationPath> = tree
        .iter()
        .filter(|p| p.contains(sigs_dir) && p.matches('/').count() == 2)
        .filter_map(|p| {
            DeclarationKind::from_path(p).map(|kind| DeclarationPath {
                kind,
                dir: parent_dir(p).to_string(),
                path: p.clone(),
            })
        })
        .collect();
    found.sort();
    found
}

/// Answers whether a login may act as owner for the directories a PR touches
pub struct OwnershipResolver<'a> {
    platform: &'a dyn PlatformService,
    sigs_dir: &'a str,
}

impl<'a> OwnershipResolver<'a> {
    /// Create a resolver for the ownership area rooted at `sigs_dir`
    pub const fn new(platform: &'a dyn PlatformService, sigs_dir: &'a str) -> Self {
        Self { platform, sigs_dir }
    }

    /// Whether `login` is an owner of every sig directory changed by `pr`
    ///
    /// Fails closed: any fetch or decode failure denies.
    pub async fn authorize(&self, pr: &PrRef, login: &str) -> bool {
        let changed = match self.platform.list_pr_files(pr).await {
            Ok(files) => files,
            Err(e) => {
                error!(%pr, error = %e, "listing changed files failed, denying ownership");
                return false;
            }
        };
        self.authorize_paths(&pr.repo_ref(), login, &changed).await
    }

    /// Whether `login` is an owner of every sig directory in `changed`
    pub async fn authorize_paths(&self, repo: &RepoRef, login: &str, changed: &[String]) -> bool {
        let Some(mut pending) = affected_dirs(changed, self.sigs_dir) else {
            debug!(%repo, login, "changed files outside the ownership area");
            return false;
        };

        let tree = match self.platform.get_directory_tree(repo, OWNERSHIP_BRANCH).await {
            Ok(tree) => tree,
            Err(e) => {
                error!(%repo, error = %e, "fetching directory tree failed, denying ownership");
                return false;
            }
        };

        for decl in declaration_paths(&tree, self.sigs_dir) {
            if !pending.contains(&decl.dir) {
                continue;
            }

            let declaration = match self
                .platform
                .get_path_content(repo, &decl.path, OWNERSHIP_BRANCH)
                .await
                .and_then(|file| OwnershipDeclaration::decode(decl.kind, &file))
            {
                Ok(d) => d,
                Err(e) => {
                    error!(%repo, path = %decl.path, error = %e, "reading ownership declaration failed");
                    return false;
                }
            };

            if !declaration.authorizes(login) {
                debug!(%repo, login, dir = %decl.dir, "not an owner");
                return false;
            }

            pending.remove(&decl.dir);
            if pending.is_empty() {
                return true;
            }
        }

        debug!(%repo, login, remaining = ?pending, "directories without declaration");
        false
    }
}
