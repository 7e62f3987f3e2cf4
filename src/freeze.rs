//! Freeze window evaluator
//!
//! Freeze declaration files list branches that are frozen for an org, and who
//! may still merge into them. A matching entry means the branch is frozen;
//! there is no separate active flag.

use crate::config::FreezeFile;
use crate::content::decode_yaml;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::RepoRef;
use glob::Pattern;
use serde::Deserialize;
use tracing::{debug, error};

/// Decoded freeze declaration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreezeDeclaration {
    /// Declared windows
    #[serde(default)]
    pub freeze: Vec<FreezeWindow>,
}

/// A frozen branch pattern in an org
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FreezeWindow {
    /// Organization the window applies to
    pub org: String,
    /// Branch name or glob pattern
    pub branch: String,
    /// Logins allowed to merge despite the freeze
    #[serde(default)]
    pub owners: Vec<String>,
}

impl FreezeWindow {
    /// Whether this window covers `branch` in `org`
    pub fn matches(&self, org: &str, branch: &str) -> bool {
        if self.org != org {
            return false;
        }
        Pattern::new(&self.branch).map_or_else(|_| self.branch == branch, |p| p.matches(branch))
    }

    /// Whether the window is in force
    ///
    /// Presence of a matching declaration is the signal, so this is always true.
    pub const fn is_frozen(&self) -> bool {
        true
    }

    /// Whether `login` may override the freeze (exact match)
    ///
    /// An empty login, as used by system-triggered evaluations, never matches.
    pub fn is_owner(&self, login: &str) -> bool {
        !login.is_empty() && self.owners.iter().any(|o| o == login)
    }
}

impl FreezeDeclaration {
    /// First window covering `branch` in `org`
    pub fn find(&self, org: &str, branch: &str) -> Option<&FreezeWindow> {
        self.freeze.iter().find(|w| w.matches(org, branch))
    }
}

/// Find the freeze window covering `branch` in `org`
///
/// Sources are read in order and the first match wins. Any fetch or decode
/// error aborts: callers must treat it as "cannot tell", not "not frozen".
pub async fn find_freeze_window(
    platform: &dyn PlatformService,
    org: &str,
    branch: &str,
    sources: &[FreezeFile],
) -> Result<Option<FreezeWindow>> {
    for source in sources {
        let repo = RepoRef::new(&source.owner, &source.repo);
        let declaration: FreezeDeclaration = platform
            .get_path_content(&repo, &source.path, &source.branch)
            .await
            .and_then(|file| decode_yaml(&file))
            .inspect_err(|e| error!(source = %source, error = %e, "reading freeze file failed"))?;

        if let Some(window) = declaration.find(org, branch) {
            debug!(source = %source, org, branch, "branch is frozen");
            return Ok(Some(window.clone()));
        }
    }

    Ok(None)
}
