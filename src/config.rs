//! Bot configuration
//!
//! The configuration file is YAML. Global settings sit at the top level;
//! `config_items` holds per-repository merge policy, selected by
//! [`BotConfig::config_for`].

use crate::error::{Error, Result};
use crate::labels::APPROVED_LABEL;
use crate::types::{MergeMethod, RepoRef};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Identity whose `labeled` events count as legitimate
    #[serde(default = "default_trusted_label_actor")]
    pub trusted_label_actor: String,
    /// Namespace of CLA labels
    #[serde(default = "default_cla_label_prefix")]
    pub cla_label_prefix: String,
    /// Repository holding sig declarations
    #[serde(default)]
    pub community: CommunityRepo,
    /// Repository that gets the detailed merge commit body
    #[serde(default)]
    pub designated_repo: DesignatedRepo,
    /// Per-repository policy
    #[serde(default)]
    pub config_items: Vec<MergeConfig>,
}

fn default_trusted_label_actor() -> String {
    "openEuler-bot".to_string()
}

fn default_cla_label_prefix() -> String {
    "openeuler-cla/".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            trusted_label_actor: default_trusted_label_actor(),
            cla_label_prefix: default_cla_label_prefix(),
            community: CommunityRepo::default(),
            designated_repo: DesignatedRepo::default(),
            config_items: Vec::new(),
        }
    }
}

/// Location of the community repository
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommunityRepo {
    /// Owning organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch to read declarations from
    pub branch: String,
}

impl Default for CommunityRepo {
    fn default() -> Self {
        Self {
            owner: "openeuler".to_string(),
            repo: "community".to_string(),
            branch: "master".to_string(),
        }
    }
}

/// The repository whose merges carry name/email trailers and a linked body
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DesignatedRepo {
    /// Organization
    pub org: String,
    /// Repository name
    pub repo: String,
    /// Login of the bot that opens synchronization PRs
    pub sync_bot: String,
    /// Path of the maintainer/committer registry in the community repo
    pub registry_path: String,
}

impl Default for DesignatedRepo {
    fn default() -> Self {
        Self {
            org: "openeuler".to_string(),
            repo: "kernel".to_string(),
            sync_bot: "openeuler-sync-bot".to_string(),
            registry_path: "sig/Kernel/sig-info.yaml".to_string(),
        }
    }
}

impl DesignatedRepo {
    /// Whether `org/repo` is the designated repository
    pub fn is(&self, org: &str, repo: &str) -> bool {
        self.org == org && self.repo == repo
    }
}

/// A freeze declaration file to consult
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FreezeFile {
    /// Owning organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch
    pub branch: String,
    /// Path of the file
    pub path: String,
}

impl std::fmt::Display for FreezeFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}:{}", self.owner, self.repo, self.branch, self.path)
    }
}

/// Merge policy for a set of repositories
#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Organizations (`org`) or repositories (`org/repo`) this item applies to
    #[serde(default)]
    pub repos: Vec<String>,
    /// Repositories (`org/repo`) excluded from an org-wide item
    #[serde(default)]
    pub excluded_repos: Vec<String>,
    /// Labels required in addition to `approved`
    #[serde(default)]
    pub labels_for_merge: Vec<String>,
    /// Labels that must be absent
    #[serde(default)]
    pub missing_labels_for_merge: Vec<String>,
    /// Number of lgtm labels required
    #[serde(default = "default_lgtm_counts_required")]
    pub lgtm_counts_required: u32,
    /// Let sig owners run `/lgtm` without repository write access
    #[serde(default)]
    pub check_permission_based_on_sig_owners: bool,
    /// Directory holding sig ownership declarations
    #[serde(default = "default_sigs_dir")]
    pub sigs_dir: String,
    /// Freeze declaration files, consulted in order
    #[serde(default)]
    pub freeze_file: Vec<FreezeFile>,
    /// Merge method for the designated repository
    #[serde(default = "default_merge_method")]
    pub merge_method: String,
    /// Skip reminding authors to set a reviewer
    #[serde(default)]
    pub unable_checking_reviewer_for_pr: bool,
}

const fn default_lgtm_counts_required() -> u32 {
    1
}

fn default_sigs_dir() -> String {
    "sig".to_string()
}

fn default_merge_method() -> String {
    "merge".to_string()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            excluded_repos: Vec::new(),
            labels_for_merge: Vec::new(),
            missing_labels_for_merge: Vec::new(),
            lgtm_counts_required: default_lgtm_counts_required(),
            check_permission_based_on_sig_owners: false,
            sigs_dir: default_sigs_dir(),
            freeze_file: Vec::new(),
            merge_method: default_merge_method(),
            unable_checking_reviewer_for_pr: false,
        }
    }
}

impl MergeConfig {
    /// Labels that must be present: `approved` plus `labels_for_merge`
    ///
    /// The canonical `lgtm` label is added by the audit when the quorum is one.
    pub fn required_labels(&self) -> BTreeSet<String> {
        std::iter::once(APPROVED_LABEL.to_string())
            .chain(self.labels_for_merge.iter().cloned())
            .collect()
    }

    /// Labels that must be absent
    pub fn forbidden_labels(&self) -> BTreeSet<String> {
        self.missing_labels_for_merge.iter().cloned().collect()
    }

    /// Configured merge method, falling back to `merge`
    pub fn configured_merge_method(&self) -> MergeMethod {
        MergeMethod::from_config(&self.merge_method).unwrap_or_default()
    }

    fn applies_to(&self, org: &str, full_name: &str) -> Option<bool> {
        if self.excluded_repos.iter().any(|r| r == full_name) {
            return None;
        }
        if self.repos.iter().any(|r| r == full_name) {
            return Some(true);
        }
        self.repos.iter().any(|r| r == org).then_some(false)
    }

    fn validate(&mut self) -> Result<()> {
        if self.lgtm_counts_required == 0 {
            self.lgtm_counts_required = 1;
        }
        if MergeMethod::from_config(&self.merge_method).is_none() {
            return Err(Error::Config(format!(
                "unsupported merge_method '{}' for {:?}, expected merge, squash or rebase",
                self.merge_method, self.repos
            )));
        }
        if self.check_permission_based_on_sig_owners && self.sigs_dir.trim().is_empty() {
            return Err(Error::Config(format!(
                "sigs_dir must be set when check_permission_based_on_sig_owners is enabled for {:?}",
                self.repos
            )));
        }
        if self.repos.is_empty() {
            return Err(Error::Config("config item without repos".to_string()));
        }
        Ok(())
    }
}

impl BotConfig {
    /// Parse and validate configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    fn validate(&mut self) -> Result<()> {
        if self.trusted_label_actor.trim().is_empty() {
            return Err(Error::Config("trusted_label_actor must not be empty".to_string()));
        }
        for item in &mut self.config_items {
            item.validate()?;
        }
        Ok(())
    }

    /// Policy for a repository
    ///
    /// An item naming `org/repo` wins over one naming only `org`.
    pub fn config_for(&self, repo: &RepoRef) -> Result<&MergeConfig> {
        let full_name = repo.to_string();
        let mut org_match = None;

        for item in &self.config_items {
            match item.applies_to(&repo.org, &full_name) {
                Some(true) => return Ok(item),
                Some(false) if org_match.is_none() => org_match = Some(item),
                _ => {}
            }
        }

        org_match.ok_or_else(|| Error::Config(format!("no config for this repo: {full_name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r"
trusted_label_actor: robot
config_items:
  - repos: [openeuler]
    excluded_repos: [openeuler/infra]
    labels_for_merge: [ci_successful]
    lgtm_counts_required: 2
  - repos: [openeuler/kernel]
    merge_method: rebase
    freeze_file:
      - owner: openeuler
        repo: release-management
        branch: master
        path: freeze.yaml
";

    #[test]
    fn test_repo_specific_item_wins() {
        let config = BotConfig::from_yaml(SAMPLE).unwrap();
        let item = config.config_for(&RepoRef::new("openeuler", "kernel")).unwrap();
        assert_eq!(item.configured_merge_method(), MergeMethod::Rebase);
        assert_eq!(item.freeze_file.len(), 1);
        assert_eq!(item.lgtm_counts_required, 1);
    }

    #[test]
    fn test_org_item_applies_to_other_repos() {
        let config = BotConfig::from_yaml(SAMPLE).unwrap();
        let item = config.config_for(&RepoRef::new("openeuler", "docs")).unwrap();
        assert_eq!(item.lgtm_counts_required, 2);
        assert!(item.required_labels().contains("ci_successful"));
        assert!(item.required_labels().contains(APPROVED_LABEL));
    }

    #[test]
    fn test_excluded_repo_has_no_config() {
        let config = BotConfig::from_yaml(SAMPLE).unwrap();
        let result = config.config_for(&RepoRef::new("openeuler", "infra"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = BotConfig::from_yaml("config_items:\n  - repos: [src-openeuler]\n").unwrap();
        assert_eq!(config.trusted_label_actor, "openEuler-bot");
        assert_eq!(config.cla_label_prefix, "openeuler-cla/");
        assert_eq!(config.community, CommunityRepo::default());
        assert!(config.designated_repo.is("openeuler", "kernel"));
        let item = &config.config_items[0];
        assert_eq!(item.sigs_dir, "sig");
        assert_eq!(item.configured_merge_method(), MergeMethod::Merge);
    }

    #[test]
    fn test_zero_lgtm_count_normalized_to_one() {
        let config =
            BotConfig::from_yaml("config_items:\n  - repos: [a]\n    lgtm_counts_required: 0\n")
                .unwrap();
        assert_eq!(config.config_items[0].lgtm_counts_required, 1);
    }

    #[test]
    fn test_invalid_merge_method_rejected() {
        let result =
            BotConfig::from_yaml("config_items:\n  - repos: [a]\n    merge_method: ff-only\n");
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("ff-only")),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.trusted_label_actor, "robot");
        assert_eq!(config.config_items.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = BotConfig::load(Path::new("/nonexistent/review-robot.yaml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
