//! Label names and the per-evaluation label set

use std::collections::BTreeSet;

/// Label marking a PR approved by a maintainer
pub const APPROVED_LABEL: &str = "approved";

/// Canonical lgtm label; per-reviewer labels share this prefix
pub const LGTM_LABEL: &str = "lgtm";

/// Label requesting a squash merge
pub const SQUASH_LABEL: &str = "merge/squash";

/// Label requesting a rebase merge
pub const REBASE_LABEL: &str = "merge/rebase";

/// Label added by `/ack`
pub const ACK_LABEL: &str = "Acked";

/// Prefix of merge strategy labels
pub const MERGE_STRATEGY_PREFIX: &str = "merge/";

/// Prefix of sig labels
pub const SIG_PREFIX: &str = "sig/";

/// The platform limits label names to 20 characters
const LABEL_LEN_LIMIT: usize = 20;

/// Immutable set of label names present on a PR
///
/// Membership is exact and case-sensitive. Iteration is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    names: BTreeSet<String>,
}

impl LabelSet {
    /// Build a set from label names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `label` is present
    pub fn contains(&self, label: &str) -> bool {
        self.names.contains(label)
    }

    /// Iterate label names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Labels counting toward the lgtm quorum
    pub fn lgtm_labels(&self) -> Vec<&str> {
        self.iter().filter(|l| is_lgtm_label(l)).collect()
    }

    /// Labels of `required` that are not present, sorted
    pub fn missing<'a>(&self, required: &'a BTreeSet<String>) -> Vec<&'a str> {
        required
            .iter()
            .filter(|l| !self.contains(l))
            .map(String::as_str)
            .collect()
    }

    /// Labels of `forbidden` that are present, sorted
    pub fn present<'a>(&self, forbidden: &'a BTreeSet<String>) -> Vec<&'a str> {
        forbidden
            .iter()
            .filter(|l| self.contains(l))
            .map(String::as_str)
            .collect()
    }
}

impl<'a> FromIterator<&'a str> for LabelSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Whether a label counts as an lgtm label
pub fn is_lgtm_label(label: &str) -> bool {
    label.starts_with(LGTM_LABEL)
}

/// The lgtm label a reviewer adds
///
/// With a quorum of one everybody shares `lgtm`; otherwise each reviewer
/// gets `lgtm-<login>`, truncated to the platform label length limit.
pub fn lgtm_label_for(login: &str, required: u32) -> String {
    if required <= 1 {
        return LGTM_LABEL.to_string();
    }

    format!("{LGTM_LABEL}-{}", login.to_lowercase())
        .chars()
        .take(LABEL_LEN_LIMIT)
        .collect()
}
