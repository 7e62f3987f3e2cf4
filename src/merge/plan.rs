//! Merge verdicts - pure decision functions
//!
//! Everything here works on data that was already fetched, so the decision
//! rules can be unit tested without a platform.

use crate::freeze::FreezeWindow;
use crate::types::PullRequestDetails;

/// Reason given when the platform reports the PR as not cleanly mergeable
pub const CONFLICT_REASON: &str = "PR conflicts to the target branch.";

/// Outcome of an eligibility evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeVerdict {
    /// Every check passed
    Eligible,
    /// A policy check failed
    ///
    /// `reasons` is empty when nobody can be addressed, as for a frozen branch
    /// evaluated without a triggering commenter.
    Blocked {
        /// Human-readable reasons, in check order
        reasons: Vec<String>,
    },
    /// Remote state could not be read; try again later
    Indeterminate {
        /// What failed
        cause: String,
    },
}

impl MergeVerdict {
    /// Block with the given reasons
    pub fn blocked<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Blocked {
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the PR may be merged
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Reasons for a blocked verdict; empty otherwise
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Blocked { reasons } => reasons,
            _ => &[],
        }
    }

    /// Whether the verdict blocks without anything to tell the user
    pub fn is_silent(&self) -> bool {
        match self {
            Self::Blocked { reasons } => reasons.is_empty(),
            Self::Indeterminate { .. } => true,
            Self::Eligible => false,
        }
    }
}

impl std::fmt::Display for MergeVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligible => write!(f, "eligible"),
            Self::Blocked { reasons } if reasons.is_empty() => write!(f, "blocked"),
            Self::Blocked { reasons } => write!(f, "blocked: {}", reasons.join("; ")),
            Self::Indeterminate { cause } => write!(f, "indeterminate: {cause}"),
        }
    }
}

/// Where the label set of an evaluation comes from
///
/// A live commenter triggers a fresh label fetch, since the comment handler
/// may have just changed labels. A system-triggered evaluation (a label
/// update event) trusts the PR snapshot carried by the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource<'a> {
    /// Fetch labels again on behalf of `trigger`
    Live {
        /// Login of the commenter
        trigger: &'a str,
    },
    /// Use the labels of the PR snapshot
    Snapshot,
}

impl<'a> LabelSource<'a> {
    /// Source for an optional trigger; an empty login counts as no trigger
    pub fn for_trigger(trigger: Option<&'a str>) -> Self {
        match trigger {
            Some(login) if !login.is_empty() => Self::Live { trigger: login },
            _ => Self::Snapshot,
        }
    }

    /// Login that triggered the evaluation, if any
    pub const fn trigger(&self) -> Option<&'a str> {
        match *self {
            Self::Live { trigger } => Some(trigger),
            Self::Snapshot => None,
        }
    }
}

/// Conflict check on the PR snapshot
///
/// An unknown mergeable state counts as a conflict.
pub fn check_conflict(details: &PullRequestDetails) -> Option<MergeVerdict> {
    (!details.is_mergeable()).then(|| MergeVerdict::blocked([CONFLICT_REASON]))
}

/// Reason given to a commenter who cannot override a freeze
pub fn frozen_reason(window: &FreezeWindow) -> String {
    format!(
        "The target branch of PR has been frozen and it can be merge only by branch owners: {}",
        window.owners.join(", ")
    )
}

/// Freeze decision given the window covering the target branch, if any
pub fn check_freeze(window: Option<&FreezeWindow>, trigger: Option<&str>) -> MergeVerdict {
    let Some(window) = window.filter(|w| w.is_frozen()) else {
        return MergeVerdict::Eligible;
    };

    match trigger.filter(|t| !t.is_empty()) {
        None => MergeVerdict::blocked(Vec::<String>::new()),
        Some(login) if window.is_owner(login) => MergeVerdict::Eligible,
        Some(_) => MergeVerdict::blocked([frozen_reason(window)]),
    }
}

/// Comment telling a commenter why the PR cannot be merged
pub fn not_mergeable_comment(login: &str, reasons: &[String]) -> String {
    format!(
        "@{login} , this pr is not mergeable and the reasons are below:\n{}",
        reasons.join("\n")
    )
}
