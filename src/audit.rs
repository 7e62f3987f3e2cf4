//! Label audit
//!
//! Checks the labels on a PR against the merge policy and against the
//! operation log, so that labels added by hand instead of through the robot
//! do not count. Every check runs; reasons accumulate.

use crate::config::MergeConfig;
use crate::labels::{LGTM_LABEL, LabelSet, is_lgtm_label};
use crate::types::{LabelEvent, LabelEventKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Who may add labels and how CLA labels are recognized
#[derive(Debug, Clone, Copy)]
pub struct AuditPolicy<'a> {
    /// Identity whose `labeled` events are legitimate
    pub trusted_actor: &'a str,
    /// Namespace of CLA labels
    pub cla_label_prefix: &'a str,
}

/// Latest `labeled` event of a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLog {
    /// Label name
    pub label: String,
    /// Actor login
    pub who: String,
    /// Event time
    pub at: DateTime<Utc>,
}

/// Why a present label is not acceptable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelIssue {
    /// No `labeled` event with an actor exists for the label
    MissingLog {
        /// Label name
        label: String,
    },
    /// The latest `labeled` event was made by someone other than the robot
    AddedByUser {
        /// Label name
        label: String,
        /// Actor login
        who: String,
        /// Whether the label is in the CLA namespace
        cla: bool,
    },
}

impl LabelIssue {
    /// Label the issue is about
    pub fn label(&self) -> &str {
        match self {
            Self::MissingLog { label } | Self::AddedByUser { label, .. } => label,
        }
    }

    /// Remediation text shown to the user
    pub fn message(&self) -> String {
        match self {
            Self::MissingLog { .. } => "The corresponding operation log is missing. you should \
                 delete the label and add it again by correct way"
                .to_string(),
            Self::AddedByUser {
                label,
                who,
                cla: true,
            } => format!(
                "{who} You can't add {label} by yourself, please remove it and use /check-cla to add it"
            ),
            Self::AddedByUser { label, who, .. } => format!(
                "{who} You can't add {label} by yourself, please contact the maintainers"
            ),
        }
    }
}

/// Reason emitted when the lgtm quorum is not met
pub fn quorum_reason(required: u32, actual: usize) -> String {
    format!("PR needs {required} lgtm labels and now gets {actual}")
}

/// Most recent `labeled` event for `label`
///
/// Events without an actor are ignored. On equal timestamps the earlier
/// entry in the log wins.
pub fn latest_label_log(events: &[LabelEvent], label: &str) -> Option<LabelLog> {
    let mut latest: Option<(&LabelEvent, &str)> = None;

    for event in events {
        if event.kind != LabelEventKind::Labeled || event.label != label {
            continue;
        }
        let Some(who) = event.actor.as_deref().filter(|a| !a.is_empty()) else {
            continue;
        };
        if latest.is_none_or(|(current, _)| event.created_at > current.created_at) {
            latest = Some((event, who));
        }
    }

    latest.map(|(event, who)| LabelLog {
        label: label.to_string(),
        who: who.to_string(),
        at: event.created_at,
    })
}

/// Labels that were not added through the robot
///
/// Only labels that are required or lgtm-prefixed are checked. Result is
/// sorted by label.
pub fn check_labels_legal(
    labels: &LabelSet,
    required: &BTreeSet<String>,
    events: &[LabelEvent],
    policy: AuditPolicy<'_>,
) -> Vec<LabelIssue> {
    labels
        .iter()
        .filter(|l| required.contains(*l) || is_lgtm_label(l))
        .filter_map(|label| match latest_label_log(events, label) {
            None => Some(LabelIssue::MissingLog {
                label: label.to_string(),
            }),
            Some(log) if log.who != policy.trusted_actor => Some(LabelIssue::AddedByUser {
                cla: label.starts_with(policy.cla_label_prefix),
                label: log.label,
                who: log.who,
            }),
            Some(_) => None,
        })
        .collect()
}

/// Render legality issues as a single reason
pub fn render_label_issues(issues: &[LabelIssue]) -> Option<String> {
    if issues.is_empty() {
        return None;
    }

    let noun = if issues.len() > 1 {
        "labels are"
    } else {
        "label is"
    };
    let entries: Vec<String> = issues
        .iter()
        .map(|i| format!("{}: {}", i.label(), i.message()))
        .collect();

    Some(format!(
        "**The following {noun} not ready**.\n\n{}",
        entries.join("\n\n")
    ))
}

/// Audit the labels of a PR; an empty result means the labels allow merging
pub fn validate_labels(
    labels: &LabelSet,
    config: &MergeConfig,
    events: &[LabelEvent],
    policy: AuditPolicy<'_>,
) -> Vec<String> {
    let mut reasons = Vec::new();
    let mut required = config.required_labels();

    let quorum = config.lgtm_counts_required;
    if quorum <= 1 {
        required.insert(LGTM_LABEL.to_string());
    } else {
        let actual = labels.lgtm_labels().len();
        if actual < quorum as usize {
            reasons.push(quorum_reason(quorum, actual));
        }
    }

    let issues = check_labels_legal(labels, &required, events, policy);
    if let Some(reason) = render_label_issues(&issues) {
        reasons.push(reason);
    }

    let missing = labels.missing(&required);
    if !missing.is_empty() {
        reasons.push(format!(
            "PR does not have these labels: {}",
            missing.join(", ")
        ));
    }

    let forbidden = config.forbidden_labels();
    let present = labels.present(&forbidden);
    if !present.is_empty() {
        reasons.push(format!(
            "PR should remove these labels: {}",
            present.join(", ")
        ));
    }

    reasons
}
