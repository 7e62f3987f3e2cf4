//! Merge commit trailer built from review comments
//!
//! `/lgtm` comments become `Reviewed-by`, `/approve` comments `Signed-off-by`
//! and, in the designated repository, `/ack` comments `Acked-by`.

use crate::commands::Command;
use crate::config::{CommunityRepo, DesignatedRepo};
use crate::content::decode_yaml;
use crate::ownership::SigInfo;
use crate::platform::PlatformService;
use crate::types::{PrComment, PrRef, RepoRef};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Kind of review signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    /// `/lgtm`
    Lgtm,
    /// `/approve`
    Approve,
    /// `/ack`
    Ack,
}

impl SignalKind {
    const fn command(self) -> Command {
        match self {
            Self::Lgtm => Command::Lgtm,
            Self::Approve => Command::Approve,
            Self::Ack => Command::Ack,
        }
    }

    const fn trailer(self) -> &'static str {
        match self {
            Self::Lgtm => "Reviewed-by",
            Self::Approve => "Signed-off-by",
            Self::Ack => "Acked-by",
        }
    }
}

/// Identities per signal kind, deduplicated and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSignals {
    /// Logins that commented `/lgtm`
    pub reviewers: BTreeSet<String>,
    /// Logins that commented `/approve`
    pub signers: BTreeSet<String>,
    /// Logins that commented `/ack`
    pub ackers: BTreeSet<String>,
}

impl ReviewSignals {
    /// Whether no signal was found
    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty() && self.signers.is_empty() && self.ackers.is_empty()
    }

    fn kinds(&self) -> [(SignalKind, &BTreeSet<String>); 3] {
        [
            (SignalKind::Lgtm, &self.reviewers),
            (SignalKind::Approve, &self.signers),
            (SignalKind::Ack, &self.ackers),
        ]
    }

    fn set_mut(&mut self, kind: SignalKind) -> &mut BTreeSet<String> {
        match kind {
            SignalKind::Lgtm => &mut self.reviewers,
            SignalKind::Approve => &mut self.signers,
            SignalKind::Ack => &mut self.ackers,
        }
    }
}

/// Collect review signals from the comment history
///
/// The PR author's own comments never count. Ordinary repositories only count
/// unedited comments; the designated repository also accepts edited ones and
/// recognizes `/ack`.
pub fn collect_signals(comments: &[PrComment], author: &str, designated: bool) -> ReviewSignals {
    let mut signals = ReviewSignals::default();
    let kinds: &[SignalKind] = if designated {
        &[SignalKind::Lgtm, SignalKind::Approve, SignalKind::Ack]
    } else {
        &[SignalKind::Lgtm, SignalKind::Approve]
    };

    for comment in comments {
        if comment.author == author || !(designated || comment.is_unedited()) {
            continue;
        }
        for kind in kinds {
            if kind.command().matches(&comment.body) {
                signals.set_mut(*kind).insert(comment.author.clone());
            }
        }
    }

    signals
}

/// Trailer for ordinary repositories, addressing people by login
pub fn render_login_trailer(author: &str, signals: &ReviewSignals) -> String {
    if signals.is_empty() {
        return String::new();
    }

    let mut out = format!("From: @{author}\n");
    for (kind, logins) in signals.kinds() {
        if kind == SignalKind::Ack || logins.is_empty() {
            continue;
        }
        let joined = logins
            .iter()
            .map(|l| format!("@{l}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("{}: {joined}\n", kind.trailer()));
    }
    out
}

/// Map login to `Name <email>` from a sig registry
pub fn identity_map(registry: &SigInfo) -> HashMap<String, String> {
    registry
        .members()
        .map(|m| (m.gitee_id.clone(), format!("{} <{}>", m.name, m.email)))
        .collect()
}

/// Trailer for the designated repository, one line per resolved identity
///
/// Logins missing from the registry are dropped.
pub fn render_identity_trailer(
    signals: &ReviewSignals,
    identities: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    for (kind, logins) in signals.kinds() {
        let resolved: BTreeSet<&String> = logins.iter().filter_map(|l| identities.get(l)).collect();
        for identity in resolved {
            out.push_str(&format!("{}: {identity}\n", kind.trailer()));
        }
    }
    out
}

/// Build the trailer for a PR; any failure yields an empty trailer
pub async fn build_trailer(
    platform: &dyn PlatformService,
    community: &CommunityRepo,
    designated: &DesignatedRepo,
    pr: &PrRef,
    author: &str,
) -> String {
    let comments = match platform.list_pr_comments(pr).await {
        Ok(c) => c,
        Err(e) => {
            warn!(%pr, error = %e, "listing comments failed, merging without trailer");
            return String::new();
        }
    };

    let is_designated = designated.is(&pr.org, &pr.repo);
    let signals = collect_signals(&comments, author, is_designated);
    if signals.is_empty() {
        debug!(%pr, "no review signals");
        return String::new();
    }

    if !is_designated {
        return render_login_trailer(author, &signals);
    }

    let community_repo = RepoRef::new(&community.owner, &community.repo);
    let registry: SigInfo = match platform
        .get_path_content(&community_repo, &designated.registry_path, &community.branch)
        .await
        .and_then(|file| decode_yaml(&file))
    {
        Ok(r) => r,
        Err(e) => {
            warn!(%pr, error = %e, "reading maintainer registry failed, merging without trailer");
            return String::new();
        }
    };

    render_identity_trailer(&signals, &identity_map(&registry))
}
