//! Eligibility evaluation - gathers remote state and applies the checks
//!
//! Checks run in a fixed order: conflict, operation log, label audit, freeze.
//! The first failing stage decides the verdict.

use crate::audit::{AuditPolicy, validate_labels};
use crate::config::{BotConfig, MergeConfig};
use crate::freeze::find_freeze_window;
use crate::labels::LabelSet;
use crate::merge::plan::{LabelSource, MergeVerdict, check_conflict, check_freeze};
use crate::platform::PlatformService;
use crate::types::{PrRef, PullRequestDetails};
use tracing::{debug, info, warn};

/// Everything an evaluation or merge needs besides the PR itself
#[derive(Clone, Copy)]
pub struct MergeContext<'a> {
    /// Platform collaborator
    pub platform: &'a dyn PlatformService,
    /// Bot-wide configuration
    pub bot: &'a BotConfig,
    /// Policy of the PR's repository
    pub config: &'a MergeConfig,
}

impl<'a> MergeContext<'a> {
    /// Bundle the collaborators of an evaluation
    pub const fn new(
        platform: &'a dyn PlatformService,
        bot: &'a BotConfig,
        config: &'a MergeConfig,
    ) -> Self {
        Self {
            platform,
            bot,
            config,
        }
    }

    /// Audit policy derived from the bot configuration
    pub fn audit_policy(&self) -> AuditPolicy<'a> {
        let bot = self.bot;
        AuditPolicy {
            trusted_actor: &bot.trusted_label_actor,
            cla_label_prefix: &bot.cla_label_prefix,
        }
    }
}

/// Verdict plus the labels it was computed from
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Outcome of the checks
    pub verdict: MergeVerdict,
    /// Labels the evaluation used, in platform order
    pub labels: Vec<String>,
}

/// Labels for an evaluation
///
/// A failed fresh fetch falls back to the snapshot.
pub async fn current_labels(
    platform: &dyn PlatformService,
    pr: &PrRef,
    details: &PullRequestDetails,
    source: LabelSource<'_>,
) -> Vec<String> {
    match source {
        LabelSource::Snapshot => details.labels.clone(),
        LabelSource::Live { trigger } => match platform.get_pr_labels(pr).await {
            Ok(labels) => labels,
            Err(e) => {
                warn!(%pr, trigger, error = %e, "fetching labels failed, using PR snapshot");
                details.labels.clone()
            }
        },
    }
}

/// Evaluate whether `pr` may be merged
pub async fn evaluate_merge(
    ctx: &MergeContext<'_>,
    pr: &PrRef,
    details: &PullRequestDetails,
    source: LabelSource<'_>,
) -> Evaluation {
    let labels = current_labels(ctx.platform, pr, details, source).await;
    let verdict = decide(ctx, pr, details, &labels, source.trigger()).await;
    info!(%pr, trigger = source.trigger().unwrap_or_default(), %verdict, "merge evaluated");
    Evaluation { verdict, labels }
}

async fn decide(
    ctx: &MergeContext<'_>,
    pr: &PrRef,
    details: &PullRequestDetails,
    labels: &[String],
    trigger: Option<&str>,
) -> MergeVerdict {
    if let Some(blocked) = check_conflict(details) {
        debug!(%pr, mergeable = ?details.mergeable, "PR is not mergeable");
        return blocked;
    }

    let events = match ctx.platform.list_operation_logs(pr).await {
        Ok(events) => events,
        Err(e) => {
            warn!(%pr, error = %e, "fetching operation log failed");
            return MergeVerdict::Indeterminate {
                cause: format!("operation log unavailable: {e}"),
            };
        }
    };

    let set: LabelSet = labels.iter().map(String::as_str).collect();
    let reasons = validate_labels(&set, ctx.config, &events, ctx.audit_policy());
    if !reasons.is_empty() {
        debug!(%pr, count = reasons.len(), "label audit failed");
        return MergeVerdict::Blocked { reasons };
    }

    match find_freeze_window(
        ctx.platform,
        &pr.org,
        &details.base_ref,
        &ctx.config.freeze_file,
    )
    .await
    {
        Ok(window) => check_freeze(window.as_ref(), trigger),
        Err(e) => MergeVerdict::Indeterminate {
            cause: format!("freeze state unavailable: {e}"),
        },
    }
}
