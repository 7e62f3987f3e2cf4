//! Merge execution - effectful operations
//!
//! Builds the commit message for an eligible PR and issues the merge call.

use crate::error::{Error, Result};
use crate::merge::body::SyncReference;
use crate::merge::descriptor::build_trailer;
use crate::merge::evaluate::{Evaluation, MergeContext, evaluate_merge};
use crate::merge::method::resolve_merge_method;
use crate::merge::plan::{LabelSource, MergeVerdict};
use crate::types::{MergeMethod, MergeResult, PrRef, PullRequestDetails};
use tracing::{info, warn};

/// Result of a merge attempt
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// The PR was merged
    Merged(MergeResult),
    /// The PR was not eligible
    NotMerged(MergeVerdict),
}

impl MergeOutcome {
    /// Whether the PR was merged
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Commit message for ordinary repositories
pub fn ordinary_message(trailer: &str) -> String {
    format!("\n{trailer}")
}

/// Commit message for the designated repository
///
/// A non-empty trailer is set off by a blank line so git reads it as the
/// trailer block.
pub fn designated_message(author: &str, body: &str, html_url: &str, trailer: &str) -> String {
    let mut message =
        format!("\nMerge Pull Request from: @{author}\n\n{body}\n\nLink:{html_url}\n");
    if !trailer.is_empty() {
        message.push('\n');
        message.push_str(trailer);
    }
    message
}

/// Body of a designated-repository PR, following the sync template when the
/// sync bot authored it
///
/// Falls back to the raw body when the template does not parse or the
/// related PR cannot be read.
pub async fn designated_body(ctx: &MergeContext<'_>, details: &PullRequestDetails) -> String {
    let raw = details.body.clone().unwrap_or_default();
    if details.author != ctx.bot.designated_repo.sync_bot {
        return raw;
    }

    let Some(reference) = SyncReference::parse(&raw) else {
        warn!(pr_number = details.number, "sync PR body does not follow the template");
        return raw;
    };

    match ctx.platform.get_pr_details(&reference.related).await {
        Ok(related) => reference.render(related.body.as_deref().unwrap_or_default()),
        Err(e) => {
            warn!(related = %reference.related, error = %e, "fetching related PR failed");
            raw
        }
    }
}

/// Merge an eligible PR
///
/// The designated repository merges with the configured method; other
/// repositories resolve it from `labels`.
pub async fn execute_merge(
    ctx: &MergeContext<'_>,
    pr: &PrRef,
    details: &PullRequestDetails,
    labels: &[String],
) -> Result<MergeResult> {
    let designated = &ctx.bot.designated_repo;
    let trailer = build_trailer(
        ctx.platform,
        &ctx.bot.community,
        designated,
        pr,
        &details.author,
    )
    .await;

    let (message, method) = if designated.is(&pr.org, &pr.repo) {
        let body = designated_body(ctx, details).await;
        (
            designated_message(&details.author, &body, &details.html_url, &trailer),
            ctx.config.configured_merge_method(),
        )
    } else {
        let method: MergeMethod =
            resolve_merge_method(ctx.platform, &ctx.bot.community, &pr.repo_ref(), labels).await;
        (ordinary_message(&trailer), method)
    };

    info!(%pr, %method, "merging PR");
    let result = ctx.platform.merge_pr(pr, &message, &method).await?;
    if !result.merged {
        return Err(Error::Platform(format!(
            "merge of {pr} was not performed: {}",
            result.message.as_deref().unwrap_or("no reason given")
        )));
    }

    Ok(result)
}

/// Evaluate `pr` and merge it when eligible
pub async fn try_merge(
    ctx: &MergeContext<'_>,
    pr: &PrRef,
    details: &PullRequestDetails,
    source: LabelSource<'_>,
) -> Result<MergeOutcome> {
    let Evaluation { verdict, labels } = evaluate_merge(ctx, pr, details, source).await;
    if !verdict.is_eligible() {
        return Ok(MergeOutcome::NotMerged(verdict));
    }

    execute_merge(ctx, pr, details, &labels)
        .await
        .map(MergeOutcome::Merged)
}
