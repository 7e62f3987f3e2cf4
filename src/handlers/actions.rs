//! Housekeeping handlers: strategy labels, CLA, ack, and pull request events

use super::messages;
use super::{CommentContext, PrEventContext};
use crate::commands::Command;
use crate::error::Result;
use crate::events::{ACTION_LABELED, ACTION_OPENED, ACTION_SYNCHRONIZE};
use crate::labels::{ACK_LABEL, APPROVED_LABEL, LabelSet, REBASE_LABEL, SQUASH_LABEL};
use crate::merge::{LabelSource, MergeOutcome, try_merge};
use tracing::{debug, info};

/// `/cla cancel`: drop the CLA-ok label
pub(crate) async fn cla_cancel(ctx: &CommentContext<'_>) -> Result<()> {
    if !ctx.says(Command::ClaCancel) || !permitted_silently(ctx).await? {
        return Ok(());
    }
    let label = format!("{}yes", ctx.merge.bot.cla_label_prefix);
    ctx.platform().remove_pr_label(&ctx.pr, &label).await
}

/// `/rebase`
pub(crate) async fn rebase(ctx: &CommentContext<'_>) -> Result<()> {
    add_strategy_label(ctx, Command::Rebase, REBASE_LABEL, SQUASH_LABEL).await
}

/// `/squash`
pub(crate) async fn squash(ctx: &CommentContext<'_>) -> Result<()> {
    add_strategy_label(ctx, Command::Squash, SQUASH_LABEL, REBASE_LABEL).await
}

/// `/rebase cancel`
pub(crate) async fn rebase_cancel(ctx: &CommentContext<'_>) -> Result<()> {
    remove_strategy_label(ctx, Command::RebaseCancel, REBASE_LABEL).await
}

/// `/squash cancel`
pub(crate) async fn squash_cancel(ctx: &CommentContext<'_>) -> Result<()> {
    remove_strategy_label(ctx, Command::SquashCancel, SQUASH_LABEL).await
}

/// `/ack`, recognized in the designated repository only
pub(crate) async fn ack(ctx: &CommentContext<'_>) -> Result<()> {
    if !ctx.says(Command::Ack) {
        return Ok(());
    }
    if !ctx.merge.bot.designated_repo.is(&ctx.pr.org, &ctx.pr.repo) {
        debug!(pr = %ctx.pr, "ignoring /ack outside the designated repository");
        return Ok(());
    }
    if !permitted_silently(ctx).await? {
        return Ok(());
    }
    ctx.platform().add_pr_label(&ctx.pr, ACK_LABEL).await
}

async fn permitted_silently(ctx: &CommentContext<'_>) -> Result<bool> {
    let permitted = ctx.commenter_permitted(false).await?;
    if !permitted {
        debug!(pr = %ctx.pr, commenter = ctx.commenter, "command ignored, no permission");
    }
    Ok(permitted)
}

async fn add_strategy_label(
    ctx: &CommentContext<'_>,
    command: Command,
    label: &str,
    opposite: &str,
) -> Result<()> {
    if !ctx.says(command) || !permitted_silently(ctx).await? {
        return Ok(());
    }

    if ctx.has_label(opposite) {
        let hint = if label == REBASE_LABEL {
            messages::REBASE_CONFLICTS_SQUASH
        } else {
            messages::SQUASH_CONFLICTS_REBASE
        };
        return ctx.comment(hint).await;
    }

    ctx.platform().add_pr_label(&ctx.pr, label).await
}

async fn remove_strategy_label(
    ctx: &CommentContext<'_>,
    command: Command,
    label: &str,
) -> Result<()> {
    if !ctx.says(command) || !permitted_silently(ctx).await? {
        return Ok(());
    }
    ctx.platform().remove_pr_label(&ctx.pr, label).await
}

/// New commits invalidate lgtm and approval labels
pub(crate) async fn clear_labels(ctx: &PrEventContext<'_>) -> Result<()> {
    let pr = &ctx.event.pull_request;
    if ctx.event.action != ACTION_SYNCHRONIZE || !pr.is_open() {
        return Ok(());
    }

    let labels: LabelSet = pr.labels.iter().map(|l| l.name.as_str()).collect();
    let mut stale: Vec<String> = labels
        .lgtm_labels()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    if labels.contains(APPROVED_LABEL) {
        stale.push(APPROVED_LABEL.to_string());
    }
    if stale.is_empty() {
        return Ok(());
    }

    for label in &stale {
        ctx.platform().remove_pr_label(&ctx.pr, label).await?;
    }
    info!(pr = %ctx.pr, removed = ?stale, "cleared review labels after new commits");
    ctx.platform()
        .create_pr_comment(&ctx.pr, &messages::labels_cleared(&stale))
        .await
}

/// New commits re-trigger CI
pub(crate) async fn retest(ctx: &PrEventContext<'_>) -> Result<()> {
    if ctx.event.action != ACTION_SYNCHRONIZE || !ctx.event.pull_request.is_open() {
        return Ok(());
    }
    ctx.platform()
        .create_pr_comment(&ctx.pr, messages::RETEST)
        .await
}

/// Remind authors who open a PR without assignees
pub(crate) async fn check_reviewer(ctx: &PrEventContext<'_>) -> Result<()> {
    let pr = &ctx.event.pull_request;
    if ctx.merge.config.unable_checking_reviewer_for_pr
        || ctx.event.action != ACTION_OPENED
        || !pr.is_open()
        || !pr.assignees.is_empty()
    {
        return Ok(());
    }
    ctx.platform()
        .create_pr_comment(&ctx.pr, &messages::reviewer_not_set(&pr.user.login))
        .await
}

/// A label change may complete the merge conditions
///
/// Nobody commented, so a blocked verdict is not reported.
pub(crate) async fn merge_on_label_update(ctx: &PrEventContext<'_>) -> Result<()> {
    if ctx.event.action != ACTION_LABELED {
        return Ok(());
    }

    let details = ctx.event.pull_request.to_details();
    match try_merge(&ctx.merge, &ctx.pr, &details, LabelSource::Snapshot).await? {
        MergeOutcome::Merged(result) => {
            info!(pr = %ctx.pr, sha = ?result.sha, "PR merged after label update");
        }
        MergeOutcome::NotMerged(verdict) => {
            debug!(pr = %ctx.pr, %verdict, "PR not merged after label update");
        }
    }
    Ok(())
}
