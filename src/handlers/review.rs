//! `/lgtm`, `/approve` and `/check-pr`

use super::CommentContext;
use super::messages;
use crate::commands::Command;
use crate::error::Result;
use crate::labels::{APPROVED_LABEL, LGTM_LABEL, is_lgtm_label, lgtm_label_for};
use crate::merge::{LabelSource, MergeOutcome, not_mergeable_comment, try_merge};
use tracing::{debug, error, info};

/// `/lgtm` and `/lgtm cancel`
pub(crate) async fn lgtm(ctx: &CommentContext<'_>) -> Result<()> {
    if ctx.says(Command::Lgtm) {
        return add_lgtm(ctx).await;
    }
    if ctx.says(Command::LgtmCancel) {
        return remove_lgtm(ctx).await;
    }
    Ok(())
}

async fn add_lgtm(ctx: &CommentContext<'_>) -> Result<()> {
    if ctx.commenter == ctx.author {
        return ctx.comment(messages::LGTM_BY_SELF).await;
    }

    if !ctx.commenter_permitted(true).await? {
        return ctx
            .comment(&messages::lgtm_not_permitted(ctx.commenter))
            .await;
    }

    let label = lgtm_label_for(ctx.commenter, ctx.config().lgtm_counts_required);
    if label != LGTM_LABEL
        && let Err(e) = ensure_repo_label(ctx, &label).await
    {
        error!(pr = %ctx.pr, label = %label, error = %e, "creating repository label failed");
    }

    ctx.platform().add_pr_label(&ctx.pr, &label).await?;
    if let Err(e) = ctx
        .comment(&messages::label_added(&label, ctx.commenter))
        .await
    {
        error!(pr = %ctx.pr, error = %e, "commenting on added label failed");
    }

    merge_on_comment(ctx, false).await
}

async fn remove_lgtm(ctx: &CommentContext<'_>) -> Result<()> {
    if ctx.commenter == ctx.author {
        for label in ctx.labels.iter().filter(|l| is_lgtm_label(l)) {
            ctx.platform().remove_pr_label(&ctx.pr, label).await?;
        }
        return Ok(());
    }

    if !ctx.commenter_permitted(true).await? {
        return ctx
            .comment(&messages::label_not_permitted(
                ctx.commenter,
                "remove",
                LGTM_LABEL,
            ))
            .await;
    }

    let label = lgtm_label_for(ctx.commenter, ctx.config().lgtm_counts_required);
    ctx.platform().remove_pr_label(&ctx.pr, &label).await?;
    ctx.comment(&messages::label_removed(&label, ctx.commenter))
        .await
}

async fn ensure_repo_label(ctx: &CommentContext<'_>, label: &str) -> Result<()> {
    let repo = ctx.pr.repo_ref();
    let existing = ctx.platform().list_repo_labels(&repo).await?;
    if existing.iter().any(|l| l == label) {
        return Ok(());
    }
    debug!(%repo, label, "creating repository label");
    ctx.platform().create_repo_label(&repo, label).await
}

/// `/approve` and `/approve cancel`
pub(crate) async fn approve(ctx: &CommentContext<'_>) -> Result<()> {
    if ctx.says(Command::Approve) {
        if !ctx.commenter_permitted(false).await? {
            return ctx
                .comment(&messages::label_not_permitted(
                    ctx.commenter,
                    "add",
                    APPROVED_LABEL,
                ))
                .await;
        }

        ctx.platform().add_pr_label(&ctx.pr, APPROVED_LABEL).await?;
        if let Err(e) = ctx
            .comment(&messages::label_added(APPROVED_LABEL, ctx.commenter))
            .await
        {
            error!(pr = %ctx.pr, error = %e, "commenting on added label failed");
        }

        return merge_on_comment(ctx, false).await;
    }

    if ctx.says(Command::ApproveCancel) {
        if !ctx.commenter_permitted(false).await? {
            return ctx
                .comment(&messages::label_not_permitted(
                    ctx.commenter,
                    "remove",
                    APPROVED_LABEL,
                ))
                .await;
        }

        ctx.platform()
            .remove_pr_label(&ctx.pr, APPROVED_LABEL)
            .await?;
        return ctx
            .comment(&messages::label_removed(APPROVED_LABEL, ctx.commenter))
            .await;
    }

    Ok(())
}

/// `/check-pr`
pub(crate) async fn check_pr(ctx: &CommentContext<'_>) -> Result<()> {
    if !ctx.says(Command::CheckPr) {
        return Ok(());
    }
    merge_on_comment(ctx, true).await
}

/// Evaluate on behalf of the commenter and merge when eligible
///
/// With `explain`, a blocked verdict with reasons is answered with a comment.
async fn merge_on_comment(ctx: &CommentContext<'_>, explain: bool) -> Result<()> {
    let details = ctx.platform().get_pr_details(&ctx.pr).await?;
    let source = LabelSource::Live {
        trigger: ctx.commenter,
    };

    match try_merge(&ctx.merge, &ctx.pr, &details, source).await? {
        MergeOutcome::Merged(result) => {
            info!(pr = %ctx.pr, sha = ?result.sha, "PR merged");
            Ok(())
        }
        MergeOutcome::NotMerged(verdict) => {
            let reasons = verdict.reasons();
            if explain && !reasons.is_empty() {
                return ctx
                    .comment(&not_mergeable_comment(ctx.commenter, reasons))
                    .await;
            }
            debug!(pr = %ctx.pr, %verdict, "PR not merged");
            Ok(())
        }
    }
}
