//! Check command - evaluate merge eligibility without merging

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use review_robot::error::Result;
use review_robot::merge::{
    LabelSource, MergeContext, MergeVerdict, evaluate_merge, resolve_merge_method,
};
use review_robot::types::RepoRef;
use std::path::Path;

/// Run the check command
pub async fn run_check(
    config_path: &Path,
    api_url: Option<&str>,
    org: &str,
    repo: &str,
    number: u64,
    trigger: Option<&str>,
) -> Result<()> {
    let ctx = CommandContext::new(config_path, api_url).await?;
    let repo = RepoRef::new(org, repo);
    let pr = repo.pr(number);
    let config = ctx.config.config_for(&repo)?;
    let merge = MergeContext::new(ctx.platform.as_ref(), &ctx.config, config);

    let details = ctx.platform.get_pr_details(&pr).await?;
    let evaluation =
        evaluate_merge(&merge, &pr, &details, LabelSource::for_trigger(trigger)).await;

    println!("{} {}", pr.emphasis(), details.title.muted());
    match &evaluation.verdict {
        MergeVerdict::Eligible => {
            let method = if ctx.config.designated_repo.is(org, &repo.repo) {
                config.configured_merge_method()
            } else {
                resolve_merge_method(
                    ctx.platform.as_ref(),
                    &ctx.config.community,
                    &repo,
                    &evaluation.labels,
                )
                .await
            };
            println!("  {} (method: {method})", "eligible".success());
        }
        MergeVerdict::Blocked { reasons } if reasons.is_empty() => {
            println!("  {}", "blocked".failure());
        }
        MergeVerdict::Blocked { reasons } => {
            println!("  {}", "blocked".failure());
            for reason in reasons {
                println!("  {} {reason}", "-".muted());
            }
        }
        MergeVerdict::Indeterminate { cause } => {
            println!("  {} {}", "indeterminate".warning(), cause.muted());
        }
    }

    Ok(())
}
