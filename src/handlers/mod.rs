//! Event handlers
//!
//! Each inbound event runs a fixed list of independent handlers. All of them
//! run even when an earlier one fails; failures are folded into one
//! [`Error::Handlers`](crate::error::Error::Handlers).

mod actions;
pub mod messages;
mod review;

use crate::commands::Command;
use crate::config::{BotConfig, MergeConfig};
use crate::error::{ErrorCollector, Result};
use crate::events::{IssueCommentEvent, PullRequestEvent, WebhookEvent};
use crate::merge::MergeContext;
use crate::permission::has_permission;
use crate::platform::PlatformService;
use crate::types::PrRef;
use tracing::{debug, info};

/// Dispatches webhook events to the handler set
pub struct ReviewRobot<'a> {
    platform: &'a dyn PlatformService,
    config: &'a BotConfig,
}

impl<'a> ReviewRobot<'a> {
    /// Create a robot working against `platform`
    pub const fn new(platform: &'a dyn PlatformService, config: &'a BotConfig) -> Self {
        Self { platform, config }
    }

    /// Handle any supported event
    pub async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        match event {
            WebhookEvent::PullRequest(e) => self.handle_pr_event(e).await,
            WebhookEvent::IssueComment(e) => self.handle_comment_event(e).await,
        }
    }

    /// Run the pull request handlers: clear labels, retest, check reviewer,
    /// merge on label update
    pub async fn handle_pr_event(&self, event: &PullRequestEvent) -> Result<()> {
        let pr = event.pr_ref();
        let config = self.config.config_for(&pr.repo_ref())?;
        let ctx = PrEventContext {
            merge: MergeContext::new(self.platform, self.config, config),
            pr,
            event,
        };
        info!(pr = %ctx.pr, action = %event.action, "handling pull request event");

        let mut errors = ErrorCollector::new();
        errors.record(actions::clear_labels(&ctx).await);
        errors.record(actions::retest(&ctx).await);
        errors.record(actions::check_reviewer(&ctx).await);
        errors.record(actions::merge_on_label_update(&ctx).await);
        errors.finish()
    }

    /// Run the comment command handlers
    ///
    /// Comments that are not new comments on an open PR are ignored.
    pub async fn handle_comment_event(&self, event: &IssueCommentEvent) -> Result<()> {
        let pr = event.pr_ref();
        let config = self.config.config_for(&pr.repo_ref())?;

        if !event.is_new_comment_on_open_pr() {
            debug!(%pr, action = %event.action, "ignoring comment event");
            return Ok(());
        }

        let ctx = CommentContext {
            merge: MergeContext::new(self.platform, self.config, config),
            pr,
            commenter: &event.comment.user.login,
            author: &event.issue.user.login,
            body: &event.comment.body,
            labels: event.label_names(),
        };
        info!(pr = %ctx.pr, commenter = ctx.commenter, "handling comment event");

        let mut errors = ErrorCollector::new();
        errors.record(review::lgtm(&ctx).await);
        errors.record(review::approve(&ctx).await);
        errors.record(review::check_pr(&ctx).await);
        errors.record(actions::cla_cancel(&ctx).await);
        errors.record(actions::rebase(&ctx).await);
        errors.record(actions::squash(&ctx).await);
        errors.record(actions::rebase_cancel(&ctx).await);
        errors.record(actions::squash_cancel(&ctx).await);
        errors.record(actions::ack(&ctx).await);
        errors.finish()
    }
}

/// State shared by the pull request handlers
pub(crate) struct PrEventContext<'a> {
    pub merge: MergeContext<'a>,
    pub pr: PrRef,
    pub event: &'a PullRequestEvent,
}

impl PrEventContext<'_> {
    fn platform(&self) -> &dyn PlatformService {
        self.merge.platform
    }
}

/// State shared by the comment handlers
pub(crate) struct CommentContext<'a> {
    pub merge: MergeContext<'a>,
    pub pr: PrRef,
    pub commenter: &'a str,
    pub author: &'a str,
    pub body: &'a str,
    /// Labels of the PR when the comment was made
    pub labels: Vec<String>,
}

impl CommentContext<'_> {
    fn platform(&self) -> &dyn PlatformService {
        self.merge.platform
    }

    fn config(&self) -> &MergeConfig {
        self.merge.config
    }

    fn says(&self, command: Command) -> bool {
        command.matches(self.body)
    }

    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Whether the commenter may run maintainer commands
    ///
    /// `with_sig_owners` lets sig owners qualify when the repository allows it.
    async fn commenter_permitted(&self, with_sig_owners: bool) -> Result<bool> {
        let config = self.config();
        let sigs_dir = (with_sig_owners && config.check_permission_based_on_sig_owners)
            .then_some(config.sigs_dir.as_str());
        has_permission(self.platform(), &self.pr, self.commenter, sigs_dir).await
    }

    async fn comment(&self, body: &str) -> Result<()> {
        self.platform().create_pr_comment(&self.pr, body).await
    }
}
