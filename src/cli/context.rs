//! Shared command context for CLI commands
//!
//! Loads the bot configuration and connects to GitHub.

use review_robot::auth::get_github_auth;
use review_robot::config::BotConfig;
use review_robot::error::Result;
use review_robot::platform::{GitHubService, PlatformService};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Shared context for CLI commands that talk to the platform
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: BotConfig,
    /// Platform service
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Load `config_path` and authenticate against GitHub
    ///
    /// `api_url` points at a GitHub Enterprise API or a test server.
    pub async fn new(config_path: &Path, api_url: Option<&str>) -> Result<Self> {
        let config = BotConfig::load(config_path)?;

        let host = api_url
            .and_then(|u| Url::parse(u).ok())
            .and_then(|u| u.host_str().map(ToString::to_string))
            .filter(|h| h != "api.github.com");
        let auth = get_github_auth(host.as_deref()).await?;
        debug!(source = ?auth.source, host = ?auth.host, "authenticated");

        let platform: Box<dyn PlatformService> = match api_url {
            Some(base) => Box::new(GitHubService::with_api_base(&auth.token, base)?),
            None => Box::new(GitHubService::new(&auth.token, None)?),
        };

        Ok(Self { config, platform })
    }
}
