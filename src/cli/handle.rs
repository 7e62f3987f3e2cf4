//! Handle command - run the handler set for one webhook delivery

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use review_robot::error::{Error, Result};
use review_robot::events::WebhookEvent;
use review_robot::handlers::ReviewRobot;
use std::path::Path;
use tracing::info;

fn read_payload(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|e| Error::Event(format!("failed to read payload from stdin: {e}")));
    }
    std::fs::read_to_string(path)
        .map_err(|e| Error::Event(format!("failed to read {}: {e}", path.display())))
}

/// Run the handle command
///
/// The payload is decoded before any network access, so a malformed delivery
/// fails without credentials.
pub async fn run_handle(
    config_path: &Path,
    api_url: Option<&str>,
    event: &str,
    payload_path: &Path,
) -> Result<()> {
    let payload = read_payload(payload_path)?;
    let event = WebhookEvent::parse(event, &payload)?;
    info!(repo = %event.repo_ref(), "decoded webhook delivery");

    let ctx = CommandContext::new(config_path, api_url).await?;
    let robot = ReviewRobot::new(ctx.platform.as_ref(), &ctx.config);
    robot.handle(&event).await?;

    println!("{} {}", "✓".success(), "handled".muted());
    Ok(())
}
