//! Parsing of synchronization PR bodies
//!
//! PRs opened by the sync bot in the designated repository follow this
//! template (format v1):
//!
//! ```text
//! <header line>
//! ### 1. <origin PR reference>
//! https://<host>/<org>/<repo>/pulls/<number>
//! ...
//! ```
//!
//! The merge commit then embeds the description of the linked PR. Anything
//! that does not follow the template is used verbatim.

use crate::types::PrRef;
use url::Url;

/// References extracted from a sync PR body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReference {
    /// Origin PR reference, as written after `1. `
    pub origin: String,
    /// URL of the related PR, as written
    pub related_url: String,
    /// The related PR
    pub related: PrRef,
}

impl SyncReference {
    /// Parse a body following the v1 template
    pub fn parse(body: &str) -> Option<Self> {
        let mut lines = body.lines().skip(1);
        let origin_line = lines.next()?.trim_end_matches('\r');
        let url_line = lines.next()?.trim_end_matches('\r').trim();

        let origin = origin_line
            .strip_prefix("### ")?
            .split_once("1. ")
            .map(|(_, rest)| rest.trim().to_string())
            .filter(|s| !s.is_empty())?;

        let related = parse_pr_url(url_line)?;

        Some(Self {
            origin,
            related_url: url_line.to_string(),
            related,
        })
    }

    /// Body text combining the references with the related PR's description
    pub fn render(&self, related_body: &str) -> String {
        format!(
            "\n{}\n{}\n\n{related_body}",
            self.origin, self.related_url
        )
    }
}

/// Parse `https://<host>/<org>/<repo>/pulls/<number>`
pub fn parse_pr_url(text: &str) -> Option<PrRef> {
    let url = Url::parse(text).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [org, repo, "pulls" | "pull", number] => Some(PrRef {
            org: (*org).to_string(),
            repo: (*repo).to_string(),
            number: number.parse().ok()?,
        }),
        _ => None,
    }
}
