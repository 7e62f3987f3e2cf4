//! Review commands recognized in comment bodies
//!
//! A command occupies a whole line, is matched case-insensitively and may
//! carry trailing whitespace. One comment can hold several commands.

use regex::Regex;
use std::sync::LazyLock;

/// A review command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/approve`
    Approve,
    /// `/approve cancel`
    ApproveCancel,
    /// `/lgtm`
    Lgtm,
    /// `/lgtm cancel`
    LgtmCancel,
    /// `/ack`
    Ack,
    /// `/check-pr`
    CheckPr,
    /// `/cla cancel`
    ClaCancel,
    /// `/rebase`
    Rebase,
    /// `/rebase cancel`
    RebaseCancel,
    /// `/squash`
    Squash,
    /// `/squash cancel`
    SquashCancel,
}

static PATTERNS: LazyLock<Vec<(Command, Regex)>> = LazyLock::new(|| {
    [
        (Command::Approve, r"(?mi)^/approve\s*$"),
        (Command::ApproveCancel, r"(?mi)^/approve cancel\s*$"),
        (Command::Lgtm, r"(?mi)^/lgtm\s*$"),
        (Command::LgtmCancel, r"(?mi)^/lgtm cancel\s*$"),
        (Command::Ack, r"(?mi)^/ack\s*$"),
        (Command::CheckPr, r"(?mi)^/check-pr\s*$"),
        (Command::ClaCancel, r"(?mi)^/cla cancel\s*$"),
        (Command::Rebase, r"(?mi)^/rebase\s*$"),
        (Command::RebaseCancel, r"(?mi)^/rebase cancel\s*$"),
        (Command::Squash, r"(?mi)^/squash\s*$"),
        (Command::SquashCancel, r"(?mi)^/squash cancel\s*$"),
    ]
    .into_iter()
    .filter_map(|(cmd, pattern)| Regex::new(pattern).ok().map(|re| (cmd, re)))
    .collect()
});

impl Command {
    /// Whether `body` contains this command on a line of its own
    pub fn matches(self, body: &str) -> bool {
        PATTERNS
            .iter()
            .any(|(cmd, re)| *cmd == self && re.is_match(body))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approve => "/approve",
            Self::ApproveCancel => "/approve cancel",
            Self::Lgtm => "/lgtm",
            Self::LgtmCancel => "/lgtm cancel",
            Self::Ack => "/ack",
            Self::CheckPr => "/check-pr",
            Self::ClaCancel => "/cla cancel",
            Self::Rebase => "/rebase",
            Self::RebaseCancel => "/rebase cancel",
            Self::Squash => "/squash",
            Self::SquashCancel => "/squash cancel",
        };
        write!(f, "{s}")
    }
}
