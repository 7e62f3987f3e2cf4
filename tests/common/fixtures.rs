//! Test fixtures: PRs, comments, label events, configs and webhook payloads

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use review_robot::config::BotConfig;
use review_robot::types::{
    LabelEvent, LabelEventKind, PrComment, PrRef, PrState, PullRequestDetails, RepoRef,
};
use serde_json::json;

/// Login of the robot in every fixture config
pub const BOT: &str = "openEuler-bot";

/// Fixed point in time all fixtures are relative to
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

pub fn pr_ref(org: &str, repo: &str, number: u64) -> PrRef {
    RepoRef::new(org, repo).pr(number)
}

/// Open, mergeable PR into `master` authored by `dev`
pub fn make_details(number: u64, labels: &[&str]) -> PullRequestDetails {
    PullRequestDetails {
        number,
        title: format!("PR {number}"),
        body: Some(format!("Body of PR {number}")),
        state: PrState::Open,
        mergeable: Some(true),
        base_ref: "master".to_string(),
        author: "dev".to_string(),
        labels: labels.iter().map(ToString::to_string).collect(),
        assignees: Vec::new(),
        html_url: format!("https://github.com/openeuler/docs/pull/{number}"),
    }
}

/// `labeled` event by `actor`, `minute` minutes after the base time
pub fn labeled_by(label: &str, actor: &str, minute: i64) -> LabelEvent {
    LabelEvent {
        kind: LabelEventKind::Labeled,
        label: label.to_string(),
        actor: Some(actor.to_string()),
        created_at: base_time() + Duration::minutes(minute),
    }
}

/// `labeled` events by the robot for every label
pub fn bot_labeled(labels: &[&str]) -> Vec<LabelEvent> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| labeled_by(l, BOT, i64::try_from(i).unwrap()))
        .collect()
}

/// Unedited comment
pub fn comment(id: u64, author: &str, body: &str) -> PrComment {
    PrComment {
        id,
        body: body.to_string(),
        author: author.to_string(),
        created_at: base_time(),
        updated_at: base_time(),
    }
}

/// Comment edited a few minutes after creation
pub fn edited_comment(id: u64, author: &str, body: &str) -> PrComment {
    PrComment {
        updated_at: base_time() + Duration::minutes(5),
        ..comment(id, author, body)
    }
}

/// Config with one org-wide item for `openeuler`
///
/// `item` holds the item's fields as unindented YAML.
pub fn bot_config(item: &str) -> BotConfig {
    let yaml = format!(
        "trusted_label_actor: {BOT}\nconfig_items:\n  - repos: [openeuler]\n{}",
        indent(item)
    );
    BotConfig::from_yaml(&yaml).unwrap()
}

/// Config with default policy for `openeuler`
pub fn default_config() -> BotConfig {
    bot_config("")
}

fn indent(item: &str) -> String {
    item.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("    {l}\n"))
        .collect()
}

/// `pull_request` webhook payload for `openeuler/<repo>#<number>`
pub fn pr_event_json(action: &str, repo: &str, number: u64, labels: &[&str]) -> String {
    pr_event_value(action, repo, number, labels).to_string()
}

pub fn pr_event_value(
    action: &str,
    repo: &str,
    number: u64,
    labels: &[&str],
) -> serde_json::Value {
    json!({
        "action": action,
        "number": number,
        "pull_request": {
            "number": number,
            "state": "open",
            "title": format!("PR {number}"),
            "body": "Fix things",
            "mergeable": true,
            "merged": false,
            "base": {"ref": "master"},
            "user": {"login": "dev"},
            "labels": labels.iter().map(|l| json!({"name": l})).collect::<Vec<_>>(),
            "assignees": [],
            "html_url": format!("https://github.com/openeuler/{repo}/pull/{number}")
        },
        "repository": {"name": repo, "owner": {"login": "openeuler"}}
    })
}

/// `issue_comment` webhook payload for a new comment on an open PR authored by `dev`
pub fn comment_event_json(
    repo: &str,
    number: u64,
    commenter: &str,
    body: &str,
    labels: &[&str],
) -> String {
    comment_event_value(repo, number, commenter, body, labels).to_string()
}

pub fn comment_event_value(
    repo: &str,
    number: u64,
    commenter: &str,
    body: &str,
    labels: &[&str],
) -> serde_json::Value {
    json!({
        "action": "created",
        "comment": {
            "id": 100,
            "body": body,
            "user": {"login": commenter},
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        },
        "issue": {
            "number": number,
            "state": "open",
            "user": {"login": "dev"},
            "labels": labels.iter().map(|l| json!({"name": l})).collect::<Vec<_>>(),
            "pull_request": {"url": format!("https://api.github.com/repos/openeuler/{repo}/pulls/{number}")}
        },
        "repository": {"name": repo, "owner": {"login": "openeuler"}}
    })
}
