//! Comment texts posted by the handlers

/// Reply to an author trying to lgtm their own PR
pub const LGTM_BY_SELF: &str =
    "***lgtm*** can not be added in your self-own pull request. :astonished:";

/// Comment that re-triggers CI
pub const RETEST: &str = "/retest";

/// Hint when `/rebase` meets a squash label
pub const REBASE_CONFLICTS_SQUASH: &str =
    "Please use **/squash cancel** to remove **merge/squash** label, and try **/rebase** again";

/// Hint when `/squash` meets a rebase label
pub const SQUASH_CONFLICTS_REBASE: &str =
    "Please use **/rebase cancel** to remove **merge/rebase** label, and try **/squash** again";

/// Labels removed after new commits
pub fn labels_cleared(labels: &[String]) -> String {
    format!(
        "New code changes of pr are detected and remove these labels ***{}***. :flushed: ",
        labels.join(", ")
    )
}

/// Reply to a reviewer whose `/lgtm` does not count
pub fn lgtm_not_permitted(commenter: &str) -> String {
    format!(
        "Thanks for your review, ***{commenter}***, your opinion is very important to us.:wave:\n\
         The maintainers will consider your advice carefully."
    )
}

/// Reply to a commenter who may not change `label`
pub fn label_not_permitted(commenter: &str, action: &str, label: &str) -> String {
    format!(
        "\n***@{commenter}*** has no permission to {action} ***{label}*** label in this pull request. :astonished:\n\
         Please contact to the collaborators in this repository."
    )
}

/// Confirmation that `label` was added
pub fn label_added(label: &str, commenter: &str) -> String {
    format!(
        "***{label}*** was added to this pull request by: ***{commenter}***. :wave: \n\
         **NOTE:** If this pull request is not merged while all conditions are met, \
         comment \"/check-pr\" to try again. :smile: "
    )
}

/// Confirmation that `label` was removed
pub fn label_removed(label: &str, commenter: &str) -> String {
    format!("***{label}*** was removed in this pull request by: ***{commenter}***. :flushed: ")
}

/// Reminder for PRs opened without a reviewer
pub fn reviewer_not_set(author: &str) -> String {
    format!(
        "**@{author}** Thank you for submitting a PullRequest. It is detected that you have \
         not set a reviewer, please set a one."
    )
}
