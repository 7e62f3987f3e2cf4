//! Merge engine
//!
//! Three-phase pattern:
//! 1. Gather - fetch labels, operation log and freeze state (effectful)
//! 2. Decide - turn them into a `MergeVerdict` (pure, testable)
//! 3. Execute - resolve method and commit message, then merge (effectful)

mod body;
mod descriptor;
mod evaluate;
mod execute;
mod method;
mod plan;

pub use body::{SyncReference, parse_pr_url};
pub use descriptor::{
    ReviewSignals, SignalKind, build_trailer, collect_signals, identity_map,
    render_identity_trailer, render_login_trailer,
};
pub use evaluate::{Evaluation, MergeContext, current_labels, evaluate_merge};
pub use execute::{
    MergeOutcome, designated_body, designated_message, execute_merge, ordinary_message, try_merge,
};
pub use method::{
    LabelHint, RepositoryDeclaration, declaration_path, declared_method, label_hint,
    resolve_merge_method,
};
pub use plan::{
    CONFLICT_REASON, LabelSource, MergeVerdict, check_conflict, check_freeze, frozen_reason,
    not_mergeable_comment,
};
