use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Vote toggles segmented by target kind and outcome (voted / unvoted).
    pub static ref VOTE_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discussion_vote_toggles_total",
        "Vote toggles segmented by target kind and outcome",
        &["target", "outcome"]
    )
    .expect("failed to register discussion_vote_toggles_total");

    /// Comment mutations segmented by action (created / updated / tombstoned / hard_deleted).
    pub static ref COMMENT_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discussion_comment_writes_total",
        "Comment mutations segmented by action",
        &["action"]
    )
    .expect("failed to register discussion_comment_writes_total");
}
