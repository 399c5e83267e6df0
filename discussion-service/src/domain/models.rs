use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a top-level submission on a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub content: String,
    /// Denormalized counter, kept in sync with the vote ledger inside the
    /// toggle transaction. Never recomputed on the read path.
    pub upvotes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment entity - a reply on a post, optionally nested under another comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    /// Self-reference. A non-null parent always belongs to the same post.
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub upvotes: i32,
    /// Tombstone flag: content cleared, row retained so children stay attached.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment read model with author display fields joined in
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub upvotes: i32,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_display_name: String,
}

/// Vote ledger entry - row existence means "this user upvotes this target"
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub user_id: Uuid,
    pub target_type: String,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The two kinds of votable targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTarget {
    Post,
    Comment,
}

impl VoteTarget {
    /// Ledger discriminator value, also the CHECK-constrained column value
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteTarget::Post => "post",
            VoteTarget::Comment => "comment",
        }
    }

    /// Table holding this target's denormalized counter
    pub fn table(&self) -> &'static str {
        match self {
            VoteTarget::Post => "posts",
            VoteTarget::Comment => "comments",
        }
    }
}

/// Outcome of a vote toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub has_voted: bool,
    pub upvotes: i32,
}
