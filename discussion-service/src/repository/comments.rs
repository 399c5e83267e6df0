use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Comment, CommentWithAuthor};
use crate::error::Result;

/// How a delete was applied to a comment row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Row removed outright (leaf comment, nothing referenced it)
    HardDeleted,
    /// Row retained with content cleared so children stay attached
    Tombstoned,
}

/// Repository for Comment operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment on a post
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, content, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, parent_id, content, upvotes, deleted,
                      created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Get a single comment by ID, tombstones included.
    ///
    /// Callers decide whether a tombstone is acceptable: it is a valid parent
    /// for replies but not a valid target for edits, deletes, or votes.
    pub async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, parent_id, content, upvotes, deleted,
                   created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Update comment content
    pub async fn update_comment(&self, comment_id: Uuid, content: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, post_id, author_id, parent_id, content, upvotes, deleted,
                      created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Remove a comment, preserving referential integrity for replies.
    ///
    /// The children probe and the row mutation run in one transaction: a
    /// comment with replies is tombstoned (content cleared, author retained),
    /// a leaf is removed outright.
    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<DeleteOutcome> {
        let mut tx = self.pool.begin().await?;

        let has_children: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM comments WHERE parent_id = $1)
            "#,
        )
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = if has_children {
            sqlx::query(
                r#"
                UPDATE comments
                SET content = '', deleted = TRUE, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
            DeleteOutcome::Tombstoned
        } else {
            sqlx::query("DELETE FROM comments WHERE id = $1")
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::HardDeleted
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Get the flat comment list for a post with author display fields joined.
    ///
    /// Tombstones are included so replies keep a resolvable parent; their
    /// content is already cleared at delete time. Ordered by created_at for
    /// stable output; tree assembly happens downstream.
    pub async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.author_id, c.parent_id, c.content, c.upvotes,
                   c.deleted, c.created_at, c.updated_at,
                   COALESCE(u.display_name, '[unknown]') AS author_display_name
            FROM comments c
            LEFT JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
