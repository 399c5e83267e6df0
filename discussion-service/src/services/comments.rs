/// Comment service - validation, ownership checks, and the tombstone policy
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Comment, CommentWithAuthor};
use crate::error::{AppError, Result};
use crate::metrics::discussion::COMMENT_WRITES_TOTAL;
use crate::repository::comments::DeleteOutcome;
use crate::repository::{CommentRepository, PostRepository};

/// Maximum comment length in characters, applied after trimming.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

pub struct CommentService {
    posts: PostRepository,
    comments: CommentRepository,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }

    /// Create a comment on a post, optionally as a reply to another comment.
    ///
    /// A reply's parent must belong to the same post. A tombstoned parent is
    /// a valid attachment point: the row still exists and the thread stays
    /// navigable.
    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Comment> {
        let content = validate_content(content)?;

        if !self.posts.post_exists(post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .comments
                .get_comment(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;

            if parent.post_id != post_id {
                return Err(AppError::Validation(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
        }

        let comment = self
            .comments
            .create_comment(post_id, user_id, content, parent_id)
            .await?;

        COMMENT_WRITES_TOTAL.with_label_values(&["created"]).inc();
        tracing::debug!(comment_id = %comment.id, %post_id, "comment created");

        Ok(comment)
    }

    /// Update a comment's content. Only the author may edit.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let content = validate_content(content)?;

        let existing = self.require_live_comment(comment_id).await?;
        if existing.author_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can edit a comment".to_string(),
            ));
        }

        let comment = self.comments.update_comment(comment_id, content).await?;

        COMMENT_WRITES_TOTAL.with_label_values(&["updated"]).inc();

        Ok(comment)
    }

    /// Delete a comment. Only the author may delete.
    ///
    /// Comments with replies are tombstoned so the replies keep a resolvable
    /// parent; leaves are removed outright.
    pub async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> Result<bool> {
        let existing = self.require_live_comment(comment_id).await?;
        if existing.author_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete a comment".to_string(),
            ));
        }

        let outcome = self.comments.delete_comment(comment_id).await?;

        let action = match outcome {
            DeleteOutcome::Tombstoned => "tombstoned",
            DeleteOutcome::HardDeleted => "hard_deleted",
        };
        COMMENT_WRITES_TOTAL.with_label_values(&[action]).inc();
        tracing::debug!(%comment_id, action, "comment deleted");

        Ok(true)
    }

    /// Get the flat comment list for a post with author display fields.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        if !self.posts.post_exists(post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        self.comments.list_by_post(post_id).await
    }

    /// Fetch a comment that is present and not tombstoned.
    async fn require_live_comment(&self, comment_id: Uuid) -> Result<Comment> {
        match self.comments.get_comment(comment_id).await? {
            Some(comment) if !comment.deleted => Ok(comment),
            _ => Err(AppError::NotFound("Comment not found".to_string())),
        }
    }
}

/// Trim and bound-check user-supplied content.
fn validate_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Content exceeds the maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_content() {
        assert_eq!(validate_content("hello").unwrap(), "hello");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_content("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn rejects_empty_content() {
        assert!(matches!(
            validate_content(""),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_whitespace_only_content() {
        assert!(matches!(
            validate_content(" \t\n "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn accepts_content_at_the_limit() {
        let content = "x".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn rejects_content_over_the_limit() {
        let content = "x".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(matches!(
            validate_content(&content),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // Multi-byte characters still count as one each.
        let content = "é".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_content(&content).is_ok());
    }
}
