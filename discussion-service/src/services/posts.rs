/// Post service - creation and retrieval for the submissions comments hang off
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::Post;
use crate::error::{AppError, Result};
use crate::repository::PostRepository;

/// Maximum post title length in characters, applied after trimming.
pub const MAX_TITLE_LENGTH: usize = 300;
/// Maximum post body length in characters, applied after trimming.
pub const MAX_POST_LENGTH: usize = 10_000;

pub struct PostService {
    posts: PostRepository,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool),
        }
    }

    /// Create a new post on a board
    pub async fn create_post(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Post> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::Validation(format!(
                "Title exceeds the maximum length of {MAX_TITLE_LENGTH} characters"
            )));
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Content must not be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_POST_LENGTH {
            return Err(AppError::Validation(format!(
                "Content exceeds the maximum length of {MAX_POST_LENGTH} characters"
            )));
        }

        self.posts.create_post(user_id, board_id, title, content).await
    }

    /// Get a post by ID, including its denormalized upvote counter
    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }
}
