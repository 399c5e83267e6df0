/// Vote service - target validation plus the transactional toggle
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{VoteState, VoteTarget};
use crate::error::{AppError, Result};
use crate::metrics::discussion::VOTE_TOGGLES_TOTAL;
use crate::repository::{CommentRepository, PostRepository, VoteRepository};

pub struct VoteService {
    posts: PostRepository,
    comments: CommentRepository,
    votes: VoteRepository,
}

impl VoteService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            votes: VoteRepository::new(pool),
        }
    }

    /// Toggle the caller's upvote on a post or comment.
    ///
    /// Target existence is checked before the transaction opens; tombstoned
    /// comments are not votable. The ledger flip and counter adjustment are
    /// one atomic unit inside the repository.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        target: VoteTarget,
        target_id: Uuid,
    ) -> Result<VoteState> {
        match target {
            VoteTarget::Post => {
                if !self.posts.post_exists(target_id).await? {
                    return Err(AppError::NotFound("Post not found".to_string()));
                }
            }
            VoteTarget::Comment => match self.comments.get_comment(target_id).await? {
                Some(comment) if !comment.deleted => {}
                _ => return Err(AppError::NotFound("Comment not found".to_string())),
            },
        }

        let state = self.votes.toggle(user_id, target, target_id).await?;

        let outcome = if state.has_voted { "voted" } else { "unvoted" };
        VOTE_TOGGLES_TOTAL
            .with_label_values(&[target.as_str(), outcome])
            .inc();
        tracing::debug!(
            %user_id,
            target = target.as_str(),
            %target_id,
            outcome,
            upvotes = state.upvotes,
            "vote toggled"
        );

        Ok(state)
    }
}
