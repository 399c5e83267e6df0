use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Vote, VoteState, VoteTarget};
use crate::error::Result;

/// Repository for the vote ledger and the denormalized counters it drives.
///
/// The ledger is the source of truth; `posts.upvotes` / `comments.upvotes`
/// are maintained incrementally in the same transaction as the ledger row,
/// never recomputed on the read path.
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip a user's upvote on a target and adjust its counter atomically.
    ///
    /// Delete-then-insert inside one transaction: if the ledger row existed
    /// the vote is retracted, otherwise it is cast. The counter moves via a
    /// single `upvotes = upvotes ± 1` statement, so concurrent toggles from
    /// different users never lose updates. A lost insert race against a
    /// concurrent duplicate toggle from the same user is absorbed by
    /// `ON CONFLICT DO NOTHING` and reported as the current state.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        target: VoteTarget,
        target_id: Uuid,
    ) -> Result<VoteState> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE user_id = $1 AND target_type = $2 AND target_id = $3
            "#,
        )
        .bind(user_id)
        .bind(target.as_str())
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        let state = if deleted.rows_affected() > 0 {
            let upvotes: i32 = sqlx::query_scalar(&format!(
                "UPDATE {} SET upvotes = upvotes - 1 WHERE id = $1 RETURNING upvotes",
                target.table()
            ))
            .bind(target_id)
            .fetch_one(&mut *tx)
            .await?;

            VoteState {
                has_voted: false,
                upvotes,
            }
        } else {
            let inserted = sqlx::query(
                r#"
                INSERT INTO votes (user_id, target_type, target_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, target_type, target_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(target.as_str())
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() > 0 {
                let upvotes: i32 = sqlx::query_scalar(&format!(
                    "UPDATE {} SET upvotes = upvotes + 1 WHERE id = $1 RETURNING upvotes",
                    target.table()
                ))
                .bind(target_id)
                .fetch_one(&mut *tx)
                .await?;

                VoteState {
                    has_voted: true,
                    upvotes,
                }
            } else {
                // A concurrent toggle from the same user won the insert race;
                // their vote stands. Report current state instead of erroring.
                let upvotes: i32 = sqlx::query_scalar(&format!(
                    "SELECT upvotes FROM {} WHERE id = $1",
                    target.table()
                ))
                .bind(target_id)
                .fetch_one(&mut *tx)
                .await?;

                VoteState {
                    has_voted: true,
                    upvotes,
                }
            }
        };

        tx.commit().await?;
        Ok(state)
    }

    /// Find a user's active upvote on a target, if any
    pub async fn find_vote(
        &self,
        user_id: Uuid,
        target: VoteTarget,
        target_id: Uuid,
    ) -> Result<Option<Vote>> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            SELECT user_id, target_type, target_id, created_at
            FROM votes
            WHERE user_id = $1 AND target_type = $2 AND target_id = $3
            "#,
        )
        .bind(user_id)
        .bind(target.as_str())
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vote)
    }

    /// Count ledger rows for a target by aggregating the ledger directly.
    ///
    /// Reconciliation/verification path only; the serving path reads the
    /// denormalized counter on the target row.
    pub async fn count_ledger_rows(&self, target: VoteTarget, target_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM votes
            WHERE target_type = $1 AND target_id = $2
            "#,
        )
        .bind(target.as_str())
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
