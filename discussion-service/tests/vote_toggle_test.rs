//! Integration tests: vote toggle
//!
//! Exercises the toggle against a real database:
//! - involution: two consecutive toggles restore the original state
//! - the denormalized counter always equals the ledger row count
//! - concurrent toggles from distinct users are both reflected
//! - missing / tombstoned targets are rejected before the transaction opens

mod common;

use common::{seed_board, seed_post, seed_user, setup_test_db};
use discussion_service::domain::models::VoteTarget;
use discussion_service::error::AppError;
use discussion_service::services::{CommentService, VoteService};
use uuid::Uuid;

async fn ledger_count(
    pool: &sqlx::PgPool,
    target: VoteTarget,
    target_id: Uuid,
) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE target_type = $1 AND target_id = $2")
        .bind(match target {
            VoteTarget::Post => "post",
            VoteTarget::Comment => "comment",
        })
        .bind(target_id)
        .fetch_one(pool)
        .await
        .expect("count ledger rows")
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn toggle_twice_returns_to_original_state() {
    let pool = setup_test_db().await.expect("test db");
    let author = seed_user(&pool, "author").await;
    let voter = seed_user(&pool, "voter").await;
    let board = seed_board(&pool, "general").await;
    let post = seed_post(&pool, author, board).await;

    let comments = CommentService::new(pool.clone());
    let comment = comments
        .create_comment(author, post, "first!", None)
        .await
        .expect("create comment");

    let votes = VoteService::new(pool.clone());

    let state = votes
        .toggle(voter, VoteTarget::Comment, comment.id)
        .await
        .expect("first toggle");
    assert!(state.has_voted);
    assert_eq!(state.upvotes, 1);

    let state = votes
        .toggle(voter, VoteTarget::Comment, comment.id)
        .await
        .expect("second toggle");
    assert!(!state.has_voted);
    assert_eq!(state.upvotes, 0);

    assert_eq!(ledger_count(&pool, VoteTarget::Comment, comment.id).await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn counter_always_matches_ledger() {
    let pool = setup_test_db().await.expect("test db");
    let author = seed_user(&pool, "author").await;
    let board = seed_board(&pool, "general").await;
    let post = seed_post(&pool, author, board).await;

    let votes = VoteService::new(pool.clone());

    // A mixed sequence: three users, one of them flip-flopping.
    let u1 = seed_user(&pool, "u1").await;
    let u2 = seed_user(&pool, "u2").await;
    let u3 = seed_user(&pool, "u3").await;
    for user in [u1, u2, u3, u1, u1, u2] {
        votes
            .toggle(user, VoteTarget::Post, post)
            .await
            .expect("toggle");
    }

    // u1 toggled 3x (net on), u2 2x (net off), u3 1x (net on) => 2 active votes.
    let upvotes: i32 = sqlx::query_scalar("SELECT upvotes FROM posts WHERE id = $1")
        .bind(post)
        .fetch_one(&pool)
        .await
        .expect("read counter");
    assert_eq!(upvotes, 2);
    assert_eq!(
        upvotes as i64,
        ledger_count(&pool, VoteTarget::Post, post).await
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_toggles_from_distinct_users_both_count() {
    let pool = setup_test_db().await.expect("test db");
    let author = seed_user(&pool, "author").await;
    let board = seed_board(&pool, "general").await;
    let post = seed_post(&pool, author, board).await;

    let comments = CommentService::new(pool.clone());
    let comment = comments
        .create_comment(author, post, "race me", None)
        .await
        .expect("create comment");

    let u1 = seed_user(&pool, "u1").await;
    let u2 = seed_user(&pool, "u2").await;

    let task = |user: Uuid| {
        let pool = pool.clone();
        let comment_id = comment.id;
        tokio::spawn(async move {
            VoteService::new(pool)
                .toggle(user, VoteTarget::Comment, comment_id)
                .await
        })
    };

    let (r1, r2) = tokio::join!(task(u1), task(u2));
    r1.expect("task 1 join").expect("task 1 toggle");
    r2.expect("task 2 join").expect("task 2 toggle");

    let upvotes: i32 = sqlx::query_scalar("SELECT upvotes FROM comments WHERE id = $1")
        .bind(comment.id)
        .fetch_one(&pool)
        .await
        .expect("read counter");
    assert_eq!(upvotes, 2);
    assert_eq!(ledger_count(&pool, VoteTarget::Comment, comment.id).await, 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn toggle_on_missing_target_is_not_found() {
    let pool = setup_test_db().await.expect("test db");
    let voter = seed_user(&pool, "voter").await;

    let votes = VoteService::new(pool.clone());

    let err = votes
        .toggle(voter, VoteTarget::Post, Uuid::new_v4())
        .await
        .expect_err("missing post");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = votes
        .toggle(voter, VoteTarget::Comment, Uuid::new_v4())
        .await
        .expect_err("missing comment");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn tombstoned_comment_is_not_votable() {
    let pool = setup_test_db().await.expect("test db");
    let author = seed_user(&pool, "author").await;
    let board = seed_board(&pool, "general").await;
    let post = seed_post(&pool, author, board).await;

    let comments = CommentService::new(pool.clone());
    let parent = comments
        .create_comment(author, post, "parent", None)
        .await
        .expect("create parent");
    comments
        .create_comment(author, post, "child", Some(parent.id))
        .await
        .expect("create child");
    comments
        .delete_comment(parent.id, author)
        .await
        .expect("tombstone parent");

    let votes = VoteService::new(pool.clone());
    let err = votes
        .toggle(author, VoteTarget::Comment, parent.id)
        .await
        .expect_err("tombstone rejected");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn post_and_comment_ledgers_are_distinct() {
    let pool = setup_test_db().await.expect("test db");
    let author = seed_user(&pool, "author").await;
    let voter = seed_user(&pool, "voter").await;
    let board = seed_board(&pool, "general").await;
    let post = seed_post(&pool, author, board).await;

    let comments = CommentService::new(pool.clone());
    let comment = comments
        .create_comment(author, post, "hello", None)
        .await
        .expect("create comment");

    // Same voter, same uuid-space: a post vote must not shadow a comment vote.
    let votes = VoteService::new(pool.clone());
    votes
        .toggle(voter, VoteTarget::Post, post)
        .await
        .expect("post toggle");
    let state = votes
        .toggle(voter, VoteTarget::Comment, comment.id)
        .await
        .expect("comment toggle");

    assert!(state.has_voted);
    assert_eq!(ledger_count(&pool, VoteTarget::Post, post).await, 1);
    assert_eq!(ledger_count(&pool, VoteTarget::Comment, comment.id).await, 1);
}
