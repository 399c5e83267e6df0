/// Vote handlers - HTTP endpoints for the upvote toggle
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::VoteTarget;
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::VoteService;

/// Toggle the caller's upvote on a post
pub async fn upvote_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = VoteService::new((**pool).clone());
    let state = service
        .toggle(user_id.0, VoteTarget::Post, *post_id)
        .await?;

    Ok(HttpResponse::Ok().json(state))
}

/// Toggle the caller's upvote on a comment
pub async fn upvote_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = VoteService::new((**pool).clone());
    let state = service
        .toggle(user_id.0, VoteTarget::Comment, *comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(state))
}
