/// Discussion Service Library
///
/// The discussion/voting engine for forum-style posts: nested comment threads
/// plus a per-user, per-target upvote toggle backed by a vote ledger and a
/// denormalized counter that never drifts from it.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for the engine's REST surface
/// - `domain`: entity models and the pure reply-tree builder
/// - `services`: business logic (validation, ownership, toggle orchestration)
/// - `repository`: database access layer
/// - `middleware`: gateway-identity extraction and request metrics
/// - `metrics`: Prometheus collectors and the /metrics handler
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
