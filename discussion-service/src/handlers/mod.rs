/// HTTP handlers for the discussion engine
///
/// Handlers stay thin: extract identity and payload, call the service layer,
/// map the result onto a response. Error mapping lives on `AppError`.
pub mod comments;
pub mod posts;
pub mod votes;

pub use comments::{create_comment, delete_comment, get_post_comments, update_comment};
pub use posts::{create_post, get_post};
pub use votes::{upvote_comment, upvote_post};
