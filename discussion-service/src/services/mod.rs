pub mod comments;
pub mod posts;
pub mod votes;

pub use comments::CommentService;
pub use posts::PostService;
pub use votes::VoteService;
