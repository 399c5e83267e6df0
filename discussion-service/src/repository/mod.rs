pub mod comments;
pub mod posts;
pub mod votes;

pub use comments::CommentRepository;
pub use posts::PostRepository;
pub use votes::VoteRepository;
