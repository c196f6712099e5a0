//! Row mapping and SQL for each table. Repositories never interpret
//! results; a missing row is `None`, every other failure is an error.

mod comment;
mod issue;
mod user;

pub use comment::CommentRepository;
pub use issue::IssueRepository;
pub use user::UserRepository;
