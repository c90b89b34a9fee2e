//! Comment domain: model and the store-facing service trait.

pub mod model;
pub mod service;

pub use model::{Comment, NewComment, MAX_COMMENT_LEN};
pub use service::CommentService;
