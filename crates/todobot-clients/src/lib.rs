//! Typed HTTP clients for the todobot collaborator services.
//!
//! Two stores sit behind the dialog engine: the task/category store and the
//! comment store. Each gets a thin reqwest-backed client implementing the
//! corresponding service trait from `todobot-core`. Both attach the
//! bot-identity header and share a bounded request timeout; neither retries.

pub mod comments;
pub mod config;
pub mod tasks;

mod remote;

pub use comments::HttpCommentClient;
pub use config::ClientConfig;
pub use tasks::HttpTaskClient;
