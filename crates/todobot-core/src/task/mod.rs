//! Task and category domain: models and the store-facing service trait.

pub mod model;
pub mod service;

pub use model::{Category, NewTask, Task, TaskPatch};
pub use service::TaskService;
