//! The todobot dialog engine.
//!
//! Consumes inbound events (commands, button presses, free text), runs the
//! per-conversation state machine against the session store, calls the task
//! and comment services at the right transition points, and produces outbound
//! actions for the event source to deliver.

pub mod dispatcher;
pub mod engine;
pub mod menus;
pub mod stats;

pub use dispatcher::{Dispatcher, EventSink};
pub use engine::DialogEngine;
pub use stats::TaskStats;
