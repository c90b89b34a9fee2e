//! Conversation owner identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a conversation owner.
///
/// The transport layer resolves end users to this identifier before events
/// reach the dialog engine; the engine never interprets it beyond equality
/// and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
