//! Outbound actions produced by the dialog engine.
//!
//! Delivery to the end user is the event source's responsibility; the engine
//! only describes what should be shown.

use crate::event::CallbackToken;
use serde::{Deserialize, Serialize};

/// One pressable option in a rendered menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Human-readable button label
    pub label: String,
    /// The token delivered back when the button is pressed
    pub token: CallbackToken,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Whether a terminal action succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Success,
    Failure,
}

/// An action the event source should deliver to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Render a message with pressable options.
    Menu {
        text: String,
        options: Vec<MenuOption>,
    },
    /// Ask the user for free-text input.
    Prompt { text: String },
    /// Report the outcome of a terminal action.
    Report {
        outcome: ReportOutcome,
        message: String,
    },
}

impl Outbound {
    /// A menu with the given text and options.
    pub fn menu(text: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self::Menu {
            text: text.into(),
            options,
        }
    }

    /// A free-text prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::Prompt { text: text.into() }
    }

    /// A success report.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Report {
            outcome: ReportOutcome::Success,
            message: message.into(),
        }
    }

    /// A failure report.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Report {
            outcome: ReportOutcome::Failure,
            message: message.into(),
        }
    }

    /// Check if this is a failure report
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Report {
                outcome: ReportOutcome::Failure,
                ..
            }
        )
    }
}
