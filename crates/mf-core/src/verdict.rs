//! Validation verdicts attached to a single field.

use serde::{Deserialize, Serialize};

/// Prefix carried by every user-visible error message.
pub const ERROR_PREFIX: &str = "❌";

/// Status part of a [`ValidationVerdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    #[default]
    Default,
    Success,
    Error,
    Loading,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Default => "default",
            VerdictStatus::Success => "success",
            VerdictStatus::Error => "error",
            VerdictStatus::Loading => "loading",
        }
    }
}

/// Outcome of validating one field.
///
/// `checked` can only be `true` together with [`VerdictStatus::Success`];
/// the fields are private so that every verdict goes through a constructor
/// that upholds this.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationVerdict {
    status: VerdictStatus,
    message: String,
    checked: bool,
}

impl ValidationVerdict {
    /// Neutral verdict, optionally carrying a hint such as the
    /// "press duplicate check" prompt.
    pub fn idle(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Default,
            message: message.into(),
            checked: false,
        }
    }

    /// Local success that does not count as an explicit confirmation.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Success,
            message: message.into(),
            checked: false,
        }
    }

    /// Success that has been explicitly confirmed (duplicate check passed,
    /// current password verified, provider default accepted).
    pub fn confirmed(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Success,
            message: message.into(),
            checked: true,
        }
    }

    /// Error verdict. Messages missing the `❌` prefix get it prepended.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.starts_with(ERROR_PREFIX) {
            message
        } else {
            format!("{ERROR_PREFIX} {message}")
        };
        Self {
            status: VerdictStatus::Error,
            message,
            checked: false,
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Loading,
            message: message.into(),
            checked: false,
        }
    }

    pub fn status(&self) -> VerdictStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn is_success(&self) -> bool {
        self.status == VerdictStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == VerdictStatus::Error
    }

    pub fn is_loading(&self) -> bool {
        self.status == VerdictStatus::Loading
    }
}
