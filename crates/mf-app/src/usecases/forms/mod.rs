//! Form sessions.
//!
//! One session per mounted form. A session owns its field store, verdicts
//! and submission gate behind a single async mutex; the lock is released
//! before any gateway is awaited so that edits stay possible while a check
//! or submission is pending. Results that come back after the field was
//! edited again, or after the session was closed, are dropped.

mod additional_info;
mod child_management;
mod gated;
mod liveness;
mod login;
mod password_change;
mod profile_edit;
mod signup;

#[cfg(test)]
mod test_support;

pub use additional_info::{AdditionalInfoField, AdditionalInfoSession, KakaoProfile};
pub use child_management::{ChildListError, ChildManagementSession};
pub use liveness::SessionLiveness;
pub use login::{LoginField, LoginSession};
pub use password_change::{PasswordChangeField, PasswordChangeSession};
pub use profile_edit::{ProfileEditField, ProfileEditSession};
pub use signup::{SignupField, SignupSession};

/// Role written into every account created from these forms.
pub const DEFAULT_ROLE: &str = "USER";
