//! Port interfaces for the form sessions
//!
//! Ports define the contract between the sessions and the external
//! collaborators (user-service backend, fixtures, system clock). Sessions
//! depend on these traits only, and receive implementations explicitly
//! when they are built.

mod clock;
mod duplicate_check;
mod password_verify;
mod submission;

pub use clock::ClockPort;
pub use duplicate_check::{DuplicateCheckPort, DuplicateCheckResponse, DuplicateCheckResult};
pub use password_verify::{CurrentPasswordVerifierPort, PasswordVerification};
pub use submission::{ChildProfilePort, LoginPort, PasswordChangePort, ProfileUpdatePort, SignupPort};
