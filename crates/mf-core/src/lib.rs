//! # mf-core
//!
//! Core domain models and validation rules for the Momnect front-end forms.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! validators are total functions, session state is plain data, and every
//! network-backed collaborator is reached through a port in [`ports`].

pub mod account;
pub mod child;
pub mod config;
pub mod errors;
pub mod form;
pub mod ports;
pub mod validation;
pub mod verdict;

// Re-export commonly used types at the crate root
pub use config::FormsConfig;
pub use errors::{GatewayError, SubmissionError};
pub use form::{FieldStore, FormState, GatedFieldEvent, GatedFieldStateMachine, OneShotLatch};
pub use validation::{FieldKind, ValidationContext, ValidationOutcome, ValidatorRegistry};
pub use verdict::{ValidationVerdict, VerdictStatus};
