//! Momnect Forms Application Layer
//!
//! This crate contains the form sessions and the gateway-backed use cases
//! they share. Sessions only see `mf-core` ports; adapters are injected by
//! the bootstrap.

pub mod usecases;

pub use usecases::forms::{
    AdditionalInfoField, AdditionalInfoSession, ChildListError, ChildManagementSession,
    KakaoProfile, LoginField, LoginSession, PasswordChangeField, PasswordChangeSession,
    ProfileEditField, ProfileEditSession, SessionLiveness, SignupField, SignupSession,
};
pub use usecases::{CheckDuplicate, VerifyCurrentPassword};
