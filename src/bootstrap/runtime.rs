//! # Forms Runtime
//!
//! Holds the wired ports and hands out fresh form sessions. Each call
//! returns a new, mounted session; sessions share the ports but no state.
//!
//! ```rust,no_run
//! use momnect_forms::{load_config, FormsRuntime};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = load_config("momnect-forms.toml".into())?;
//! let runtime = FormsRuntime::from_config(&config)?;
//! let signup = runtime.signup_session();
//! # let _ = signup;
//! # Ok(())
//! # }
//! ```

use mf_app::{
    AdditionalInfoSession, ChildManagementSession, KakaoProfile, LoginSession,
    PasswordChangeSession, ProfileEditSession, SignupSession,
};
use mf_core::account::ProfileInfo;
use mf_core::FormsConfig;
use mf_infra::BackendMode;

use super::wiring::{wire_dependencies, FormDeps, WiringResult};

/// Email used when the provider profile carries none.
pub const KAKAO_FALLBACK_EMAIL: &str = "kakaouser@kakao.com";

pub struct FormsRuntime {
    deps: FormDeps,
}

impl FormsRuntime {
    pub fn new(deps: FormDeps) -> Self {
        Self { deps }
    }

    pub fn from_config(config: &FormsConfig) -> WiringResult<Self> {
        Ok(Self::new(wire_dependencies(config)?))
    }

    pub fn mode(&self) -> BackendMode {
        self.deps.mode
    }

    pub fn deps(&self) -> &FormDeps {
        &self.deps
    }

    pub fn signup_session(&self) -> SignupSession {
        SignupSession::new(self.deps.duplicate_check.clone(), self.deps.signup.clone())
    }

    /// Session for completing a kakao signup.
    pub fn additional_info_session(&self, mut profile: KakaoProfile) -> AdditionalInfoSession {
        if profile.email.trim().is_empty() {
            profile.email = KAKAO_FALLBACK_EMAIL.to_string();
        }
        AdditionalInfoSession::new(
            profile,
            &self.deps.kakao_default_nickname,
            self.deps.duplicate_check.clone(),
            self.deps.signup.clone(),
        )
    }

    pub fn login_session(&self) -> LoginSession {
        LoginSession::new(self.deps.login.clone())
    }

    pub fn password_change_session(&self) -> PasswordChangeSession {
        PasswordChangeSession::new(
            self.deps.password_verifier.clone(),
            self.deps.password_change.clone(),
        )
    }

    pub fn profile_edit_session(&self, current: ProfileInfo) -> ProfileEditSession {
        ProfileEditSession::new(
            current,
            self.deps.duplicate_check.clone(),
            self.deps.profile_update.clone(),
        )
    }

    pub fn child_management_session(&self) -> ChildManagementSession {
        ChildManagementSession::new(self.deps.clock.clone(), self.deps.child_store.clone())
    }
}
