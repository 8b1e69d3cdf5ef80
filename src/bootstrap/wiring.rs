//! Dependency wiring.
//!
//! Turns a loaded [`FormsConfig`] into the set of ports the sessions need.
//! Empty config values are interpreted here, not in the loader.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use mf_core::ports::{
    ChildProfilePort, ClockPort, CurrentPasswordVerifierPort, DuplicateCheckPort, LoginPort,
    PasswordChangePort, ProfileUpdatePort, SignupPort,
};
use mf_core::FormsConfig;
use mf_infra::fixtures::{
    FixtureAccounts, FixtureChildStore, FixtureNicknameRegistry, FixturePasswordChange,
    FixturePasswordVerifier, Latency,
};
use mf_infra::{BackendMode, ConfigError, SystemClock, UserServiceClient, UserServiceError};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_KAKAO_NICKNAME: &str = "카카오닉네임";

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("user service client initialization failed: {0}")]
    UserService(#[from] UserServiceError),
}

/// Ports handed to the form sessions.
///
/// Groups parameters only; every port is required.
#[derive(Clone)]
pub struct FormDeps {
    pub mode: BackendMode,
    pub duplicate_check: Arc<dyn DuplicateCheckPort>,
    pub password_verifier: Arc<dyn CurrentPasswordVerifierPort>,
    pub signup: Arc<dyn SignupPort>,
    pub login: Arc<dyn LoginPort>,
    pub password_change: Arc<dyn PasswordChangePort>,
    pub profile_update: Arc<dyn ProfileUpdatePort>,
    pub child_store: Arc<dyn ChildProfilePort>,
    pub clock: Arc<dyn ClockPort>,
    pub kakao_default_nickname: String,
}

/// Build every port from the configuration.
///
/// The current-password verifier and the child store have no user-service
/// endpoint and always use their fixtures.
pub fn wire_dependencies(config: &FormsConfig) -> WiringResult<FormDeps> {
    let mode: BackendMode = config.backend_mode.parse()?;
    let latency = Latency::from_millis(config.fixture_latency_ms);

    let kakao_default_nickname = if config.kakao_default_nickname.trim().is_empty() {
        DEFAULT_KAKAO_NICKNAME.to_string()
    } else {
        config.kakao_default_nickname.clone()
    };

    let password_verifier: Arc<dyn CurrentPasswordVerifierPort> = Arc::new(
        FixturePasswordVerifier::new(config.fixture_current_password.clone(), latency),
    );
    let child_store: Arc<dyn ChildProfilePort> = Arc::new(FixtureChildStore::new(latency));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let deps = match mode {
        BackendMode::Http => {
            if config.backend_base_url.trim().is_empty() {
                return Err(ConfigError::MissingBaseUrl.into());
            }
            let timeout_ms = match config.backend_timeout_ms {
                0 => DEFAULT_TIMEOUT_MS,
                ms => ms,
            };
            let client = Arc::new(UserServiceClient::new(
                config.backend_base_url.trim(),
                Duration::from_millis(timeout_ms),
            )?);
            info!(base_url = %client.base_url(), timeout_ms, "Wiring user-service gateways");

            FormDeps {
                mode,
                duplicate_check: client.clone(),
                password_verifier,
                signup: client.clone(),
                login: client.clone(),
                password_change: client.clone(),
                profile_update: client,
                child_store,
                clock,
                kakao_default_nickname,
            }
        }
        BackendMode::Fixture => {
            let accounts = Arc::new(FixtureAccounts::new(latency));
            info!(latency_ms = config.fixture_latency_ms, "Wiring fixture gateways");

            FormDeps {
                mode,
                duplicate_check: Arc::new(FixtureNicknameRegistry::new(
                    config.fixture_taken_nicknames.clone(),
                    latency,
                )),
                password_verifier,
                signup: accounts.clone(),
                login: accounts.clone(),
                password_change: Arc::new(FixturePasswordChange::new(latency)),
                profile_update: accounts,
                child_store,
                clock,
                kakao_default_nickname,
            }
        }
    };

    Ok(deps)
}
