//! In-memory gateways for running the forms without a user service.
//!
//! Each fixture sleeps for the configured latency before answering so the
//! sessions go through their loading states the same way they do against
//! the real backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use mf_core::account::{
    LoginRequest, PasswordChangeRequest, ProfileInfo, SignupRequest, SubmissionReceipt,
};
use mf_core::child::ChildRecord;
use mf_core::ports::{
    ChildProfilePort, CurrentPasswordVerifierPort, DuplicateCheckPort, DuplicateCheckResponse,
    LoginPort, PasswordChangePort, PasswordVerification, ProfileUpdatePort, SignupPort,
};
use mf_core::FieldKind;

pub const DEFAULT_TAKEN_NICKNAMES: [&str; 3] = ["관리자", "테스트", "admin"];
pub const DEFAULT_CURRENT_PASSWORD: &str = "correct123";

const TAKEN_MESSAGE: &str = "이미 사용 중입니다";
const AVAILABLE_MESSAGE: &str = "사용 가능합니다";
const PASSWORD_MATCH_MESSAGE: &str = "현재 비밀번호가 확인되었습니다";
const PASSWORD_MISMATCH_MESSAGE: &str = "현재 비밀번호가 일치하지 않습니다";
const PASSWORD_CHANGED_MESSAGE: &str = "비밀번호가 성공적으로 변경되었습니다.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Answers duplicate checks from a fixed list of taken nicknames.
/// Login IDs and emails are always available.
pub struct FixtureNicknameRegistry {
    taken: Vec<String>,
    latency: Latency,
}

impl FixtureNicknameRegistry {
    pub fn new(taken: Vec<String>, latency: Latency) -> Self {
        let taken = if taken.is_empty() {
            DEFAULT_TAKEN_NICKNAMES.iter().map(|s| s.to_string()).collect()
        } else {
            taken
        };
        Self { taken, latency }
    }

    pub fn taken(&self) -> &[String] {
        &self.taken
    }
}

#[async_trait]
impl DuplicateCheckPort for FixtureNicknameRegistry {
    async fn check_duplicate(
        &self,
        kind: FieldKind,
        value: &str,
    ) -> anyhow::Result<DuplicateCheckResponse> {
        self.latency.wait().await;
        let is_duplicate =
            kind == FieldKind::Nickname && self.taken.iter().any(|taken| taken == value);
        debug!(kind = %kind, is_duplicate, "Fixture duplicate check");
        Ok(DuplicateCheckResponse {
            success: true,
            is_duplicate,
            message: if is_duplicate { TAKEN_MESSAGE } else { AVAILABLE_MESSAGE }.to_string(),
        })
    }
}

pub struct FixturePasswordVerifier {
    current_password: String,
    latency: Latency,
}

impl FixturePasswordVerifier {
    pub fn new(current_password: impl Into<String>, latency: Latency) -> Self {
        let current_password = current_password.into();
        let current_password = if current_password.is_empty() {
            DEFAULT_CURRENT_PASSWORD.to_string()
        } else {
            current_password
        };
        Self {
            current_password,
            latency,
        }
    }
}

#[async_trait]
impl CurrentPasswordVerifierPort for FixturePasswordVerifier {
    async fn verify(&self, current_password: &str) -> anyhow::Result<PasswordVerification> {
        self.latency.wait().await;
        let is_valid = current_password == self.current_password;
        Ok(PasswordVerification {
            is_valid,
            message: if is_valid {
                PASSWORD_MATCH_MESSAGE
            } else {
                PASSWORD_MISMATCH_MESSAGE
            }
            .to_string(),
        })
    }
}

/// Accepts every password change and keeps the requests.
pub struct FixturePasswordChange {
    latency: Latency,
    received: Mutex<Vec<PasswordChangeRequest>>,
}

impl FixturePasswordChange {
    pub fn new(latency: Latency) -> Self {
        Self {
            latency,
            received: Mutex::new(Vec::new()),
        }
    }

    pub async fn received(&self) -> Vec<PasswordChangeRequest> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl PasswordChangePort for FixturePasswordChange {
    async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> anyhow::Result<SubmissionReceipt> {
        self.latency.wait().await;
        self.received.lock().await.push(request.clone());
        Ok(SubmissionReceipt::accepted(PASSWORD_CHANGED_MESSAGE))
    }
}

pub struct FixtureChildStore {
    latency: Latency,
    saved: Mutex<Vec<Vec<ChildRecord>>>,
}

impl FixtureChildStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            latency,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Every saved batch, oldest first.
    pub async fn saved(&self) -> Vec<Vec<ChildRecord>> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl ChildProfilePort for FixtureChildStore {
    async fn save_children(&self, children: &[ChildRecord]) -> anyhow::Result<()> {
        self.latency.wait().await;
        debug!(count = children.len(), "Fixture saved children");
        self.saved.lock().await.push(children.to_vec());
        Ok(())
    }
}

/// Account backend kept in memory: signups register login IDs, logins are
/// checked against them, profile updates are recorded.
pub struct FixtureAccounts {
    latency: Latency,
    accounts: Mutex<HashMap<String, Option<String>>>,
    profiles: Mutex<Vec<ProfileInfo>>,
}

impl FixtureAccounts {
    pub fn new(latency: Latency) -> Self {
        Self {
            latency,
            accounts: Mutex::new(HashMap::new()),
            profiles: Mutex::new(Vec::new()),
        }
    }

    pub async fn is_registered(&self, login_id: &str) -> bool {
        self.accounts.lock().await.contains_key(login_id)
    }

    pub async fn profiles(&self) -> Vec<ProfileInfo> {
        self.profiles.lock().await.clone()
    }
}

#[async_trait]
impl SignupPort for FixtureAccounts {
    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<SubmissionReceipt> {
        self.latency.wait().await;
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&request.login_id) {
            return Ok(SubmissionReceipt::rejected("이미 가입된 아이디입니다."));
        }
        accounts.insert(request.login_id.clone(), request.password.clone());
        Ok(SubmissionReceipt::accepted("회원가입이 완료되었습니다."))
    }
}

#[async_trait]
impl LoginPort for FixtureAccounts {
    async fn login(&self, request: &LoginRequest) -> anyhow::Result<bool> {
        self.latency.wait().await;
        let accounts = self.accounts.lock().await;
        Ok(matches!(
            accounts.get(&request.login_id),
            Some(Some(password)) if *password == request.password
        ))
    }
}

#[async_trait]
impl ProfileUpdatePort for FixtureAccounts {
    async fn update_profile(&self, profile: &ProfileInfo) -> anyhow::Result<SubmissionReceipt> {
        self.latency.wait().await;
        self.profiles.lock().await.push(profile.clone());
        Ok(SubmissionReceipt::accepted("프로필이 수정되었습니다."))
    }
}
