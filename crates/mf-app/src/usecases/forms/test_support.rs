//! Hand-written port doubles for the session tests.
//!
//! mockall expectations cannot park a call half-way, so the doubles here
//! can be held on a [`Hold`] to observe a session while a gateway call is
//! pending.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use mf_core::account::{
    LoginRequest, PasswordChangeRequest, ProfileInfo, SignupRequest, SubmissionReceipt,
};
use mf_core::child::ChildRecord;
use mf_core::ports::{
    ChildProfilePort, ClockPort, CurrentPasswordVerifierPort, DuplicateCheckPort,
    DuplicateCheckResponse, LoginPort, PasswordChangePort, PasswordVerification,
    ProfileUpdatePort, SignupPort,
};
use mf_core::FieldKind;

/// Parks a gateway call until the test releases it.
#[derive(Default)]
pub struct Hold {
    started: Notify,
    release: Notify,
}

impl Hold {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }
}

async fn pass(hold: &Option<Arc<Hold>>) {
    if let Some(hold) = hold {
        hold.pass().await;
    }
}

/// How a fake backend answers.
#[derive(Debug, Clone)]
pub enum Outcome {
    Accept,
    Reject(&'static str),
    Fail,
}

impl Outcome {
    fn receipt(&self) -> anyhow::Result<SubmissionReceipt> {
        match self {
            Outcome::Accept => Ok(SubmissionReceipt::accepted("ok")),
            Outcome::Reject(message) => Ok(SubmissionReceipt::rejected(*message)),
            Outcome::Fail => Err(anyhow::anyhow!("backend unreachable")),
        }
    }
}

pub struct FakeDuplicateCheck {
    taken: Vec<String>,
    fail: bool,
    hold: Option<Arc<Hold>>,
    calls: Mutex<Vec<(FieldKind, String)>>,
}

impl FakeDuplicateCheck {
    pub fn available() -> Self {
        Self::taking(&[])
    }

    pub fn taking(taken: &[&str]) -> Self {
        Self {
            taken: taken.iter().map(|v| v.to_string()).collect(),
            fail: false,
            hold: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::available()
        }
    }

    pub fn held(mut self, hold: Arc<Hold>) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn calls(&self) -> Vec<(FieldKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DuplicateCheckPort for FakeDuplicateCheck {
    async fn check_duplicate(
        &self,
        kind: FieldKind,
        value: &str,
    ) -> anyhow::Result<DuplicateCheckResponse> {
        self.calls.lock().unwrap().push((kind, value.to_string()));
        pass(&self.hold).await;
        if self.fail {
            return Err(anyhow::anyhow!("duplicate check backend down"));
        }
        let is_duplicate = self.taken.iter().any(|taken| taken == value);
        Ok(DuplicateCheckResponse {
            success: true,
            is_duplicate,
            message: if is_duplicate {
                "이미 사용 중입니다".into()
            } else {
                "사용 가능합니다".into()
            },
        })
    }
}

pub struct FakeSignup {
    outcome: Outcome,
    hold: Option<Arc<Hold>>,
    requests: Mutex<Vec<SignupRequest>>,
}

impl FakeSignup {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            hold: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn held(mut self, hold: Arc<Hold>) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn requests(&self) -> Vec<SignupRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignupPort for FakeSignup {
    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<SubmissionReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        pass(&self.hold).await;
        self.outcome.receipt()
    }
}

pub struct FakeLogin {
    accepts: Option<bool>,
    requests: Mutex<Vec<LoginRequest>>,
}

impl FakeLogin {
    pub fn accepting() -> Self {
        Self::with(Some(true))
    }

    pub fn refusing() -> Self {
        Self::with(Some(false))
    }

    pub fn failing() -> Self {
        Self::with(None)
    }

    fn with(accepts: Option<bool>) -> Self {
        Self {
            accepts,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LoginRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoginPort for FakeLogin {
    async fn login(&self, request: &LoginRequest) -> anyhow::Result<bool> {
        self.requests.lock().unwrap().push(request.clone());
        self.accepts
            .ok_or_else(|| anyhow::anyhow!("login backend down"))
    }
}

pub struct FakeVerifier {
    password: &'static str,
    fail: bool,
    hold: Option<Arc<Hold>>,
    calls: Mutex<usize>,
}

impl FakeVerifier {
    pub fn accepting(password: &'static str) -> Self {
        Self {
            password,
            fail: false,
            hold: None,
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::accepting("")
        }
    }

    pub fn held(mut self, hold: Arc<Hold>) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CurrentPasswordVerifierPort for FakeVerifier {
    async fn verify(&self, current_password: &str) -> anyhow::Result<PasswordVerification> {
        *self.calls.lock().unwrap() += 1;
        pass(&self.hold).await;
        if self.fail {
            return Err(anyhow::anyhow!("verifier down"));
        }
        let is_valid = current_password == self.password;
        Ok(PasswordVerification {
            is_valid,
            message: if is_valid {
                "현재 비밀번호가 확인되었습니다".into()
            } else {
                "현재 비밀번호가 일치하지 않습니다".into()
            },
        })
    }
}

pub struct FakePasswordChange {
    outcome: Outcome,
    requests: Mutex<Vec<PasswordChangeRequest>>,
}

impl FakePasswordChange {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PasswordChangeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasswordChangePort for FakePasswordChange {
    async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> anyhow::Result<SubmissionReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.receipt()
    }
}

pub struct FakeProfileUpdate {
    outcome: Outcome,
    requests: Mutex<Vec<ProfileInfo>>,
}

impl FakeProfileUpdate {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProfileInfo> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileUpdatePort for FakeProfileUpdate {
    async fn update_profile(&self, profile: &ProfileInfo) -> anyhow::Result<SubmissionReceipt> {
        self.requests.lock().unwrap().push(profile.clone());
        self.outcome.receipt()
    }
}

pub struct FakeChildStore {
    fail: bool,
    hold: Option<Arc<Hold>>,
    saved: Mutex<Vec<Vec<ChildRecord>>>,
}

impl FakeChildStore {
    pub fn new() -> Self {
        Self {
            fail: false,
            hold: None,
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn held(mut self, hold: Arc<Hold>) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn saved(&self) -> Vec<Vec<ChildRecord>> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChildProfilePort for FakeChildStore {
    async fn save_children(&self, children: &[ChildRecord]) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(children.to_vec());
        pass(&self.hold).await;
        if self.fail {
            return Err(anyhow::anyhow!("child store down"));
        }
        Ok(())
    }
}

pub struct FixedClock(pub NaiveDate);

impl ClockPort for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
