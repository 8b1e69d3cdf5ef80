//! Login form.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, Instrument};

use mf_core::account::LoginRequest;
use mf_core::form::FormSnapshot;
use mf_core::ports::LoginPort;
use mf_core::{FormState, SubmissionError};

use super::SessionLiveness;

const MISSING_CREDENTIALS_MESSAGE: &str = "❌ 아이디와 비밀번호를 모두 입력해주세요.";
const LOGIN_REFUSED_MESSAGE: &str = "❌ 로그인 실패: 아이디 또는 비밀번호를 확인해주세요.";
const LOGIN_FAILED_MESSAGE: &str = "❌ 로그인 중 오류가 발생했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginField {
    LoginId,
    Password,
}

impl LoginField {
    pub const ALL: [LoginField; 2] = [LoginField::LoginId, LoginField::Password];
}

struct LoginState {
    form: FormState<LoginField>,
    error_message: Option<String>,
}

impl LoginState {
    fn new() -> Self {
        Self {
            form: FormState::new(&LoginField::ALL),
            error_message: None,
        }
    }

    fn is_submittable(&self) -> bool {
        self.form.gate(&LoginField::ALL, true).is_open()
    }
}

/// Session behind the login page. No field is validated beyond presence;
/// the backend decides.
pub struct LoginSession {
    state: Mutex<LoginState>,
    liveness: SessionLiveness,
    login: Arc<dyn LoginPort>,
}

impl LoginSession {
    pub fn new(login: Arc<dyn LoginPort>) -> Self {
        Self {
            state: Mutex::new(LoginState::new()),
            liveness: SessionLiveness::mounted(),
            login,
        }
    }

    /// Stores `value` and clears the previous login error.
    pub async fn set_field(&self, field: LoginField, value: &str) {
        let mut state = self.state.lock().await;
        state.form.set_field(field, value);
        state.error_message = None;
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error_message.clone()
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.is_submittable()
    }

    pub async fn snapshot(&self) -> FormSnapshot<LoginField> {
        let state = self.state.lock().await;
        state.form.snapshot(state.is_submittable())
    }

    /// Logs in with the current credentials. Every failure also leaves its
    /// message in [`LoginSession::error_message`].
    pub async fn submit(&self) -> Result<(), SubmissionError> {
        let request = {
            let mut state = self.state.lock().await;
            if !self.liveness.is_mounted() {
                return Err(SubmissionError::SessionClosed);
            }
            if state.form.submit_in_flight() {
                return Err(SubmissionError::InFlight);
            }
            if !state.is_submittable() {
                state.error_message = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
                return Err(SubmissionError::NotSubmittable);
            }
            state.form.begin_submit();
            state.error_message = None;
            LoginRequest {
                login_id: state.form.value(LoginField::LoginId).to_string(),
                password: state.form.value(LoginField::Password).to_string(),
            }
        };

        let span = info_span!("usecase.login.submit", login_id = %request.login_id);
        let result = self.login.login(&request).instrument(span).await;

        let mut state = self.state.lock().await;
        state.form.finish_submit();
        match result {
            Ok(true) => {
                info!(login_id = %request.login_id, "login succeeded");
                Ok(())
            }
            Ok(false) => {
                info!(login_id = %request.login_id, "login refused");
                state.error_message = Some(LOGIN_REFUSED_MESSAGE.to_string());
                Err(SubmissionError::Rejected(LOGIN_REFUSED_MESSAGE.to_string()))
            }
            Err(err) => {
                error!(error = ?err, "login request failed");
                state.error_message = Some(LOGIN_FAILED_MESSAGE.to_string());
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    pub async fn reset(&self) {
        *self.state.lock().await = LoginState::new();
    }
}
