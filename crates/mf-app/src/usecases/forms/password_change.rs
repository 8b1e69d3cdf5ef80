//! Password change form.
//!
//! The current password is a gated field: it has to be verified before the
//! change can be submitted, and any edit drops the verification again.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use mf_core::account::{PasswordChangeRequest, SubmissionReceipt};
use mf_core::form::{FormSnapshot, SubmissionGate};
use mf_core::ports::{CurrentPasswordVerifierPort, PasswordChangePort};
use mf_core::validation::{validate_password_match, validate_password_strength};
use mf_core::{
    FormState, GatedFieldEvent, GatedFieldStateMachine, SubmissionError, ValidationVerdict,
};

use super::gated::{begin_check, finish_check, CheckStart};
use super::SessionLiveness;
use crate::usecases::VerifyCurrentPassword;

const CURRENT_PASSWORD_MISSING: &str = "현재 비밀번호를 입력해주세요";
const CHANGED_MESSAGE: &str = "비밀번호가 성공적으로 변경되었습니다.";
const CHANGE_REJECTED_MESSAGE: &str = "비밀번호 변경에 실패했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PasswordChangeField {
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}

impl PasswordChangeField {
    pub const ALL: [PasswordChangeField; 3] = [
        PasswordChangeField::CurrentPassword,
        PasswordChangeField::NewPassword,
        PasswordChangeField::ConfirmPassword,
    ];
}

struct PasswordChangeState {
    form: FormState<PasswordChangeField>,
}

impl PasswordChangeState {
    fn new() -> Self {
        Self {
            form: FormState::new(&PasswordChangeField::ALL),
        }
    }

    fn gate(&self) -> SubmissionGate {
        let tracker = &self.form.tracker;
        let checks_passed = tracker.is_checked(PasswordChangeField::CurrentPassword)
            && tracker.is_success(PasswordChangeField::NewPassword)
            && tracker.is_success(PasswordChangeField::ConfirmPassword);
        self.form.gate(&PasswordChangeField::ALL, checks_passed)
    }

    fn revalidate_confirm(&mut self) {
        let confirm = self.form.value(PasswordChangeField::ConfirmPassword);
        let verdict = if confirm.trim().is_empty() {
            ValidationVerdict::default()
        } else {
            validate_password_match(self.form.value(PasswordChangeField::NewPassword), confirm)
                .into_verdict()
        };
        self.form
            .set_verdict(PasswordChangeField::ConfirmPassword, verdict);
    }
}

pub struct PasswordChangeSession {
    state: Mutex<PasswordChangeState>,
    liveness: SessionLiveness,
    verify: VerifyCurrentPassword,
    change: Arc<dyn PasswordChangePort>,
}

impl PasswordChangeSession {
    pub fn new(
        verifier: Arc<dyn CurrentPasswordVerifierPort>,
        change: Arc<dyn PasswordChangePort>,
    ) -> Self {
        Self {
            state: Mutex::new(PasswordChangeState::new()),
            liveness: SessionLiveness::mounted(),
            verify: VerifyCurrentPassword::new(verifier),
            change,
        }
    }

    /// Stores `value` and updates the verdicts it affects. A new password
    /// also re-checks a confirmation that is already filled in.
    pub async fn set_field(&self, field: PasswordChangeField, value: &str) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        let previous = state.form.verdict(field).status();
        state.form.set_field(field, value);

        match field {
            PasswordChangeField::CurrentPassword => {
                let (next, _) =
                    GatedFieldStateMachine::transition(previous, GatedFieldEvent::Edited);
                debug_assert_eq!(next, state.form.verdict(field).status());
            }
            PasswordChangeField::NewPassword => {
                let verdict = if value.trim().is_empty() {
                    ValidationVerdict::default()
                } else {
                    validate_password_strength(value).outcome().into_verdict()
                };
                state.form.set_verdict(field, verdict);
                state.revalidate_confirm();
            }
            PasswordChangeField::ConfirmPassword => state.revalidate_confirm(),
        }
        state.form.verdict(field)
    }

    /// Verifies the current password; the gateway is not called for a
    /// blank value or while a verification is pending.
    pub async fn verify_current_password(&self) -> ValidationVerdict {
        let field = PasswordChangeField::CurrentPassword;
        let pending = {
            let mut state = self.state.lock().await;
            let local = if state.form.fields.is_blank(field) {
                ValidationVerdict::error(CURRENT_PASSWORD_MISSING)
            } else {
                ValidationVerdict::default()
            };
            match begin_check(&mut state.form, field, local, &self.liveness) {
                CheckStart::Settled(verdict) => return verdict,
                CheckStart::Started(pending) => pending,
            }
        };

        let verdict = self.verify.execute(&pending.value).await;

        let mut state = self.state.lock().await;
        finish_check(&mut state.form, field, pending, verdict, &self.liveness)
    }

    pub async fn verdict(&self, field: PasswordChangeField) -> ValidationVerdict {
        self.state.lock().await.form.verdict(field)
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.gate().is_open()
    }

    pub async fn snapshot(&self) -> FormSnapshot<PasswordChangeField> {
        let state = self.state.lock().await;
        state.form.snapshot(state.gate().is_open())
    }

    /// Changes the password. Succeeds at most once per session.
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmissionError> {
        let request = {
            let mut state = self.state.lock().await;
            if !self.liveness.is_mounted() {
                return Err(SubmissionError::SessionClosed);
            }
            if state.form.is_latched() {
                return Err(SubmissionError::AlreadyCompleted);
            }
            if state.form.submit_in_flight() {
                return Err(SubmissionError::InFlight);
            }
            if !state.gate().is_open() {
                return Err(SubmissionError::NotSubmittable);
            }
            state.form.begin_submit();
            let value = |field| state.form.value(field).to_string();
            PasswordChangeRequest {
                current_password: value(PasswordChangeField::CurrentPassword),
                new_password: value(PasswordChangeField::NewPassword),
                new_password_confirm: value(PasswordChangeField::ConfirmPassword),
            }
        };

        let span = info_span!("usecase.password_change.submit");
        let result = self.change.change_password(&request).instrument(span).await;

        let mut state = self.state.lock().await;
        state.form.finish_submit();
        match result {
            Ok(receipt) if receipt.success => {
                info!("password changed");
                state.form.latch();
                if receipt.message.trim().is_empty() {
                    Ok(SubmissionReceipt::accepted(CHANGED_MESSAGE))
                } else {
                    Ok(receipt)
                }
            }
            Ok(receipt) => {
                warn!(reason = %receipt.message, "password change rejected");
                let message = if receipt.message.trim().is_empty() {
                    CHANGE_REJECTED_MESSAGE.to_string()
                } else {
                    receipt.message
                };
                Err(SubmissionError::Rejected(message))
            }
            Err(err) => {
                error!(error = ?err, "password change request failed");
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    pub async fn reset(&self) {
        *self.state.lock().await = PasswordChangeState::new();
    }
}
