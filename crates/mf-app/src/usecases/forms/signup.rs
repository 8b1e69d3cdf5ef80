//! Local signup form.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};

use mf_core::account::{Agreement, Agreements, OAuthProvider, SignupRequest, SubmissionReceipt};
use mf_core::form::{FormSnapshot, SubmissionGate};
use mf_core::ports::{DuplicateCheckPort, SignupPort};
use mf_core::validation::{
    extract_phone_numbers, format_phone_input, process_address_data, validate_password,
    AddressData, NicknamePolicy,
};
use mf_core::{
    FieldKind, FormState, SubmissionError, ValidationContext, ValidationVerdict, ValidatorRegistry,
};

use super::gated::{begin_check, finish_check, CheckStart};
use super::{SessionLiveness, DEFAULT_ROLE};
use crate::usecases::CheckDuplicate;

const SIGNUP_REJECTED_MESSAGE: &str = "회원가입에 실패했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignupField {
    Name,
    LoginId,
    Password,
    PasswordConfirm,
    Nickname,
    Email,
    Phone,
    Address,
}

impl SignupField {
    pub const ALL: [SignupField; 8] = [
        SignupField::Name,
        SignupField::LoginId,
        SignupField::Password,
        SignupField::PasswordConfirm,
        SignupField::Nickname,
        SignupField::Email,
        SignupField::Phone,
        SignupField::Address,
    ];

    /// Nickname is optional; everything else must be filled in.
    const REQUIRED: [SignupField; 7] = [
        SignupField::Name,
        SignupField::LoginId,
        SignupField::Password,
        SignupField::PasswordConfirm,
        SignupField::Email,
        SignupField::Phone,
        SignupField::Address,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            SignupField::Name => FieldKind::Name,
            SignupField::LoginId => FieldKind::LoginId,
            SignupField::Password => FieldKind::Password,
            SignupField::PasswordConfirm => FieldKind::PasswordConfirm,
            SignupField::Nickname => FieldKind::Nickname,
            SignupField::Email => FieldKind::Email,
            SignupField::Phone => FieldKind::Phone,
            SignupField::Address => FieldKind::Address,
        }
    }
}

struct SignupState {
    form: FormState<SignupField>,
    agreements: Agreements,
}

impl SignupState {
    fn new() -> Self {
        Self {
            form: FormState::new(&SignupField::ALL),
            agreements: Agreements::default(),
        }
    }

    fn local_verdict(&self, field: SignupField) -> ValidationVerdict {
        let form = &self.form;
        match field {
            SignupField::Password | SignupField::PasswordConfirm => validate_password(
                form.value(SignupField::Password),
                form.value(SignupField::PasswordConfirm),
            ),
            other => {
                let ctx = ValidationContext::new().with_nickname_policy(NicknamePolicy::Signup);
                ValidatorRegistry::evaluate(other.kind(), form.value(other), &ctx)
            }
        }
    }

    fn checks_passed(&self) -> bool {
        let tracker = &self.form.tracker;
        let nickname_ok = self.form.fields.is_blank(SignupField::Nickname)
            || tracker.is_checked(SignupField::Nickname);

        self.agreements.required_given()
            && tracker.is_checked(SignupField::LoginId)
            && tracker.is_checked(SignupField::Email)
            && nickname_ok
            && tracker.is_success(SignupField::PasswordConfirm)
    }

    fn gate(&self) -> SubmissionGate {
        self.form.gate(&SignupField::REQUIRED, self.checks_passed())
    }

    fn request(&self) -> SignupRequest {
        let value = |field| self.form.value(field).to_string();
        let nickname = value(SignupField::Nickname);
        SignupRequest {
            login_id: value(SignupField::LoginId),
            password: Some(value(SignupField::Password)),
            name: value(SignupField::Name),
            email: value(SignupField::Email),
            phone_number: extract_phone_numbers(self.form.value(SignupField::Phone)),
            nickname: (!nickname.trim().is_empty()).then_some(nickname),
            address: value(SignupField::Address),
            oauth_provider: OAuthProvider::Local,
            is_terms_agreed: self.agreements.terms,
            is_privacy_agreed: self.agreements.privacy,
            agreements: self.agreements,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

/// Session behind the local signup page.
///
/// Login ID and email must pass the duplicate check; nickname only when it
/// is filled in. A successful submission completes the session.
pub struct SignupSession {
    state: Mutex<SignupState>,
    liveness: SessionLiveness,
    check_duplicate: CheckDuplicate,
    signup: Arc<dyn SignupPort>,
}

impl SignupSession {
    pub fn new(duplicate_check: Arc<dyn DuplicateCheckPort>, signup: Arc<dyn SignupPort>) -> Self {
        Self {
            state: Mutex::new(SignupState::new()),
            liveness: SessionLiveness::mounted(),
            check_duplicate: CheckDuplicate::new(duplicate_check),
            signup,
        }
    }

    /// Stores `value` and re-runs the local validator of `field`.
    ///
    /// Phone input is reformatted as `010-1234-5678`; an edit that would
    /// exceed eleven digits is ignored.
    pub async fn set_field(&self, field: SignupField, value: &str) -> ValidationVerdict {
        let mut state = self.state.lock().await;

        let value = match field {
            SignupField::Phone => match format_phone_input(value) {
                Some(formatted) => formatted,
                None => {
                    debug!("phone edit exceeds eleven digits; ignored");
                    return state.form.verdict(field);
                }
            },
            _ => value.to_string(),
        };

        state.form.set_field(field, value);
        if matches!(field, SignupField::Password | SignupField::PasswordConfirm) {
            let strength = ValidatorRegistry::evaluate(
                FieldKind::Password,
                state.form.value(SignupField::Password),
                &ValidationContext::new(),
            );
            let combined = state.local_verdict(SignupField::PasswordConfirm);
            state.form.set_verdict(SignupField::Password, strength);
            state.form.set_verdict(SignupField::PasswordConfirm, combined);
        } else {
            let verdict = state.local_verdict(field);
            state.form.set_verdict(field, verdict);
        }
        state.form.verdict(field)
    }

    /// Fills the address from a postcode lookup, composing the lot-number
    /// address with its building descriptors.
    pub async fn set_address_from_lookup(&self, data: &AddressData) -> ValidationVerdict {
        let address = process_address_data(data, false);
        self.set_field(SignupField::Address, &address).await
    }

    pub async fn set_agreement(&self, agreement: Agreement, value: bool) {
        self.state.lock().await.agreements.set(agreement, value);
    }

    pub async fn set_all_agreements(&self, value: bool) {
        self.state.lock().await.agreements.set_all(value);
    }

    pub async fn agreements(&self) -> Agreements {
        self.state.lock().await.agreements
    }

    /// Runs the duplicate check for login ID, email or nickname.
    ///
    /// While a check for the field is pending, further calls return the
    /// loading verdict without reaching the backend.
    pub async fn check_duplicate(&self, field: SignupField) -> ValidationVerdict {
        let kind = field.kind();
        let pending = {
            let mut state = self.state.lock().await;
            if !kind.supports_duplicate_check() {
                warn!(field = %kind, "field has no duplicate check");
                return state.form.verdict(field);
            }
            let local = state.local_verdict(field);
            match begin_check(&mut state.form, field, local, &self.liveness) {
                CheckStart::Settled(verdict) => return verdict,
                CheckStart::Started(pending) => pending,
            }
        };

        let verdict = self.check_duplicate.execute(kind, &pending.value).await;

        let mut state = self.state.lock().await;
        finish_check(&mut state.form, field, pending, verdict, &self.liveness)
    }

    pub async fn verdict(&self, field: SignupField) -> ValidationVerdict {
        self.state.lock().await.form.verdict(field)
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.gate().is_open()
    }

    pub async fn snapshot(&self) -> FormSnapshot<SignupField> {
        let state = self.state.lock().await;
        state.form.snapshot(state.gate().is_open())
    }

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
            state.request()
        };

        let span = info_span!("usecase.signup.submit", login_id = %request.login_id);
        let result = self.signup.signup(&request).instrument(span).await;

        let mut state = self.state.lock().await;
        state.form.finish_submit();
        match result {
            Ok(receipt) if receipt.success => {
                info!(login_id = %request.login_id, "signup completed");
                state.form.latch();
                Ok(receipt)
            }
            Ok(receipt) => {
                warn!(reason = %receipt.message, "signup rejected");
                let message = if receipt.message.trim().is_empty() {
                    SIGNUP_REJECTED_MESSAGE.to_string()
                } else {
                    receipt.message
                };
                Err(SubmissionError::Rejected(message))
            }
            Err(err) => {
                error!(error = ?err, "signup request failed");
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    /// Clears every value, verdict and agreement and lifts the completed
    /// latch.
    pub async fn reset(&self) {
        *self.state.lock().await = SignupState::new();
    }
}
