//! Additional information asked from users arriving through kakao login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use mf_core::account::{Agreements, OAuthProvider, SignupRequest, SubmissionReceipt};
use mf_core::form::{FormSnapshot, SubmissionGate};
use mf_core::ports::{DuplicateCheckPort, SignupPort};
use mf_core::validation::{process_address_data, AddressData, NicknamePolicy};
use mf_core::{
    FieldKind, FormState, SubmissionError, ValidationContext, ValidationVerdict, ValidatorRegistry,
};

use super::gated::{begin_check, finish_check, CheckStart};
use super::{SessionLiveness, DEFAULT_ROLE};
use crate::usecases::CheckDuplicate;

const SIGNUP_REJECTED_MESSAGE: &str = "회원가입에 실패했습니다.";

/// What the kakao login handed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoProfile {
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdditionalInfoField {
    Name,
    Nickname,
    Address,
}

impl AdditionalInfoField {
    pub const ALL: [AdditionalInfoField; 3] = [
        AdditionalInfoField::Name,
        AdditionalInfoField::Nickname,
        AdditionalInfoField::Address,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            AdditionalInfoField::Name => FieldKind::Name,
            AdditionalInfoField::Nickname => FieldKind::Nickname,
            AdditionalInfoField::Address => FieldKind::Address,
        }
    }
}

struct AdditionalInfoState {
    form: FormState<AdditionalInfoField>,
    privacy_agreed: bool,
}

impl AdditionalInfoState {
    fn new(default_nickname: &str) -> Self {
        let mut state = Self {
            form: FormState::new(&AdditionalInfoField::ALL),
            privacy_agreed: false,
        };
        state
            .form
            .set_field(AdditionalInfoField::Nickname, default_nickname);
        let verdict = state.local_verdict(AdditionalInfoField::Nickname, default_nickname);
        state.form.set_verdict(AdditionalInfoField::Nickname, verdict);
        state
    }

    fn local_verdict(&self, field: AdditionalInfoField, default_nickname: &str) -> ValidationVerdict {
        let ctx = ValidationContext::new()
            .with_nickname_policy(NicknamePolicy::ProviderDefault(default_nickname));
        ValidatorRegistry::evaluate(field.kind(), self.form.value(field), &ctx)
    }

    fn gate(&self) -> SubmissionGate {
        let checks_passed =
            self.privacy_agreed && self.form.tracker.is_checked(AdditionalInfoField::Nickname);
        self.form.gate(&AdditionalInfoField::ALL, checks_passed)
    }
}

/// Session behind the kakao additional-info page.
///
/// The nickname starts as the provider's nickname, which is accepted
/// without a duplicate check. Any other nickname must pass one.
pub struct AdditionalInfoSession {
    state: Mutex<AdditionalInfoState>,
    liveness: SessionLiveness,
    profile: KakaoProfile,
    default_nickname: String,
    check_duplicate: CheckDuplicate,
    signup: Arc<dyn SignupPort>,
}

impl AdditionalInfoSession {
    /// `fallback_nickname` stands in when the kakao profile carries no
    /// nickname.
    pub fn new(
        profile: KakaoProfile,
        fallback_nickname: &str,
        duplicate_check: Arc<dyn DuplicateCheckPort>,
        signup: Arc<dyn SignupPort>,
    ) -> Self {
        let default_nickname = profile
            .nickname
            .clone()
            .filter(|nickname| !nickname.trim().is_empty())
            .unwrap_or_else(|| fallback_nickname.to_string());
        Self {
            state: Mutex::new(AdditionalInfoState::new(&default_nickname)),
            liveness: SessionLiveness::mounted(),
            profile,
            default_nickname,
            check_duplicate: CheckDuplicate::new(duplicate_check),
            signup,
        }
    }

    pub fn default_nickname(&self) -> &str {
        &self.default_nickname
    }

    pub async fn set_field(&self, field: AdditionalInfoField, value: &str) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.form.set_field(field, value);
        let verdict = state.local_verdict(field, &self.default_nickname);
        state.form.set_verdict(field, verdict.clone());
        verdict
    }

    /// Fills the address from a postcode lookup, preferring the road
    /// address.
    pub async fn set_address_from_lookup(&self, data: &AddressData) -> ValidationVerdict {
        let address = process_address_data(data, true);
        self.set_field(AdditionalInfoField::Address, &address).await
    }

    pub async fn set_privacy_agreement(&self, agreed: bool) {
        self.state.lock().await.privacy_agreed = agreed;
    }

    /// Duplicate check for a nickname other than the provider's.
    pub async fn check_nickname(&self) -> ValidationVerdict {
        let field = AdditionalInfoField::Nickname;
        let pending = {
            let mut state = self.state.lock().await;
            let local = state.local_verdict(field, &self.default_nickname);
            match begin_check(&mut state.form, field, local, &self.liveness) {
                CheckStart::Settled(verdict) => return verdict,
                CheckStart::Started(pending) => pending,
            }
        };

        let verdict = self
            .check_duplicate
            .execute(FieldKind::Nickname, &pending.value)
            .await;

        let mut state = self.state.lock().await;
        finish_check(&mut state.form, field, pending, verdict, &self.liveness)
    }

    pub async fn verdict(&self, field: AdditionalInfoField) -> ValidationVerdict {
        self.state.lock().await.form.verdict(field)
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.gate().is_open()
    }

    pub async fn snapshot(&self) -> FormSnapshot<AdditionalInfoField> {
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
            self.request(&state)
        };

        let span = info_span!("usecase.additional_info.submit", email = %request.email);
        let result = self.signup.signup(&request).instrument(span).await;

        let mut state = self.state.lock().await;
        state.form.finish_submit();
        match result {
            Ok(receipt) if receipt.success => {
                info!(email = %request.email, "kakao signup completed");
                state.form.latch();
                Ok(receipt)
            }
            Ok(receipt) => {
                warn!(reason = %receipt.message, "kakao signup rejected");
                let message = if receipt.message.trim().is_empty() {
                    SIGNUP_REJECTED_MESSAGE.to_string()
                } else {
                    receipt.message
                };
                Err(SubmissionError::Rejected(message))
            }
            Err(err) => {
                error!(error = ?err, "kakao signup request failed");
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    // The single consent checkbox on this page covers terms and privacy.
    fn request(&self, state: &AdditionalInfoState) -> SignupRequest {
        let value = |field| state.form.value(field).to_string();
        let agreements = Agreements {
            terms: state.privacy_agreed,
            privacy: state.privacy_agreed,
            ..Agreements::default()
        };
        SignupRequest {
            login_id: self.profile.email.clone(),
            password: None,
            name: value(AdditionalInfoField::Name),
            email: self.profile.email.clone(),
            phone_number: String::new(),
            nickname: Some(value(AdditionalInfoField::Nickname)),
            address: value(AdditionalInfoField::Address),
            oauth_provider: OAuthProvider::Kakao,
            is_terms_agreed: agreements.terms,
            is_privacy_agreed: agreements.privacy,
            agreements,
            role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    /// Back to the provider nickname with everything else cleared.
    pub async fn reset(&self) {
        *self.state.lock().await = AdditionalInfoState::new(&self.default_nickname);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::forms::test_support::{FakeDuplicateCheck, FakeSignup, Outcome};

    fn profile(nickname: Option<&str>) -> KakaoProfile {
        KakaoProfile {
            email: "kakaouser@kakao.com".into(),
            nickname: nickname.map(str::to_string),
        }
    }

    fn session(
        nickname: Option<&str>,
        duplicates: Arc<FakeDuplicateCheck>,
        signup: Arc<FakeSignup>,
    ) -> AdditionalInfoSession {
        AdditionalInfoSession::new(profile(nickname), "카카오닉네임", duplicates, signup)
    }

    #[tokio::test]
    async fn provider_nickname_is_confirmed_up_front() {
        let duplicates = Arc::new(FakeDuplicateCheck::available());
        let session = session(
            Some("맘넥트카카오"),
            duplicates.clone(),
            Arc::new(FakeSignup::new(Outcome::Accept)),
        );

        let verdict = session.verdict(AdditionalInfoField::Nickname).await;
        assert!(verdict.checked());
        assert_eq!(verdict.message(), "✅ 카카오 닉네임이 설정되었습니다");

        let checked = session.check_nickname().await;
        assert!(checked.checked());
        assert!(duplicates.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_provider_nickname_falls_back() {
        let session = session(
            None,
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeSignup::new(Outcome::Accept)),
        );

        assert_eq!(session.default_nickname(), "카카오닉네임");
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.values[&AdditionalInfoField::Nickname], "카카오닉네임");
    }

    #[tokio::test]
    async fn returning_to_provider_nickname_skips_the_check() {
        let duplicates = Arc::new(FakeDuplicateCheck::available());
        let session = session(
            Some("맘넥트카카오"),
            duplicates.clone(),
            Arc::new(FakeSignup::new(Outcome::Accept)),
        );

        let changed = session.set_field(AdditionalInfoField::Nickname, "새닉네임").await;
        assert!(!changed.checked());

        let back = session
            .set_field(AdditionalInfoField::Nickname, "맘넥트카카오")
            .await;
        assert!(back.checked());
        assert!(duplicates.calls().is_empty());
    }

    #[tokio::test]
    async fn other_nickname_must_pass_duplicate_check() {
        let duplicates = Arc::new(FakeDuplicateCheck::taking(&["관리자"]));
        let session = session(
            Some("맘넥트카카오"),
            duplicates.clone(),
            Arc::new(FakeSignup::new(Outcome::Accept)),
        );

        let short = session.set_field(AdditionalInfoField::Nickname, "가").await;
        assert_eq!(short.message(), "❌ 닉네임은 2~10자여야 합니다");
        assert!(session.check_nickname().await.is_error());
        assert!(duplicates.calls().is_empty());

        session.set_field(AdditionalInfoField::Nickname, "관리자").await;
        let taken = session.check_nickname().await;
        assert_eq!(taken.message(), "❌ 이미 사용 중입니다");

        session.set_field(AdditionalInfoField::Nickname, "새닉네임").await;
        let free = session.check_nickname().await;
        assert_eq!(free.message(), "✅ 사용 가능한 닉네임입니다");
        assert_eq!(duplicates.calls().len(), 2);
    }

    #[tokio::test]
    async fn submission_sends_kakao_request() {
        let signup = Arc::new(FakeSignup::new(Outcome::Accept));
        let session = session(
            Some("맘넥트카카오"),
            Arc::new(FakeDuplicateCheck::available()),
            signup.clone(),
        );
        session.set_field(AdditionalInfoField::Name, "김엄마").await;
        session
            .set_address_from_lookup(&AddressData {
                road_address: "서울 강남구 테헤란로 1".into(),
                ..AddressData::default()
            })
            .await;
        assert!(!session.is_submittable().await);

        session.set_privacy_agreement(true).await;
        assert!(session.is_submittable().await);

        session.submit().await.unwrap();

        let request = &signup.requests()[0];
        assert_eq!(request.oauth_provider, OAuthProvider::Kakao);
        assert_eq!(request.password, None);
        assert_eq!(request.nickname.as_deref(), Some("맘넥트카카오"));
        assert_eq!(request.address, "서울 강남구 테헤란로 1");
        assert!(request.is_privacy_agreed);
        assert!(matches!(
            session.submit().await,
            Err(SubmissionError::AlreadyCompleted)
        ));
    }

    #[tokio::test]
    async fn reset_restores_provider_nickname() {
        let session = session(
            Some("맘넥트카카오"),
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeSignup::new(Outcome::Accept)),
        );
        session.set_field(AdditionalInfoField::Nickname, "새닉네임").await;

        session.reset().await;

        assert!(session.verdict(AdditionalInfoField::Nickname).await.checked());
    }
}
