//! Profile edit form.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use mf_core::account::{ProfileInfo, SubmissionReceipt};
use mf_core::form::{FormSnapshot, SubmissionGate};
use mf_core::ports::{DuplicateCheckPort, ProfileUpdatePort};
use mf_core::validation::{extract_phone_numbers, format_phone_number, NicknamePolicy};
use mf_core::{
    FieldKind, FormState, SubmissionError, ValidationContext, ValidationVerdict, ValidatorRegistry,
};

use super::gated::{begin_check, finish_check, CheckStart};
use super::SessionLiveness;
use crate::usecases::CheckDuplicate;

const UPDATE_REJECTED_MESSAGE: &str = "프로필 수정에 실패했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileEditField {
    Nickname,
    Email,
    Phone,
}

impl ProfileEditField {
    pub const ALL: [ProfileEditField; 3] = [
        ProfileEditField::Nickname,
        ProfileEditField::Email,
        ProfileEditField::Phone,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            ProfileEditField::Nickname => FieldKind::Nickname,
            ProfileEditField::Email => FieldKind::Email,
            ProfileEditField::Phone => FieldKind::Phone,
        }
    }
}

struct ProfileEditState {
    form: FormState<ProfileEditField>,
    /// Profile the form was opened with, or last saved.
    baseline: ProfileInfo,
}

impl ProfileEditState {
    fn new(baseline: ProfileInfo) -> Self {
        let mut form = FormState::new(&ProfileEditField::ALL);
        form.set_field(ProfileEditField::Nickname, baseline.nickname.as_str());
        form.set_field(ProfileEditField::Email, baseline.email.as_str());
        form.set_field(
            ProfileEditField::Phone,
            format_phone_number(&baseline.phone_number),
        );
        Self { form, baseline }
    }

    fn local_verdict(&self, field: ProfileEditField) -> ValidationVerdict {
        let ctx = ValidationContext::new().with_nickname_policy(NicknamePolicy::Signup);
        ValidatorRegistry::evaluate(field.kind(), self.form.value(field), &ctx)
    }

    fn is_changed(&self, field: ProfileEditField) -> bool {
        let value = self.form.value(field);
        match field {
            ProfileEditField::Nickname => value != self.baseline.nickname,
            ProfileEditField::Email => value != self.baseline.email,
            ProfileEditField::Phone => {
                extract_phone_numbers(value) != extract_phone_numbers(&self.baseline.phone_number)
            }
        }
    }

    fn has_changes(&self) -> bool {
        ProfileEditField::ALL
            .iter()
            .any(|field| self.is_changed(*field))
    }

    /// Unchanged fields pass as they are, even when blank; a changed
    /// nickname or email needs a duplicate check, a changed phone number a
    /// valid format.
    fn gate(&self) -> SubmissionGate {
        let tracker = &self.form.tracker;
        let passed = |field: ProfileEditField| {
            !self.is_changed(field)
                || match field {
                    ProfileEditField::Phone => tracker.is_success(field),
                    _ => tracker.is_checked(field),
                }
        };
        let changed: Vec<ProfileEditField> = ProfileEditField::ALL
            .into_iter()
            .filter(|field| self.is_changed(*field))
            .collect();
        let checks_passed = !changed.is_empty() && changed.iter().copied().all(passed);
        self.form.gate(&changed, checks_passed)
    }

    fn profile(&self) -> ProfileInfo {
        ProfileInfo {
            nickname: self.form.value(ProfileEditField::Nickname).to_string(),
            email: self.form.value(ProfileEditField::Email).to_string(),
            phone_number: extract_phone_numbers(self.form.value(ProfileEditField::Phone)),
        }
    }
}

/// Session behind the profile edit page, seeded with the current profile.
pub struct ProfileEditSession {
    state: Mutex<ProfileEditState>,
    liveness: SessionLiveness,
    initial: ProfileInfo,
    check_duplicate: CheckDuplicate,
    update: Arc<dyn ProfileUpdatePort>,
}

impl ProfileEditSession {
    pub fn new(
        current: ProfileInfo,
        duplicate_check: Arc<dyn DuplicateCheckPort>,
        update: Arc<dyn ProfileUpdatePort>,
    ) -> Self {
        Self {
            state: Mutex::new(ProfileEditState::new(current.clone())),
            liveness: SessionLiveness::mounted(),
            initial: current,
            check_duplicate: CheckDuplicate::new(duplicate_check),
            update,
        }
    }

    pub async fn set_field(&self, field: ProfileEditField, value: &str) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        let value = match field {
            ProfileEditField::Phone => format_phone_number(value),
            _ => value.to_string(),
        };
        state.form.set_field(field, value);
        let verdict = state.local_verdict(field);
        state.form.set_verdict(field, verdict.clone());
        verdict
    }

    pub async fn is_changed(&self, field: ProfileEditField) -> bool {
        self.state.lock().await.is_changed(field)
    }

    pub async fn has_changes(&self) -> bool {
        self.state.lock().await.has_changes()
    }

    /// Duplicate check for the nickname or the email.
    pub async fn check_duplicate(&self, field: ProfileEditField) -> ValidationVerdict {
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

    pub async fn verdict(&self, field: ProfileEditField) -> ValidationVerdict {
        self.state.lock().await.form.verdict(field)
    }

    pub async fn is_submittable(&self) -> bool {
        self.state.lock().await.gate().is_open()
    }

    pub async fn snapshot(&self) -> FormSnapshot<ProfileEditField> {
        let state = self.state.lock().await;
        state.form.snapshot(state.gate().is_open())
    }

    /// Saves the edited profile. The saved profile becomes the new
    /// baseline, so the form has no changes afterwards.
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmissionError> {
        let profile = {
            let mut state = self.state.lock().await;
            if !self.liveness.is_mounted() {
                return Err(SubmissionError::SessionClosed);
            }
            if state.form.submit_in_flight() {
                return Err(SubmissionError::InFlight);
            }
            if !state.gate().is_open() {
                return Err(SubmissionError::NotSubmittable);
            }
            state.form.begin_submit();
            state.profile()
        };

        let span = info_span!("usecase.profile_edit.submit");
        let result = self.update.update_profile(&profile).instrument(span).await;

        let mut state = self.state.lock().await;
        state.form.finish_submit();
        match result {
            Ok(receipt) if receipt.success => {
                info!("profile updated");
                state.baseline = profile;
                Ok(receipt)
            }
            Ok(receipt) => {
                warn!(reason = %receipt.message, "profile update rejected");
                let message = if receipt.message.trim().is_empty() {
                    UPDATE_REJECTED_MESSAGE.to_string()
                } else {
                    receipt.message
                };
                Err(SubmissionError::Rejected(message))
            }
            Err(err) => {
                error!(error = ?err, "profile update request failed");
                Err(SubmissionError::Gateway(err))
            }
        }
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    /// Back to the profile the session was opened with.
    pub async fn reset(&self) {
        *self.state.lock().await = ProfileEditState::new(self.initial.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::forms::test_support::{FakeDuplicateCheck, FakeProfileUpdate, Outcome};

    fn current() -> ProfileInfo {
        ProfileInfo {
            nickname: "맘넥트".into(),
            email: "mom@momnect.com".into(),
            phone_number: "01012345678".into(),
        }
    }

    fn session(
        duplicates: Arc<FakeDuplicateCheck>,
        update: Arc<FakeProfileUpdate>,
    ) -> ProfileEditSession {
        ProfileEditSession::new(current(), duplicates, update)
    }

    #[tokio::test]
    async fn opens_with_current_profile_and_no_changes() {
        let session = session(
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        let snapshot = session.snapshot().await;

        assert_eq!(snapshot.values[&ProfileEditField::Phone], "010-1234-5678");
        assert!(!session.has_changes().await);
        assert!(!snapshot.is_submittable);
    }

    #[tokio::test]
    async fn changed_nickname_needs_a_check() {
        let duplicates = Arc::new(FakeDuplicateCheck::available());
        let session = session(
            duplicates.clone(),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        session.set_field(ProfileEditField::Nickname, "새닉네임").await;
        assert!(session.is_changed(ProfileEditField::Nickname).await);
        assert!(!session.is_submittable().await);

        let verdict = session.check_duplicate(ProfileEditField::Nickname).await;
        assert!(verdict.checked());
        assert!(session.is_submittable().await);
        assert_eq!(duplicates.calls(), vec![(FieldKind::Nickname, "새닉네임".to_string())]);
    }

    #[tokio::test]
    async fn nickname_length_follows_signup_rule() {
        let session = session(
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        let verdict = session.set_field(ProfileEditField::Nickname, "가").await;

        assert_eq!(verdict.message(), "❌ 닉네임은 2글자 이상이어야 합니다");
    }

    #[tokio::test]
    async fn changed_phone_only_needs_a_valid_format() {
        let duplicates = Arc::new(FakeDuplicateCheck::available());
        let session = session(
            duplicates.clone(),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        let bad = session.set_field(ProfileEditField::Phone, "0212345678").await;
        assert!(bad.is_error());
        assert!(!session.is_submittable().await);

        let good = session.set_field(ProfileEditField::Phone, "01098765432").await;
        assert!(good.is_success());
        assert!(session.is_submittable().await);
        assert!(duplicates.calls().is_empty());
    }

    #[tokio::test]
    async fn reformatting_the_same_number_is_not_a_change() {
        let session = session(
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        session.set_field(ProfileEditField::Phone, "010 1234 5678").await;

        assert!(!session.has_changes().await);
    }

    #[tokio::test]
    async fn saved_profile_becomes_baseline() {
        let update = Arc::new(FakeProfileUpdate::new(Outcome::Accept));
        let session = session(Arc::new(FakeDuplicateCheck::available()), update.clone());
        session.set_field(ProfileEditField::Phone, "01098765432").await;

        session.submit().await.unwrap();

        assert_eq!(update.requests()[0].phone_number, "01098765432");
        assert!(!session.has_changes().await);
        assert!(matches!(
            session.submit().await,
            Err(SubmissionError::NotSubmittable)
        ));

        session.reset().await;
        assert!(!session.has_changes().await);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.values[&ProfileEditField::Phone], "010-1234-5678");
    }

    #[tokio::test]
    async fn taken_email_blocks_the_save() {
        let session = session(
            Arc::new(FakeDuplicateCheck::taking(&["taken@momnect.com"])),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );
        session.set_field(ProfileEditField::Email, "taken@momnect.com").await;

        let verdict = session.check_duplicate(ProfileEditField::Email).await;

        assert!(verdict.is_error());
        assert!(!session.is_submittable().await);
    }

    #[tokio::test]
    async fn blank_untouched_phone_does_not_block_nickname_change() {
        let session = ProfileEditSession::new(
            ProfileInfo {
                nickname: "카카오닉네임".into(),
                email: "kakaouser@kakao.com".into(),
                phone_number: String::new(),
            },
            Arc::new(FakeDuplicateCheck::available()),
            Arc::new(FakeProfileUpdate::new(Outcome::Accept)),
        );

        session.set_field(ProfileEditField::Nickname, "새닉네임").await;
        assert!(session.check_duplicate(ProfileEditField::Nickname).await.checked());

        assert!(session.is_submittable().await);
        assert!(session.submit().await.unwrap().success);
    }
}
