//! Driving a gated field through its check.
//!
//! Split in two halves around the gateway await: [`begin_check`] runs under
//! the session lock and decides whether the gateway is called at all,
//! [`finish_check`] runs under the lock again and applies the result unless
//! it went stale in between.

use tracing::debug;

use mf_core::form::GatedFieldAction;
use mf_core::{
    FormState, GatedFieldEvent, GatedFieldStateMachine, ValidationVerdict, VerdictStatus,
};

use super::SessionLiveness;
use crate::usecases::CHECKING_MESSAGE;

const BLANK_INPUT_MESSAGE: &str = "입력값을 확인해주세요";

/// Value captured when a check starts.
#[derive(Debug)]
pub(crate) struct PendingCheck {
    pub value: String,
    revision: u64,
}

#[derive(Debug)]
pub(crate) enum CheckStart {
    /// Gateway must be called with the pending value.
    Started(PendingCheck),
    /// Nothing to call; this is the field's verdict.
    Settled(ValidationVerdict),
}

/// `local` is the field's verdict from its local validator. An error there
/// refuses the check, a verdict that is already confirmed (provider-default
/// nickname) is taken as is.
pub(crate) fn begin_check<F: Ord + Copy>(
    form: &mut FormState<F>,
    field: F,
    local: ValidationVerdict,
    liveness: &SessionLiveness,
) -> CheckStart {
    let current = form.verdict(field);
    if !liveness.is_mounted() || !GatedFieldStateMachine::can_request_check(current.status()) {
        return CheckStart::Settled(current);
    }

    let refusal = if local.is_error() {
        Some(local)
    } else if local.checked() {
        form.set_verdict(field, local.clone());
        return CheckStart::Settled(local);
    } else if form.fields.is_blank(field) {
        Some(ValidationVerdict::error(BLANK_INPUT_MESSAGE))
    } else {
        None
    };

    if let Some(refusal) = refusal {
        let (next, _) =
            GatedFieldStateMachine::transition(current.status(), GatedFieldEvent::CheckRefused);
        debug_assert_eq!(next, VerdictStatus::Error);
        form.set_verdict(field, refusal.clone());
        return CheckStart::Settled(refusal);
    }

    let (_, actions) =
        GatedFieldStateMachine::transition(current.status(), GatedFieldEvent::CheckRequested);
    if !actions.contains(&GatedFieldAction::InvokeGateway) {
        return CheckStart::Settled(current);
    }

    form.set_verdict(field, ValidationVerdict::loading(CHECKING_MESSAGE));
    CheckStart::Started(PendingCheck {
        value: form.value(field).to_string(),
        revision: form.fields.revision(field),
    })
}

/// Applies `verdict` unless the session closed or the field was edited
/// after the check started. Returns the field's verdict afterwards.
pub(crate) fn finish_check<F: Ord + Copy>(
    form: &mut FormState<F>,
    field: F,
    pending: PendingCheck,
    verdict: ValidationVerdict,
    liveness: &SessionLiveness,
) -> ValidationVerdict {
    if !liveness.is_mounted() {
        debug!("session closed before the check resolved; result dropped");
        return form.verdict(field);
    }
    if form.fields.revision(field) != pending.revision {
        debug!("field edited while the check was pending; result dropped");
        return form.verdict(field);
    }

    let current = form.verdict(field);
    let (next, _) = GatedFieldStateMachine::transition(
        current.status(),
        GatedFieldEvent::Resolved {
            ok: verdict.checked(),
        },
    );
    if next == verdict.status() {
        form.set_verdict(field, verdict);
    }
    form.verdict(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Field {
        Nickname,
    }

    fn form_with(value: &str) -> FormState<Field> {
        let mut form = FormState::new(&[Field::Nickname]);
        form.set_field(Field::Nickname, value);
        form
    }

    fn start(form: &mut FormState<Field>, liveness: &SessionLiveness) -> PendingCheck {
        match begin_check(form, Field::Nickname, ValidationVerdict::idle(""), liveness) {
            CheckStart::Started(pending) => pending,
            CheckStart::Settled(verdict) => panic!("check did not start: {verdict:?}"),
        }
    }

    #[test]
    fn blank_value_is_refused() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("  ");

        let start = begin_check(&mut form, Field::Nickname, ValidationVerdict::idle(""), &liveness);

        match start {
            CheckStart::Settled(verdict) => {
                assert_eq!(verdict.message(), "❌ 입력값을 확인해주세요");
            }
            CheckStart::Started(_) => panic!("blank value reached the gateway"),
        }
        assert!(form.verdict(Field::Nickname).is_error());
    }

    #[test]
    fn local_error_is_refused_with_its_own_message() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("a");
        let local = ValidationVerdict::error("❌ 닉네임은 2글자 이상이어야 합니다");

        let start = begin_check(&mut form, Field::Nickname, local.clone(), &liveness);

        assert!(matches!(start, CheckStart::Settled(ref v) if *v == local));
    }

    #[test]
    fn confirmed_local_verdict_bypasses_gateway() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("카카오닉네임");
        let local = ValidationVerdict::confirmed("✅ 카카오 닉네임이 설정되었습니다");

        let start = begin_check(&mut form, Field::Nickname, local, &liveness);

        assert!(matches!(start, CheckStart::Settled(ref v) if v.checked()));
        assert!(form.tracker.is_checked(Field::Nickname));
    }

    #[test]
    fn started_check_sets_loading_and_blocks_a_second_one() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("맘넥트");

        let pending = start(&mut form, &liveness);
        assert_eq!(pending.value, "맘넥트");
        assert!(form.verdict(Field::Nickname).is_loading());

        let again = begin_check(&mut form, Field::Nickname, ValidationVerdict::idle(""), &liveness);
        assert!(matches!(again, CheckStart::Settled(ref v) if v.is_loading()));
    }

    #[test]
    fn result_applies_to_unchanged_field() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("맘넥트");
        let pending = start(&mut form, &liveness);

        let verdict = finish_check(
            &mut form,
            Field::Nickname,
            pending,
            ValidationVerdict::confirmed("✅ 사용 가능한 닉네임입니다"),
            &liveness,
        );

        assert!(verdict.checked());
        assert_eq!(form.tracker.status(Field::Nickname), VerdictStatus::Success);
    }

    #[test]
    fn result_for_an_edited_field_is_dropped() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("맘넥트");
        let pending = start(&mut form, &liveness);
        form.set_field(Field::Nickname, "맘넥트2");

        let verdict = finish_check(
            &mut form,
            Field::Nickname,
            pending,
            ValidationVerdict::confirmed("✅ 사용 가능한 닉네임입니다"),
            &liveness,
        );

        assert!(!verdict.checked());
        assert_eq!(verdict.status(), VerdictStatus::Default);
    }

    #[test]
    fn result_after_close_is_dropped() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("맘넥트");
        let pending = start(&mut form, &liveness);
        liveness.close();

        let verdict = finish_check(
            &mut form,
            Field::Nickname,
            pending,
            ValidationVerdict::confirmed("✅ 사용 가능한 닉네임입니다"),
            &liveness,
        );

        assert!(!verdict.checked());
    }

    #[test]
    fn failed_check_can_be_retried() {
        let liveness = SessionLiveness::mounted();
        let mut form = form_with("맘넥트");
        let pending = start(&mut form, &liveness);
        finish_check(
            &mut form,
            Field::Nickname,
            pending,
            ValidationVerdict::error("❌ 확인 중 오류가 발생했습니다"),
            &liveness,
        );
        assert!(form.verdict(Field::Nickname).is_error());

        let retry = start(&mut form, &liveness);

        assert_eq!(retry.value, "맘넥트");
    }

    #[test]
    fn closed_session_never_starts_a_check() {
        let liveness = SessionLiveness::mounted();
        liveness.close();
        let mut form = form_with("맘넥트");

        let start = begin_check(&mut form, Field::Nickname, ValidationVerdict::idle(""), &liveness);

        assert!(matches!(start, CheckStart::Settled(_)));
        assert!(!form.verdict(Field::Nickname).is_loading());
    }
}
