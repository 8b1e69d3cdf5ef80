//! Gated field state machine.
//!
//! A gated field only counts toward submission once an external check
//! (duplicate check, current-password verification) has confirmed it.

use crate::verdict::VerdictStatus;

/// Events that drive a gated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedFieldEvent {
    /// User changed the value.
    Edited,
    /// User pressed the check control.
    CheckRequested,
    /// Local validation refused to send the value to the gateway.
    CheckRefused,
    /// Gateway answered; `ok` is its verdict.
    Resolved { ok: bool },
    /// Gateway call failed.
    Failed,
}

/// Side effects produced by transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedFieldAction {
    InvokeGateway,
}

/// Pure state machine over [`VerdictStatus`]: no side effects.
pub struct GatedFieldStateMachine;

impl GatedFieldStateMachine {
    pub fn transition(
        state: VerdictStatus,
        event: GatedFieldEvent,
    ) -> (VerdictStatus, Vec<GatedFieldAction>) {
        match (state, event) {
            (_, GatedFieldEvent::Edited) => (VerdictStatus::Default, Vec::new()),
            (
                VerdictStatus::Default | VerdictStatus::Error,
                GatedFieldEvent::CheckRequested,
            ) => (VerdictStatus::Loading, vec![GatedFieldAction::InvokeGateway]),
            (VerdictStatus::Default | VerdictStatus::Error, GatedFieldEvent::CheckRefused) => {
                (VerdictStatus::Error, Vec::new())
            }
            (VerdictStatus::Loading, GatedFieldEvent::Resolved { ok: true }) => {
                (VerdictStatus::Success, Vec::new())
            }
            (
                VerdictStatus::Loading,
                GatedFieldEvent::Resolved { ok: false } | GatedFieldEvent::Failed,
            ) => (VerdictStatus::Error, Vec::new()),
            (state, _event) => (state, Vec::new()),
        }
    }

    /// Whether the check control is enabled in `state`.
    pub fn can_request_check(state: VerdictStatus) -> bool {
        matches!(state, VerdictStatus::Default | VerdictStatus::Error)
    }
}
