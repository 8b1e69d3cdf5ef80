//! Form session state.
//!
//! [`FormState`] aggregates the [`FieldStore`], the [`ValidationTracker`]
//! and the submission flags of one form. Form-specific rules (which fields
//! are required, which checks gate submission) live in the sessions that
//! own a `FormState`.

mod gated;
mod store;
mod tracker;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::verdict::ValidationVerdict;

pub use gated::{GatedFieldAction, GatedFieldEvent, GatedFieldStateMachine};
pub use store::FieldStore;
pub use tracker::ValidationTracker;

/// One-way flag: once fired it stays fired until [`OneShotLatch::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotLatch {
    fired: bool,
}

impl OneShotLatch {
    pub fn fire(&mut self) {
        self.fired = true;
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}

/// Inputs of the submission decision, kept apart so callers can log why a
/// form is not submittable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionGate {
    pub fields_filled: bool,
    pub checks_passed: bool,
    pub in_flight: bool,
    pub latched: bool,
}

impl SubmissionGate {
    pub fn is_open(&self) -> bool {
        self.fields_filled && self.checks_passed && !self.in_flight && !self.latched
    }
}

/// Serializable view of a form handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot<F: Ord> {
    pub values: BTreeMap<F, String>,
    pub verdicts: BTreeMap<F, ValidationVerdict>,
    pub is_submittable: bool,
    pub submit_in_flight: bool,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct FormState<F: Ord> {
    pub fields: FieldStore<F>,
    pub tracker: ValidationTracker<F>,
    submit_in_flight: bool,
    latch: OneShotLatch,
}

impl<F: Ord + Copy> FormState<F> {
    pub fn new(fields: &[F]) -> Self {
        Self {
            fields: FieldStore::new(fields),
            tracker: ValidationTracker::new(fields),
            submit_in_flight: false,
            latch: OneShotLatch::default(),
        }
    }

    /// Writes `value` and resets the field's verdict so it is evaluated
    /// again. Returns the new revision of the field.
    pub fn set_field(&mut self, field: F, value: impl Into<String>) -> u64 {
        let revision = self.fields.set(field, value);
        self.tracker.reset(field);
        revision
    }

    pub fn value(&self, field: F) -> &str {
        self.fields.get(field)
    }

    pub fn verdict(&self, field: F) -> ValidationVerdict {
        self.tracker.get(field).cloned().unwrap_or_default()
    }

    pub fn set_verdict(&mut self, field: F, verdict: ValidationVerdict) {
        self.tracker.set(field, verdict);
    }

    /// Marks a submission as started. Returns `false` if one is already
    /// running or the form has latched.
    pub fn begin_submit(&mut self) -> bool {
        if self.submit_in_flight || self.latch.is_fired() {
            return false;
        }
        self.submit_in_flight = true;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submit_in_flight = false;
    }

    pub fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub fn latch(&mut self) {
        self.latch.fire();
    }

    pub fn is_latched(&self) -> bool {
        self.latch.is_fired()
    }

    pub fn reset_latch(&mut self) {
        self.latch.reset();
    }

    pub fn gate(&self, required: &[F], checks_passed: bool) -> SubmissionGate {
        SubmissionGate {
            fields_filled: self.fields.all_filled(required),
            checks_passed,
            in_flight: self.submit_in_flight,
            latched: self.latch.is_fired(),
        }
    }

    pub fn snapshot(&self, is_submittable: bool) -> FormSnapshot<F> {
        FormSnapshot {
            values: self.fields.values(),
            verdicts: self.tracker.verdicts().clone(),
            is_submittable,
            submit_in_flight: self.submit_in_flight,
            completed: self.latch.is_fired(),
        }
    }
}
