use std::collections::BTreeMap;

use crate::verdict::{ValidationVerdict, VerdictStatus};

/// Per-field verdicts of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTracker<F: Ord> {
    verdicts: BTreeMap<F, ValidationVerdict>,
}

impl<F: Ord + Copy> ValidationTracker<F> {
    pub fn new(fields: &[F]) -> Self {
        Self {
            verdicts: fields
                .iter()
                .map(|field| (*field, ValidationVerdict::default()))
                .collect(),
        }
    }

    pub fn set(&mut self, field: F, verdict: ValidationVerdict) {
        self.verdicts.insert(field, verdict);
    }

    pub fn reset(&mut self, field: F) {
        self.set(field, ValidationVerdict::default());
    }

    pub fn get(&self, field: F) -> Option<&ValidationVerdict> {
        self.verdicts.get(&field)
    }

    pub fn status(&self, field: F) -> VerdictStatus {
        self.get(field).map(ValidationVerdict::status).unwrap_or_default()
    }

    pub fn is_checked(&self, field: F) -> bool {
        self.get(field).is_some_and(ValidationVerdict::checked)
    }

    pub fn is_success(&self, field: F) -> bool {
        self.status(field) == VerdictStatus::Success
    }

    pub fn any_loading(&self) -> bool {
        self.verdicts.values().any(ValidationVerdict::is_loading)
    }

    pub fn verdicts(&self) -> &BTreeMap<F, ValidationVerdict> {
        &self.verdicts
    }
}
