use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldEntry {
    value: String,
    revision: u64,
}

/// Current input values of one form, keyed by the form's field enum.
///
/// Every write bumps the field's revision so that asynchronous work started
/// against an older value can tell it has gone stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore<F: Ord> {
    entries: BTreeMap<F, FieldEntry>,
}

impl<F: Ord + Copy> FieldStore<F> {
    pub fn new(fields: &[F]) -> Self {
        Self {
            entries: fields
                .iter()
                .map(|field| (*field, FieldEntry::default()))
                .collect(),
        }
    }

    /// Overwrites `field` and returns its new revision. Other fields are
    /// untouched.
    pub fn set(&mut self, field: F, value: impl Into<String>) -> u64 {
        let entry = self.entries.entry(field).or_default();
        entry.value = value.into();
        entry.revision += 1;
        entry.revision
    }

    pub fn get(&self, field: F) -> &str {
        self.entries
            .get(&field)
            .map(|entry| entry.value.as_str())
            .unwrap_or_default()
    }

    pub fn revision(&self, field: F) -> u64 {
        self.entries.get(&field).map(|entry| entry.revision).unwrap_or(0)
    }

    pub fn is_blank(&self, field: F) -> bool {
        self.get(field).trim().is_empty()
    }

    pub fn all_filled(&self, fields: &[F]) -> bool {
        fields.iter().all(|field| !self.is_blank(*field))
    }

    pub fn values(&self) -> BTreeMap<F, String> {
        self.entries
            .iter()
            .map(|(field, entry)| (*field, entry.value.clone()))
            .collect()
    }
}
