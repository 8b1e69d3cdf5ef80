//! Child records edited on the child-management page.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_CHILDREN: usize = 2;
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(Uuid);

impl ChildId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable fields of a child row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildField {
    Nickname,
    BirthDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    pub id: ChildId,
    pub nickname: String,
    /// Raw `YYYY-MM-DD` input.
    pub birth_date: String,
    /// Full years at the time the birth date was entered.
    pub age: Option<i32>,
}

impl ChildRecord {
    pub fn blank() -> Self {
        Self {
            id: ChildId::new(),
            nickname: String::new(),
            birth_date: String::new(),
            age: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.nickname.trim().is_empty() && !self.birth_date.is_empty()
    }
}

pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BIRTH_DATE_FORMAT).ok()
}

/// Age in full years on `today`; one less if the birthday has not come yet
/// this year.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age for a raw birth-date input, `None` when empty or unparsable.
pub fn age_from_input(value: &str, today: NaiveDate) -> Option<i32> {
    parse_birth_date(value).map(|birth| calculate_age(birth, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_full_years() {
        let today = date(2024, 6, 15);
        assert_eq!(calculate_age(date(2020, 3, 15), today), 4);
        assert_eq!(calculate_age(date(2020, 6, 15), today), 4);
        assert_eq!(calculate_age(date(2020, 6, 16), today), 3);
        assert_eq!(calculate_age(date(2020, 7, 1), today), 3);
    }

    #[test]
    fn age_from_input_handles_bad_dates() {
        let today = date(2024, 6, 15);
        assert_eq!(age_from_input("", today), None);
        assert_eq!(age_from_input("2020/03/15", today), None);
        assert_eq!(age_from_input("2022-07-20", today), Some(1));
    }

    #[test]
    fn completeness_needs_nickname_and_birth_date() {
        let mut child = ChildRecord::blank();
        assert!(!child.is_complete());
        child.nickname = "첫째".into();
        assert!(!child.is_complete());
        child.birth_date = "2020-03-15".into();
        assert!(child.is_complete());
        child.nickname = "  ".into();
        assert!(!child.is_complete());
    }
}
