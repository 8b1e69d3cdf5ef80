//! Name, login ID and email rules.
//!
//! Two families live here. The `validate_*` functions are the simple
//! checks used on account-lookup style forms and return a
//! [`ValidationOutcome`]. The `realtime_*` functions run while the user
//! types on forms that also offer a duplicate check, and produce the
//! verdict shown under the input directly.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ValidationOutcome, DUPLICATE_CHECK_PROMPT};
use crate::verdict::ValidationVerdict;

pub const LOGIN_ID_MIN_LEN: usize = 4;
pub const NAME_MIN_LEN: usize = 2;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_email_shape(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

fn is_login_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-')
}

pub fn validate_name(name: &str) -> ValidationOutcome {
    if name.trim().is_empty() {
        return ValidationOutcome::invalid("이름을 입력해주세요");
    }
    if name.chars().count() < NAME_MIN_LEN {
        return ValidationOutcome::invalid("이름은 2글자 이상 입력해주세요");
    }
    ValidationOutcome::valid("")
}

pub fn validate_email(email: &str) -> ValidationOutcome {
    if email.trim().is_empty() {
        return ValidationOutcome::invalid("이메일을 입력해주세요");
    }
    if !is_email_shape(email) {
        return ValidationOutcome::invalid("올바른 이메일 형식을 입력해주세요");
    }
    ValidationOutcome::valid("")
}

/// Non-blank and at least four characters; no charset restriction.
pub fn validate_login_id(login_id: &str) -> ValidationOutcome {
    if login_id.trim().is_empty() {
        return ValidationOutcome::invalid("아이디를 입력해주세요");
    }
    if login_id.chars().count() < LOGIN_ID_MIN_LEN {
        return ValidationOutcome::invalid("아이디는 4글자 이상 입력해주세요");
    }
    ValidationOutcome::valid("")
}

/// At least four characters from `[a-zA-Z0-9@._-]`.
pub fn realtime_login_id(value: &str) -> ValidationVerdict {
    if value.trim().is_empty() {
        return ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT);
    }
    if value.chars().count() < LOGIN_ID_MIN_LEN {
        return ValidationVerdict::error("❌ 로그인 ID는 4자 이상이어야 합니다");
    }
    if !value.chars().all(is_login_id_char) {
        return ValidationVerdict::error("❌ 영문, 숫자, @, ., _, - 만 사용 가능합니다");
    }
    ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT)
}

pub fn realtime_email(value: &str) -> ValidationVerdict {
    if value.trim().is_empty() {
        return ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT);
    }
    if !is_email_shape(value) {
        return ValidationVerdict::error("❌ 올바른 이메일 형식이 아닙니다");
    }
    ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT)
}
