//! Validator registry.
//!
//! Every validator is a total function of the raw value (and sometimes a
//! related value) with no side effects. [`ValidatorRegistry`] dispatches on
//! [`FieldKind`] and a [`ValidationContext`] that selects between the
//! variants kept for each call site.

mod address;
mod identity;
mod nickname;
mod password;
mod phone;

use serde::{Deserialize, Serialize};

use crate::verdict::ValidationVerdict;

pub use address::{process_address_data, validate_address, AddressData};
pub use identity::{
    is_email_shape, realtime_email, realtime_login_id, validate_email, validate_login_id,
    validate_name, LOGIN_ID_MIN_LEN, NAME_MIN_LEN,
};
pub use nickname::{
    validate_nickname, NicknamePolicy, NICKNAME_MAX_LEN, NICKNAME_MIN_LEN,
    REALTIME_NICKNAME_MAX_LEN,
};
pub use password::{
    validate_password, validate_password_match, validate_password_strength, PasswordStrength,
    StrengthOutcome, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN, PASSWORD_SPECIAL_CHARS,
};
pub use phone::{
    extract_phone_numbers, format_phone_input, format_phone_number, validate_phone_number,
    PHONE_MAX_DIGITS, PHONE_MAX_FORMATTED_LEN,
};

/// Hint shown while a duplicate-checkable field waits for its check.
pub const DUPLICATE_CHECK_PROMPT: &str = "💡 중복 확인을 눌러주세요";

/// `{ isValid, message }` pair returned by the plain validators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }

    /// Not valid, but nothing to complain about yet (empty input).
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        !self.is_valid && self.message.is_empty()
    }

    pub fn into_verdict(self) -> ValidationVerdict {
        if self.is_valid {
            ValidationVerdict::success(self.message)
        } else if self.message.is_empty() {
            ValidationVerdict::idle("")
        } else {
            ValidationVerdict::error(self.message)
        }
    }
}

/// Kinds of fields the registry knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Name,
    LoginId,
    Email,
    Nickname,
    Password,
    PasswordConfirm,
    Phone,
    Address,
}

impl FieldKind {
    /// Identifier used by the backend (`type` query parameter).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::LoginId => "loginId",
            FieldKind::Email => "email",
            FieldKind::Nickname => "nickname",
            FieldKind::Password => "password",
            FieldKind::PasswordConfirm => "passwordConfirm",
            FieldKind::Phone => "phone",
            FieldKind::Address => "address",
        }
    }

    /// Label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Name => "이름",
            FieldKind::LoginId => "아이디",
            FieldKind::Email => "이메일",
            FieldKind::Nickname => "닉네임",
            FieldKind::Password | FieldKind::PasswordConfirm => "비밀번호",
            FieldKind::Phone => "휴대폰번호",
            FieldKind::Address => "주소",
        }
    }

    pub fn supports_duplicate_check(&self) -> bool {
        matches!(self, FieldKind::LoginId | FieldKind::Email | FieldKind::Nickname)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which login-ID / email family to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Live validation on forms with a duplicate check.
    #[default]
    Realtime,
    /// Plain presence/shape checks.
    Simple,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    pub mode: ValidationMode,
    pub nickname: NicknamePolicy<'a>,
    /// Second field some rules compare against (the password for a
    /// confirmation).
    pub related: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_nickname_policy(mut self, policy: NicknamePolicy<'a>) -> Self {
        self.nickname = policy;
        self
    }

    pub fn with_related(mut self, related: &'a str) -> Self {
        self.related = Some(related);
        self
    }
}

/// Stateless dispatcher over the validators.
pub struct ValidatorRegistry;

impl ValidatorRegistry {
    pub fn evaluate(kind: FieldKind, value: &str, ctx: &ValidationContext<'_>) -> ValidationVerdict {
        match kind {
            FieldKind::Name => validate_name(value).into_verdict(),
            FieldKind::LoginId => match ctx.mode {
                ValidationMode::Realtime => realtime_login_id(value),
                ValidationMode::Simple => validate_login_id(value).into_verdict(),
            },
            FieldKind::Email => match ctx.mode {
                ValidationMode::Realtime => realtime_email(value),
                ValidationMode::Simple => validate_email(value).into_verdict(),
            },
            FieldKind::Nickname => validate_nickname(value, ctx.nickname),
            FieldKind::Password => validate_password_strength(value).outcome().into_verdict(),
            FieldKind::PasswordConfirm => {
                validate_password_match(ctx.related.unwrap_or_default(), value).into_verdict()
            }
            FieldKind::Phone => validate_phone_number(value).into_verdict(),
            FieldKind::Address => validate_address(value).into_verdict(),
        }
    }
}
