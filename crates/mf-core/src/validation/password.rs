//! Password strength and confirmation rules.

use serde::{Deserialize, Serialize};

use super::ValidationOutcome;
use crate::verdict::ValidationVerdict;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 16;

/// Characters accepted as the "special" class.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    None,
    Weak,
    Strong,
}

/// Result of [`validate_password_strength`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthOutcome {
    pub is_valid: bool,
    pub message: String,
    pub strength: PasswordStrength,
}

impl StrengthOutcome {
    fn weak(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_string(),
            strength: PasswordStrength::Weak,
        }
    }

    pub fn outcome(&self) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: self.is_valid,
            message: self.message.clone(),
        }
    }
}

/// Checks length 8..=16 and the letter / digit / special classes, reporting
/// the first failing condition in that order.
pub fn validate_password_strength(password: &str) -> StrengthOutcome {
    if password.is_empty() {
        return StrengthOutcome {
            is_valid: false,
            message: String::new(),
            strength: PasswordStrength::None,
        };
    }

    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return StrengthOutcome::weak("❌ 비밀번호는 8자 이상이어야 합니다");
    }
    if len > PASSWORD_MAX_LEN {
        return StrengthOutcome::weak("❌ 비밀번호는 16자 이하여야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return StrengthOutcome::weak("❌ 영문자를 포함해야 합니다");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return StrengthOutcome::weak("❌ 숫자를 포함해야 합니다");
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return StrengthOutcome::weak("❌ 특수문자를 포함해야 합니다");
    }

    StrengthOutcome {
        is_valid: true,
        message: "✅ 사용 가능한 비밀번호입니다".to_string(),
        strength: PasswordStrength::Strong,
    }
}

/// Confirmation must equal the password and the password itself must be
/// strong. An empty confirmation is neutral.
pub fn validate_password_match(password: &str, confirm: &str) -> ValidationOutcome {
    if confirm.is_empty() {
        return ValidationOutcome::neutral();
    }

    if password != confirm {
        return ValidationOutcome::invalid("❌ 비밀번호가 일치하지 않습니다");
    }

    let strength = validate_password_strength(password);
    if !strength.is_valid {
        return ValidationOutcome::invalid(strength.message);
    }

    ValidationOutcome::valid("✅ 비밀번호가 일치합니다")
}

/// Combined verdict for a password / confirmation pair, as shown under the
/// confirmation input.
pub fn validate_password(password: &str, confirm: &str) -> ValidationVerdict {
    let strength = validate_password_strength(password);
    if !password.is_empty() && !strength.is_valid {
        return ValidationVerdict::error(strength.message);
    }

    let matched = validate_password_match(password, confirm);
    if !confirm.is_empty() && !matched.is_valid {
        return ValidationVerdict::error(matched.message);
    }

    if !confirm.is_empty() && matched.is_valid {
        return ValidationVerdict::success(matched.message);
    }

    ValidationVerdict::idle("")
}
