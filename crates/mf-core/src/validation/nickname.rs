//! Nickname policies.
//!
//! The signup form, the generic duplicate-check flow and the kakao
//! additional-info form each apply their own length rule. They are kept as
//! separate named policies rather than merged.

use super::DUPLICATE_CHECK_PROMPT;
use crate::verdict::ValidationVerdict;

pub const NICKNAME_MIN_LEN: usize = 2;
pub const NICKNAME_MAX_LEN: usize = 10;
pub const REALTIME_NICKNAME_MAX_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NicknamePolicy<'a> {
    /// Signup form: optional, 2–10 characters when present.
    #[default]
    Signup,
    /// Generic duplicate-check flow: at most 15 characters; blank means the
    /// login ID is used as nickname.
    Realtime,
    /// Social signup: the provider-supplied nickname is accepted as is,
    /// anything else must be 2–10 characters.
    ProviderDefault(&'a str),
}

pub fn validate_nickname(value: &str, policy: NicknamePolicy<'_>) -> ValidationVerdict {
    let len = value.chars().count();
    match policy {
        NicknamePolicy::Signup => {
            if !value.is_empty() {
                if len < NICKNAME_MIN_LEN {
                    return ValidationVerdict::error("❌ 닉네임은 2글자 이상이어야 합니다");
                }
                if len > NICKNAME_MAX_LEN {
                    return ValidationVerdict::error("❌ 닉네임은 10글자 이하여야 합니다");
                }
            }
            ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT)
        }
        NicknamePolicy::Realtime => {
            if value.trim().is_empty() {
                return ValidationVerdict::confirmed("✅ 아이디가 닉네임이 됩니다");
            }
            if len > REALTIME_NICKNAME_MAX_LEN {
                return ValidationVerdict::error("❌ 닉네임은 15자 이하로 입력해주세요");
            }
            ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT)
        }
        NicknamePolicy::ProviderDefault(default) => {
            if value == default {
                return ValidationVerdict::confirmed("✅ 카카오 닉네임이 설정되었습니다");
            }
            if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
                return ValidationVerdict::error("❌ 닉네임은 2~10자여야 합니다");
            }
            ValidationVerdict::idle(DUPLICATE_CHECK_PROMPT)
        }
    }
}
