//! Mobile phone number formatting and validation.

use super::ValidationOutcome;

/// Formatted length of `010-1234-5678`.
pub const PHONE_MAX_FORMATTED_LEN: usize = 13;
pub const PHONE_MAX_DIGITS: usize = 11;

pub fn extract_phone_numbers(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups digits as `3-4-4` while typing.
///
/// Input with more than 11 digits is cut to the formatted width instead of
/// being regrouped.
pub fn format_phone_number(value: &str) -> String {
    let numbers = extract_phone_numbers(value);

    if numbers.len() > PHONE_MAX_DIGITS {
        return value.chars().take(PHONE_MAX_FORMATTED_LEN).collect();
    }

    group_digits(&numbers)
}

/// Signup variant of [`format_phone_number`]: an edit that would exceed 11
/// digits is refused and `None` is returned so the caller keeps the
/// previous value.
pub fn format_phone_input(value: &str) -> Option<String> {
    let numbers = extract_phone_numbers(value);
    if numbers.len() > PHONE_MAX_DIGITS {
        return None;
    }
    Some(group_digits(&numbers))
}

// `numbers` is ASCII digits only, so byte slicing is char slicing.
fn group_digits(numbers: &str) -> String {
    match numbers.len() {
        0..=3 => numbers.to_string(),
        4..=7 => format!("{}-{}", &numbers[..3], &numbers[3..]),
        _ => format!("{}-{}-{}", &numbers[..3], &numbers[3..7], &numbers[7..]),
    }
}

pub fn validate_phone_number(phone_number: &str) -> ValidationOutcome {
    let numbers = extract_phone_numbers(phone_number);

    if numbers.is_empty() {
        return ValidationOutcome::neutral();
    }
    if numbers.len() < 10 {
        return ValidationOutcome::invalid("❌ 핸드폰 번호가 너무 짧습니다");
    }
    if numbers.len() > PHONE_MAX_DIGITS {
        return ValidationOutcome::invalid("❌ 핸드폰 번호가 너무 깁니다");
    }
    if !numbers.starts_with("010") {
        return ValidationOutcome::invalid("❌ 010으로 시작하는 번호를 입력해주세요");
    }

    ValidationOutcome::valid("✅ 올바른 핸드폰 번호입니다")
}
