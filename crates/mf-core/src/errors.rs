use thiserror::Error;

use crate::verdict::ERROR_PREFIX;

/// Failure of a network-backed check.
///
/// Only ever logged; the user sees a generic verdict instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway call failed: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("field `{0}` has no duplicate check")]
    Unsupported(&'static str),
}

/// Failure of a final submission step.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form is not ready to submit")]
    NotSubmittable,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("form was already submitted")]
    AlreadyCompleted,

    #[error("session has been closed")]
    SessionClosed,

    #[error("backend rejected submission: {0}")]
    Rejected(String),

    #[error("submission failed: {0}")]
    Gateway(#[source] anyhow::Error),
}

impl SubmissionError {
    /// Message shown to the user; never carries the underlying cause.
    pub fn user_message(&self) -> String {
        let text = match self {
            SubmissionError::NotSubmittable => "입력값을 확인해주세요",
            SubmissionError::InFlight => "처리 중입니다. 잠시만 기다려주세요",
            SubmissionError::AlreadyCompleted => "이미 처리되었습니다",
            SubmissionError::SessionClosed => "페이지를 다시 열어주세요",
            SubmissionError::Rejected(message) if !message.trim().is_empty() => {
                return prefixed(message);
            }
            SubmissionError::Rejected(_) | SubmissionError::Gateway(_) => {
                "처리 중 오류가 발생했습니다"
            }
        };
        prefixed(text)
    }
}

fn prefixed(message: &str) -> String {
    if message.starts_with(ERROR_PREFIX) {
        message.to_string()
    } else {
        format!("{ERROR_PREFIX} {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_prefixed() {
        let errors = [
            SubmissionError::NotSubmittable,
            SubmissionError::InFlight,
            SubmissionError::AlreadyCompleted,
            SubmissionError::SessionClosed,
            SubmissionError::Rejected("회원가입에 실패했습니다.".into()),
            SubmissionError::Rejected(String::new()),
            SubmissionError::Gateway(anyhow::anyhow!("connection refused")),
        ];
        for error in errors {
            assert!(error.user_message().starts_with("❌ "), "{error}");
        }
    }

    #[test]
    fn gateway_cause_is_not_shown_to_user() {
        let error = SubmissionError::Gateway(anyhow::anyhow!("connection refused"));
        assert!(!error.user_message().contains("connection refused"));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn backend_rejection_message_is_surfaced() {
        let error = SubmissionError::Rejected("이미 가입된 이메일입니다.".into());
        assert_eq!(error.user_message(), "❌ 이미 가입된 이메일입니다.");
    }
}
