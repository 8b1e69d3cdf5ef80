use std::sync::Arc;

use tracing::{debug, error, info, warn};

use mf_core::ports::DuplicateCheckPort;
use mf_core::{FieldKind, GatewayError, ValidationVerdict};

use super::CHECK_FAILED_MESSAGE;

const TAKEN_FALLBACK_MESSAGE: &str = "이미 사용 중입니다";

/// Use case for asking the backend whether a login ID, email or nickname
/// is still free.
///
/// Never fails: every outcome is folded into a verdict. Transport errors
/// are logged here and replaced by a generic message.
pub struct CheckDuplicate {
    port: Arc<dyn DuplicateCheckPort>,
}

impl CheckDuplicate {
    pub fn new(port: Arc<dyn DuplicateCheckPort>) -> Self {
        Self { port }
    }

    #[tracing::instrument(
        name = "usecase.check_duplicate.execute",
        skip(self, kind, value),
        fields(kind = %kind)
    )]
    pub async fn execute(&self, kind: FieldKind, value: &str) -> ValidationVerdict {
        match self.port.check(kind, value).await {
            Ok(result) if !result.answered => {
                warn!(reason = %result.message, "duplicate check was not answered");
                ValidationVerdict::error(CHECK_FAILED_MESSAGE)
            }
            Ok(result) if result.available => {
                debug!("value is available");
                ValidationVerdict::confirmed(format!("✅ 사용 가능한 {}입니다", kind.label()))
            }
            Ok(result) => {
                info!(reason = %result.message, "value is not available");
                if result.message.trim().is_empty() {
                    ValidationVerdict::error(TAKEN_FALLBACK_MESSAGE)
                } else {
                    ValidationVerdict::error(result.message)
                }
            }
            Err(GatewayError::Unsupported(kind)) => {
                error!(kind, "duplicate check requested for a field without one");
                ValidationVerdict::error(CHECK_FAILED_MESSAGE)
            }
            Err(err) => {
                error!(error = ?err, "duplicate check failed");
                ValidationVerdict::error(CHECK_FAILED_MESSAGE)
            }
        }
    }
}
