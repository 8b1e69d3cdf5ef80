use std::sync::Arc;

use tracing::{debug, error, info};

use mf_core::ports::CurrentPasswordVerifierPort;
use mf_core::ValidationVerdict;

use super::CHECK_FAILED_MESSAGE;

/// Use case for confirming the user's current password before a change.
pub struct VerifyCurrentPassword {
    verifier: Arc<dyn CurrentPasswordVerifierPort>,
}

impl VerifyCurrentPassword {
    pub fn new(verifier: Arc<dyn CurrentPasswordVerifierPort>) -> Self {
        Self { verifier }
    }

    #[tracing::instrument(name = "usecase.verify_current_password.execute", skip_all)]
    pub async fn execute(&self, current_password: &str) -> ValidationVerdict {
        match self.verifier.verify(current_password).await {
            Ok(result) if result.is_valid => {
                debug!("current password verified");
                ValidationVerdict::confirmed(format!("✅ {}", result.message))
            }
            Ok(result) => {
                info!("current password rejected");
                ValidationVerdict::error(result.message)
            }
            Err(err) => {
                error!(error = ?err, "current password verification failed");
                ValidationVerdict::error(CHECK_FAILED_MESSAGE)
            }
        }
    }
}
