use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordVerification {
    pub is_valid: bool,
    pub message: String,
}

/// Verifies a plaintext guess of the signed-in user's current password.
#[async_trait]
pub trait CurrentPasswordVerifierPort: Send + Sync {
    async fn verify(&self, current_password: &str) -> anyhow::Result<PasswordVerification>;
}
