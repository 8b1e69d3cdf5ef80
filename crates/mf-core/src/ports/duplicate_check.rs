//! Duplicate-check port
//!
//! Confirms that a login ID, email or nickname is not taken yet.
//! Implementations are provided by the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;
use crate::validation::FieldKind;

/// Raw backend answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResponse {
    pub success: bool,
    pub is_duplicate: bool,
    pub message: String,
}

/// Answer consumed by a session; not kept after being turned into a
/// verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCheckResult {
    /// `false` when the backend could not perform the check.
    pub answered: bool,
    pub available: bool,
    pub message: String,
}

impl From<DuplicateCheckResponse> for DuplicateCheckResult {
    fn from(response: DuplicateCheckResponse) -> Self {
        Self {
            answered: response.success,
            available: response.success && !response.is_duplicate,
            message: response.message,
        }
    }
}

#[async_trait]
pub trait DuplicateCheckPort: Send + Sync {
    async fn check_duplicate(
        &self,
        kind: FieldKind,
        value: &str,
    ) -> anyhow::Result<DuplicateCheckResponse>;

    /// Runs the check for a supported field kind and folds the response.
    async fn check(&self, kind: FieldKind, value: &str) -> Result<DuplicateCheckResult, GatewayError> {
        if !kind.supports_duplicate_check() {
            return Err(GatewayError::Unsupported(kind.as_str()));
        }
        self.check_duplicate(kind, value)
            .await
            .map(DuplicateCheckResult::from)
            .map_err(GatewayError::Transport)
    }
}

#[cfg(test)]
mockall::mock! {
    pub DuplicateCheck {}

    #[async_trait]
    impl DuplicateCheckPort for DuplicateCheck {
        async fn check_duplicate(
            &self,
            kind: FieldKind,
            value: &str,
        ) -> anyhow::Result<DuplicateCheckResponse>;
    }
}
