//! Final-step backends of the account forms.

use async_trait::async_trait;

use crate::account::{
    LoginRequest, PasswordChangeRequest, ProfileInfo, SignupRequest, SubmissionReceipt,
};
use crate::child::ChildRecord;

#[async_trait]
pub trait SignupPort: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<SubmissionReceipt>;
}

#[async_trait]
pub trait LoginPort: Send + Sync {
    /// `Ok(false)` means the credentials were refused.
    async fn login(&self, request: &LoginRequest) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait PasswordChangePort: Send + Sync {
    async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> anyhow::Result<SubmissionReceipt>;
}

#[async_trait]
pub trait ProfileUpdatePort: Send + Sync {
    async fn update_profile(&self, profile: &ProfileInfo) -> anyhow::Result<SubmissionReceipt>;
}

#[async_trait]
pub trait ChildProfilePort: Send + Sync {
    async fn save_children(&self, children: &[ChildRecord]) -> anyhow::Result<()>;
}
