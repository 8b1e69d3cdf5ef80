//! User-service HTTP client.
//!
//! Every endpoint answers with the `{ success, data, message }` envelope.
//! Client errors (4xx) that still carry an envelope are business refusals
//! and come back as unsuccessful answers; anything else is a transport
//! failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use mf_core::account::{
    LoginRequest, PasswordChangeRequest, ProfileInfo, SignupRequest, SubmissionReceipt,
};
use mf_core::ports::{
    DuplicateCheckPort, DuplicateCheckResponse, LoginPort, PasswordChangePort, ProfileUpdatePort,
    SignupPort,
};
use mf_core::FieldKind;

const CHECK_PATH: &str = "/user-service/users/check";
const SIGNUP_PATH: &str = "/user-service/auth/signup";
const LOGIN_PATH: &str = "/user-service/auth/login";
const PASSWORD_PATH: &str = "/user-service/users/password";
const PROFILE_PATH: &str = "/user-service/users/profile";

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("server error: {0}")]
    Server(StatusCode),

    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("failed to build http client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for UserServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            UserServiceError::Timeout
        } else if let Some(status) = error.status() {
            map_status_code(status)
        } else {
            UserServiceError::Network(error.to_string())
        }
    }
}

fn map_status_code(code: StatusCode) -> UserServiceError {
    match code {
        StatusCode::UNAUTHORIZED => UserServiceError::Unauthorized,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => UserServiceError::Timeout,
        _ if code.is_server_error() => UserServiceError::Server(code),
        _ => UserServiceError::UnexpectedStatus(code),
    }
}

/// Response envelope shared by all user-service endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn message_or_default(&self) -> String {
        self.message.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateCheckData {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    value: String,
    is_duplicate: bool,
    #[serde(default)]
    message: String,
}

/// Envelope of a 2xx answer, or of a 4xx answer that still carries one.
struct Answer<T> {
    status: StatusCode,
    envelope: ApiResponse<T>,
}

impl<T> Answer<T> {
    fn accepted(&self) -> bool {
        self.status.is_success() && self.envelope.success
    }

    fn into_receipt(self) -> SubmissionReceipt {
        SubmissionReceipt {
            success: self.accepted(),
            message: self.envelope.message_or_default(),
        }
    }
}

pub struct UserServiceClient {
    client: Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UserServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UserServiceError::Client(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Answer<T>, UserServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_server_error() || status == StatusCode::UNAUTHORIZED {
            return Err(map_status_code(status));
        }

        let body = response.text().await?;
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(Answer { status, envelope }),
            Err(err) if status.is_success() => {
                Err(UserServiceError::InvalidResponse(err.to_string()))
            }
            Err(_) => Err(map_status_code(status)),
        }
    }

    pub async fn check_duplicate(
        &self,
        kind: FieldKind,
        value: &str,
    ) -> Result<DuplicateCheckResponse, UserServiceError> {
        let request = self
            .client
            .get(self.url(CHECK_PATH))
            .query(&[("type", kind.as_str()), ("value", value)]);
        let answer: Answer<DuplicateCheckData> = self.send(request).await?;

        let success = answer.accepted();
        let envelope = answer.envelope;
        let response = match envelope.data {
            Some(data) => {
                debug!(
                    kind = %data.kind,
                    value = %data.value,
                    is_duplicate = data.is_duplicate,
                    "Duplicate check answered"
                );
                let message = if data.message.is_empty() {
                    envelope.message.unwrap_or_default()
                } else {
                    data.message
                };
                DuplicateCheckResponse {
                    success,
                    is_duplicate: data.is_duplicate,
                    message,
                }
            }
            None => DuplicateCheckResponse {
                success: false,
                is_duplicate: false,
                message: envelope.message.unwrap_or_default(),
            },
        };
        Ok(response)
    }

    pub async fn signup(
        &self,
        request: &SignupRequest,
    ) -> Result<SubmissionReceipt, UserServiceError> {
        let answer: Answer<serde_json::Value> = self
            .send(self.client.post(self.url(SIGNUP_PATH)).json(request))
            .await?;
        Ok(answer.into_receipt())
    }

    /// `Ok(false)` when the credentials are refused.
    pub async fn login(&self, request: &LoginRequest) -> Result<bool, UserServiceError> {
        match self
            .send::<serde_json::Value>(self.client.post(self.url(LOGIN_PATH)).json(request))
            .await
        {
            Ok(answer) => Ok(answer.accepted()),
            Err(UserServiceError::Unauthorized) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> Result<SubmissionReceipt, UserServiceError> {
        let answer: Answer<serde_json::Value> = self
            .send(self.client.put(self.url(PASSWORD_PATH)).json(request))
            .await?;
        Ok(answer.into_receipt())
    }

    pub async fn update_profile(
        &self,
        profile: &ProfileInfo,
    ) -> Result<SubmissionReceipt, UserServiceError> {
        let answer: Answer<serde_json::Value> = self
            .send(self.client.put(self.url(PROFILE_PATH)).json(profile))
            .await?;
        Ok(answer.into_receipt())
    }
}

#[async_trait]
impl DuplicateCheckPort for UserServiceClient {
    async fn check_duplicate(
        &self,
        kind: FieldKind,
        value: &str,
    ) -> anyhow::Result<DuplicateCheckResponse> {
        UserServiceClient::check_duplicate(self, kind, value)
            .await
            .map_err(|err| {
                warn!(error = %err, kind = %kind, "Duplicate check request failed");
                err.into()
            })
    }
}

#[async_trait]
impl SignupPort for UserServiceClient {
    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<SubmissionReceipt> {
        Ok(UserServiceClient::signup(self, request).await?)
    }
}

#[async_trait]
impl LoginPort for UserServiceClient {
    async fn login(&self, request: &LoginRequest) -> anyhow::Result<bool> {
        Ok(UserServiceClient::login(self, request).await?)
    }
}

#[async_trait]
impl PasswordChangePort for UserServiceClient {
    async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> anyhow::Result<SubmissionReceipt> {
        Ok(UserServiceClient::change_password(self, request).await?)
    }
}

#[async_trait]
impl ProfileUpdatePort for UserServiceClient {
    async fn update_profile(&self, profile: &ProfileInfo) -> anyhow::Result<SubmissionReceipt> {
        Ok(UserServiceClient::update_profile(self, profile).await?)
    }
}
