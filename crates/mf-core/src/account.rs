//! Request payloads handed to the account backends.

use serde::{Deserialize, Serialize};

/// Consent checkboxes of the signup form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreements {
    pub terms: bool,
    pub privacy: bool,
    pub age: bool,
    pub location: bool,
    pub push: bool,
}

/// Individual consent checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    Terms,
    Privacy,
    Age,
    Location,
    Push,
}

impl Agreements {
    pub fn set(&mut self, agreement: Agreement, value: bool) {
        match agreement {
            Agreement::Terms => self.terms = value,
            Agreement::Privacy => self.privacy = value,
            Agreement::Age => self.age = value,
            Agreement::Location => self.location = value,
            Agreement::Push => self.push = value,
        }
    }

    pub fn set_all(&mut self, value: bool) {
        *self = Self {
            terms: value,
            privacy: value,
            age: value,
            location: value,
            push: value,
        };
    }

    pub fn all(&self) -> bool {
        self.terms && self.privacy && self.age && self.location && self.push
    }

    /// Terms, privacy and age are mandatory; location and push are not.
    pub fn required_given(&self) -> bool {
        self.terms && self.privacy && self.age
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OAuthProvider {
    Local,
    Kakao,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub login_id: String,
    pub password: Option<String>,
    pub name: String,
    pub email: String,
    /// Digits only.
    pub phone_number: String,
    pub nickname: Option<String>,
    pub address: String,
    pub oauth_provider: OAuthProvider,
    pub is_terms_agreed: bool,
    pub is_privacy_agreed: bool,
    pub agreements: Agreements,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Editable part of the user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub nickname: String,
    pub email: String,
    pub phone_number: String,
}

/// Backend answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
}

impl SubmissionReceipt {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
