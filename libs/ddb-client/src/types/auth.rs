//! Login, password and two-factor payloads.
//!
//! `Debug` never prints passwords, TOTP codes or tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials for the cookie and JWT login endpoints
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginInput {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub totp_token: String,
}

impl UserLoginInput {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            totp_token: String::new(),
        }
    }

    #[must_use]
    pub fn with_totp(mut self, totp_token: impl Into<String>) -> Self {
        self.totp_token = totp_token.into();
        self
    }
}

impl fmt::Debug for UserLoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserLoginInput")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("totp_token", &"[REDACTED]")
            .finish()
    }
}

/// JWT issued by the JWT login endpoints
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "userID", default)]
    pub user_id: String,
    #[serde(rename = "householdID", default)]
    pub household_id: String,
    pub token: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("user_id", &self.user_id)
            .field("household_id", &self.household_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStatusResponse {
    pub user_is_authenticated: bool,
    pub account_status: String,
    pub account_status_explanation: String,
    pub active_household: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateInput {
    pub new_password: String,
    pub current_password: String,
    #[serde(default)]
    pub totp_token: String,
}

impl fmt::Debug for PasswordUpdateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordUpdateInput").finish_non_exhaustive()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotpSecretRefreshInput {
    pub current_password: String,
    #[serde(default)]
    pub totp_token: String,
}

impl fmt::Debug for TotpSecretRefreshInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpSecretRefreshInput").finish_non_exhaustive()
    }
}

/// New two-factor secret, as text and as a QR code data URI
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TotpSecretRefreshResponse {
    pub qr_code: String,
    pub two_factor_secret: String,
}

impl fmt::Debug for TotpSecretRefreshResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpSecretRefreshResponse")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecretVerificationInput {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "totpToken")]
    pub totp_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetTokenCreationRequestInput {
    pub email_address: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetTokenRedemptionRequestInput {
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordResetTokenRedemptionRequestInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetTokenRedemptionRequestInput")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddressVerificationRequestInput {
    pub email_verification_token: String,
}

/// Body of the accept, cancel and reject invitation calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdInvitationUpdateRequestInput {
    pub token: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdOwnershipTransferInput {
    pub reason: String,
    pub current_owner: String,
    pub new_owner: String,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_input_wire_names() {
        let input = UserLoginInput::new("chef", "hunter2").with_totp("123456");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"username": "chef", "password": "hunter2", "totpToken": "123456"})
        );

        let without_totp = serde_json::to_value(UserLoginInput::new("chef", "pw")).unwrap();
        assert!(without_totp.get("totpToken").is_none());
    }

    #[test]
    fn debug_hides_secrets() {
        let dbg = format!("{:?}", UserLoginInput::new("chef", "hunter2").with_totp("123456"));
        assert!(dbg.contains("chef"));
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains("123456"));

        let token: TokenResponse =
            serde_json::from_value(json!({"userID": "u1", "householdID": "h1", "token": "jwt.value"}))
                .unwrap();
        assert_eq!(token.user_id, "u1");
        assert!(!format!("{token:?}").contains("jwt.value"));
    }

    #[test]
    fn auth_status_tolerates_missing_fields() {
        let status: UserStatusResponse =
            serde_json::from_value(json!({"userIsAuthenticated": true, "activeHousehold": "h1"}))
                .unwrap();
        assert!(status.user_is_authenticated);
        assert_eq!(status.active_household, "h1");
        assert!(status.account_status.is_empty());
    }
}
