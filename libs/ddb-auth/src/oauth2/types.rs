use serde::Deserialize;

/// Token endpoint response for both the code exchange and refreshes.
///
/// `Deserialize` only, so tokens cannot be serialized into logs.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Present on the code exchange; servers may rotate it on refresh
    #[serde(default)]
    pub refresh_token: Option<String>,
}
