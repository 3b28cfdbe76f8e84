use log::*;
use reqwest::Client;

use crate::{api::API_VERSION, assertion::AssertionSigner, error::PoyntApiError};

/// OAuth2 grant type for the JWT-bearer flow.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Sign a fresh assertion and trade it for a bearer access token at `{endpoint}/token`.
///
/// The grant is posted as a URL-encoded form with exactly two fields, `grantType` and `assertion`. The token comes
/// back in the `accessToken` field of the response and is treated as an opaque string from then on.
pub async fn exchange_access_token(
    client: &Client,
    endpoint: &str,
    signer: &AssertionSigner,
) -> Result<String, PoyntApiError> {
    let assertion = signer.sign()?;
    let url = format!("{endpoint}/token");
    debug!("Requesting access token from {url}");
    let response = client
        .post(&url)
        .header("api-version", API_VERSION)
        .form(&[("grantType", JWT_BEARER_GRANT_TYPE), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| PoyntApiError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        return Err(PoyntApiError::TokenExchange(format!("Server returned {status}. {message}")));
    }
    let body: serde_json::Value = response.json().await.map_err(|e| PoyntApiError::TokenExchange(e.to_string()))?;
    let token = body["accessToken"]
        .as_str()
        .ok_or_else(|| PoyntApiError::TokenExchange("Response is missing the accessToken field".to_string()))?;
    info!("Access token granted ({} characters)", token.len());
    Ok(token.to_string())
}
