use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PoyntApiError;

/// Validity window of a signed assertion, in seconds. The platform rejects assertions that live longer.
pub const ASSERTION_TTL_SECS: i64 = 360;

/// Claim set of a self-issued assertion. The application vouches for itself, so subject and issuer are both the
/// application id, and the audience is the endpoint the token will be presented to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(application_id: &str, audience: &str) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: application_id.to_string(),
            iss: application_id.to_string(),
            aud: vec![audience.to_string()],
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        }
    }
}

/// Signs short-lived identity assertions with the application's RSA private key.
pub struct AssertionSigner {
    application_id: String,
    audience: String,
    encoding_key: EncodingKey,
}

impl AssertionSigner {
    /// Load the signing key from PEM text. Both PKCS#1 and PKCS#8 encodings are accepted.
    pub fn from_pem(pem: &str, application_id: &str, audience: &str) -> Result<Self, PoyntApiError> {
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| PoyntApiError::KeyLoad(e.to_string()))?;
        Ok(Self { application_id: application_id.to_string(), audience: audience.to_string(), encoding_key })
    }

    /// Produce a fresh RS256-signed assertion. Each call issues a new `jti` and a new validity window.
    pub fn sign(&self) -> Result<String, PoyntApiError> {
        let claims = AssertionClaims::new(&self.application_id, &self.audience);
        debug!("Signing assertion {} for {}", claims.jti, self.application_id);
        let header = Header { alg: Algorithm::RS256, ..Default::default() };
        encode(&header, &claims, &self.encoding_key).map_err(|e| PoyntApiError::Signing(e.to_string()))
    }
}
