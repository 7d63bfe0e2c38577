//! Session-token verification.
//!
//! The identity provider issues RS256-signed JWTs; we only ever verify them
//! against its PEM public key. The `sub` claim is the external identity id
//! (`clerk_id`) that Tenant and Manager rows are keyed on.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims we read from a session token. Extra provider claims are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject -- the external identity id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Not-before time (UTC Unix timestamp).
    #[serde(default)]
    pub nbf: Option<i64>,
}

/// RS256 verifier built once at startup from the configured public key.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Parse a PEM-encoded RSA public key.
    pub fn from_rsa_pem(pem: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        // Session tokens carry an `azp` claim rather than `aud`.
        validation.validate_aud = false;
        validation.validate_nbf = true;

        Ok(Self { key, validation })
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// Checks signature, algorithm, `exp`, and `nbf` (when present).
    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}
