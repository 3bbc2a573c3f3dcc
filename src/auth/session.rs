//! Session token issuing and verification
//!
//! Tokens are HS256 JWTs carrying the subject and a fixed expiry. Nothing is
//! stored server-side; expiry is the only way a token stops working.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
};

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens with a single server secret
pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl SessionVerifier {
    pub fn new(secret: &str, lifetime: Duration, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "session signing secret must not be empty"
            )));
        }

        let lifetime = chrono::Duration::from_std(lifetime)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid token lifetime: {}", e)))?;

        // Expiry is checked against the injected clock in `verify`, so the
        // library's wall-clock check is turned off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            clock,
        })
    }

    /// Issue a token for an already authenticated subject
    #[instrument(skip(self))]
    pub fn issue(&self, subject: &str) -> AppResult<IssuedToken> {
        // Claims carry whole seconds; report the same instants to the caller
        let issued_at = self.clock.now().trunc_subsecs(0);
        let expires_at = issued_at + self.lifetime;

        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign token: {}", e)))?;

        debug!(expires_at = %expires_at, "Issued session token");

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Return the subject of a valid token
    ///
    /// Forged, malformed and expired tokens all yield
    /// [`AppError::InvalidCredential`] and nothing else.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let claims = self.decode_claims(token).ok_or(AppError::InvalidCredential)?;

        if self.clock.now().timestamp() >= claims.exp || claims.sub.is_empty() {
            return Err(AppError::InvalidCredential);
        }

        Ok(claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Session token rejected");
                None
            }
        }
    }
}
