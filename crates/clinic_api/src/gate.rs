//! Identity gate: bearer-token issuance and verification.
//!
//! # Responsibility
//! - Turn a bearer credential into a [`Claims`] record or a typed failure.
//! - Issue HS256 JWTs for operator tooling.
//!
//! # Invariants
//! - The signature is checked before the claims are trusted; expiry is only
//!   reported for correctly signed tokens.
//! - Only `alg = HS256` headers are accepted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_ALG: &str = "HS256";
const TOKEN_TYP: &str = "JWT";

/// Caller role carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Patient => write!(f, "patient"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "patient" => Ok(Self::Patient),
            other => Err(format!("unknown role `{other}`; expected admin|patient")),
        }
    }
}

/// Verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account) id.
    pub sub: i64,
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Why a bearer credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Access denied. No token provided or invalid format.")]
    Missing,
    #[error("Access denied. Invalid token.")]
    Malformed,
    #[error("Access denied. Token has expired.")]
    Expired,
    #[error("Access denied. Invalid token.")]
    Invalid,
}

impl AuthError {
    /// Stable failure kind reported as `result.errorType`.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("token secret must not be empty")]
    EmptySecret,
    #[error("token lifetime must be positive, got {0} seconds")]
    InvalidTtl(i64),
    #[error("token expiry overflows the clock range")]
    ExpiryOverflow,
    #[error("token secret rejected by HMAC: {0}")]
    InvalidKey(String),
    #[error("failed to encode token: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Verifies bearer credentials.
pub trait IdentityGate: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// HMAC-SHA256 signed JWT gate.
#[derive(Clone)]
pub struct Hs256Gate {
    mac: HmacSha256,
    ttl_secs: i64,
}

impl Hs256Gate {
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self, GateError> {
        if secret.is_empty() {
            return Err(GateError::EmptySecret);
        }
        if ttl_secs <= 0 {
            return Err(GateError::InvalidTtl(ttl_secs));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| GateError::InvalidKey(err.to_string()))?;
        Ok(Self { mac, ttl_secs })
    }

    /// Issues a token for `subject` valid for the configured TTL.
    pub fn issue(&self, subject: i64, role: Role) -> Result<String, GateError> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or(GateError::ExpiryOverflow)?;
        self.sign(&Claims {
            sub: subject,
            role,
            iat: now,
            exp,
        })
    }

    /// Signs arbitrary claims. Exposed for callers that pin `iat`/`exp`.
    pub fn sign(&self, claims: &Claims) -> Result<String, GateError> {
        let header = TokenHeader {
            alg: TOKEN_ALG.to_string(),
            typ: TOKEN_TYP.to_string(),
        };
        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let message = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{message}.{signature}"))
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed);
        };

        let header: TokenHeader = decode_segment(header_b64)?;
        if header.alg != TOKEN_ALG {
            return Err(AuthError::Invalid);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::Malformed)?;
        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| AuthError::Invalid)?;

        let claims: Claims = decode_segment(claims_b64)?;
        if claims.exp <= now {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

impl IdentityGate for Hs256Gate {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Hs256Gate {
        Hs256Gate::new("unit-test-secret", 60).unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let gate = gate();
        let token = gate.issue(12, Role::Patient).unwrap();
        let claims = gate.verify(&token).unwrap();
        assert_eq!(claims.sub, 12);
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.exp - claims.iat, 60);
        assert!(!claims.is_admin());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let gate = gate();
        let token = gate
            .sign(&Claims {
                sub: 1,
                role: Role::Admin,
                iat: 1_000,
                exp: 2_000,
            })
            .unwrap();
        assert_eq!(gate.verify_at(&token, 1_999).unwrap().sub, 1);
        assert_eq!(gate.verify_at(&token, 2_000), Err(AuthError::Expired));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let other = Hs256Gate::new("another-secret", 60).unwrap();
        let token = other.issue(1, Role::Admin).unwrap();
        assert_eq!(gate().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn tampered_claims_are_invalid() {
        let gate = gate();
        let token = gate.issue(1, Role::Patient).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                sub: 1,
                role: Role::Admin,
                iat: 0,
                exp: i64::MAX,
            })
            .unwrap(),
        );
        parts[1] = &forged;
        assert_eq!(gate.verify(&parts.join(".")), Err(AuthError::Invalid));
    }

    #[test]
    fn garbage_is_malformed() {
        let gate = gate();
        assert_eq!(gate.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(gate.verify("a.b.c.d"), Err(AuthError::Malformed));
        assert_eq!(gate.verify("%%.%%.%%"), Err(AuthError::Malformed));
    }

    #[test]
    fn expiry_message_differs_from_invalid() {
        assert_eq!(
            AuthError::Expired.to_string(),
            "Access denied. Token has expired."
        );
        assert_eq!(AuthError::Invalid.to_string(), "Access denied. Invalid token.");
        assert_eq!(AuthError::Expired.error_type(), "expired");
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("doctor".parse::<Role>().is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            Hs256Gate::new("", 60),
            Err(GateError::EmptySecret)
        ));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        for ttl in [0, -10, i64::MIN] {
            assert!(matches!(
                Hs256Gate::new("s", ttl),
                Err(GateError::InvalidTtl(value)) if value == ttl
            ));
        }
    }

    #[test]
    fn overflowing_expiry_is_an_error() {
        let gate = Hs256Gate::new("s", i64::MAX).unwrap();
        assert!(matches!(
            gate.issue(1, Role::Admin),
            Err(GateError::ExpiryOverflow)
        ));
    }
}
