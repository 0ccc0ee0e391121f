use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};
use uuid::Uuid;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    MissingOrInvalidAud,
    EmptyClaim(&'static str),
    InvalidSubUuid,
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingOrInvalidAud => write!(f, "missing or invalid 'aud' claim"),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidSubUuid => write!(f, "invalid 'sub' (expected UUID)"),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        // Typical: aud is a string
        serde_json::Value::String(s) => !s.trim().is_empty(),
        // Also valid: aud is an array of strings
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `aud` in JWT can be either string or array; jsonwebtoken validates it via `Validation::set_audience`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    // Keep as Value to accept both string and array. Validation handles audience checks.
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Verified token in the shape the application consumes.
///
/// - `sub` is a UUID by project convention, so it is promoted to `Uuid` here.
/// - `iss`/`aud`/`exp` consistency is guaranteed by `verify_strict`.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

/// EdDSA (Ed25519) access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        access_public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(access_public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature
    /// - `exp` (unless disabled)
    /// - `iss` and `aud` (because we set them)
    ///
    /// This method additionally checks:
    /// - required claims are present *and not empty* (`iss`, `aud`, `sub`, `exp`)
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let claims = self.verify(token)?;

        // Required (non-empty) checks. `exp` is `u64` so serde guarantees presence,
        // but we still defend against a meaningless value.
        if claims.iss.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(AccessJwtError::EmptyClaim("exp"));
        }
        if !aud_is_present_and_valid(&claims.aud) {
            return Err(AccessJwtError::MissingOrInvalidAud);
        }

        // Project convention: subject is a UUID
        if Self::parse_sub_uuid(&claims.sub).is_err() {
            return Err(AccessJwtError::InvalidSubUuid);
        }

        Ok(claims)
    }

    /// Verify + strict claim validation, then convert claims into an application-friendly type.
    ///
    /// This is the recommended entry-point for middleware.
    pub fn verify_verified(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.verify_strict(token)?;

        let user_id =
            Self::parse_sub_uuid(&claims.sub).map_err(|_| AccessJwtError::InvalidSubUuid)?;

        Ok(VerifiedAccessToken {
            user_id,
            roles: claims.roles.unwrap_or_default(),
        })
    }

    // Helper: parse `sub` into UUID
    pub fn parse_sub_uuid(sub: &str) -> Result<Uuid, ()> {
        Uuid::parse_str(sub).map_err(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{TEST_ISSUER, test_auth_service, token};

    #[test]
    fn accepts_a_well_formed_token_and_extracts_roles() {
        let auth = test_auth_service();
        let token = token("8f9f12cd-9b2f-4732-9c46-8e6a0a176f6b", &["admin"]);

        let verified = auth.verify_verified(&token).unwrap();
        assert_eq!(
            verified.user_id.to_string(),
            "8f9f12cd-9b2f-4732-9c46-8e6a0a176f6b"
        );
        assert_eq!(verified.roles, vec!["admin".to_string()]);
    }

    #[test]
    fn rejects_a_non_uuid_subject() {
        let auth = test_auth_service();
        let token = token("user-42", &[]);
        assert!(auth.verify_verified(&token).is_err());
    }

    #[test]
    fn rejects_the_wrong_audience() {
        // tokens are signed for TEST_AUDIENCE; this verifier expects another
        let auth = super::AuthService::new(
            crate::test_support::TEST_PUBLIC_KEY_PEM,
            TEST_ISSUER,
            "some-other-audience",
            0,
        )
        .unwrap();
        let token = token("8f9f12cd-9b2f-4732-9c46-8e6a0a176f6b", &[]);
        assert!(auth.verify_verified(&token).is_err());
    }
}
