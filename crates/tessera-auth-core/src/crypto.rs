//! Signing key handling
//!
//! The key is injected once at construction and never changes for the
//! lifetime of the component holding it. Provisioning and rotation happen
//! outside this crate.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};

/// Pre-built HS256 key pair for signing and verifying session tokens.
///
/// Both halves are derived once and cloned into the issuer and validator.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    key_length: usize,
}

impl SigningKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// The only algorithm tokens are signed or accepted with
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a new signing key from secret bytes.
    ///
    /// # Errors
    /// Returns error if key is too short (less than 32 bytes).
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let secret = secret.as_ref();
        if secret.len() < Self::MIN_KEY_LENGTH {
            return Err(KeyError::KeyTooShort {
                actual: secret.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            key_length: secret.len(),
        })
    }

    /// Base validation rules for this key: HS256 only, `exp` required.
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation
    }

    /// Sign claims into a compact JWS
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding)
    }

    /// Verify a compact JWS and decode its claims
    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
        validation: &Validation,
    ) -> Result<T, jsonwebtoken::errors::Error> {
        decode::<T>(token, &self.decoding, validation).map(|data| data.claims)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &Self::ALGORITHM)
            .field("key_length", &self.key_length)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a signing key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}
