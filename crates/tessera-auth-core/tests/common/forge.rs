//! Hand-built tokens for attack and edge-case tests

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use super::TEST_SECRET;

/// Signs arbitrary claims with the shared test secret
pub struct TokenForger {
    key: EncodingKey,
}

impl TokenForger {
    pub fn new() -> Self {
        Self::with_secret(TEST_SECRET)
    }

    pub fn with_secret(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Well-formed claims for a user at the given auth time (seconds)
    pub fn claims(user_id: i64, role: &str, iat: i64) -> Value {
        json!({
            "userId": user_id,
            "userRole": role,
            "iat": iat,
            "exp": iat + 24 * 60 * 60,
        })
    }

    pub fn sign(&self, claims: &Value) -> String {
        self.sign_with(Algorithm::HS256, claims)
    }

    pub fn sign_with(&self, alg: Algorithm, claims: &Value) -> String {
        encode(&Header::new(alg), claims, &self.key).expect("Failed to sign test token")
    }

    /// An unsigned token (`alg: none`)
    pub fn unsigned(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.")
    }

    /// Replace the payload of a signed token, keeping its signature
    pub fn swap_payload(token: &str, claims: &Value) -> String {
        let mut parts = token.split('.');
        let header = parts.next().unwrap_or_default();
        let _payload = parts.next();
        let signature = parts.next().unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.{signature}")
    }
}
