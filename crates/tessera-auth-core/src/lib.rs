//! Tessera Auth Core - session token issuance and validation
//!
//! Tokens are HS256 JWTs whose `iat` claim must equal the auth time the
//! directory currently holds for the user. Recording a new auth time (at login
//! or on a credential change) therefore invalidates every earlier token
//! without any revocation list.

pub mod claims;
pub mod config;
pub mod crypto;
pub mod error;
pub mod issuer;
pub mod service;
pub mod validator;

pub use claims::SessionClaims;
pub use config::{ConfigError, TokenConfig, TOKEN_LIFETIME};
pub use crypto::{KeyError, SigningKey};
pub use error::{AuthError, Rejection, RejectionClass};
pub use issuer::{IssuedToken, TokenIssuer};
pub use service::TokenService;
pub use validator::{bearer_token, Principal, TokenValidator, ValidationResult};
