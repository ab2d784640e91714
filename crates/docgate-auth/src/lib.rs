//! # DocGate Auth
//!
//! Service-account credentials and OAuth2 bearer tokens for the outbound
//! Google API calls. The key is parsed once at startup; tokens are minted by
//! signing an RS256 JWT assertion and exchanging it at the key's token
//! endpoint, then cached until shortly before expiry.

pub mod credentials;
pub mod token;

pub use credentials::ServiceAccountKey;
pub use token::TokenSource;
