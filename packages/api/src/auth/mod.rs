//! # Credential primitives
//!
//! The three cryptographic helpers the user validation chain is built on:
//!
//! - [`hash_password`] / [`verify_password`] — Argon2id password hashing
//!   with a server pepper.
//! - [`KeyedHasher`] — HMAC-SHA256 digests of remember tokens, used as the
//!   session lookup key.
//! - [`token`] — remember-token generation and the decode-and-measure
//!   check for caller-supplied tokens.
//!
//! Tokens and digests share one text encoding: URL-safe base64 without
//! padding, so values can travel in cookies and URLs.

mod hmac;
mod password;
pub mod token;

pub use self::hmac::KeyedHasher;
pub use self::password::{hash_password, verify_password};

/// Base64 engine shared by token and digest encoding.
pub(crate) const B64: base64::engine::GeneralPurpose =
    base64::engine::general_purpose::URL_SAFE_NO_PAD;
