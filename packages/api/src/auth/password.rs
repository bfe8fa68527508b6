//! # Password hashing and verification — Argon2id with a server pepper
//!
//! - [`hash_password`] — appends the process-wide pepper to the plaintext,
//!   generates a random salt via [`OsRng`], and hashes with the default
//!   Argon2id parameters. The result is a PHC-format string
//!   (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`) stored in the
//!   `password_hash` column. The per-hash salt means two hashes of the
//!   same password differ; the pepper means a leaked hash set alone is not
//!   enough to mount a dictionary attack.
//!
//! - [`verify_password`] — parses a PHC-format hash and checks the
//!   peppered plaintext against it. A mismatch is the expected failure
//!   mode and comes back as `Ok(false)`; `Err` is reserved for malformed
//!   hashes and internal hashing failures, which callers must not conflate
//!   with bad credentials.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::Error;

/// Hash a password with the pepper appended. Returns a PHC-format string.
pub fn hash_password(password: &str, pepper: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let peppered = format!("{password}{pepper}");
    let hash = Argon2::default()
        .hash_password(peppered.as_bytes(), &salt)
        .map_err(|err| Error::PasswordHash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password + pepper against a stored PHC-format hash.
pub fn verify_password(password: &str, pepper: &str, hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash).map_err(|err| Error::PasswordHash(err.to_string()))?;
    let peppered = format!("{password}{pepper}");
    match Argon2::default().verify_password(peppered.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(Error::PasswordHash(err.to_string())),
    }
}
