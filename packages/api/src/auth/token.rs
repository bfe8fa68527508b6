//! Remember-token generation and measurement.

use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::auth::B64;
use crate::error::Error;

/// Number of random bytes in a generated remember token.
pub const REMEMBER_TOKEN_BYTES: usize = 32;

/// Generate a remember token: 32 bytes from the OS CSPRNG, URL-safe base64.
pub fn remember_token() -> Result<String, Error> {
    let mut bytes = [0u8; REMEMBER_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| Error::Rand(err.to_string()))?;
    Ok(B64.encode(bytes))
}

/// Decode a previously encoded token and report how many bytes it carries.
///
/// Used to enforce the minimum-entropy policy on caller-supplied tokens
/// that did not come from [`remember_token`].
pub fn n_bytes(token: &str) -> Result<usize, Error> {
    let bytes = B64.decode(token)?;
    Ok(bytes.len())
}
