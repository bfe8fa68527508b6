use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::B64;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 hasher bound to the server's secret key.
///
/// Digests are deterministic per key, so the digest of a client-presented
/// token can be used directly as a storage lookup key. Every call clones
/// the precomputed keyed state, so no input carries over between calls on
/// the same instance.
#[derive(Clone)]
pub struct KeyedHasher {
    mac: HmacSha256,
}

impl KeyedHasher {
    pub fn new(key: &str) -> Self {
        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        Self { mac }
    }

    /// Digest `value`, text-encoded the same way as remember tokens.
    pub fn hash(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        B64.encode(mac.finalize().into_bytes())
    }
}
