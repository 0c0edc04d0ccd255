//! License key generation.
//!
//! Keys are URL-safe base64 tokens carrying 192 bits of OS entropy. The
//! generator alone does not guarantee uniqueness - the `UNIQUE(product_id,
//! key)` constraint in the store does, with a bounded retry loop on the
//! insert path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Raw entropy per key (192 bits, encodes to 32 URL-safe characters).
const KEY_BYTES: usize = 24;

/// Generate a fresh random license key.
pub fn generate_license_key() -> String {
    let mut buf = [0u8; KEY_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
