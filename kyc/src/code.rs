//! Invitation code generation.

use rand::RngCore;

/// Prefix carried by every invitation code.
pub const CODE_PREFIX: &str = "KYC";

/// Bytes of entropy behind the code body (10 hex characters).
const CODE_BYTES: usize = 5;

/// Generate a shareable invitation code: the fixed prefix followed by
/// ten uppercase hex characters. 40 bits of entropy is enough that
/// collisions are handled by insert-and-retry rather than prevention.
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{CODE_PREFIX}{}", hex::encode_upper(bytes))
}
