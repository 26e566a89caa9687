//! AWS-style identifier generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngExt;

const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bytes at or above this bound are redrawn so `b % 36` stays uniform.
const UPPER_ALNUM_ACCEPT: u8 = 252;

/// Length of the random suffix of IAM unique IDs.
pub const UNIQUE_ID_SUFFIX_LEN: usize = 17;

/// Fill a buffer of `len` random bytes.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut buf = vec![0u8; len];
    rng.fill(buf.as_mut_slice());
    buf
}

/// Random string of uppercase ASCII letters and digits, each drawn
/// uniformly.
///
/// ```
/// let id = awsmock_core::ids::random_upper_alnum(12);
/// assert_eq!(id.len(), 12);
/// assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
/// ```
#[must_use]
pub fn random_upper_alnum(len: usize) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 32];
    while out.len() < len {
        rng.fill(&mut buf);
        out.extend(
            buf.iter()
                .filter(|&&b| b < UPPER_ALNUM_ACCEPT)
                .map(|&b| char::from(UPPER_ALNUM[usize::from(b) % UPPER_ALNUM.len()]))
                .take(len - out.len()),
        );
    }
    out
}

/// IAM unique ID: `prefix` followed by 17 random uppercase alphanumerics.
///
/// Prefixes in use: `AIDA` (users), `AGPA` (groups), `AROA` (roles),
/// `ANPA` (managed policies), `AIPA` (instance profiles).
#[must_use]
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}{}", random_upper_alnum(UNIQUE_ID_SUFFIX_LEN))
}

/// Access key ID: `AKIA` followed by 16 random uppercase alphanumerics.
#[must_use]
pub fn access_key_id() -> String {
    format!("AKIA{}", random_upper_alnum(16))
}

/// Secret access key: 40 characters of the standard base64 alphabet.
#[must_use]
pub fn secret_access_key() -> String {
    STANDARD.encode(random_bytes(30))
}

/// Request ID attached to every response.
#[must_use]
pub fn request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
