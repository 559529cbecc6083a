use sha2::{Digest, Sha256};

pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short digest prefix used in log events in place of the raw input.
pub fn short_digest(text: &str) -> String {
    let mut full = sha256_hex(text);
    full.truncate(12);
    full
}
