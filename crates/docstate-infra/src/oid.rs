//! Store-assigned identifier minting.
//!
//! Identifiers are 24 lowercase hex characters: a 4-byte big-endian unix
//! timestamp followed by 8 random bytes. Callers treat them as opaque;
//! the timestamp prefix only gives a rough creation ordering and keeps the
//! token the same width as the all-zero check-mode placeholder.

use chrono::Utc;
use rand::RngCore;
use rand::rngs::OsRng;

use docstate_types::document::DocumentId;

/// Mint a fresh identifier for a newly inserted document.
pub fn generate() -> DocumentId {
    let secs = Utc::now().timestamp() as u32;
    let mut tail = [0u8; 8];
    OsRng.fill_bytes(&mut tail);

    let mut hex = String::with_capacity(24);
    for byte in secs.to_be_bytes().iter().chain(tail.iter()) {
        hex.push_str(&format!("{byte:02x}"));
    }
    DocumentId::new(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstate_types::document::ID_LEN;

    #[test]
    fn test_generated_id_is_24_lower_hex() {
        let id = generate();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_id_is_never_the_placeholder() {
        let id = generate();
        assert_ne!(id, DocumentId::placeholder());
    }
}
