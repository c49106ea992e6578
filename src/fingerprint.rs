//! Content fingerprints used for change detection.

use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of `data`.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Fingerprint of the UTF-8 encoding of `text`.
pub fn fingerprint_str(text: &str) -> String {
    fingerprint(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = fingerprint(b"co2,12.5,2024-01-01T00:00:00Z\n");
        let b = fingerprint(b"co2,12.5,2024-01-01T00:00:00Z\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_different_content() {
        assert_ne!(fingerprint(b"alpha"), fingerprint(b"alphb"));
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_str_matches_bytes() {
        assert_eq!(fingerprint_str("héllo"), fingerprint("héllo".as_bytes()));
    }
}
