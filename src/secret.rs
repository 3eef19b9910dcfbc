// ============================================================================
// src/secret.rs – OS-backed secret generation (JWT secret, password pepper)
// ============================================================================

use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use getrandom::getrandom;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{check_length, ForgeError};

pub const DEFAULT_JWT_BYTES: usize = 64;
pub const DEFAULT_PEPPER_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    JwtSecret,
    Pepper,
}

impl SecretKind {
    pub fn default_key(self) -> &'static str {
        match self {
            SecretKind::JwtSecret => "JWT_SECRET",
            SecretKind::Pepper => "PEPPER",
        }
    }

    pub fn default_bytes(self) -> usize {
        match self {
            SecretKind::JwtSecret => DEFAULT_JWT_BYTES,
            SecretKind::Pepper => DEFAULT_PEPPER_BYTES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SecretKind::JwtSecret => "JWT secret",
            SecretKind::Pepper => "pepper",
        }
    }
}

/// Fill `len` bytes from the OS randomness source. The buffer is wiped on drop.
pub fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let len = check_length(len)?;
    let mut buf = Zeroizing::new(vec![0u8; len]);
    // getrandom::Error does not implement std::error::Error -> map explicitly
    getrandom(&mut buf[..]).map_err(|e| ForgeError::Entropy(format!("{e:?}")))?;
    Ok(buf)
}

/// `len` random bytes as lowercase hex (`2 * len` characters).
pub fn generate_jwt_secret(len: usize) -> Result<Zeroizing<String>> {
    let raw = random_bytes(len)?;
    let value = Zeroizing::new(hex::encode(&raw[..]));
    ensure_line_safe(&value)?;
    Ok(value)
}

/// `len` random bytes as URL-safe base64. Padding is part of the value.
pub fn generate_pepper(len: usize) -> Result<Zeroizing<String>> {
    let raw = random_bytes(len)?;
    let value = Zeroizing::new(URL_SAFE.encode(&raw[..]));
    ensure_line_safe(&value)?;
    Ok(value)
}

pub fn generate(kind: SecretKind, len: usize) -> Result<Zeroizing<String>> {
    match kind {
        SecretKind::JwtSecret => generate_jwt_secret(len),
        SecretKind::Pepper => generate_pepper(len),
    }
}

/// Reject values that would break line-based env parsing.
pub fn ensure_line_safe(value: &str) -> Result<(), ForgeError> {
    if value.is_empty() || value.contains(['\n', '\r', '\0']) {
        return Err(ForgeError::UnsafeValue);
    }
    Ok(())
}

/// Short SHA-256 signet of a value (first 64 bits, hex). Safe to print.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_secret_is_lowercase_hex_of_double_length() {
        for n in [1usize, 16, 33, DEFAULT_JWT_BYTES] {
            let secret = generate_jwt_secret(n).unwrap();
            assert_eq!(secret.len(), 2 * n);
            assert!(secret
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn default_jwt_secret_is_128_chars() {
        let secret = generate(SecretKind::JwtSecret, SecretKind::JwtSecret.default_bytes()).unwrap();
        assert_eq!(secret.len(), 128);
    }

    #[test]
    fn pepper_decodes_to_requested_length() {
        for n in [1usize, 2, 3, 16, DEFAULT_PEPPER_BYTES, 50] {
            let pepper = generate_pepper(n).unwrap();
            let decoded = URL_SAFE.decode(pepper.as_bytes()).unwrap();
            assert_eq!(decoded.len(), n);
            assert!(!pepper.contains('+') && !pepper.contains('/'));
        }
    }

    #[test]
    fn default_pepper_keeps_padding() {
        let pepper = generate(SecretKind::Pepper, DEFAULT_PEPPER_BYTES).unwrap();
        assert_eq!(pepper.len(), 44);
        assert!(pepper.ends_with('='));
    }

    #[test]
    fn consecutive_values_differ() {
        let a = generate_jwt_secret(16).unwrap();
        let b = generate_jwt_secret(16).unwrap();
        assert_ne!(*a, *b);

        let c = generate_pepper(16).unwrap();
        let d = generate_pepper(16).unwrap();
        assert_ne!(*c, *d);
    }

    #[test]
    fn out_of_range_lengths_are_rejected() {
        for len in [0usize, crate::error::MAX_SECRET_BYTES + 1, usize::MAX] {
            let err = generate_pepper(len).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ForgeError>(),
                Some(ForgeError::InvalidLength(n)) if *n == len
            ));
        }
    }

    #[test]
    fn line_breaking_values_are_unsafe() {
        assert!(ensure_line_safe("abc==").is_ok());
        assert!(ensure_line_safe("").is_err());
        assert!(ensure_line_safe("ab\ncd").is_err());
        assert!(ensure_line_safe("ab\r").is_err());
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(fingerprint("abc"), "ba7816bf8f01cfea");
    }
}
