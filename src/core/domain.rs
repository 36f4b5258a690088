use secrecy::{ExposeSecret, Secret};
use std::fmt;
use zeroize::Zeroizing;

use super::errors::DappError;

/// Private key wrapper (32 bytes) with secrecy::Secret for automatic zeroization and display-hiding
pub struct PrivateKey(Secret<[u8; 32]>);

impl PrivateKey {
    pub fn new(k: [u8; 32]) -> Self {
        Self(Secret::new(k))
    }

    /// Parses a hex key, with or without a `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, DappError> {
        let trimmed = input.trim();
        let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(raw).map_err(|e| DappError::InvalidKey(format!("not valid hex: {}", e)))?,
        );
        Self::try_from_slice(&bytes)
    }

    /// Try to construct a PrivateKey from a byte slice (must be 32 bytes).
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, DappError> {
        if slice.len() != 32 {
            return Err(DappError::InvalidKey("private key must be 32 bytes".to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(slice);
        Ok(PrivateKey::new(arr))
    }

    /// Scoped access to the underlying secret bytes.
    pub fn with_secret<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8; 32]) -> R,
    {
        f(self.0.expose_secret())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_prefixed_and_bare() {
        let bare = "11".repeat(32);
        let prefixed = format!("0x{}", bare);
        let a = PrivateKey::from_hex(&bare).unwrap();
        let b = PrivateKey::from_hex(&prefixed).unwrap();
        assert_eq!(a.with_secret(|k| *k), b.with_secret(|k| *k));
        assert!(a.with_secret(|k| k.iter().all(|&x| x == 0x11)));
    }

    #[test]
    fn from_hex_trims_surrounding_whitespace() {
        let key = PrivateKey::from_hex(&format!("\t0x{}\n", "ab".repeat(32))).unwrap();
        assert!(key.with_secret(|k| k.iter().all(|&x| x == 0xab)));
    }

    #[test]
    fn from_hex_rejects_short_key() {
        let res = PrivateKey::from_hex("0xdeadbeef");
        assert!(matches!(res, Err(DappError::InvalidKey(_))));
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let res = PrivateKey::from_hex(&"zz".repeat(32));
        assert!(matches!(res, Err(DappError::InvalidKey(_))));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = PrivateKey::new([0x42; 32]);
        let shown = format!("{:?}", key);
        assert!(!shown.contains("42"));
        assert!(shown.contains("REDACTED"));
    }
}
