//! Content address of a stored object
//!
//! A hash key is the 20-byte SHA-1 digest of an object's serialized form.
//! It is the only identifier objects use to refer to each other, and it names
//! the object file inside the objects directory.
//!
//! ## Format
//!
//! - Binary: 20 bytes
//! - Text: 40 lower-case hexadecimal characters, two per byte

use crate::artifacts::objects::{HASH_KEY_HEX_LENGTH, HASH_KEY_LENGTH};
use sha1::{Digest, Sha1};

/// Fixed-width SHA-1 digest identifying an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey([u8; HASH_KEY_LENGTH]);

impl HashKey {
    /// Hash arbitrary bytes into a key
    pub fn hash(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        let mut bytes = [0u8; HASH_KEY_LENGTH];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Parse a key from its hexadecimal representation
    ///
    /// # Errors
    ///
    /// Fails when the length is odd, differs from 40 characters,
    /// or a byte pair is not valid hex.
    pub fn parse(hex: &str) -> anyhow::Result<Self> {
        if hex.len() % 2 != 0 {
            anyhow::bail!("odd hash key length: {}", hex.len());
        }
        if hex.len() != HASH_KEY_HEX_LENGTH {
            anyhow::bail!("invalid hash key length: {}", hex.len());
        }

        let mut bytes = [0u8; HASH_KEY_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex
                .get(i * 2..i * 2 + 2)
                .ok_or_else(|| anyhow::anyhow!("invalid hash key characters: {}", hex))?;
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| anyhow::anyhow!("invalid hash key characters: {}", hex))?;
        }

        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }

    /// First 7 hex characters, used in command output
    pub fn to_short_hex(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl std::fmt::Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for HashKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
