use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::crypto::error::CipherError;

/// Cryptographically secure byte source for key and IV material.
///
/// Constructed once and passed explicitly to whatever needs random
/// material, instead of hiding a process-global generator behind a
/// first-use initialization.
pub struct SecureRandom {
    rng: OsRng,
}

impl SecureRandom {
    pub fn new() -> Self {
        SecureRandom { rng: OsRng }
    }

    /// Draws `len` bytes from the operating system source.
    pub fn generate(&mut self, len: usize) -> Result<Vec<u8>, CipherError> {
        let mut buf = vec![0u8; len];
        self.rng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CipherError::Rng(e.to_string()))?;
        Ok(buf)
    }

    /// Fresh key of `key_size` bytes, for use when no chosen key was
    /// supplied.
    pub fn generate_key(&mut self, key_size: usize) -> Result<Vec<u8>, CipherError> {
        self.generate(key_size)
    }

    /// Fresh IV matching the cipher's block size.
    pub fn generate_iv(&mut self, block_size: usize) -> Result<Vec<u8>, CipherError> {
        self.generate(block_size)
    }
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::new()
    }
}
