use crate::crypto::block::RoundId;
use crate::crypto::error::CipherError;

pub trait CipherAlgorithm {
    fn encrypt(&self, data: &[u8]) -> Vec<u8>;
    fn decrypt(&self, data: &[u8]) -> Vec<u8>;
}

pub trait SymmetricCipher: CipherAlgorithm {
    fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError>;
}

/// Block ciphers that expose their internal round pipeline.
///
/// The round schedule names every stage the cipher reports through
/// [`encrypt_block_traced`](Self::encrypt_block_traced); the facade
/// feeds those reports into a
/// [`Collector`](crate::crypto::collector::Collector).
pub trait SymmetricCipherWithRounds: SymmetricCipher {
    fn block_size(&self) -> usize;

    /// Identifiers of the rounds this cipher reports, in pipeline order.
    fn round_schedule(&self) -> Vec<RoundId>;

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8>;
    fn decrypt_block(&self, block: &[u8]) -> Vec<u8>;

    /// Encrypts one block, handing every round's output to `observe`
    /// before returning the final ciphertext block. The last reported
    /// round output equals the returned ciphertext.
    fn encrypt_block_traced(
        &self,
        block: &[u8],
        observe: &mut dyn FnMut(RoundId, &[u8]),
    ) -> Vec<u8>;
}
