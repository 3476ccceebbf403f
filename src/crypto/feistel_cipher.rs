use crate::crypto::block::RoundId;
use crate::crypto::cipher_traits::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use crate::crypto::error::CipherError;
use crate::crypto::feistel_network::FeistelNetwork;

/// Round-instrumented block cipher built on a [`FeistelNetwork`].
///
/// This is the crate's reference producer of round telemetry; the
/// underlying round function carries no security claim.
pub struct FeistelCipher {
    network: FeistelNetwork,
    block_size: usize,
    round_keys: Vec<Vec<u8>>,
}

impl FeistelCipher {
    pub fn new(network: FeistelNetwork, block_size: usize) -> Self {
        assert!(
            block_size >= 2 && block_size % 2 == 0,
            "Feistel block size must be even and at least 2"
        );
        FeistelCipher {
            network,
            block_size,
            round_keys: Vec::new(),
        }
    }
}

impl CipherAlgorithm for FeistelCipher {
    fn encrypt(&self, block: &[u8]) -> Vec<u8> {
        self.network.encrypt_with_round_keys(block, &self.round_keys)
    }

    fn decrypt(&self, block: &[u8]) -> Vec<u8> {
        self.network.decrypt_with_round_keys(block, &self.round_keys)
    }
}

impl SymmetricCipher for FeistelCipher {
    fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        if key.is_empty() {
            return Err(CipherError::InvalidKeySize(0));
        }
        self.round_keys = self.network.generate_round_keys(key);
        Ok(())
    }
}

impl SymmetricCipherWithRounds for FeistelCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn round_schedule(&self) -> Vec<RoundId> {
        (1..=self.network.num_rounds() as RoundId).collect()
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        self.network.encrypt_with_round_keys(block, &self.round_keys)
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        self.network.decrypt_with_round_keys(block, &self.round_keys)
    }

    fn encrypt_block_traced(
        &self,
        block: &[u8],
        observe: &mut dyn FnMut(RoundId, &[u8]),
    ) -> Vec<u8> {
        self.network
            .encrypt_with_round_keys_traced(block, &self.round_keys, observe)
    }
}
