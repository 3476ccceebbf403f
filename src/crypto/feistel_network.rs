use std::sync::Arc;

use crate::crypto::block::RoundId;
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::key_expansion::KeyExpansion;

/// Generic balanced Feistel round engine.
///
/// Round keys come from the injected [`KeyExpansion`]; the per-round
/// mixing function is pluggable through [`EncryptionTransformation`].
/// Round identifiers run `1..=num_rounds`.
pub struct FeistelNetwork {
    num_rounds: usize,
    key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
    transformation: Arc<dyn EncryptionTransformation + Send + Sync>,
}

impl FeistelNetwork {
    pub fn new(
        num_rounds: usize,
        key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
        transformation: Arc<dyn EncryptionTransformation + Send + Sync>,
    ) -> Self {
        FeistelNetwork {
            num_rounds,
            key_expansion,
            transformation,
        }
    }

    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    pub fn generate_round_keys(&self, key: &[u8]) -> Vec<Vec<u8>> {
        self.key_expansion.generate_round_keys(key)
    }

    pub fn encrypt_with_round_keys(&self, block: &[u8], round_keys: &[Vec<u8>]) -> Vec<u8> {
        let keys: Vec<&Vec<u8>> = round_keys.iter().collect();
        self.run_rounds(block, &keys, &mut |_, _| {})
    }

    pub fn decrypt_with_round_keys(&self, block: &[u8], round_keys: &[Vec<u8>]) -> Vec<u8> {
        // The swap-at-the-end output makes decryption the same ladder
        // with the round keys reversed.
        let keys: Vec<&Vec<u8>> = round_keys.iter().rev().collect();
        self.run_rounds(block, &keys, &mut |_, _| {})
    }

    /// Encrypts one block, invoking `observe` with the joined cipher
    /// state after every round. The final round reports the swapped
    /// output state, so the last observation equals the returned
    /// ciphertext block.
    pub fn encrypt_with_round_keys_traced(
        &self,
        block: &[u8],
        round_keys: &[Vec<u8>],
        observe: &mut dyn FnMut(RoundId, &[u8]),
    ) -> Vec<u8> {
        let keys: Vec<&Vec<u8>> = round_keys.iter().collect();
        self.run_rounds(block, &keys, observe)
    }

    fn run_rounds(
        &self,
        block: &[u8],
        round_keys: &[&Vec<u8>],
        observe: &mut dyn FnMut(RoundId, &[u8]),
    ) -> Vec<u8> {
        assert_eq!(block.len() % 2, 0, "Feistel block length must be even");
        assert_eq!(
            round_keys.len(),
            self.num_rounds,
            "key schedule length does not match the round count"
        );

        if self.num_rounds == 0 {
            return block.to_vec();
        }

        let half = block.len() / 2;
        let mut left = block[..half].to_vec();
        let mut right = block[half..].to_vec();

        for (index, round_key) in round_keys.iter().enumerate() {
            let mixed = self.transformation.transform(&right, round_key);
            debug_assert_eq!(mixed.len(), half, "round function changed the half-block size");
            let next_right: Vec<u8> = left.iter().zip(mixed.iter()).map(|(l, m)| l ^ m).collect();
            left = right;
            right = next_right;

            // The final round reports the swapped output below instead.
            if index + 1 < self.num_rounds {
                let mut state = left.clone();
                state.extend_from_slice(&right);
                observe(index as RoundId + 1, &state);
            }
        }

        let mut output = right;
        output.extend_from_slice(&left);
        observe(self.num_rounds as RoundId, &output);
        output
    }
}
