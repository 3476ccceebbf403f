use crate::crypto::encryption_transformation::EncryptionTransformation;

/// Round function that XORs the half-block with the cycled round key.
/// A Feistel ladder only needs the round function to be deterministic,
/// so this is enough to exercise the pipeline; not a security primitive.
pub struct XorTransformation;

impl EncryptionTransformation for XorTransformation {
    fn transform(&self, input_block: &[u8], round_key: &[u8]) -> Vec<u8> {
        if round_key.is_empty() {
            return input_block.to_vec();
        }
        input_block
            .iter()
            .zip(round_key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}
