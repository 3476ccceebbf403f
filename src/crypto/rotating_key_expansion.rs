use crate::crypto::key_expansion::KeyExpansion;

/// Derives one subkey per round by rotating the key bytes left by the
/// round index.
pub struct RotatingKeyExpansion {
    num_rounds: usize,
}

impl RotatingKeyExpansion {
    pub fn new(num_rounds: usize) -> Self {
        RotatingKeyExpansion { num_rounds }
    }
}

impl KeyExpansion for RotatingKeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Vec<Vec<u8>> {
        assert!(!key.is_empty(), "key must not be empty");
        (0..self.num_rounds)
            .map(|round| {
                let mut subkey = key.to_vec();
                subkey.rotate_left(round % key.len());
                subkey
            })
            .collect()
    }
}
