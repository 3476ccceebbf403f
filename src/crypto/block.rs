use std::collections::HashMap;
use std::sync::Arc;

use crate::crypto::error::CipherError;

/// Identifier of one named stage of a cipher's round pipeline.
pub type RoundId = u32;

/// Transformation history of one fixed-size plaintext segment.
///
/// A `Block` owns a snapshot of the segment's original bytes plus every
/// round output reported for it so far. It shares its owning
/// [`Collector`](crate::crypto::collector::Collector)'s round schedule
/// through an `Arc`, so eligibility checks and replay ordering need no
/// back-pointer to the collector itself.
pub struct Block {
    rounds: Arc<[RoundId]>,
    plain: Vec<u8>,
    recorded: HashMap<RoundId, Vec<u8>>,
}

impl Block {
    pub(crate) fn new(rounds: Arc<[RoundId]>, plain: &[u8]) -> Self {
        Block {
            rounds,
            plain: plain.to_vec(),
            recorded: HashMap::new(),
        }
    }

    /// Records the output of one cipher round for this segment.
    ///
    /// Rounds may arrive in any order, but every identifier must appear
    /// in the owning collector's schedule and may be recorded at most
    /// once. A rejected call leaves the block untouched, so the first
    /// recorded value always survives.
    pub fn add_round(&mut self, round_id: RoundId, output: &[u8]) -> Result<(), CipherError> {
        if !self.rounds.contains(&round_id) {
            return Err(CipherError::UnknownRound { id: round_id });
        }
        if self.recorded.contains_key(&round_id) {
            return Err(CipherError::DuplicateRound { id: round_id });
        }
        self.recorded.insert(round_id, output.to_vec());
        Ok(())
    }

    /// The plaintext snapshot this block was created with.
    pub fn plain(&self) -> &[u8] {
        &self.plain
    }

    /// Number of round outputs recorded so far.
    pub fn recorded_rounds(&self) -> usize {
        self.recorded.len()
    }

    /// Walks the segment through the declared schedule: the plaintext
    /// first, then one entry per scheduled round, in schedule order
    /// regardless of recording order. A round that never reported output
    /// repeats the last recorded value (carry-forward), so the iterator
    /// always yields exactly `1 + rounds` entries.
    pub fn transformations(&self) -> Transformations<'_> {
        Transformations {
            block: self,
            step: 0,
            current: &self.plain,
        }
    }

    /// State of the segment after round step `step`, where step 0 is the
    /// plaintext, applying carry-forward for unrecorded rounds.
    pub(crate) fn snapshot_at(&self, step: usize) -> &[u8] {
        debug_assert!(step <= self.rounds.len(), "round step outside schedule");
        self.rounds[..step]
            .iter()
            .rev()
            .find_map(|id| self.recorded.get(id))
            .map_or(&self.plain[..], Vec::as_slice)
    }

    pub(crate) fn shares_schedule(&self, rounds: &Arc<[RoundId]>) -> bool {
        Arc::ptr_eq(&self.rounds, rounds)
    }
}

/// Lazy, restartable view of a block's snapshots, see
/// [`Block::transformations`].
pub struct Transformations<'a> {
    block: &'a Block,
    step: usize,
    current: &'a [u8],
}

impl<'a> Iterator for Transformations<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.step > self.block.rounds.len() {
            return None;
        }
        if self.step > 0 {
            let round_id = self.block.rounds[self.step - 1];
            if let Some(output) = self.block.recorded.get(&round_id) {
                self.current = output;
            }
        }
        self.step += 1;
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.block.rounds.len() + 1 - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Transformations<'_> {}
