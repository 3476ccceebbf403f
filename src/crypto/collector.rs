use std::sync::Arc;

use crate::crypto::block::{Block, RoundId};

/// Owns a round schedule and every [`Block`] minted under it, and merges
/// the blocks' transformation histories into full-message snapshots.
///
/// The schedule is fixed at construction and applies to every block the
/// collector creates; block registration order decides the byte order of
/// each merged snapshot.
pub struct Collector {
    rounds: Arc<[RoundId]>,
    blocks: Vec<Block>,
}

impl Collector {
    pub fn new(rounds: impl Into<Vec<RoundId>>) -> Self {
        Collector {
            rounds: rounds.into().into(),
            blocks: Vec::new(),
        }
    }

    /// The declared round schedule, in recording and replay order.
    pub fn rounds(&self) -> &[RoundId] {
        &self.rounds
    }

    /// Registers the next plaintext segment and returns its block.
    ///
    /// The returned handle is the way round outputs get recorded for the
    /// segment; earlier blocks stay reachable through [`blocks`](Self::blocks).
    pub fn new_block(&mut self, plain: &[u8]) -> &mut Block {
        self.blocks
            .push(Block::new(Arc::clone(&self.rounds), plain));
        self.blocks.last_mut().unwrap()
    }

    /// All registered blocks, in registration order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Merged view across all blocks: snapshot `k` is the concatenation,
    /// in registration order, of every block's step-`k` state. Yields
    /// nothing while no block is registered; otherwise exactly
    /// `1 + rounds` snapshots. Snapshot 0 is the concatenated plaintext
    /// and the final snapshot is the complete ciphertext once every
    /// block has recorded its terminal round.
    pub fn transformations(&self) -> MergedTransformations<'_> {
        debug_assert!(
            self.blocks.iter().all(|b| b.shares_schedule(&self.rounds)),
            "block recorded under a foreign round schedule"
        );
        let steps = if self.blocks.is_empty() {
            0
        } else {
            self.rounds.len() + 1
        };
        MergedTransformations {
            collector: self,
            step: 0,
            steps,
        }
    }
}

/// Lazy, restartable sequence of full-message snapshots, see
/// [`Collector::transformations`].
pub struct MergedTransformations<'a> {
    collector: &'a Collector,
    step: usize,
    steps: usize,
}

impl Iterator for MergedTransformations<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.steps {
            return None;
        }
        let step = self.step;
        self.step += 1;

        let mut snapshot = Vec::new();
        for block in &self.collector.blocks {
            snapshot.extend_from_slice(block.snapshot_at(step));
        }
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MergedTransformations<'_> {}
