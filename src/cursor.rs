//! Cursor over a (possibly shuffled) manifest ordering.
//!
//! The cursor owns the manifest outright: it is moved onto the producer
//! thread and never shared, so no locking is needed. Iteration is infinite;
//! reaching the end of the manifest wraps to the start and, when shuffling
//! is enabled, draws a fresh permutation. That wrap point is the only place
//! the iteration order ever changes.

use crate::manifest::{Manifest, ManifestEntry};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Infinite iteration over manifest entries in file or shuffled order.
///
/// # Seed handling
/// A fixed seed reproduces the exact sample order across runs. The single
/// `StdRng` is reused across epochs, so each wrap draws a different
/// permutation while the whole sequence stays a pure function of the seed.
pub struct ManifestCursor {
    manifest: Manifest,
    order: Vec<usize>,
    pos: usize,
    rng: Option<StdRng>,
    epoch: usize,
}

impl ManifestCursor {
    /// Creates a cursor positioned at the first entry. When `shuffle` is
    /// set, the initial permutation is drawn immediately.
    ///
    /// The manifest loader guarantees non-emptiness, so `next` never fails.
    pub fn new(manifest: Manifest, shuffle: bool, seed: u64) -> Self {
        let order: Vec<usize> = (0..manifest.len()).collect();
        let mut cursor = Self {
            manifest,
            order,
            pos: 0,
            rng: shuffle.then(|| StdRng::seed_from_u64(seed)),
            epoch: 0,
        };
        if let Some(rng) = cursor.rng.as_mut() {
            cursor.order.shuffle(rng);
        }
        cursor
    }

    /// Returns the next entry and advances. Wraps past the last index back
    /// to 0, reshuffling if enabled.
    pub fn next(&mut self) -> ManifestEntry {
        if self.pos == self.order.len() {
            self.pos = 0;
            self.epoch += 1;
            if let Some(rng) = self.rng.as_mut() {
                self.order.shuffle(rng);
            }
            debug!(epoch = self.epoch, "manifest exhausted, restarting");
        }
        let entry = self.manifest.entries()[self.order[self.pos]].clone();
        self.pos += 1;
        entry
    }

    /// Number of completed passes over the manifest.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn label_width(&self) -> usize {
        self.manifest.label_width()
    }

    pub fn manifest_len(&self) -> usize {
        self.manifest.len()
    }
}
