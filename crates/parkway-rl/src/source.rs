//! Snapshot sources standing in for occupancy sensors

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::state::Snapshot;

/// Produces a fresh occupancy snapshot on demand
pub trait SnapshotSource {
    fn next_snapshot(&mut self, total_slots: usize) -> Snapshot;
}

/// Independent Bernoulli draw per slot, with no memory between calls
pub struct RandomSnapshotSource<R = StdRng> {
    rng: R,
    occupancy_probability: f64,
}

impl RandomSnapshotSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSnapshotSource<R> {
    /// Fair coin per slot
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            occupancy_probability: 0.5,
        }
    }

    /// Probability is clamped to [0, 1]
    pub fn with_occupancy_probability(mut self, probability: f64) -> Self {
        self.occupancy_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl<R: Rng> SnapshotSource for RandomSnapshotSource<R> {
    fn next_snapshot(&mut self, total_slots: usize) -> Snapshot {
        let p = self.occupancy_probability;
        let values = (0..total_slots)
            .map(|_| u8::from(self.rng.gen_bool(p)))
            .collect();
        Snapshot::new(values)
    }
}

/// Replays a fixed cycle of snapshots
pub struct ScriptedSnapshotSource {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl ScriptedSnapshotSource {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            cursor: 0,
        }
    }

    /// The same snapshot every time
    pub fn repeat(snapshot: Snapshot) -> Self {
        Self::new(vec![snapshot])
    }
}

impl SnapshotSource for ScriptedSnapshotSource {
    /// Snapshots of the wrong length are fitted; an empty script yields a
    /// fully occupied lot.
    fn next_snapshot(&mut self, total_slots: usize) -> Snapshot {
        if self.snapshots.is_empty() {
            return Snapshot::new(vec![1; total_slots]);
        }
        let snapshot = self.snapshots[self.cursor % self.snapshots.len()].clone();
        self.cursor = self.cursor.wrapping_add(1);
        snapshot.fit(total_slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_source_length() {
        let mut source = RandomSnapshotSource::seeded(1);
        assert_eq!(source.next_snapshot(60).len(), 60);
        assert!(source.next_snapshot(0).is_empty());
    }

    #[test]
    fn test_random_source_is_reproducible() {
        let mut a = RandomSnapshotSource::seeded(42);
        let mut b = RandomSnapshotSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_snapshot(8), b.next_snapshot(8));
        }
    }

    #[test]
    fn test_random_source_extremes() {
        let mut full = RandomSnapshotSource::seeded(3).with_occupancy_probability(1.0);
        assert_eq!(full.next_snapshot(5).free_count(), 0);

        let mut empty = RandomSnapshotSource::seeded(3).with_occupancy_probability(-2.0);
        assert_eq!(empty.next_snapshot(5).free_count(), 5);
    }

    #[test]
    fn test_random_source_roughly_fair() {
        let mut source = RandomSnapshotSource::seeded(11);
        let free: usize = (0..200).map(|_| source.next_snapshot(10).free_count()).sum();
        assert!(free > 800 && free < 1200, "free = {free}");
    }

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSnapshotSource::new(vec![
            Snapshot::new(vec![0, 1]),
            Snapshot::new(vec![1, 0]),
        ]);
        assert_eq!(source.next_snapshot(2).values(), &[0, 1]);
        assert_eq!(source.next_snapshot(2).values(), &[1, 0]);
        assert_eq!(source.next_snapshot(2).values(), &[0, 1]);
    }

    #[test]
    fn test_scripted_source_fits_length() {
        let mut source = ScriptedSnapshotSource::repeat(Snapshot::new(vec![0]));
        assert_eq!(source.next_snapshot(3).values(), &[0, 1, 1]);
    }

    #[test]
    fn test_empty_script_is_full_lot() {
        let mut source = ScriptedSnapshotSource::new(vec![]);
        assert_eq!(source.next_snapshot(4).free_count(), 0);
    }
}
