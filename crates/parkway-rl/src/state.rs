//! Occupancy snapshots, state indexing and the reward function

use serde::{Deserialize, Serialize};

/// Reward value from the environment
pub type Reward = f64;

/// Slot index across all floors, ground floor first
pub type Action = usize;

/// Snapshot prefix length used for state indexing.
///
/// Slots past this position do not contribute to the state index, so lots
/// with more than 12 slots alias distinct occupancies onto the same row.
pub const MAX_STATE_BITS: usize = 12;

/// Reward for choosing a free slot
pub const FREE_SLOT_REWARD: Reward = 10.0;

/// Reward for choosing an occupied slot
pub const OCCUPIED_SLOT_REWARD: Reward = -10.0;

/// Binary occupancy across every slot, 1 = occupied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    /// Any nonzero entry counts as occupied
    pub fn new(values: Vec<u8>) -> Self {
        Self(values.into_iter().map(|v| u8::from(v != 0)).collect())
    }

    pub fn from_bools(occupied: &[bool]) -> Self {
        Self(occupied.iter().map(|o| u8::from(*o)).collect())
    }

    pub fn values(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Out-of-range slots are reported as not free
    pub fn is_free(&self, slot: usize) -> bool {
        self.0.get(slot) == Some(&0)
    }

    pub fn free_count(&self) -> usize {
        self.0.iter().filter(|v| **v == 0).count()
    }

    /// Share of free slots in percent; 0 for an empty snapshot
    pub fn efficiency(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.free_count() as f64 / self.0.len() as f64 * 100.0
    }

    /// Number of leading entries that make up the state index
    pub fn state_bits(&self) -> usize {
        state_bits(self.0.len())
    }

    /// First `min(len, 12)` entries read as a base-2 number, first entry
    /// most significant.
    pub fn state_index(&self) -> usize {
        self.0[..self.state_bits()]
            .iter()
            .fold(0, |acc, bit| (acc << 1) | usize::from(*bit))
    }

    /// The snapshot after parking in `slot`; unchanged if already occupied
    pub fn successor(&self, slot: Action) -> Self {
        let mut next = self.clone();
        if let Some(value) = next.0.get_mut(slot) {
            *value = 1;
        }
        next
    }

    /// Truncate, or pad with occupied slots, to exactly `total_slots`
    pub fn fit(mut self, total_slots: usize) -> Self {
        self.0.resize(total_slots, 1);
        self
    }
}

impl From<Vec<u8>> for Snapshot {
    fn from(values: Vec<u8>) -> Self {
        Self::new(values)
    }
}

/// Prefix length used for indexing a lot of `total_slots`
pub fn state_bits(total_slots: usize) -> usize {
    total_slots.min(MAX_STATE_BITS)
}

/// Number of value-table rows for a lot of `total_slots`
pub fn state_space_size(total_slots: usize) -> usize {
    1 << state_bits(total_slots)
}

/// +10 for a free slot, -10 otherwise
pub fn reward(snapshot: &Snapshot, action: Action) -> Reward {
    if snapshot.is_free(action) {
        FREE_SLOT_REWARD
    } else {
        OCCUPIED_SLOT_REWARD
    }
}
