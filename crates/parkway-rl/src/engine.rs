//! Allocator engine - owns the value table and traces, runs training and
//! answers recommendation queries

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use parkway_core::{ParkwayError, Result};

use crate::algorithm::{Allocator, TabularQAllocator, EXPLORATION_RATE};
use crate::experience::{Experience, RewardTrace};
use crate::source::SnapshotSource;
use crate::state::{reward, Action, Reward, Snapshot};

/// Efficiency below this is high congestion
pub const HIGH_CONGESTION_BELOW: f64 = 25.0;

/// Efficiency below this (and at least `HIGH_CONGESTION_BELOW`) is medium
pub const SMOOTH_FROM: f64 = 50.0;

/// Largest lot the allocator accepts. The value table holds
/// `2^min(slots, 12) x slots` cells, so this caps it at 32 MiB.
pub const MAX_TOTAL_SLOTS: usize = 1024;

/// Uniform lot shape used by the allocator.
///
/// Only constructible through [`LotGeometry::new`], so every value has at
/// least one slot and no more than [`MAX_TOTAL_SLOTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LotGeometry {
    floors: usize,
    slots_per_floor: usize,
}

impl LotGeometry {
    pub fn new(floors: usize, slots_per_floor: usize) -> Result<Self> {
        if floors == 0 || slots_per_floor == 0 {
            return Err(ParkwayError::InvalidLayout(format!(
                "need at least one floor and one slot per floor, got {floors}x{slots_per_floor}"
            )));
        }
        match floors.checked_mul(slots_per_floor) {
            Some(total) if total <= MAX_TOTAL_SLOTS => Ok(Self {
                floors,
                slots_per_floor,
            }),
            _ => Err(ParkwayError::InvalidLayout(format!(
                "{floors}x{slots_per_floor} exceeds the {MAX_TOTAL_SLOTS} slot limit"
            ))),
        }
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn slots_per_floor(&self) -> usize {
        self.slots_per_floor
    }

    pub fn total_slots(&self) -> usize {
        self.floors * self.slots_per_floor
    }

    /// (floor, slot) of a flat action index, both 0-based
    pub fn locate(&self, action: Action) -> (usize, usize) {
        (action / self.slots_per_floor, action % self.slots_per_floor)
    }
}

/// Traffic level derived from the share of free slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionBand {
    High,
    Medium,
    Smooth,
}

impl CongestionBand {
    /// Lower bounds are inclusive: 25.0 is medium, 50.0 is smooth
    pub fn from_efficiency(efficiency: f64) -> Self {
        if efficiency < HIGH_CONGESTION_BELOW {
            CongestionBand::High
        } else if efficiency < SMOOTH_FROM {
            CongestionBand::Medium
        } else {
            CongestionBand::Smooth
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CongestionBand::High => "High congestion",
            CongestionBand::Medium => "Medium traffic",
            CongestionBand::Smooth => "Smooth flow",
        }
    }
}

impl std::fmt::Display for CongestionBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything one training episode produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeOutcome {
    pub snapshot: Snapshot,
    pub experience: Experience,
    /// Value of the updated cell after the update
    pub updated_value: f64,
    pub baseline_action: Action,
    pub baseline_reward: Reward,
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub episodes: usize,
    pub average_allocator_reward: Reward,
    pub average_random_reward: Reward,
    pub improvement: Reward,
}

impl TrainingReport {
    fn from_trace(trace: &RewardTrace) -> Self {
        let allocator = trace.average_allocator();
        let random = trace.average_random();
        Self {
            episodes: trace.len(),
            average_allocator_reward: allocator,
            average_random_reward: random,
            improvement: allocator - random,
        }
    }
}

/// Suggested slot for one live snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub snapshot: Snapshot,
    pub state_index: usize,
    pub action: Action,
    /// 0-based floor of `action`
    pub floor: usize,
    /// 0-based slot within `floor`
    pub slot: usize,
    pub free_slots: usize,
    pub total_slots: usize,
    pub efficiency: f64,
    pub congestion: CongestionBand,
}

/// Engine statistics across runs
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub runs: u64,
    pub total_episodes: u64,
    pub total_rewards: f64,
    pub average_reward: f64,
    pub trace_len: usize,
    pub algorithm: String,
}

/// Session-owned allocator state.
///
/// Holds the value table (inside the allocator), the reward trace of the
/// current run and the RNG used for exploration and the random baseline.
pub struct AllocatorEngine {
    geometry: LotGeometry,
    allocator: Box<dyn Allocator>,
    trace: RewardTrace,
    rng: StdRng,
    exploration_rate: f64,
    runs: u64,
    total_episodes: u64,
    total_rewards: f64,
}

impl AllocatorEngine {
    /// Fresh engine with a zeroed tabular allocator
    pub fn new(geometry: LotGeometry, seed: Option<u64>) -> Self {
        let allocator = TabularQAllocator::new(geometry.total_slots());
        Self::build(geometry, Box::new(allocator), seed)
    }

    /// Engine around a caller-supplied allocator, which must have one action
    /// per slot of `geometry`
    pub fn with_allocator(
        geometry: LotGeometry,
        allocator: Box<dyn Allocator>,
        seed: Option<u64>,
    ) -> Result<Self> {
        if allocator.action_space_size() != geometry.total_slots() {
            return Err(ParkwayError::InvalidLayout(format!(
                "allocator {} has {} actions, lot has {} slots",
                allocator.name(),
                allocator.action_space_size(),
                geometry.total_slots()
            )));
        }
        Ok(Self::build(geometry, allocator, seed))
    }

    fn build(geometry: LotGeometry, allocator: Box<dyn Allocator>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            "Allocator engine created: {} floors x {} slots, algorithm {}",
            geometry.floors,
            geometry.slots_per_floor,
            allocator.name()
        );
        Self {
            geometry,
            allocator,
            trace: RewardTrace::new(),
            rng,
            exploration_rate: EXPLORATION_RATE,
            runs: 0,
            total_episodes: 0,
            total_rewards: 0.0,
        }
    }

    /// Override the exploration rate used during training, clamped to [0, 1]
    pub fn with_exploration_rate(mut self, rate: f64) -> Self {
        self.set_exploration_rate(rate);
        self
    }

    pub fn set_exploration_rate(&mut self, rate: f64) {
        self.exploration_rate = rate.clamp(0.0, 1.0);
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Zero the table, clear the trace and statistics
    pub fn reset(&mut self) {
        self.allocator.reset();
        self.trace.clear();
        self.runs = 0;
        self.total_episodes = 0;
        self.total_rewards = 0.0;
        info!("Allocator engine reset");
    }

    pub fn geometry(&self) -> LotGeometry {
        self.geometry
    }

    pub fn allocator(&self) -> &dyn Allocator {
        self.allocator.as_ref()
    }

    pub fn trace(&self) -> &RewardTrace {
        &self.trace
    }

    /// Clear the trace ahead of a new training run
    pub fn begin_run(&mut self) {
        self.trace.clear();
        self.runs += 1;
        debug!("Training run {} started", self.runs);
    }

    /// One episode: draw, act, update one cell, record both rewards
    pub fn train_step(&mut self, source: &mut dyn SnapshotSource) -> EpisodeOutcome {
        let total = self.geometry.total_slots();
        let snapshot = source.next_snapshot(total).fit(total);

        let state = snapshot.state_index();
        let action = self
            .allocator
            .choose_action(state, self.exploration_rate, &mut self.rng);
        let r = reward(&snapshot, action);

        let next_state = snapshot.successor(action).state_index();
        let experience = Experience::new(state, action, r, next_state);
        let updated_value = self.allocator.update(&experience);

        let baseline_action = self.rng.gen_range(0..total);
        let baseline_reward = reward(&snapshot, baseline_action);

        self.trace.push(r, baseline_reward);
        self.total_episodes += 1;
        self.total_rewards += r;

        debug!(
            "Episode {}: state {} action {} reward {} value {:.3}",
            self.trace.len(),
            state,
            action,
            r,
            updated_value
        );

        EpisodeOutcome {
            snapshot,
            experience,
            updated_value,
            baseline_action,
            baseline_reward,
        }
    }

    /// Summary of the current run so far
    pub fn report(&self) -> TrainingReport {
        TrainingReport::from_trace(&self.trace)
    }

    /// Close the current run: log and return its summary
    pub fn finish_run(&self) -> TrainingReport {
        let report = self.report();
        info!(
            "Training complete: {} episodes, allocator avg {:.2}, random avg {:.2}",
            report.episodes, report.average_allocator_reward, report.average_random_reward
        );
        report
    }

    /// Run `episodes` episodes, calling `on_progress(done, episodes)` after each
    pub fn train_with_progress<F>(
        &mut self,
        episodes: usize,
        source: &mut dyn SnapshotSource,
        mut on_progress: F,
    ) -> TrainingReport
    where
        F: FnMut(usize, usize),
    {
        self.begin_run();
        for done in 1..=episodes {
            self.train_step(source);
            on_progress(done, episodes);
        }
        self.finish_run()
    }

    pub fn train(&mut self, episodes: usize, source: &mut dyn SnapshotSource) -> TrainingReport {
        self.train_with_progress(episodes, source, |_, _| {})
    }

    /// Greedy suggestion for a fresh snapshot; does not touch the table
    pub fn recommend(&self, source: &mut dyn SnapshotSource) -> Recommendation {
        let total = self.geometry.total_slots();
        let snapshot = source.next_snapshot(total).fit(total);
        self.recommend_for(snapshot)
    }

    /// Greedy suggestion for a given snapshot
    pub fn recommend_for(&self, snapshot: Snapshot) -> Recommendation {
        let total = self.geometry.total_slots();
        let snapshot = snapshot.fit(total);
        let state_index = snapshot.state_index();
        let action = self.allocator.best_action(state_index);
        let (floor, slot) = self.geometry.locate(action);
        let efficiency = snapshot.efficiency();
        let congestion = CongestionBand::from_efficiency(efficiency);

        debug!(
            "Recommendation: state {} -> floor {} slot {} ({:.1}% free, {})",
            state_index, floor, slot, efficiency, congestion
        );

        Recommendation {
            free_slots: snapshot.free_count(),
            snapshot,
            state_index,
            action,
            floor,
            slot,
            total_slots: total,
            efficiency,
            congestion,
        }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            runs: self.runs,
            total_episodes: self.total_episodes,
            total_rewards: self.total_rewards,
            average_reward: if self.total_episodes > 0 {
                self.total_rewards / self.total_episodes as f64
            } else {
                0.0
            },
            trace_len: self.trace.len(),
            algorithm: self.allocator.name().to_string(),
        }
    }

    pub fn params(&self) -> serde_json::Value {
        self.allocator.params()
    }
}
