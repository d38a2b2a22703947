//! Parkway RL - tabular Q-learning slot allocator
//!
//! Learns which slot to recommend for an occupancy snapshot and compares the
//! learned policy against a uniformly random baseline.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod algorithm;
pub mod engine;
pub mod experience;
pub mod source;
pub mod state;

pub use algorithm::{Allocator, TabularQAllocator};
pub use engine::{
    AllocatorEngine, CongestionBand, EngineStats, EpisodeOutcome, LotGeometry, Recommendation,
    TrainingReport, MAX_TOTAL_SLOTS,
};
pub use experience::{Experience, RewardTrace};
pub use source::{RandomSnapshotSource, ScriptedSnapshotSource, SnapshotSource};
pub use state::{reward, Action, Reward, Snapshot, MAX_STATE_BITS};
