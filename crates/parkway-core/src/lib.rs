//! Parkway Core - vehicles, lot layout, occupancy and sessions
//!
//! This crate provides the domain types shared by the allocator and the CLI.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod lot;
pub mod occupancy;
pub mod session;
pub mod util;
pub mod vehicle;

pub use error::{ParkwayError, Result};
pub use lot::{Floor, LotLayout, GATES};
pub use occupancy::{find_slot, OccupancyGrid, SlotAssignment};
pub use session::{Session, SessionId};
pub use vehicle::VehicleClass;
