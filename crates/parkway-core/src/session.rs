//! Session store: the occupancy grid one user works against

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ParkwayError, Result};
use crate::lot::LotLayout;
use crate::occupancy::{find_slot, OccupancyGrid, SlotAssignment};
use crate::vehicle::VehicleClass;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's view of the lot.
///
/// The grid starts randomly occupied and lives until the session is dropped
/// or reset. Nothing is persisted.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    layout: LotLayout,
    grid: OccupancyGrid,
    rng: StdRng,
}

impl Session {
    /// Create a session with a randomly occupied grid.
    /// A seed makes both the grid and gate choices reproducible.
    pub fn new(layout: LotLayout, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = OccupancyGrid::random(&layout, &mut rng);
        let session = Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            layout,
            grid,
            rng,
        };
        info!(
            "Session {} started with {} free of {} slots",
            session.id,
            session.grid.total_free(),
            session.layout.total_slots()
        );
        session
    }

    /// Session with every slot free
    pub fn with_empty_grid(layout: LotLayout, seed: u64) -> Self {
        let grid = OccupancyGrid::empty(&layout);
        Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            layout,
            grid,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Redraw the grid and start a new session identity
    pub fn reset(&mut self) {
        self.grid = OccupancyGrid::random(&self.layout, &mut self.rng);
        self.id = SessionId::new();
        self.created_at = Utc::now();
        info!("Session reset, new id {}", self.id);
    }

    pub fn layout(&self) -> &LotLayout {
        &self.layout
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Find a slot for `class` and mark it occupied
    pub fn park(&mut self, class: VehicleClass) -> Option<SlotAssignment> {
        let assignment = find_slot(&self.grid, &self.layout, class, &mut self.rng)?;
        // floor/slot come from the grid itself so they are always in range
        if let Err(e) = self.grid.occupy(assignment.floor, assignment.slot - 1) {
            debug!("Failed to mark slot occupied: {}", e);
            return None;
        }
        debug!(
            "Parked {} on {} slot {} via {}",
            class, assignment.floor_name, assignment.slot, assignment.gate
        );
        Some(assignment)
    }

    /// Free a slot; `slot` is 1-based as printed to drivers
    pub fn leave(&mut self, floor: usize, slot: usize) -> Result<()> {
        let index = slot
            .checked_sub(1)
            .ok_or(ParkwayError::SlotOutOfRange { floor, slot })?;
        self.grid.release(floor, index)
    }
}
