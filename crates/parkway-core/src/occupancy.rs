//! Occupancy grid and first-free slot search

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ParkwayError, Result};
use crate::lot::{LotLayout, GATES};
use crate::vehicle::{VehicleClass, EMPTY_GLYPH};

/// Per-floor slot states, `true` when occupied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    floors: Vec<Vec<bool>>,
}

impl OccupancyGrid {
    /// All slots free
    pub fn empty(layout: &LotLayout) -> Self {
        Self {
            floors: layout.floors().iter().map(|f| vec![false; f.slots]).collect(),
        }
    }

    /// Independent fair coin per slot
    pub fn random<R: Rng>(layout: &LotLayout, rng: &mut R) -> Self {
        Self {
            floors: layout
                .floors()
                .iter()
                .map(|f| (0..f.slots).map(|_| rng.gen_bool(0.5)).collect())
                .collect(),
        }
    }

    pub fn floor(&self, floor: usize) -> Option<&[bool]> {
        self.floors.get(floor).map(Vec::as_slice)
    }

    pub fn is_occupied(&self, floor: usize, slot: usize) -> Result<bool> {
        self.floors
            .get(floor)
            .and_then(|slots| slots.get(slot))
            .copied()
            .ok_or(ParkwayError::SlotOutOfRange { floor, slot })
    }

    pub fn free_count(&self, floor: usize) -> usize {
        self.floors
            .get(floor)
            .map_or(0, |slots| slots.iter().filter(|s| !**s).count())
    }

    pub fn total_free(&self) -> usize {
        (0..self.floors.len()).map(|f| self.free_count(f)).sum()
    }

    /// Mark a slot occupied; idempotent
    pub fn occupy(&mut self, floor: usize, slot: usize) -> Result<()> {
        self.set(floor, slot, true)
    }

    /// Mark a slot free; idempotent
    pub fn release(&mut self, floor: usize, slot: usize) -> Result<()> {
        self.set(floor, slot, false)
    }

    fn set(&mut self, floor: usize, slot: usize, occupied: bool) -> Result<()> {
        let cell = self
            .floors
            .get_mut(floor)
            .and_then(|slots| slots.get_mut(slot))
            .ok_or(ParkwayError::SlotOutOfRange { floor, slot })?;
        *cell = occupied;
        Ok(())
    }

    /// Flatten all floors into one binary vector, ground floor first
    pub fn to_snapshot(&self) -> Vec<u8> {
        self.floors
            .iter()
            .flat_map(|slots| slots.iter().map(|s| u8::from(*s)))
            .collect()
    }

    /// One glyph per slot for a floor of the given class
    pub fn render_floor(&self, floor: usize, class: VehicleClass) -> String {
        self.floors.get(floor).map_or_else(String::new, |slots| {
            slots
                .iter()
                .map(|occupied| if *occupied { class.glyph() } else { EMPTY_GLYPH })
                .collect()
        })
    }
}

/// Result of a successful slot search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub floor_name: String,
    pub floor: usize,
    /// 1-based slot number as shown to drivers
    pub slot: usize,
    pub gate: String,
    /// Free slots on the floor at search time, including the assigned one
    pub available: usize,
}

/// First free slot on the first floor accepting `class`.
///
/// Returns `None` when every accepting floor is full. The grid is not
/// modified; callers mark the slot occupied themselves.
pub fn find_slot<R: Rng>(
    grid: &OccupancyGrid,
    layout: &LotLayout,
    class: VehicleClass,
    rng: &mut R,
) -> Option<SlotAssignment> {
    for floor in layout.floors_for(class) {
        let Some(slots) = grid.floor(floor) else {
            continue;
        };
        if let Some(slot) = slots.iter().position(|occupied| !occupied) {
            let gate = GATES.choose(rng).copied().unwrap_or(GATES[0]);
            let name = layout
                .floor(floor)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            return Some(SlotAssignment {
                floor_name: name,
                floor,
                slot: slot + 1,
                gate: gate.to_string(),
                available: grid.free_count(floor),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lot::Floor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_layout() -> LotLayout {
        LotLayout::new(vec![
            Floor::new("G", VehicleClass::Bike, 3),
            Floor::new("F1", VehicleClass::Car, 2),
            Floor::new("F2", VehicleClass::Car, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_grid() {
        let layout = small_layout();
        let grid = OccupancyGrid::empty(&layout);
        assert_eq!(grid.total_free(), 7);
        assert_eq!(grid.to_snapshot(), vec![0; 7]);
    }

    #[test]
    fn test_random_grid_shape() {
        let layout = LotLayout::default_layout();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = OccupancyGrid::random(&layout, &mut rng);
        for (i, floor) in layout.floors().iter().enumerate() {
            assert_eq!(grid.floor(i).unwrap().len(), floor.slots);
        }
        assert_eq!(grid.to_snapshot().len(), 60);
    }

    #[test]
    fn test_occupy_and_release() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);

        grid.occupy(1, 0).unwrap();
        assert!(grid.is_occupied(1, 0).unwrap());
        assert_eq!(grid.free_count(1), 1);

        grid.occupy(1, 0).unwrap();
        assert_eq!(grid.free_count(1), 1);

        grid.release(1, 0).unwrap();
        assert_eq!(grid.free_count(1), 2);
    }

    #[test]
    fn test_out_of_range() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);
        assert!(matches!(
            grid.occupy(9, 0),
            Err(ParkwayError::SlotOutOfRange { floor: 9, slot: 0 })
        ));
        assert!(grid.is_occupied(0, 3).is_err());
    }

    #[test]
    fn test_find_slot_first_free() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);
        grid.occupy(1, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let found = find_slot(&grid, &layout, VehicleClass::Car, &mut rng).unwrap();

        assert_eq!(found.floor, 1);
        assert_eq!(found.floor_name, "F1");
        assert_eq!(found.slot, 2);
        assert_eq!(found.available, 1);
        assert!(GATES.contains(&found.gate.as_str()));
    }

    #[test]
    fn test_find_slot_falls_through_full_floor() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);
        grid.occupy(1, 0).unwrap();
        grid.occupy(1, 1).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let found = find_slot(&grid, &layout, VehicleClass::Car, &mut rng).unwrap();
        assert_eq!(found.floor, 2);
        assert_eq!(found.slot, 1);
    }

    #[test]
    fn test_find_slot_none_when_full() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);
        for slot in 0..3 {
            grid.occupy(0, slot).unwrap();
        }

        let mut rng = StdRng::seed_from_u64(1);
        assert!(find_slot(&grid, &layout, VehicleClass::Bike, &mut rng).is_none());
        assert!(find_slot(&grid, &layout, VehicleClass::MiniTruck, &mut rng).is_none());
    }

    #[test]
    fn test_render_floor() {
        let layout = small_layout();
        let mut grid = OccupancyGrid::empty(&layout);
        grid.occupy(0, 1).unwrap();
        assert_eq!(grid.render_floor(0, VehicleClass::Bike), ".B.");
        assert_eq!(grid.render_floor(5, VehicleClass::Bike), "");
    }
}
