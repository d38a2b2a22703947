//! Lot layout: floors, the vehicle class each accepts, and entry gates

use serde::{Deserialize, Serialize};

use crate::error::{ParkwayError, Result};
use crate::vehicle::VehicleClass;

/// Entry gates a driver can be directed to
pub const GATES: [&str; 4] = ["Gate 1", "Gate 2", "Gate 3", "Gate 4"];

/// A single floor of the lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    pub class: VehicleClass,
    pub slots: usize,
}

impl Floor {
    pub fn new(name: impl Into<String>, class: VehicleClass, slots: usize) -> Self {
        Self {
            name: name.into(),
            class,
            slots,
        }
    }
}

/// Ordered floors of the lot, ground floor first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotLayout {
    floors: Vec<Floor>,
}

impl LotLayout {
    /// Build a layout, rejecting empty lots and floors without slots
    pub fn new(floors: Vec<Floor>) -> Result<Self> {
        if floors.is_empty() {
            return Err(ParkwayError::InvalidLayout("lot has no floors".to_string()));
        }
        if let Some(floor) = floors.iter().find(|f| f.slots == 0) {
            return Err(ParkwayError::InvalidLayout(format!(
                "floor '{}' has no slots",
                floor.name
            )));
        }
        Ok(Self { floors })
    }

    /// Bike ground floor, three car floors and a mini-truck top floor
    pub fn default_layout() -> Self {
        Self {
            floors: vec![
                Floor::new("Ground Floor (Bike)", VehicleClass::Bike, 20),
                Floor::new("Floor 1 (Car)", VehicleClass::Car, 10),
                Floor::new("Floor 2 (Car)", VehicleClass::Car, 10),
                Floor::new("Floor 3 (Car)", VehicleClass::Car, 10),
                Floor::new("Floor 4 (Mini Truck)", VehicleClass::MiniTruck, 10),
            ],
        }
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, index: usize) -> Option<&Floor> {
        self.floors.get(index)
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Indices of floors accepting `class`, in layout order
    pub fn floors_for(&self, class: VehicleClass) -> Vec<usize> {
        self.floors
            .iter()
            .enumerate()
            .filter(|(_, f)| f.class == class)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn total_slots(&self) -> usize {
        self.floors.iter().map(|f| f.slots).sum()
    }
}

impl Default for LotLayout {
    fn default() -> Self {
        Self::default_layout()
    }
}
