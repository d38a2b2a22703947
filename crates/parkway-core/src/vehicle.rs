//! Vehicle classes and their display assets

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkwayError;

/// Asset shown for a free slot
pub const EMPTY_ASSET: &str = "empty.png";

/// Glyph shown for a free slot in the terminal view
pub const EMPTY_GLYPH: char = '.';

/// Vehicle classes the lot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Bike,
    Car,
    MiniTruck,
}

/// Per-class display table: (class, asset identifier, terminal glyph, label)
const ASSETS: [(VehicleClass, &str, char, &str); 3] = [
    (VehicleClass::Bike, "bike.png", 'B', "Bike"),
    (VehicleClass::Car, "car.png", 'C', "Car"),
    (VehicleClass::MiniTruck, "truck.png", 'T', "Mini Truck"),
];

impl VehicleClass {
    /// All classes in lot order (ground floor first)
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Bike,
        VehicleClass::Car,
        VehicleClass::MiniTruck,
    ];

    fn entry(self) -> (VehicleClass, &'static str, char, &'static str) {
        // ASSETS covers every variant, indexed by discriminant
        ASSETS[self as usize]
    }

    /// Image asset identifier for an occupied slot of this class
    pub fn asset(self) -> &'static str {
        self.entry().1
    }

    /// Single-character glyph for the terminal grid
    pub fn glyph(self) -> char {
        self.entry().2
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        self.entry().3
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for VehicleClass {
    type Err = ParkwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bike" => Ok(VehicleClass::Bike),
            "car" => Ok(VehicleClass::Car),
            "mini truck" | "mini-truck" | "mini_truck" | "minitruck" | "truck" => {
                Ok(VehicleClass::MiniTruck)
            }
            other => Err(ParkwayError::UnknownVehicle(other.to_string())),
        }
    }
}
