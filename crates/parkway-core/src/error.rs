//! Error types for Parkway

use thiserror::Error;

/// Main error type for Parkway
#[derive(Error, Debug)]
pub enum ParkwayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Slot out of range: floor {floor}, slot {slot}")]
    SlotOutOfRange { floor: usize, slot: usize },

    #[error("Unknown vehicle class: {0}")]
    UnknownVehicle(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Parkway operations
pub type Result<T> = std::result::Result<T, ParkwayError>;
