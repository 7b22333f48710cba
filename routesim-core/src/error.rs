use thiserror::Error;

use crate::LineId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route needs at least two stops, got {0}")]
    InvalidRoute(usize),
    #[error("Unknown stop: {0}")]
    UnknownStop(String),
    #[error("Unknown line: {0}")]
    UnknownLine(LineId),
    #[error("Unknown street: {0}")]
    UnknownStreet(String),
    #[error("No route edit in progress")]
    NotEditing,
    #[error("Traffic level must be at least 1, got {0}")]
    InvalidTraffic(u32),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
