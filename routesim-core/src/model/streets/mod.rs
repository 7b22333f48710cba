//! Street geometry model

pub mod components;

pub use components::Street;
