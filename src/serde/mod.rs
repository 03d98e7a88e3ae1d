//! Serde helpers.

pub mod address;
pub mod allowance;
pub mod duration;
