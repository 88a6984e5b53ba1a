//! Core data types for the trade alert bot.

pub mod address;
pub mod snapshot;
pub mod trade;
pub mod units;

pub use address::*;
pub use snapshot::*;
pub use trade::*;
pub use units::*;

pub use alloy_primitives::{Address, B256, U256};
