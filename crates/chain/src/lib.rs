//! Read-only access to the market contract.
//!
//! This crate provides:
//! - Contract ABI bindings for the `Bought`/`Sold` events and view calls
//! - A chain reader for block height and decoded trade events
//! - A token data source that merges the two view calls into a snapshot
//! - An in-memory mock for tests

pub mod abi;
pub mod contract;
pub mod error;
pub mod mock;
pub mod reader;

pub use contract::{MarketClient, TokenDataSource};
pub use error::{ChainError, ChainResult};
pub use mock::MockChain;
pub use reader::ChainReader;
