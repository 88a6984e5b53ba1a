//! Error types for chain access.

use thiserror::Error;

/// Errors that can occur while reading from the node or the contract.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("ABI decode error: {0}")]
    Decode(#[from] alloy::sol_types::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid block range: {from}..={to}")]
    InvalidRange { from: u64, to: u64 },

    #[error("Node unavailable: {0}")]
    Unavailable(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
