use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to allocate sample buffers for capacity {capacity}: {source}")]
    Allocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Capacity exceeded: {requested} values requested, capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("Invalid time unit: {0}")]
    InvalidUnit(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
