use std::io;
use thiserror::Error;

/// Reasons a cache configuration can be rejected before a run starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo { field: &'static str, value: u64 },

    #[error("memory size {memory_size} is too small for {associativity} ways of {block_size} byte blocks")]
    TooSmall {
        memory_size: u64,
        block_size: u64,
        associativity: u64,
    },

    #[error("block size {block_size} times associativity {associativity} overflows a 64-bit address space")]
    Overflow { block_size: u64, associativity: u64 },

    #[error("{lines} cache lines of {block_size} byte blocks can't be allocated")]
    TooLarge { lines: u64, block_size: u64 },

    #[error("couldn't read the config file: {0}")]
    Io(#[from] io::Error),

    #[error("couldn't parse the config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures at the trace file boundary. The cache engine itself never fails
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read the trace: {0}")]
    Io(#[from] io::Error),

    #[error("malformed trace entry on line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}
