//! # CacheLib
//!
//! Cachelib simulates a single set-associative cache against a trace of memory accesses and counts
//! hits and misses
//!
//! It provides a generic cache implementation which can be parameterised by a replacement policy,
//! an optional next-block prefetcher, and a simulator which drives them over a parsed trace.
//!
//! Only the presence of blocks is modelled, no data is stored and there is no notion of timing

/// Contains the cache geometry and the address decoder
pub mod address;

/// Contains the implementation of the cache, and a utility enum for the existing cache types
pub mod cache;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Contains the error types for configuration and trace ingestion
pub mod error;

/// Contains trace file loading
pub mod io;

/// Contains the next-block prefetcher
pub mod prefetch;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Contains the simulator used to run a trace through a cache configuration
pub mod simulator;

/// Contains the trace format and its parser
pub mod trace;

#[cfg(test)]
mod test;
