use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::address::Geometry;
use crate::error::ConfigError;

/// A configuration for a single simulated cache
///
/// Every field is optional in the JSON input, missing fields take the values of
/// [`CacheConfig::default`]: 1024 bytes of memory, 128 byte blocks, 4 ways, FIFO replacement, no
/// prefetching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub memory_size: u64,
    pub block_size: u64,
    pub associativity: u64,
    pub prefetch: bool,
    pub replacement_policy: ReplacementPolicyConfig,
    pub on_malformed: MalformedLinePolicy,
}

/// The replacement policy used when a set is full - fifo or lru. Defaults to fifo.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[serde(alias = "fifo", alias = "FIFO")]
    Fifo,
    #[serde(alias = "lru", alias = "LRU")]
    Lru,
}

/// What trace ingestion does when it meets a line it can't parse - truncate, skip, or error.
/// Defaults to truncate, which stops reading and simulates everything parsed so far.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MalformedLinePolicy {
    #[serde(alias = "truncate")]
    Truncate,
    #[serde(alias = "skip")]
    Skip,
    #[serde(alias = "error")]
    Error,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_size: 1024,
            block_size: 128,
            associativity: 4,
            prefetch: false,
            replacement_policy: ReplacementPolicyConfig::default(),
            on_malformed: MalformedLinePolicy::default(),
        }
    }
}

impl Default for ReplacementPolicyConfig {
    fn default() -> Self {
        ReplacementPolicyConfig::Fifo
    }
}

impl Default for MalformedLinePolicy {
    fn default() -> Self {
        MalformedLinePolicy::Truncate
    }
}

impl CacheConfig {
    /// Parses a JSON configuration
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Opens and parses a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Validates the configuration and derives the cache geometry from it
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::config::CacheConfig;
    /// let geometry = CacheConfig::default().geometry().unwrap();
    /// assert_eq!(geometry.num_sets(), 2);
    /// assert_eq!(geometry.offset_bits(), 7);
    /// assert_eq!(geometry.index_bits(), 1);
    /// ```
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.memory_size, self.block_size, self.associativity)
    }
}
