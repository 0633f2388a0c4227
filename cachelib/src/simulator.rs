use std::fmt;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::cache::{Cache, CacheTrait, GenericCache};
use crate::config::{CacheConfig, ReplacementPolicyConfig};
use crate::error::ConfigError;
use crate::prefetch::NextBlockPrefetcher;
use crate::replacement_policies::{FirstInFirstOut, LeastRecentlyUsed};
use crate::trace::Access;

/// The simulator decodes each access, drives the cache and prefetcher, and collects results.
///
/// It supports calling simulate multiple times, the cache stays warm between calls and the time
/// taken and the results accumulate accordingly
#[derive(Debug)]
pub struct Simulator {
    cache: GenericCache,
    prefetcher: Option<NextBlockPrefetcher>,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a cache simulation. Can be serialised to JSON, [`fmt::Display`] gives the
/// `Hits: <n>, Misses: <m>` summary
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub hits: u64,
    /// Primary misses plus every prefetch which had to fill a block
    pub misses: u64,
    pub accesses: u64,
    pub prefetch_fills: u64,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hits: {}, Misses: {}", self.hits, self.misses)
    }
}

/// What a single access did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    /// `prefetched` is set when the following block was also brought in, costing a second miss
    Miss { prefetched: bool },
}

impl AccessOutcome {
    /// How many misses this access adds to the total
    pub fn misses(&self) -> u64 {
        match self {
            AccessOutcome::Hit => 0,
            AccessOutcome::Miss { prefetched: false } => 1,
            AccessOutcome::Miss { prefetched: true } => 2,
        }
    }
}

impl Simulator {
    /// Creates a new simulator with an empty cache for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON or the command line
    ///
    /// returns: Result<Simulator, ConfigError>, the error if the configuration describes an
    /// impossible geometry
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let cache = match config.replacement_policy {
            ReplacementPolicyConfig::Fifo => GenericCache::from(Cache::new(geometry, FirstInFirstOut)),
            ReplacementPolicyConfig::Lru => GenericCache::from(Cache::new(geometry, LeastRecentlyUsed)),
        };
        tracing::debug!(
            num_sets = geometry.num_sets(),
            associativity = geometry.associativity(),
            offset_bits = geometry.offset_bits(),
            index_bits = geometry.index_bits(),
            tag_bits = geometry.tag_bits(),
            policy = ?config.replacement_policy,
            prefetch = config.prefetch,
            "built cache"
        );
        Ok(Self {
            cache,
            prefetcher: config.prefetch.then_some(NextBlockPrefetcher),
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Runs one access through the cache
    ///
    /// A hit only informs the replacement policy. A miss inserts the block, then, if prefetching
    /// is enabled, tries the block after it
    pub fn access(&mut self, access: Access) -> AccessOutcome {
        let line = self.cache.geometry().decode(access.address);
        let outcome = match self.cache.lookup(&line) {
            Some(way) => {
                self.cache.record_hit(&line, way);
                AccessOutcome::Hit
            }
            None => {
                self.cache.insert(&line);
                let prefetched = match self.prefetcher {
                    Some(prefetcher) => prefetcher.on_miss(&mut self.cache, access.address),
                    None => false,
                };
                AccessOutcome::Miss { prefetched }
            }
        };
        self.result.accesses += 1;
        match outcome {
            AccessOutcome::Hit => self.result.hits += 1,
            AccessOutcome::Miss { prefetched } => {
                self.result.misses += outcome.misses();
                if prefetched {
                    self.result.prefetch_fills += 1;
                }
            }
        }
        outcome
    }

    /// Simulates the cache over a sequence of accesses, strictly in order
    ///
    /// # Arguments
    ///
    /// * `accesses`: The accesses, usually from [`crate::trace::read_trace`]
    ///
    /// returns: the results accumulated so far
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::config::CacheConfig;
    /// use cachelib::simulator::Simulator;
    /// use cachelib::trace::Access;
    /// let mut simulator = Simulator::new(&CacheConfig::default()).unwrap();
    /// let result = simulator.simulate([Access::read(0x0), Access::read(0x0), Access::read(0x100)]);
    /// assert_eq!(result.to_string(), "Hits: 1, Misses: 2");
    /// ```
    pub fn simulate<I: IntoIterator<Item = Access>>(&mut self, accesses: I) -> &SimulationResult {
        let start = Instant::now();
        for access in accesses {
            self.access(access);
        }
        let end = Instant::now();
        self.simulation_time += end - start;
        tracing::info!(
            hits = self.result.hits,
            misses = self.result.misses,
            accesses = self.result.accesses,
            prefetch_fills = self.result.prefetch_fills,
            "simulation finished"
        );
        &self.result
    }

    pub fn get_result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn get_cache(&self) -> &GenericCache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines holding a block
    pub fn get_valid_line_count(&self) -> usize {
        self.cache.get_valid_line_count()
    }

    /// Gets the number of lines never filled
    pub fn get_uninitialised_line_count(&self) -> usize {
        self.cache.get_uninitialised_line_count()
    }
}
