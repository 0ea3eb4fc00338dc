use std::time::{Duration, Instant};
use serde::Serialize;
use tracing::info;
use crate::cache::{Cache, CacheTrait, GenericCache, Outcome};
use crate::config::{CacheConfig, ReplacementPolicyConfig};
use crate::error::ConfigError;
use crate::hawkeye::{Hawkeye, HawkeyeStats};
use crate::replacement_policies::{Access, LeastRecentlyUsed};
use crate::trace::{TraceRecord, RECORD_SIZE};

/// The simulator handles line alignment when using the cache, and collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
pub struct Simulator {
    cache: GenericCache,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a simulation. Can be serialised to the output format
#[derive(Debug, Serialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub name: String,
    pub policy: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_stats: Option<HawkeyeStats>,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, ConfigError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = Self::config_to_cache(config);
        let policy = match config.replacement_policy {
            ReplacementPolicyConfig::Hawkeye => "hawkeye",
            ReplacementPolicyConfig::LeastRecentlyUsed => "lru",
        };
        Ok(Self {
            cache,
            result: SimulationResult {
                name: config.name.clone(),
                policy: policy.to_string(),
                hits: 0,
                misses: 0,
                evictions: 0,
                policy_stats: None,
            },
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Reads a value from memory, at a given address with a given size
    ///
    /// The read is split so the cache is checked for each line it touches. A zero sized read still
    /// touches the line holding its address
    ///
    /// # Arguments
    ///
    /// * `pc`: The instruction issuing the read, if known
    /// * `address`: The address of the read
    /// * `size`: The size of the read in bytes
    ///
    /// returns: (), internally the result is updated
    pub fn read(&mut self, pc: Option<u64>, address: u64, size: u16) {
        let geometry = *self.cache.geometry();
        let end = address.saturating_add(size.max(1) as u64);
        let mut current_aligned_address = geometry.align(address);
        while current_aligned_address < end {
            match self.cache.access(&Access::new(current_aligned_address, pc)) {
                Outcome::Hit => self.result.hits += 1,
                Outcome::Miss => self.result.misses += 1,
            }
            match current_aligned_address.checked_add(geometry.line_size()) {
                Some(next) => current_aligned_address = next,
                None => break,
            }
        }
    }

    /// Simulates the cache over a trace of 40 byte records
    ///
    /// For speed, records are not validated; if the input format may be invalid it should be checked
    /// with `validate_trace` before using this function. While it won't panic, it may produce
    /// incorrect results
    ///
    /// Reads from the byte array are *guaranteed to be sequential*, so when using something like
    /// mmap the operating system can be advised of this
    ///
    /// # Arguments
    ///
    /// * `bytes`: The input byte array
    ///
    /// returns: Result<&SimulationResult, String>
    pub fn simulate(&mut self, bytes: &[u8]) -> Result<&SimulationResult, String> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(format!("The trace is {} bytes long, which is not a whole number of {RECORD_SIZE} byte records", bytes.len()));
        }
        info!(records = bytes.len() / RECORD_SIZE, cache = %self.result.name, "simulating trace");
        let start = Instant::now();
        for chunk in bytes.chunks_exact(RECORD_SIZE) {
            if let Ok(buffer) = <&[u8; RECORD_SIZE]>::try_from(chunk) {
                let record = TraceRecord::parse(buffer);
                self.read(record.pc, record.address, record.size);
            }
        }
        self.simulation_time += start.elapsed();
        self.refresh_result();
        info!(hits = self.result.hits, misses = self.result.misses, "simulation finished");
        Ok(&self.result)
    }

    /// The results so far
    pub fn result(&mut self) -> &SimulationResult {
        self.refresh_result();
        &self.result
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines which have never been filled
    pub fn get_uninitialised_line_count(&self) -> u64 {
        self.cache.get_uninitialised_line_count() as u64
    }

    pub fn cache(&self) -> &GenericCache {
        &self.cache
    }

    fn refresh_result(&mut self) {
        self.result.evictions = self.cache.get_eviction_count();
        self.result.policy_stats = match &self.cache {
            GenericCache::Hawkeye(c) => Some(c.policy().stats()),
            GenericCache::LeastRecentlyUsed(_) => None,
        };
    }

    /// Creates a new cache from a validated cache configuration
    fn config_to_cache(config: &CacheConfig) -> GenericCache {
        let geometry = config.geometry();
        match config.replacement_policy {
            ReplacementPolicyConfig::Hawkeye => {
                let policy = Hawkeye::new(geometry, config.window(), config.max_shct, config.shct_size);
                GenericCache::from(Cache::new(geometry, policy))
            }
            ReplacementPolicyConfig::LeastRecentlyUsed => {
                GenericCache::from(Cache::new(geometry, LeastRecentlyUsed::new()))
            }
        }
    }
}
