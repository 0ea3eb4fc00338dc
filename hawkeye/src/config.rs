use serde::Deserialize;
use crate::error::ConfigError;
use crate::geometry::Geometry;

/// A configuration for a single cache and its replacement policy
///
/// The Hawkeye fields are ignored by the other policies
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub name: String,
    pub sets: u64,
    pub ways: u64,
    #[serde(default = "default_line_size")]
    pub line_size: u64,
    /// OPTgen window length in logical timestamps. Defaults to 8 times the associativity
    #[serde(default)]
    pub occupancy_window: Option<usize>,
    #[serde(default = "default_max_shct")]
    pub max_shct: u8,
    #[serde(default = "default_shct_size")]
    pub shct_size: usize,
    #[serde(default)]
    pub replacement_policy: ReplacementPolicyConfig,
}

/// The replacement policy - hawkeye or lru. Defaults to hawkeye.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[default]
    #[serde(alias = "hawkeye")]
    Hawkeye,
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
}

fn default_line_size() -> u64 {
    64
}

fn default_max_shct() -> u8 {
    7
}

fn default_shct_size() -> usize {
    2048
}

impl CacheConfig {
    /// Checks the configuration describes a cache which can be built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sets.is_power_of_two() {
            return Err(ConfigError::Sets(self.sets));
        }
        if self.ways == 0 {
            return Err(ConfigError::Ways);
        }
        if !self.line_size.is_power_of_two() {
            return Err(ConfigError::LineSize(self.line_size));
        }
        if self.window() < 2 {
            return Err(ConfigError::OccupancyWindow(self.window()));
        }
        if self.max_shct == 0 {
            return Err(ConfigError::MaxShct);
        }
        Ok(())
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.sets, self.ways, self.line_size)
    }

    /// The OPTgen window length, after applying the default
    pub fn window(&self) -> usize {
        self.occupancy_window.unwrap_or(8 * self.ways as usize)
    }
}
