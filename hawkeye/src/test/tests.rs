use std::error::Error;
use crate::config::{CacheConfig, ReplacementPolicyConfig};
use crate::error::ConfigError;
use crate::simulator::Simulator;
use crate::util::{cyclic, hot_loop_with_scan, TraceBuilder, HOT_PC};

fn config(policy: &str) -> Result<CacheConfig, serde_json::Error> {
    serde_json::from_str(&format!(
        r#"{{ "name": "L1", "sets": 4, "ways": 4, "replacement_policy": "{policy}" }}"#
    ))
}

#[test]
fn config_defaults_and_aliases() -> Result<(), Box<dyn Error>> {
    let hawkeye = config("hawkeye")?;
    assert_eq!(hawkeye.replacement_policy, ReplacementPolicyConfig::Hawkeye);
    assert_eq!(hawkeye.line_size, 64);
    assert_eq!(hawkeye.window(), 32);
    assert_eq!(hawkeye.max_shct, 7);
    assert_eq!(hawkeye.shct_size, 2048);
    assert_eq!(config("lru")?.replacement_policy, ReplacementPolicyConfig::LeastRecentlyUsed);
    let bare: CacheConfig = serde_json::from_str(r#"{ "name": "L2", "sets": 8, "ways": 2, "occupancy_window": 5 }"#)?;
    assert_eq!(bare.replacement_policy, ReplacementPolicyConfig::Hawkeye);
    assert_eq!(bare.window(), 5);
    Ok(())
}

#[test]
fn invalid_configs_are_rejected() -> Result<(), Box<dyn Error>> {
    let mut config = config("hawkeye")?;
    config.sets = 3;
    assert_eq!(Simulator::new(&config).err(), Some(ConfigError::Sets(3)));
    config.sets = 4;
    config.ways = 0;
    assert_eq!(config.validate(), Err(ConfigError::Ways));
    config.ways = 4;
    config.line_size = 48;
    assert_eq!(config.validate(), Err(ConfigError::LineSize(48)));
    config.line_size = 64;
    config.occupancy_window = Some(1);
    assert_eq!(config.validate(), Err(ConfigError::OccupancyWindow(1)));
    config.occupancy_window = None;
    config.max_shct = 0;
    assert_eq!(config.validate(), Err(ConfigError::MaxShct));
    Ok(())
}

#[test]
fn reads_are_split_across_lines() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::new(&config("hawkeye")?)?;
    let mut builder = TraceBuilder::new();
    // Bytes 60 to 67 straddle the first two lines
    builder.read(HOT_PC, 60, 8).read(HOT_PC, 0, 4).write(HOT_PC, 64, 4);
    let result = simulator.simulate(&builder.build())?;
    assert_eq!(result.misses, 2);
    assert_eq!(result.hits, 2);
    Ok(())
}

#[test]
fn results_accumulate_across_calls() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::new(&config("lru")?)?;
    let trace = cyclic(4, 2, 64, HOT_PC);
    simulator.simulate(&trace)?;
    let result = simulator.simulate(&trace)?;
    assert_eq!(result.misses, 4);
    assert_eq!(result.hits, 12);
    assert_eq!(result.evictions, 0);
    assert!(result.policy_stats.is_none());
    assert_eq!(simulator.get_uninitialised_line_count(), 12);
    Ok(())
}

#[test]
fn partial_records_are_rejected() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::new(&config("hawkeye")?)?;
    let mut trace = cyclic(1, 1, 64, HOT_PC);
    trace.pop();
    assert!(simulator.simulate(&trace).is_err());
    Ok(())
}

#[test]
fn hawkeye_results_include_policy_stats() -> Result<(), Box<dyn Error>> {
    let mut simulator = Simulator::new(&config("hawkeye")?)?;
    let trace = hot_loop_with_scan(8, 32, 20, 64);
    let result = simulator.simulate(&trace)?;
    assert_eq!(result.hits + result.misses, 20 * 40);
    let stats = result.policy_stats.ok_or("missing policy stats")?;
    // Every eviction trains or detrains exactly once
    assert_eq!(stats.trains + stats.detrains, result.evictions);
    // Each miss records two OPTgen accesses and each hit one
    assert_eq!(stats.optgen.accesses, 2 * result.misses + result.hits);
    assert!(stats.predictor_entries <= 2);
    let json = serde_json::to_value(result)?;
    assert_eq!(json["policy"], "hawkeye");
    assert!(json["policy_stats"]["optgen"]["accesses"].is_u64());
    Ok(())
}
