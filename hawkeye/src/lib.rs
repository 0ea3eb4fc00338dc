//! # Hawkeye
//!
//! An implementation of the Hawkeye cache replacement policy. Hawkeye learns from how Belady's
//! optimal policy would have treated past accesses: each set simulates OPT over a short window of
//! history, and a table keyed by the PC of each access learns which instructions load lines that
//! OPT would keep. Lines are then aged and evicted with re-reference prediction values.
//!
//! The policy is usable on its own through the `ReplacementPolicy` trait, and the library also
//! provides a single level cache and a trace driven simulator to run it, alongside an LRU baseline

/// Contains the implementation of the cache, and a utility enum for the supported policies
pub mod cache;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Error types for configuration and trace validation
pub mod error;

/// Address to set and tag mapping
pub mod geometry;

/// The Hawkeye replacement policy
pub mod hawkeye;

/// Loading trace files
pub mod io;

/// The OPTgen simulator of Belady's optimal policy
pub mod optgen;

/// The PC indexed friendliness predictor
pub mod predictor;

/// Contains the replacement policy trait, and the LRU baseline policy
pub mod replacement_policies;

/// Contains the simulator used to run a trace through a cache configuration
pub mod simulator;

/// The trace record format
pub mod trace;

// Generated from the build.rs, private
mod hex {
    include!(concat!(env!("OUT_DIR"), "/hex.rs"));
}
#[cfg(test)]
mod test;

/// Contains utilities for building traces for tests and benchmarks.
pub mod util;
