use thiserror::Error;

/// Problems with a cache configuration, found before any cache is built
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("the number of sets must be a non-zero power of two, got {0}")]
    Sets(u64),
    #[error("the number of ways must be non-zero")]
    Ways,
    #[error("the line size must be a non-zero power of two, got {0}")]
    LineSize(u64),
    #[error("the OPTgen occupancy window must hold at least 2 timestamps, got {0}")]
    OccupancyWindow(usize),
    #[error("the predictor's maximum counter value must be non-zero")]
    MaxShct,
}

/// Problems with a trace file, found by validating it before simulation
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TraceError {
    #[error("the trace is {0} bytes long, which is not a whole number of 40 byte records")]
    PartialRecord(usize),
    #[error("record {line} is malformed: {content:?}")]
    MalformedRecord { line: usize, content: String },
}
