//! Configuration for the Terrasol sun-evaluation pipeline.
//!
//! All tunables recognized by the streaming, memory, and sweep subsystems live
//! here as serde structs with sensible defaults, persisted as RON.

mod config;
mod error;

pub use config::{
    Config, DebugConfig, MemoryConfig, StreamingConfig, SweepConfig, ViewportConfig,
};
pub use error::ConfigError;
