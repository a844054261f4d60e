//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level Terrasol configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Render viewport settings.
    pub viewport: ViewportConfig,
    /// Tile streaming settings.
    pub streaming: StreamingConfig,
    /// Memory pressure monitoring settings.
    pub memory: MemoryConfig,
    /// Sun evaluation sweep settings.
    pub sweep: SweepConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Render viewport configuration.
///
/// Vision masks are authored against this viewport size; samplers at a
/// different resolution must rescale mask points proportionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
}

/// Tile streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Target screen-space error in pixels. Lower = sharper detail, more
    /// tiles resident.
    pub error_target: f64,
    /// Maximum tree depth traversed during refinement.
    pub max_depth: u32,
    /// Hard ceiling on resident tile content, in bytes.
    pub maximum_memory_usage: usize,
    /// Prefetch sibling tiles for smoother panning.
    pub load_siblings: bool,
    /// Skip loading content for intermediate tree levels during refinement;
    /// when false, refined interior tiles stay resident for uniform detail.
    pub skip_level_of_detail: bool,
    /// Maximum concurrent tile content requests.
    pub max_concurrent_requests: usize,
    /// Frames a loaded tile must go untouched before it becomes an eviction
    /// candidate.
    pub eviction_idle_frames: u64,
    /// Multiplier applied to `error_target` while the camera is moving.
    pub motion_coarsen_factor: f64,
}

/// Memory pressure monitoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemoryConfig {
    /// Seconds between memory samples.
    pub poll_interval_seconds: f64,
    /// Fallback heap limit in bytes when the runtime exposes no limit.
    pub default_heap_limit: usize,
}

/// Sun evaluation sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// First local hour sampled (inclusive).
    pub sweep_start_hour: u32,
    /// Last local hour sampled (inclusive).
    pub sweep_end_hour: u32,
    /// Minutes between samples.
    pub time_slot_step_minutes: u32,
    /// Offset from UTC for the venue's local time, in minutes.
    pub utc_offset_minutes: i32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show live streaming stats.
    pub show_streaming_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_y_deg: 60.0,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            error_target: 16.0,
            max_depth: 20,
            maximum_memory_usage: 512 * 1024 * 1024,
            load_siblings: true,
            skip_level_of_detail: false,
            max_concurrent_requests: 8,
            eviction_idle_frames: 60,
            motion_coarsen_factor: 3.0,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 2.0,
            default_heap_limit: 2 * 1024 * 1024 * 1024,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sweep_start_hour: 12,
            sweep_end_hour: 21,
            time_slot_step_minutes: 15,
            utc_offset_minutes: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_streaming_stats: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("terrasol.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            tracing::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `terrasol.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("terrasol.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("terrasol.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            tracing::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
