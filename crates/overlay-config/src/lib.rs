//! Overlay configuration system
//!
//! This crate provides centralized configuration for overlay themes,
//! loading settings from `overlay.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the overlay
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OverlayConfig {
    /// Renderer cache settings
    pub cache: CacheConfig,
    /// Eager renderer construction settings
    pub prepare: PrepareConfig,
    /// Demo application settings
    pub demo: DemoConfig,
}

/// Renderer cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Sweep dead cache entries after this many insertions (0 disables automatic sweeps)
    pub sweep_interval: usize,
    /// Initial capacity reserved for the renderer cache
    pub initial_capacity: usize,
}

/// When renderers get constructed for a known component set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepareMode {
    /// Construct on first lookup
    Lazy,
    /// Construct every renderer before the theme is handed out
    Eager,
    /// Construct on a background thread while the theme is already usable
    Background,
}

impl PrepareMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lazy" => Some(Self::Lazy),
            "eager" => Some(Self::Eager),
            "background" | "async" => Some(Self::Background),
            _ => None,
        }
    }
}

/// Prepare configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Prepare strategy used by applications that build themes from config
    pub mode: PrepareMode,
}

/// Demo application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Name of the transition sampled by the animation demo (e.g. "high_ease")
    pub transition: Option<String>,
    /// Number of animation frames to sample
    pub frames: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: 64,
            initial_capacity: 16,
        }
    }
}

impl Default for PrepareMode {
    fn default() -> Self {
        Self::Eager
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            mode: PrepareMode::default(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            transition: None,
            frames: 20,
        }
    }
}

impl OverlayConfig {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(OverlayConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from `overlay.toml` in the current directory,
    /// or return the default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("overlay.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        // Cache settings
        if let Ok(val) = std::env::var("OVERLAY_SWEEP_INTERVAL") {
            if let Ok(interval) = val.parse::<usize>() {
                self.cache.sweep_interval = interval;
            }
        }
        if let Ok(val) = std::env::var("OVERLAY_CACHE_CAPACITY") {
            if let Ok(capacity) = val.parse::<usize>() {
                self.cache.initial_capacity = capacity;
            }
        }

        // Prepare settings
        if let Ok(val) = std::env::var("OVERLAY_PREPARE_MODE") {
            if let Some(mode) = PrepareMode::parse(&val) {
                self.prepare.mode = mode;
            }
        }

        // Demo settings
        if let Ok(transition) = std::env::var("OVERLAY_TRANSITION") {
            self.demo.transition = Some(transition);
        }
        if let Ok(val) = std::env::var("OVERLAY_DEMO_FRAMES") {
            if let Ok(frames) = val.parse::<u32>() {
                self.demo.frames = frames;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from overlay.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
