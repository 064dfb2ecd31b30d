//! Process configuration, loaded once by the entry point.
//!
//! All tunables the core consumes (TTL, window bounds, label limits,
//! geometry) live here and are passed into components explicitly; nothing
//! in the core reads configuration on its own.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;

/// Configuration at `<config_dir>/inkcal/config.toml`.
#[derive(Deserialize, Clone)]
pub struct Config {
    /// Calendar feeds, in merge order
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_ttl_minutes")]
    pub cache_ttl_minutes: i64,

    /// IANA zone the dashboard lives in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub upcoming: UpcomingConfig,
}

#[derive(Deserialize, Clone)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
}

/// The day strip's time window.
#[derive(Deserialize, Clone)]
pub struct WindowConfig {
    /// Local hour the window opens at
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Window length; 22 hours wraps past midnight into the next day
    #[serde(default = "default_window_hours")]
    pub hours: i64,
}

#[derive(Deserialize, Clone)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    /// Width of the timeline strip at the right edge of the canvas
    #[serde(default = "default_timeline_width")]
    pub timeline_width: u32,
}

#[derive(Deserialize, Clone)]
pub struct LabelConfig {
    /// Max chars for block labels on the timeline, ellipsis included
    #[serde(default = "default_timeline_label_limit")]
    pub timeline_limit: usize,
    /// Max chars for entries in the upcoming list
    #[serde(default = "default_upcoming_label_limit")]
    pub upcoming_limit: usize,
    /// Monospace glyph cell used for text measurement
    #[serde(default = "default_char_width")]
    pub char_width: u32,
    #[serde(default = "default_char_height")]
    pub char_height: u32,
}

#[derive(Deserialize, Clone)]
pub struct UpcomingConfig {
    #[serde(default = "default_upcoming_count")]
    pub count: usize,
    /// How far ahead recurring events are expanded for the list
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
}

fn default_ttl_minutes() -> i64 {
    60
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_start_hour() -> u32 {
    5
}
fn default_window_hours() -> i64 {
    22
}
fn default_canvas_width() -> u32 {
    640
}
fn default_canvas_height() -> u32 {
    384
}
fn default_timeline_width() -> u32 {
    200
}
fn default_timeline_label_limit() -> usize {
    15
}
fn default_upcoming_label_limit() -> usize {
    26
}
fn default_char_width() -> u32 {
    8
}
fn default_char_height() -> u32 {
    18
}
fn default_upcoming_count() -> usize {
    7
}
fn default_lookahead_days() -> i64 {
    30
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            start_hour: default_start_hour(),
            hours: default_window_hours(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: default_canvas_width(),
            height: default_canvas_height(),
            timeline_width: default_timeline_width(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            timeline_limit: default_timeline_label_limit(),
            upcoming_limit: default_upcoming_label_limit(),
            char_width: default_char_width(),
            char_height: default_char_height(),
        }
    }
}

impl Default for UpcomingConfig {
    fn default() -> Self {
        UpcomingConfig {
            count: default_upcoming_count(),
            lookahead_days: default_lookahead_days(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join("inkcal");
        Ok(config_dir.join("config.toml"))
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?
            .join("inkcal");
        Ok(cache_dir)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "No config found at {}.\n\n\
                Create it with at least one source:\n  \
                [[sources]]\n  \
                name = \"work\"\n  \
                url = \"https://example.com/work.ics\"",
                path.display()
            )
        })?;

        let config: Config =
            toml::from_str(&content).with_context(|| format!("Invalid config at {}", path.display()))?;
        if config.sources.is_empty() {
            bail!("Config at {} declares no [[sources]]", path.display());
        }
        Ok(config)
    }

    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.cache_ttl_minutes)
    }

    pub fn zone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("Invalid timezone '{}' in config", self.timezone))
    }
}
