use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollOptions,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate used while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Regex matching the lines that separate pages in a text document
    #[serde(default = "default_page_separator")]
    pub page_separator: String,
    /// Show the status bar below the pages
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            page_separator: default_page_separator(),
            show_status_bar: default_true(),
        }
    }
}

/// Options consumed by [`crate::ScrollEngine`] at initialization.
///
/// The interaction toggles, the paging threshold and the animation can be
/// changed afterwards through the engine; the rest is read once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollOptions {
    /// Identifies page sub-elements inside the container
    #[serde(default = "default_page_selector")]
    pub page_selector: String,
    /// Keyboard interaction (PageUp/PageDown/ArrowUp/ArrowDown)
    #[serde(default = "default_true")]
    pub keyboard_enabled: bool,
    /// Mouse wheel interaction
    #[serde(default = "default_true")]
    pub mouse_enabled: bool,
    /// Swipe up/down interaction
    #[serde(default = "default_true")]
    pub swipe_enabled: bool,
    /// -1: auto, 0: disabled, >0: enabled when the viewport is taller than this
    #[serde(default)]
    pub paging_threshold_px: PagingThreshold,
    /// Stay on the current page when the container is resized
    #[serde(default = "default_true")]
    pub resize_keeps_current_page: bool,
    #[serde(default = "default_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub scroll_debounce_ms: u64,
    #[serde(default)]
    pub animation: AnimationConfig,
    /// -1: viewport center, >=0: fixed offset from the container top
    #[serde(default)]
    pub index_recognition_offset_px: IndexRecognition,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            page_selector: default_page_selector(),
            keyboard_enabled: true,
            mouse_enabled: true,
            swipe_enabled: true,
            paging_threshold_px: PagingThreshold::default(),
            resize_keeps_current_page: true,
            resize_debounce_ms: default_debounce_ms(),
            scroll_debounce_ms: default_debounce_ms(),
            animation: AnimationConfig::default(),
            index_recognition_offset_px: IndexRecognition::default(),
        }
    }
}

/// Serializable animation settings. Custom easing and step functions are
/// injected at runtime through [`crate::scroll::Animation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Duration in milliseconds, 0 means no animation
    #[serde(default = "default_animation_duration")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: Option<EasingKind>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_animation_duration(),
            easing: Some(EasingKind::InOutQuint),
        }
    }
}

/// Built-in easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingKind {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    #[default]
    InOutQuint,
}

impl EasingKind {
    /// Name used in config files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            EasingKind::Linear => "linear",
            EasingKind::InQuad => "in_quad",
            EasingKind::OutQuad => "out_quad",
            EasingKind::InOutQuad => "in_out_quad",
            EasingKind::InCubic => "in_cubic",
            EasingKind::OutCubic => "out_cubic",
            EasingKind::InOutCubic => "in_out_cubic",
            EasingKind::InQuart => "in_quart",
            EasingKind::OutQuart => "out_quart",
            EasingKind::InOutQuart => "in_out_quart",
            EasingKind::InQuint => "in_quint",
            EasingKind::OutQuint => "out_quint",
            EasingKind::InOutQuint => "in_out_quint",
        }
    }
}

impl FromStr for EasingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::Configuration(format!("unknown easing: {s}")))
    }
}

/// When user interactions are allowed to page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum PagingThreshold {
    /// Enabled while the tallest page fits the viewport
    #[default]
    Auto,
    /// Interactions never page; programmatic navigation still works
    Disabled,
    /// Enabled while the viewport is taller than the given pixels
    AboveViewport(f64),
}

impl TryFrom<f64> for PagingThreshold {
    type Error = Error;

    fn try_from(px: f64) -> Result<Self, Self::Error> {
        if px == -1.0 {
            Ok(Self::Auto)
        } else if px == 0.0 {
            Ok(Self::Disabled)
        } else if px > 0.0 {
            Ok(Self::AboveViewport(px))
        } else {
            Err(Error::Configuration(format!(
                "paging threshold must be -1, 0 or a positive pixel value, got {px}"
            )))
        }
    }
}

impl From<PagingThreshold> for f64 {
    fn from(threshold: PagingThreshold) -> Self {
        match threshold {
            PagingThreshold::Auto => -1.0,
            PagingThreshold::Disabled => 0.0,
            PagingThreshold::AboveViewport(px) => px,
        }
    }
}

/// Which point of the viewport decides the current page index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum IndexRecognition {
    /// The page under the vertical center of the viewport
    #[default]
    ViewportCenter,
    /// The page under a fixed offset from the container top
    FromTop(f64),
}

impl From<f64> for IndexRecognition {
    fn from(px: f64) -> Self {
        if px >= 0.0 {
            Self::FromTop(px)
        } else {
            Self::ViewportCenter
        }
    }
}

impl From<IndexRecognition> for f64 {
    fn from(recognition: IndexRecognition) -> Self {
        match recognition {
            IndexRecognition::ViewportCenter => -1.0,
            IndexRecognition::FromTop(px) => px,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagescroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_page_separator() -> String {
    r"^-{3,}\s*$".to_string()
}

fn default_page_selector() -> String {
    "section".to_string()
}

fn default_debounce_ms() -> u64 {
    50
}

fn default_animation_duration() -> u64 {
    1000
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagescroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagescroll")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pagescroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
