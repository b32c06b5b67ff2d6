use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub playback: PlaybackConfig,
    pub catalog: CatalogConfig,
    pub render: RenderConfig,
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Swiping past the first/last segment moves to the previous/next story.
    pub edge_forwarding: bool,
    pub drag_commit_distance: u16,
    pub edge_swipe_threshold: u16,
    /// Cells per second.
    pub drag_commit_velocity: f32,
    pub settle_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            edge_forwarding: true,
            drag_commit_distance: 3,
            edge_swipe_threshold: 2,
            drag_commit_velocity: 30.0,
            settle_ms: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seek to 0 when a segment stops being the active one.
    pub reset_on_deactivate: bool,
    pub pause_on_modal: bool,
    /// Move to the next segment, or the next story, when a video finishes.
    pub advance_on_end: bool,
    pub simulated_load_ms: u64,
    pub simulated_play_ms: u64,
    /// Length of a simulated video; 0 plays forever.
    pub simulated_video_ms: u64,
    pub autoplay_allowed: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            reset_on_deactivate: true,
            pause_on_modal: true,
            advance_on_end: true,
            simulated_load_ms: 250,
            simulated_play_ms: 80,
            simulated_video_ms: 15_000,
            autoplay_allowed: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub cache_ttl_secs: u64,
    pub persist_cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            persist_cache: true,
        }
    }
}

impl CatalogConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub redraw_interval_ms: u64,
    pub input_poll_timeout_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            redraw_interval_ms: 33,
            input_poll_timeout_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = NavigationConfig::default();
        self.navigation.drag_commit_distance = self.navigation.drag_commit_distance.max(1);
        self.navigation.edge_swipe_threshold = self.navigation.edge_swipe_threshold.max(1);
        if !self.navigation.drag_commit_velocity.is_finite()
            || self.navigation.drag_commit_velocity <= 0.0
        {
            self.navigation.drag_commit_velocity = defaults.drag_commit_velocity;
        }
        self.navigation.settle_ms = self.navigation.settle_ms.max(1);
        self.catalog.cache_ttl_secs = self.catalog.cache_ttl_secs.max(1);
        self.render.redraw_interval_ms = self.render.redraw_interval_ms.max(1);
        self.render.input_poll_timeout_ms = self.render.input_poll_timeout_ms.max(1);
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("STV_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("stv").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("stv")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("stv").join("config.toml"));
    }
    None
}

/// Directory for the persisted catalog cache, the onboarding flag and the log file.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("STV_DATA_DIR")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("stv"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("stv"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("stv"));
    }
    None
}

#[cfg(test)]
pub(crate) fn unique_temp_path(suffix: &str) -> PathBuf {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("stv_{suffix}_{}_{}", process::id(), nanos));
    path
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{Config, unique_temp_path};

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [navigation]
            edge_forwarding = false
            drag_commit_distance = 0
            drag_commit_velocity = -4.0
            settle_ms = 0

            [playback]
            reset_on_deactivate = false
            advance_on_end = false

            [catalog]
            cache_ttl_secs = 0
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert!(!config.navigation.edge_forwarding);
        assert_eq!(config.navigation.drag_commit_distance, 1);
        assert_eq!(config.navigation.drag_commit_velocity, 30.0);
        assert_eq!(config.navigation.settle_ms, 1);
        assert_eq!(config.navigation.edge_swipe_threshold, 2);
        assert!(!config.playback.reset_on_deactivate);
        assert!(config.playback.pause_on_modal);
        assert!(!config.playback.advance_on_end);
        assert_eq!(config.playback.simulated_video_ms, 15_000);
        assert_eq!(config.catalog.cache_ttl_secs, 1);
        assert_eq!(config.keymap.preset, "default");

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn load_from_path_rejects_malformed_toml() {
        let path = unique_temp_path("broken.toml");
        fs::write(&path, "[navigation\nedge_forwarding = ").expect("config file should be written");

        assert!(Config::load_from_path(&path).is_err());

        fs::remove_file(&path).expect("config file should be removed");
    }
}
