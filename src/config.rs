use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Settings shared by every dialog. Passed explicitly to each dialog call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Window title prefix
    pub title: String,
    /// How often the stopwatch label is redrawn
    pub refresh_interval_ms: u64,
    /// Stopwatch tick length; one second in normal use
    pub tick_interval_ms: u64,
    /// Upper bound of the time-entry spinners
    pub spin_max: u32,
    /// Whether the stopwatch stops on its own at the activity balance
    pub auto_stop: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: "Tally".to_string(),
            refresh_interval_ms: 200,
            tick_interval_ms: 1000,
            spin_max: 99,
            auto_stop: true,
        }
    }
}

impl DialogConfig {
    pub fn load() -> Self {
        load_or_create(&config_dir().join("config.json"))
    }

    pub fn load_from(path: &Path) -> Self {
        load_or_create(path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Window title for a dialog with a subtitle, e.g. "Tally - Debit".
    pub fn window_title(&self, subtitle: &str) -> String {
        format!("{} - {}", self.title, subtitle)
    }
}

/// Application config directory, created on first use.
pub fn config_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally");
    fs::create_dir_all(&config_dir).ok();
    config_dir
}

/// Read a JSON config file, or write out the defaults when it does not exist.
/// Invalid files are left untouched and the defaults are used.
pub(crate) fn load_or_create<T>(path: &Path) -> T
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!(path = %path.display(), error = %e, "invalid config, using defaults"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "unreadable config, using defaults"),
        }
        return T::default();
    }

    let config = T::default();
    if let Ok(json) = serde_json::to_string_pretty(&config) {
        fs::write(path, json).ok();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_written_on_first_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = DialogConfig::load_from(&path);
        assert_eq!(config, DialogConfig::default());
        assert!(path.exists());

        let written: DialogConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, config);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"title": "Timesheet", "spin_max": 59}"#).unwrap();

        let config = DialogConfig::load_from(&path);
        assert_eq!(config.title, "Timesheet");
        assert_eq!(config.spin_max, 59);
        assert_eq!(config.refresh_interval_ms, 200);
        assert!(config.auto_stop);
    }

    #[test]
    fn test_invalid_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ broken").unwrap();

        let config = DialogConfig::load_from(&path);
        assert_eq!(config, DialogConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn test_window_title() {
        let config = DialogConfig::default();
        assert_eq!(config.window_title("Debit"), "Tally - Debit");
    }

    #[test]
    fn test_intervals_never_zero() {
        let config = DialogConfig {
            refresh_interval_ms: 0,
            tick_interval_ms: 0,
            ..DialogConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_millis(1));
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }
}
