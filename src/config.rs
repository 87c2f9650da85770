use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::WatchArgs;

/// Camera resolution requested at open.
pub const DEFAULT_RESOLUTION: (u32, u32) = (640, 480);

/// Sampling cadence of the scan loop, in ticks per second.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 10;

/// Theme constants mirrored by the TUI. Cosmetic only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    pub accent: String,
    pub dark: bool,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            accent: "teal".to_string(),
            dark: true,
        }
    }
}

pub struct Config {
    pub camera_index: u32,
    pub resolution: (u32, u32),
    pub sample_rate_hz: u32,
    pub theme: Theme,
    pub db_path: Option<PathBuf>,
    pub verbose: bool,
}

/// On-disk layout of ~/.config/qrlog/config.toml. Every field optional;
/// CLI flags win over the file, the file wins over the defaults.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    camera_index: Option<u32>,
    resolution: Option<[u32; 2]>,
    sample_rate_hz: Option<u32>,
    accent: Option<String>,
    dark: Option<bool>,
    db_path: Option<PathBuf>,
}

fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "qrlog")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_file_config() -> (FileConfig, Vec<String>) {
    let mut diagnostics = Vec::new();

    let Some(path) = config_file_path() else {
        return (FileConfig::default(), diagnostics);
    };

    // an absent file is the normal case, not a diagnostic
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => return (FileConfig::default(), diagnostics),
    };

    match toml::from_str(&contents) {
        Ok(parsed) => (parsed, diagnostics),
        Err(e) => {
            diagnostics.push(format!("ignoring malformed {}: {e}", path.display()));
            (FileConfig::default(), diagnostics)
        }
    }
}

impl Config {
    pub fn from_watch_args(args: &WatchArgs) -> (Config, Vec<String>) {
        let (file, diagnostics) = load_file_config();

        let config = Config {
            camera_index: args.camera.or(file.camera_index).unwrap_or(0),
            resolution: file
                .resolution
                .map(|[w, h]| (w, h))
                .unwrap_or(DEFAULT_RESOLUTION),
            sample_rate_hz: args
                .rate
                .or(file.sample_rate_hz)
                .unwrap_or(DEFAULT_SAMPLE_RATE_HZ)
                .max(1),
            theme: Theme {
                accent: file.accent.unwrap_or_else(|| Theme::default().accent),
                dark: file.dark.unwrap_or(true),
            },
            db_path: file.db_path,
            verbose: args.verbose,
        };

        (config, diagnostics)
    }

    pub fn default() -> Config {
        let (file, _) = load_file_config();

        Config {
            camera_index: file.camera_index.unwrap_or(0),
            resolution: file
                .resolution
                .map(|[w, h]| (w, h))
                .unwrap_or(DEFAULT_RESOLUTION),
            sample_rate_hz: file.sample_rate_hz.unwrap_or(DEFAULT_SAMPLE_RATE_HZ).max(1),
            theme: Theme::default(),
            db_path: file.db_path,
            verbose: false,
        }
    }

    /// Tick interval derived from the sampling rate (100ms at the default 10 Hz).
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.sample_rate_hz.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_interval_is_100ms() {
        let config = Config {
            camera_index: 0,
            resolution: DEFAULT_RESOLUTION,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            theme: Theme::default(),
            db_path: None,
            verbose: false,
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn file_config_parses_partial_toml() {
        let file: FileConfig = toml::from_str("sample_rate_hz = 5\naccent = \"green\"").unwrap();
        assert_eq!(file.sample_rate_hz, Some(5));
        assert_eq!(file.accent.as_deref(), Some("green"));
        assert_eq!(file.resolution, None);
    }

    #[test]
    fn file_config_parses_resolution_pair() {
        let file: FileConfig = toml::from_str("resolution = [1280, 720]").unwrap();
        assert_eq!(file.resolution, Some([1280, 720]));
    }
}
