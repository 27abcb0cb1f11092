use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "odm.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub connect_timeout_secs: u64,
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub report_interval_ms: u64,
    pub buffer_size: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: None,
            user_agent: "OpenDownloadManager/0.1".to_string(),
            report_interval_ms: 1000,
            buffer_size: 8192,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads the config at `path`, falling back to defaults when the file is
    /// missing or unparsable.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(toml_str) => toml::from_str(&toml_str).unwrap_or_else(|err| {
                warn!(path = %path.display(), "failed to parse config: {err}; using defaults");
                Config::default()
            }),
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Config::default()
            }
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms.max(1))
    }
}
