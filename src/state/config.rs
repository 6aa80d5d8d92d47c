//! Configuration management

use crate::speech::EngineKind;
use crate::{FalarError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Application configuration
///
/// Speech and front-end settings read from `~/.falar.cfg`. The chosen voice
/// is never stored; every session starts from the engine's own list.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from `~/.falar.cfg`, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a given file, creating it if missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| FalarError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| FalarError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Built-in defaults, without touching the filesystem
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Default config file path (~/.falar.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".falar.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech")).set("backend", "auto");

        ini.with_section(Some("ui"))
            .set("prompt", ">")
            .set("list_on_refresh", "true");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Which speech backend to use
    pub fn backend(&self) -> Result<EngineKind> {
        self.get_string("speech", "backend", "auto").parse()
    }

    /// Speech rate (0-100), if configured
    pub fn rate(&self) -> Option<u8> {
        self.get_int("speech", "rate", -1)
            .try_into()
            .ok()
            .filter(|&r| r <= 100)
    }

    /// Speech volume (0-100), if configured
    pub fn volume(&self) -> Option<u8> {
        self.get_int("speech", "volume", -1)
            .try_into()
            .ok()
            .filter(|&v| v <= 100)
    }

    /// Prompt printed before each input line on a terminal
    ///
    /// INI values lose trailing spaces, so the separating space is added here.
    pub fn prompt(&self) -> String {
        format!("{} ", self.get_string("ui", "prompt", ">").trim_end())
    }

    /// Print the voice list whenever the engine's voices change?
    pub fn list_on_refresh(&self) -> bool {
        self.get_bool("ui", "list_on_refresh", true)
    }
}
