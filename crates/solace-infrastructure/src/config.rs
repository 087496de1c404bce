//! Client configuration storage.
//!
//! Reads and writes `~/.config/solace/config.toml`. Writes are atomic
//! (tmp file + rename, with an exclusive lock on a sidecar lock file) so a
//! crash mid-save never leaves a torn config behind.

use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use solace_core::SolaceError;

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// File locking error.
    LockError(String),
    /// The user's home directory could not be determined.
    NoHomeDir,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            ConfigStorageError::LockError(e) => write!(f, "Lock error: {}", e),
            ConfigStorageError::NoHomeDir => write!(f, "Could not determine home directory"),
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for ConfigStorageError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigStorageError::TomlSerError(e)
    }
}

impl From<ConfigStorageError> for SolaceError {
    fn from(e: ConfigStorageError) -> Self {
        SolaceError::config(e.to_string())
    }
}

/// Client-side settings for reaching the chat services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the chat backend.
    pub base_url: String,
    /// Deadline for a single assistant exchange, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// TOML-backed storage for [`ClientConfig`].
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage handle for an explicit path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage handle at the default location:
    /// `~/.config/solace/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_location() -> Result<Self, ConfigStorageError> {
        let home = dirs::home_dir().ok_or(ConfigStorageError::NoHomeDir)?;
        Ok(Self::new(
            home.join(".config").join("solace").join("config.toml"),
        ))
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(config))`: successfully loaded
    /// - `Ok(None)`: file doesn't exist or is empty
    /// - `Err`: failed to read or parse the file
    pub fn load(&self) -> Result<Option<ClientConfig>, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let config: ClientConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Loads the config, falling back to defaults when the file is absent
    /// or unreadable. Parse failures are logged, not surfaced.
    pub fn load_or_default(&self) -> ClientConfig {
        match self.load() {
            Ok(Some(config)) => config,
            Ok(None) => ClientConfig::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to load client config, using defaults"
                );
                ClientConfig::default()
            }
        }
    }

    /// Saves the config atomically: write to a tmp file, fsync, then rename
    /// over the target while holding an exclusive lock on a sidecar file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the lock cannot
    /// be taken, or the write fails.
    pub fn save(&self, config: &ClientConfig) -> Result<(), ConfigStorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_path = self.path.with_extension("toml.lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;
        lock_file
            .lock_exclusive()
            .map_err(|e| ConfigStorageError::LockError(e.to_string()))?;

        let result = self.write_atomically(config);

        let _ = fs2::FileExt::unlock(&lock_file);
        result
    }

    fn write_atomically(&self, config: &ClientConfig) -> Result<(), ConfigStorageError> {
        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(toml_string.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), None);
        assert_eq!(storage.load_or_default(), ClientConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(dir.path().join("config.toml"));

        let config = ClientConfig {
            base_url: "https://chat.example.org".to_string(),
            request_timeout_secs: 10,
        };
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), Some(config));
    }

    #[test]
    fn test_empty_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "  \n").unwrap();

        let storage = ConfigStorage::new(path);
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://sol.example\"\n").unwrap();

        let storage = ConfigStorage::new(path);
        let config = storage.load().unwrap().unwrap();
        assert_eq!(config.base_url, "https://sol.example");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_garbled_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();

        let storage = ConfigStorage::new(path);
        assert!(storage.load().is_err());
        assert_eq!(storage.load_or_default(), ClientConfig::default());
    }
}
