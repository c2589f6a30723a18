use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use shakedown_client::SessionConfig;

pub const CONFIG_FILE_NAME: &str = "shakedown.toml";

/// Persisted CLI configuration (`~/.config/shakedown/shakedown.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default)]
    pub trusted_auth: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            trusted_auth: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CliConfig {
    /// Session settings for one command run; a `--server` flag beats the
    /// file, which beats the built-in default.
    pub fn session_config(&self, server_override: Option<&str>) -> SessionConfig {
        let mut config = SessionConfig::new(
            server_override
                .map(str::to_string)
                .unwrap_or_else(|| self.server.url.clone()),
        );
        config.trusted_auth = self.server.trusted_auth;
        config.timeout_secs = self.server.timeout_secs;
        config
    }
}

/// Config directory (`~/.config/shakedown/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("shakedown"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load() -> Result<CliConfig> {
    load_from(&config_path()?)
}

/// Missing file means defaults; a present but unparsable file is an error.
pub fn load_from(path: &Path) -> Result<CliConfig> {
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config at {}", path.display()))
}

pub fn save_to(path: &Path, config: &CliConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config at {}", path.display()))
}

pub fn show_config() -> Result<()> {
    let path = config_path()?;
    let config = load_from(&path)?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn set_config(server: Option<String>, trusted_auth: Option<bool>) -> Result<()> {
    let path = config_path()?;
    let mut config = load_from(&path)?;
    if let Some(url) = server {
        config.server.url = url;
    }
    if let Some(trusted) = trusted_auth {
        config.server.trusted_auth = trusted;
    }
    save_to(&path, &config)?;
    println!("Updated {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.server.url, "http://localhost:8080");
        assert!(!config.server.trusted_auth);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = CliConfig::default();
        config.server.url = "http://repo.example:8443".into();
        config.server.trusted_auth = true;
        save_to(&path, &config).unwrap();

        let reloaded = load_from(&path).unwrap();
        assert_eq!(reloaded.server.url, "http://repo.example:8443");
        assert!(reloaded.server.trusted_auth);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[server]\nurl = \"http://other:9090\"\n").unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.server.url, "http://other:9090");
        assert_eq!(config.server.timeout_secs, 30);
    }

    #[test]
    fn test_flag_beats_file() {
        let config = CliConfig::default();
        let session = config.session_config(Some("http://flagged:1234"));
        assert_eq!(session.base_url, "http://flagged:1234");
        let session = config.session_config(None);
        assert_eq!(session.base_url, "http://localhost:8080");
    }
}
