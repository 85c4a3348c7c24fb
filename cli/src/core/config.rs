//! # LookAroun Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the assistant's configuration.
//! Settings come from several layers, later layers overriding earlier ones:
//! 1. Default values defined in the code
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/lookaroun/config.toml` on Linux)
//! 3. Project-specific `.lookaroun.toml` in the current directory or an ancestor
//!
//! Command-line flags and the `PORT` variable are applied on top of this by
//! the individual commands (see `commands::serve::config`).
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8501
//! enable_cors = true
//! port_attempts = 1
//! session_ttl_secs = 1800   # idle sessions are dropped after this long
//!
//! [knowledge]
//! file = "~/lookaroun/knowledge.toml"
//!
//! [assistant]
//! strategy = "canonical"   # or "legacy"
//!
//! [generator]
//! endpoint = "http://127.0.0.1:9000/generate"
//! timeout_secs = 30
//! ```
//!
//! The configuration is loaded once per command execution and passed to the
//! parts that need it.
//!
use crate::bot::matcher::MatchStrategy;
use crate::core::error::{LookarounError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The effective configuration, after every layer has been applied.
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub server: ServerSection,
    pub knowledge: KnowledgeSection,
    pub assistant: AssistantSection,
    pub generator: GeneratorSection,
}

/// Network settings for `lookaroun serve`.
#[derive(Debug, Clone)]
pub struct ServerSection {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `None` defers to `PORT` or the built-in default.
    pub port: Option<u16>,
    pub enable_cors: bool,
    /// How many consecutive ports to try when the first one is taken.
    pub port_attempts: u8,
    /// Sessions without a new message for this long are dropped.
    pub session_ttl_secs: u64,
}

/// Where the knowledge tables come from.
#[derive(Debug, Default, Clone)]
pub struct KnowledgeSection {
    /// TOML file replacing the built-in tables. `~` is expanded.
    pub file: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct AssistantSection {
    pub strategy: MatchStrategy,
}

/// Conversational generator used by the legacy strategy.
#[derive(Debug, Clone)]
pub struct GeneratorSection {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
            enable_cors: true,
            port_attempts: 1,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

/// Idle time after which a chat session is discarded.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Upper bound accepted for `server.session_ttl_secs` (30 days).
const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// One configuration file as written on disk.
///
/// Every setting is optional so that a layer only overrides what it
/// actually names; defaults are applied once, after all layers are merged.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub server: ServerLayer,
    pub knowledge: KnowledgeLayer,
    pub assistant: AssistantLayer,
    pub generator: GeneratorLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub enable_cors: Option<bool>,
    pub port_attempts: Option<u8>,
    pub session_ttl_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KnowledgeLayer {
    pub file: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantLayer {
    pub strategy: Option<MatchStrategy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorLayer {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Returns `self` with every unset field taken from `lower`.
    pub fn over(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            server: ServerLayer {
                host: self.server.host.or(lower.server.host),
                port: self.server.port.or(lower.server.port),
                enable_cors: self.server.enable_cors.or(lower.server.enable_cors),
                port_attempts: self.server.port_attempts.or(lower.server.port_attempts),
                session_ttl_secs: self
                    .server
                    .session_ttl_secs
                    .or(lower.server.session_ttl_secs),
            },
            knowledge: KnowledgeLayer {
                file: self.knowledge.file.or(lower.knowledge.file),
            },
            assistant: AssistantLayer {
                strategy: self.assistant.strategy.or(lower.assistant.strategy),
            },
            generator: GeneratorLayer {
                endpoint: self.generator.endpoint.or(lower.generator.endpoint),
                timeout_secs: self.generator.timeout_secs.or(lower.generator.timeout_secs),
            },
        }
    }
}

impl From<ConfigLayer> for Config {
    fn from(layer: ConfigLayer) -> Self {
        let server = ServerSection::default();
        let generator = GeneratorSection::default();
        Config {
            server: ServerSection {
                host: layer.server.host.unwrap_or(server.host),
                port: layer.server.port,
                enable_cors: layer.server.enable_cors.unwrap_or(server.enable_cors),
                port_attempts: layer.server.port_attempts.unwrap_or(server.port_attempts),
                session_ttl_secs: layer
                    .server
                    .session_ttl_secs
                    .unwrap_or(server.session_ttl_secs),
            },
            knowledge: KnowledgeSection {
                file: layer.knowledge.file,
            },
            assistant: AssistantSection {
                strategy: layer.assistant.strategy.unwrap_or_default(),
            },
            generator: GeneratorSection {
                endpoint: layer.generator.endpoint,
                timeout_secs: layer.generator.timeout_secs.unwrap_or(generator.timeout_secs),
            },
        }
    }
}

pub const PROJECT_CONFIG_FILENAME: &str = ".lookaroun.toml";

/// Loads, merges, expands and validates the configuration for the current directory.
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config_from(&current_dir)
}

/// Same as [`load_config`], searching for the project file from `start_dir`.
pub fn load_config_from(start_dir: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(start_dir)?;
    let mut merged_config = merge_configs(user_config, project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "LookAroun", "lookaroun") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start_dir: &Path) -> Result<Option<ConfigLayer>> {
    if let Some(project_config_path) = find_project_config_path(start_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        let mut config = load_config_from_path(&project_config_path)?;
        // A relative knowledge path is relative to the file that names it.
        if let (Some(file), Some(parent)) =
            (config.knowledge.file.as_ref(), project_config_path.parent())
        {
            if !file.starts_with('~') && Path::new(file).is_relative() {
                config.knowledge.file = Some(parent.join(file).to_string_lossy().into_owned());
            }
        }
        Ok(Some(config))
    } else {
        debug!("No project configuration file (.lookaroun.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return None,
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Applies the project layer over the user layer, then fills in defaults.
fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> Config {
    let user = user.unwrap_or_default();
    let merged = match project {
        Some(project) => project.over(user),
        None => user,
    };
    Config::from(merged)
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(file) = config.knowledge.file.as_mut() {
        *file = shellexpand::tilde(file).into_owned();
        debug!("Expanded knowledge file path: {}", file);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if config.server.port_attempts == 0 {
        return Err(anyhow!(LookarounError::Config(
            "server.port_attempts must be at least 1.".to_string()
        )));
    }
    if let Some(file) = &config.knowledge.file {
        let path = Path::new(file);
        if !path.is_file() {
            return Err(anyhow!(LookarounError::Config(format!(
                "Configured knowledge file '{}' does not exist or is not a file.",
                path.display()
            ))));
        }
    }
    if let Some(endpoint) = &config.generator.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(anyhow!(LookarounError::Config(format!(
                "Generator endpoint '{}' must be an http:// or https:// URL.",
                endpoint
            ))));
        }
    }
    if !(1..=MAX_SESSION_TTL_SECS).contains(&config.server.session_ttl_secs) {
        return Err(anyhow!(LookarounError::Config(format!(
            "server.session_ttl_secs must be between 1 and {}.",
            MAX_SESSION_TTL_SECS
        ))));
    }
    if config.generator.timeout_secs == 0 {
        return Err(anyhow!(LookarounError::Config(
            "generator.timeout_secs must be greater than zero.".to_string()
        )));
    }
    if config.assistant.strategy == MatchStrategy::Legacy && config.generator.endpoint.is_none() {
        warn!("Legacy strategy selected without a generator endpoint; unmatched questions will fail.");
    }
    debug!("Configuration validation successful.");
    Ok(())
}
