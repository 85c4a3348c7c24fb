//! # Chat Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Resolves the network settings for `lookaroun serve`, combining:
//! 1. Command-line arguments, with `--port` falling back to the `PORT`
//!    environment variable (highest priority)
//! 2. The `[server]` section of the layered configuration files
//! 3. Default values: `127.0.0.1:8501`, CORS on, a single port attempt,
//!    sessions dropped after 30 idle minutes
//!
//! A `PORT` value that is not a valid port number is rejected by argument
//! parsing and stops the process before anything is bound.
//!
use super::super::AssistantArgs;
use crate::core::config::{Config, DEFAULT_SESSION_TTL_SECS};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, warn};

/// Port used when neither `--port`, `PORT` nor the config file sets one.
pub const DEFAULT_PORT: u16 = 8501;

/// # Serve Command Arguments (`ServeArgs`)
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on. Falls back to the PORT environment variable, then 8501.
    #[arg(long, short, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind. Use `0.0.0.0` to accept connections from other machines.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Disables Cross-Origin Resource Sharing (CORS) headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Number of consecutive ports to try if the first one is taken.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub port_attempts: Option<u8>,

    #[command(flatten)]
    pub assistant: AssistantArgs,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
    pub port_attempts: u8,
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            enable_cors: true,
            port_attempts: 1,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl ServerConfig {
    /// Merges the command-line arguments over the `[server]` config section.
    pub fn resolve(args: &ServeArgs, config: &Config) -> Self {
        let defaults = Self::default();

        let file_host = match config.server.host.parse::<IpAddr>() {
            Ok(host) => host,
            Err(e) => {
                warn!(
                    "Invalid host IP '{}' in config file ({}), using default {}",
                    config.server.host, e, defaults.host
                );
                defaults.host
            }
        };

        let resolved = Self {
            host: args.host.unwrap_or(file_host),
            port: args.port.or(config.server.port).unwrap_or(defaults.port),
            enable_cors: !args.no_cors && config.server.enable_cors,
            port_attempts: args.port_attempts.unwrap_or(config.server.port_attempts),
            session_ttl_secs: config.server.session_ttl_secs,
        };
        debug!("Resolved server configuration: {:?}", resolved);
        resolved
    }
}
