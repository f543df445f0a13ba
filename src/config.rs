use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Name of the configuration file looked up in the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Name of the database file used when no URL is configured
pub const DEFAULT_DATABASE_FILE: &str = "blog.db";

/// Output format of the server logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Configuration for the blog server and admin tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Directory holding uploaded post images
    pub media_root: PathBuf,
    /// Public prefix under which media files are served
    pub media_url: String,
    /// Directory holding stylesheets
    pub static_root: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Directory for daily rolling log files, if any
    pub log_dir: Option<PathBuf>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub media_root: Option<PathBuf>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub static_root: Option<PathBuf>,
    #[serde(default)]
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "blog-server", about = "Serves the blog")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[clap(long, env = "BLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "BLOG_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "BLOG_PORT")]
    pub port: Option<u16>,

    /// Directory holding uploaded media
    #[clap(long, env = "BLOG_MEDIA_ROOT")]
    pub media_root: Option<PathBuf>,

    /// Public prefix of media URLs
    #[clap(long, env = "BLOG_MEDIA_URL")]
    pub media_url: Option<String>,

    /// Directory holding static assets
    #[clap(long, env = "BLOG_STATIC_ROOT")]
    pub static_root: Option<PathBuf>,

    /// Log output format
    #[clap(long, env = "BLOG_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Directory for rolling log files
    #[clap(long, env = "BLOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            media_root: update.media_root.unwrap_or(self.media_root),
            media_url: update.media_url.unwrap_or(self.media_url),
            static_root: update.static_root.unwrap_or(self.static_root),
            log_format: update.log_format.unwrap_or(self.log_format),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// Returns the `host:port` pair the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the base (default) configuration
///
/// When a config directory is known the database file lives inside it.
pub fn base_config(config_dir: Option<&Path>) -> Config {
    let database_url = config_dir.map_or(DEFAULT_DATABASE_FILE.to_string(), |path| {
        path.join(DEFAULT_DATABASE_FILE).to_string_lossy().to_string()
    });

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 8000,
        media_root: PathBuf::from("media"),
        media_url: "/media/".to_string(),
        static_root: PathBuf::from("static"),
        log_format: LogFormat::Pretty,
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing file yields an empty update.
pub fn config_from_file(config_path: Option<&Path>) -> Result<ConfigUpdate> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;
    let update = toml::from_str::<ConfigUpdate>(&content)
        .with_context(|| format!("Failed to parse config file {:?}", config_path))?;
    info!("Loaded configuration from {:?}", config_path);
    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        host: args.host,
        port: args.port,
        media_root: args.media_root,
        media_url: args.media_url,
        static_root: args.static_root,
        log_format: args.log_format,
        log_dir: args.log_dir,
    }
}

/// Returns the platform config directory if it exists on disk
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "blog", "blog") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if path.exists() {
        Some(path)
    } else {
        info!("Config path not found at {:?}, using defaults", path);
        None
    }
}

/// Combines defaults, a config file and explicit overrides, in order of
/// increasing precedence
///
/// Without an explicit `config_file` the file is looked up as `config.toml`
/// in the platform config directory.
pub fn load_config(config_file: Option<PathBuf>, overrides: ConfigUpdate) -> Config {
    let config_dir = get_config_dir_path();
    let config_file = config_file.or_else(|| config_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME)));

    let file_update = config_from_file(config_file.as_deref()).unwrap_or_else(|e| {
        warn!("{:#}", e);
        ConfigUpdate::default()
    });

    let config = base_config(config_dir.as_deref())
        .apply_update(file_update)
        .apply_update(overrides);

    info!(
        "Final configuration: database_url={}, bind={}, media_root={:?}, static_root={:?}",
        config.database_url,
        config.bind_address(),
        config.media_root,
        config.static_root
    );

    config
}

/// Gets the complete server configuration from defaults, the config file,
/// environment variables and command line arguments
pub fn get_config(mut args: CliArgs) -> Config {
    let config_file = args.config.take();
    load_config(config_file, config_from_args(args))
}
