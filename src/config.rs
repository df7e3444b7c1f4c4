// Configuration management for route-gateway
// Supports CLI arguments, config file (TOML), and environment variables

use crate::error::RouteError;
use crate::routes::Selection;
use crate::routes::parser::PROC_NET_ROUTE;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tracing::Level;

const DEFAULT_CONFIG_FILE: &str = "route-gateway.toml";

/// Print the interface and gateway of the default IPv4 route
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "route-gateway")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route table to read
    #[arg(short = 't', long, env = "RG_ROUTE_TABLE")]
    pub route_table: Option<PathBuf>,

    /// How the default route is chosen
    #[arg(short, long, value_enum, env = "RG_SELECTION")]
    pub selection: Option<Selection>,

    /// Output format
    #[arg(short, long, value_enum, env = "RG_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Print the whole route table instead of the default route
    #[arg(long, conflicts_with = "lookup")]
    pub table: bool,

    /// Print the route used for this destination
    #[arg(long, value_name = "IPV4")]
    pub lookup: Option<Ipv4Addr>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, env = "RG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "RG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Route table settings
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Route table path (default: /proc/net/route)
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,

    /// Default route selection strategy
    #[serde(default)]
    pub selection: Selection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_table_path() -> PathBuf {
    PathBuf::from(PROC_NET_ROUTE)
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        RoutesConfig {
            table_path: default_table_path(),
            selection: Selection::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// What the binary should print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DefaultRoute,
    Table,
    Lookup(Ipv4Addr),
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub table_path: PathBuf,
    pub selection: Selection,
    pub format: OutputFormat,
    pub log_level: Level,
    pub mode: Mode,
    /// Config file that was read, if any
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        let cli_args = CliArgs::parse();

        let config_path = locate_config_file(&cli_args);
        let config_file = match &config_path {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Self::merge(cli_args, config_file)?;
        config.config_path = config_path;
        Ok(config)
    }

    /// Merge parsed CLI args over a config file
    pub fn merge(cli_args: CliArgs, config_file: ConfigFile) -> Result<Self, RouteError> {
        let level = cli_args
            .log_level
            .unwrap_or(config_file.logging.level);

        let mode = match (cli_args.table, cli_args.lookup) {
            (_, Some(dest)) => Mode::Lookup(dest),
            (true, None) => Mode::Table,
            (false, None) => Mode::DefaultRoute,
        };

        Ok(Config {
            table_path: cli_args.route_table.unwrap_or(config_file.routes.table_path),
            selection: cli_args.selection.unwrap_or(config_file.routes.selection),
            format: cli_args.format.unwrap_or(config_file.output.format),
            log_level: parse_log_level(&level)?,
            mode,
            config_path: None,
        })
    }
}

/// Explicit `--config`, else `route-gateway.toml` in the working directory
pub fn locate_config_file(cli_args: &CliArgs) -> Option<PathBuf> {
    match &cli_args.config {
        Some(path) => Some(path.clone()),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            path.exists().then_some(path)
        }
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile, RouteError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RouteError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str::<ConfigFile>(&content)
        .map_err(|e| RouteError::Config(format!("{}: {}", path.display(), e)))
}

pub fn parse_log_level(level_str: &str) -> Result<Level, RouteError> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(RouteError::Config(format!("Invalid log level: {}", level_str))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::merge(CliArgs::default(), ConfigFile::default()).unwrap();
        assert_eq!(config.table_path, PathBuf::from("/proc/net/route"));
        assert_eq!(config.selection, Selection::LowestMetric);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.mode, Mode::DefaultRoute);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_locate_config_file() {
        let cli = CliArgs {
            config: Some(PathBuf::from("/etc/route-gateway.toml")),
            ..CliArgs::default()
        };
        assert_eq!(
            locate_config_file(&cli),
            Some(PathBuf::from("/etc/route-gateway.toml"))
        );

        let found = locate_config_file(&CliArgs::default());
        assert_eq!(found.is_some(), Path::new(DEFAULT_CONFIG_FILE).exists());
    }

    #[test]
    fn test_unreadable_config_file() {
        let err = load_config_file(Path::new("/nonexistent/route-gateway.toml")).unwrap_err();
        assert!(matches!(err, RouteError::Config(msg) if msg.contains("/nonexistent/route-gateway.toml")));
    }

    #[test]
    fn test_config_file_parsing() {
        let file: ConfigFile = toml::from_str(
            r#"
            [routes]
            table_path = "/tmp/route"
            selection = "first-entry"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(file.routes.table_path, PathBuf::from("/tmp/route"));
        assert_eq!(file.routes.selection, Selection::FirstEntry);
        assert_eq!(file.output.format, OutputFormat::Json);
        assert_eq!(file.logging.level, "warn");
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: ConfigFile = toml::from_str(
            "[routes]\nselection = \"first-entry\"\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let cli = CliArgs::try_parse_from([
            "route-gateway",
            "--selection",
            "lowest-metric",
            "--route-table",
            "/srv/route",
            "--lookup",
            "8.8.8.8",
        ])
        .unwrap();

        let config = Config::merge(cli, file).unwrap();
        assert_eq!(config.selection, Selection::LowestMetric);
        assert_eq!(config.table_path, PathBuf::from("/srv/route"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.mode, Mode::Lookup(Ipv4Addr::new(8, 8, 8, 8)));
    }

    #[test]
    fn test_table_conflicts_with_lookup() {
        assert!(CliArgs::try_parse_from(["route-gateway", "--table", "--lookup", "1.1.1.1"]).is_err());
        assert!(CliArgs::try_parse_from(["route-gateway", "--selection", "nearest"]).is_err());
    }

    #[test]
    fn test_invalid_selection_in_file() {
        assert!(toml::from_str::<ConfigFile>("[routes]\nselection = \"nearest\"\n").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("DEBUG"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("invalid"), Err(RouteError::Config(_))));

        let cli = CliArgs {
            log_level: Some("loud".to_string()),
            ..CliArgs::default()
        };
        assert!(Config::merge(cli, ConfigFile::default()).is_err());
    }
}
