use clap::Parser;
use climate_archive_core::{find_config_file, load_config, ConfigSource, DEFAULT_API_PORT};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate Archive - read-only JSON API over the Hawaii historical weather dataset"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_ARCHIVE_CONFIG, ./archive.toml,
    /// $XDG_CONFIG_HOME/climate-archive/archive.toml, /etc/climate-archive/archive.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_ARCHIVE_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "CLIMATE_ARCHIVE_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_ARCHIVE_PORT")]
    pub port: Option<String>,

    /// Path to the sqlite file holding the measurement and station tables
    /// Populated by the external data-loading pipeline; opened read-only
    #[arg(long, env = "CLIMATE_ARCHIVE_DB")]
    pub database: Option<String>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| "./hawaii.sqlite".to_string())
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    // Determine config file path
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("CLIMATE_ARCHIVE_CONFIG", "archive.toml")
    };

    // Log where we're loading config from
    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    // Load from config file
    let file_config: Cli = load_config(&source).unwrap_or_default();

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        domain: cli_args.domain.or(file_config.domain),
        port: cli_args.port.or(file_config.port),
        database: cli_args.database.or(file_config.database),
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc().format(&Iso8601::DEFAULT).unwrap(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
