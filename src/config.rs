// Process configuration: CLI flags layered over an optional TOML file.

use anyhow::Context;
use clap::Parser;
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;

const REDACTED: &str = "****";

/// collectd write_http to InfluxDB relay
#[derive(Parser, Debug)]
#[command(name = "collectd-proxy")]
#[command(about = "Relays collectd write_http JSON batches to the InfluxDB series API")]
#[command(version)]
pub struct Cli {
    /// TOML config file; flags given on the command line override its values
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Proxy http port [default: 8079]
    #[arg(long = "proxy_http_port")]
    pub proxy_http_port: Option<u16>,

    /// Proxy http address [default: 0.0.0.0]
    #[arg(long = "proxy_http_address")]
    pub proxy_http_address: Option<String>,

    /// InfluxDB host [default: localhost]
    #[arg(long = "influxdb_host")]
    pub influxdb_host: Option<String>,

    /// InfluxDB port [default: 8086]
    #[arg(long = "influxdb_port")]
    pub influxdb_port: Option<u16>,

    /// InfluxDB database (required)
    #[arg(long = "influxdb_db")]
    pub influxdb_db: Option<String>,

    /// InfluxDB user (required)
    #[arg(long = "influxdb_user")]
    pub influxdb_user: Option<String>,

    /// InfluxDB password (required)
    #[arg(long = "influxdb_password")]
    pub influxdb_password: Option<String>,

    /// Display metric names pushed into InfluxDB
    #[arg(long)]
    pub verbose: bool,

    /// Comma-separated list of allowed plugins, leave blank to allow all
    #[arg(long = "collectd_plugins", value_delimiter = ',')]
    pub collectd_plugins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub influxdb: InfluxDbConfig,
    pub collectd: CollectdConfig,
    /// Log every series name pushed to InfluxDB at INFO level.
    pub verbose: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Largest inbound batch accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8079,
            host: "0.0.0.0".into(),
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InfluxDbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for InfluxDbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 8086,
            database: String::new(),
            user: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectdConfig {
    /// Allowed plugin names; empty allows every plugin.
    pub plugins: Vec<String>,
}

impl AppConfig {
    /// Build the configuration from parsed flags, reading `--config` first when given.
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let s = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str::<AppConfig>(&s)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => AppConfig::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_cli(&mut self, cli: Cli) {
        if let Some(port) = cli.proxy_http_port {
            self.server.port = port;
        }
        if let Some(host) = cli.proxy_http_address {
            self.server.host = host;
        }
        if let Some(host) = cli.influxdb_host {
            self.influxdb.host = host;
        }
        if let Some(port) = cli.influxdb_port {
            self.influxdb.port = port;
        }
        if let Some(database) = cli.influxdb_db {
            self.influxdb.database = database;
        }
        if let Some(user) = cli.influxdb_user {
            self.influxdb.user = user;
        }
        if let Some(password) = cli.influxdb_password {
            self.influxdb.password = password;
        }
        if let Some(plugins) = cli.collectd_plugins {
            self.collectd.plugins = plugins;
        }
        self.verbose |= cli.verbose;
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.influxdb.database.is_empty(),
            "Missing param : influxdb_db"
        );
        anyhow::ensure!(!self.influxdb.user.is_empty(), "Missing param : influxdb_user");
        anyhow::ensure!(
            !self.influxdb.password.is_empty(),
            "Missing param : influxdb_password"
        );
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.server.max_body_bytes > 0,
            "server.max_body_bytes must be > 0, got {}",
            self.server.max_body_bytes
        );
        anyhow::ensure!(
            self.influxdb.port > 0,
            "influxdb.port must be between 1 and 65535, got {}",
            self.influxdb.port
        );
        anyhow::ensure!(
            !self.influxdb.host.is_empty(),
            "influxdb.host must be non-empty"
        );
        Ok(())
    }

    /// Full write URL: `http://host:port/db/<db>/series?u=<user>&p=<password>&time_precision=s`.
    pub fn influxdb_url(&self) -> anyhow::Result<Url> {
        self.build_influxdb_url(&self.influxdb.password)
    }

    /// Path and query of the write URL, as sent on the request line.
    pub fn influxdb_path(&self) -> anyhow::Result<String> {
        Ok(path_and_query(&self.influxdb_url()?))
    }

    /// Same as [`Self::influxdb_path`] with the password masked, for logging.
    pub fn influxdb_path_redacted(&self) -> anyhow::Result<String> {
        Ok(path_and_query(&self.build_influxdb_url(REDACTED)?))
    }

    fn build_influxdb_url(&self, password: &str) -> anyhow::Result<Url> {
        let base = format!("http://{}:{}/", self.influxdb.host, self.influxdb.port);
        let mut url =
            Url::parse(&base).with_context(|| format!("invalid influxdb address {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("influxdb address {base} cannot carry a path"))?
            .clear()
            .extend(["db", self.influxdb.database.as_str(), "series"]);
        url.query_pairs_mut()
            .append_pair("u", &self.influxdb.user)
            .append_pair("p", password)
            .append_pair("time_precision", "s");
        Ok(url)
    }
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
