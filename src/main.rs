use anyhow::Result;
use clap::{CommandFactory, Parser};
use collectd_proxy::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Prints the configuration error followed by the flag reference, then exits non-zero.
fn usage(err: &anyhow::Error) -> ! {
    println!("{err:#}");
    let _ = config::Cli::command().print_help();
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = match config::AppConfig::from_cli(config::Cli::parse()) {
        Ok(c) => c,
        Err(e) => usage(&e),
    };

    let forwarder = forwarder::InfluxForwarder::from_config(&app_config)?;
    let influxdb_path = app_config.influxdb_path_redacted()?;
    tracing::info!(
        host = %app_config.influxdb.host,
        port = app_config.influxdb.port,
        path = %influxdb_path,
        "Influx db config"
    );
    if !app_config.collectd.plugins.is_empty() {
        tracing::info!(plugins = ?app_config.collectd.plugins, "Plugin allow-list");
    }

    let app = routes::app(&app_config, forwarder);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "{} {} proxy started on http://{}",
        version::NAME,
        version::VERSION,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Received shutdown signal");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
