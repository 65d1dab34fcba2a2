// Shared test helpers
#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use bytes::Bytes;
use collectd_proxy::config::AppConfig;
use collectd_proxy::models::{DataSourceType, SampleGroup};
use serde_json::Number;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::Duration;

pub fn num(v: f64) -> Number {
    Number::from_f64(v).unwrap()
}

pub fn sample_group(plugin: &str, plugin_instance: &str, type_: &str, type_instance: &str) -> SampleGroup {
    SampleGroup {
        host: "web01.example.com".into(),
        plugin: plugin.into(),
        plugin_instance: plugin_instance.into(),
        type_: type_.into(),
        type_instance: type_instance.into(),
        dstypes: vec![DataSourceType::Gauge],
        dsnames: vec!["value".into()],
        values: vec![Number::from(1u64)],
        time: 1000,
    }
}

/// One cpu idle gauge from web01, as collectd write_http posts it.
pub const CPU_IDLE_BATCH: &str = r#"[
  {
    "values": [97.5],
    "dstypes": ["gauge"],
    "dsnames": ["value"],
    "time": 1000,
    "interval": 10.000,
    "host": "web01.example.com",
    "plugin": "cpu",
    "plugin_instance": "0",
    "type": "cpu",
    "type_instance": "idle"
  }
]"#;

pub fn test_config(influx_addr: SocketAddr, extra: &str) -> AppConfig {
    let toml = format!(
        r#"
{extra}

[server]
port = 8079
host = "127.0.0.1"

[influxdb]
host = "{}"
port = {}
database = "metrics"
user = "collectd"
password = "secret"
"#,
        influx_addr.ip(),
        influx_addr.port()
    );
    AppConfig::load_from_str(&toml).unwrap()
}

/// One request as seen by the InfluxDB stand-in.
#[derive(Debug)]
pub struct CapturedWrite {
    pub path_and_query: String,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct StubState {
    tx: mpsc::UnboundedSender<CapturedWrite>,
    status: StatusCode,
    delay: Duration,
}

async fn capture(State(stub): State<StubState>, uri: Uri, body: Bytes) -> StatusCode {
    tokio::time::sleep(stub.delay).await;
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    let path_and_query = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let _ = stub.tx.send(CapturedWrite {
        path_and_query,
        body,
    });
    stub.status
}

/// Serves a fake InfluxDB on an ephemeral port that records every write, answering
/// with `status` after `delay`.
pub async fn spawn_influx_stub(
    status: StatusCode,
    delay: Duration,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedWrite>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .fallback(capture)
        .with_state(StubState { tx, status, delay });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, rx)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub async fn next_write(rx: &mut mpsc::UnboundedReceiver<CapturedWrite>) -> CapturedWrite {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for influxdb write")
        .expect("stub closed")
}

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Routes tracing events on this thread into a buffer until the guard is dropped.
pub fn capture_logs(level: tracing::Level) -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}
