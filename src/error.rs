// Error types for the translate and forward stages

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("malformed collectd batch: {0}")]
    Parse(#[from] serde_json::Error),

    /// `dstypes`, `dsnames` and `values` must describe the same statistics.
    #[error(
        "sample group for plugin {plugin:?} has {dstypes} dstypes, {dsnames} dsnames and {values} values"
    )]
    LengthMismatch {
        plugin: String,
        dstypes: usize,
        dsnames: usize,
        values: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("problem with request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request refused by influxdb: non-success status {status}")]
    Rejected { status: StatusCode },
}
