// write_http intake handler

use axum::{
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use bytes::Bytes;

use super::AppState;
use crate::translate::parse_batch;

/// Acknowledges as soon as the body is buffered; parse, translate and forward run detached.
/// Bodies over `server.max_body_bytes` are dropped but still answered with 200.
pub(super) async fn collectd_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    match body {
        Ok(body) => {
            tokio::spawn(relay_batch(state, body));
        }
        Err(e) => tracing::warn!(
            error = %e,
            operation = "read_body",
            "Dropping collectd batch"
        ),
    }
    StatusCode::OK
}

async fn relay_batch(state: AppState, body: Bytes) {
    let batch = match parse_batch(&body) {
        Ok(batch) => batch,
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "parse_batch",
                body_bytes = body.len(),
                "Dropping collectd batch"
            );
            return;
        }
    };
    let records = state.translator.translate(&batch);
    tracing::debug!(
        operation = "translate",
        groups_count = batch.len(),
        records_count = records.len(),
        "Batch translated"
    );
    state.forwarder.forward_and_log(&records).await;
}
