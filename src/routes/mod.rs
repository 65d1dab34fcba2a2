// HTTP intake: every method and path lands on the collectd handler

mod intake;

use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::forwarder::InfluxForwarder;
use crate::translate::Translator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) translator: Arc<Translator>,
    pub(crate) forwarder: InfluxForwarder,
}

pub fn app(config: &AppConfig, forwarder: InfluxForwarder) -> Router {
    let state = AppState {
        translator: Arc::new(Translator::from_config(config)),
        forwarder,
    };
    Router::new()
        .fallback(intake::collectd_handler) // ANY /*
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .with_state(state)
}
