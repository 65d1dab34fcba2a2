// InfluxDB series writer

use crate::config::AppConfig;
use crate::error::ForwardError;
use crate::models::OutputRecord;
use crate::version::user_agent;
use reqwest::{Client, Url};

/// Posts translated batches to the InfluxDB series endpoint. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct InfluxForwarder {
    client: Client,
    url: Url,
}

impl InfluxForwarder {
    pub fn new(url: Url) -> Result<Self, ForwardError> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self { client, url })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.influxdb_url()?)?)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// One POST per call, empty batches included. Only 2xx counts as success; nothing is retried.
    pub async fn forward(&self, records: &[OutputRecord]) -> Result<(), ForwardError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(records)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Rejected { status });
        }
        Ok(())
    }

    /// Like [`Self::forward`], with the outcome routed to the log instead of the caller.
    pub async fn forward_and_log(&self, records: &[OutputRecord]) {
        match self.forward(records).await {
            Ok(()) => tracing::debug!(
                operation = "forward",
                records_count = records.len(),
                "Batch written to influxdb"
            ),
            Err(ForwardError::Rejected { status }) => tracing::error!(
                operation = "forward",
                status = status.as_u16(),
                records_count = records.len(),
                "Request refused by influxdb: non-success status"
            ),
            Err(e) => tracing::error!(
                operation = "forward",
                error = %e,
                records_count = records.len(),
                "Request to influxdb failed"
            ),
        }
    }
}
