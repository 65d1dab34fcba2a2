// Batch translation: collectd sample groups -> InfluxDB series points

use crate::config::AppConfig;
use crate::error::TranslateError;
use crate::filter::PluginFilter;
use crate::models::{OutputRecord, SampleGroup};
use crate::naming::{metric_base_name, series_name, short_hostname};

/// Parses a write_http body. The whole batch is rejected if any group is malformed.
pub fn parse_batch(body: &[u8]) -> Result<Vec<SampleGroup>, TranslateError> {
    let batch: Vec<SampleGroup> = serde_json::from_slice(body)?;
    for group in &batch {
        group.validate()?;
    }
    Ok(batch)
}

/// Immutable translation settings, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    filter: PluginFilter,
    verbose: bool,
}

impl Translator {
    pub fn new(filter: PluginFilter, verbose: bool) -> Self {
        Self { filter, verbose }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(PluginFilter::new(&config.collectd.plugins), config.verbose)
    }

    /// Expands every allowed group into one record per supported statistic.
    /// Output order follows batch order, then statistic order within a group.
    pub fn translate(&self, batch: &[SampleGroup]) -> Vec<OutputRecord> {
        let mut output = Vec::new();
        for group in batch {
            if !self.filter.is_allowed(&group.plugin) {
                continue;
            }
            let hostname = short_hostname(&group.host);
            let base = metric_base_name(group);

            let stats = group
                .dstypes
                .iter()
                .zip(&group.dsnames)
                .zip(&group.values);
            for ((dstype, dsname), value) in stats {
                if !dstype.is_supported() {
                    continue;
                }
                let name = series_name(&base, dsname);
                if self.verbose {
                    tracing::info!(metric = %name, "Push metric");
                } else {
                    tracing::trace!(metric = %name, "Push metric");
                }
                output.push(OutputRecord {
                    name,
                    time: group.time,
                    value: value.clone(),
                    hostname: hostname.to_string(),
                });
            }
        }
        output
    }
}
