use async_trait::async_trait;
use guardian_common::types::{Metric, MetricPayload, MetricSet, MetricValue, POLL_COUNT};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Errors surfaced by a [`MetricSender`].
///
/// Metrics sent before the failing one are not rolled back; the caller only
/// learns that the batch as a whole did not go through.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The request could not be delivered (connect, timeout, I/O).
    #[error("failed to send metric '{name}': {source}")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server rejected metric '{name}' with status {status}")]
    Status { name: String, status: StatusCode },
}

/// Delivers a batch of named measurements to the server.
#[async_trait]
pub trait MetricSender: Send + Sync {
    /// Sends every entry as its own request, stopping at the first failure.
    async fn send_metrics(&self, metrics: &MetricSet) -> Result<(), SendError>;
}

/// Wire shape of update requests, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// `POST /update/{kind}/{name}/{value}`
    #[default]
    Path,
    /// `POST /update/` with a JSON body
    Json,
}

/// Decides the kind of an agent measurement from its name alone:
/// `PollCount` is a counter, everything else a gauge.
pub fn classify(name: &str, value: f64) -> Metric {
    if name == POLL_COUNT {
        Metric::counter(name, value as i64)
    } else {
        Metric::gauge(name, value)
    }
}

pub struct HttpSender {
    client: reqwest::Client,
    base_url: String,
    format: WireFormat,
}

impl HttpSender {
    pub fn new(base_url: &str, format: WireFormat, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            format,
        })
    }

    fn request(&self, metric: &Metric) -> reqwest::RequestBuilder {
        match self.format {
            WireFormat::Path => {
                let value = match metric.value {
                    MetricValue::Gauge(v) => v.to_string(),
                    MetricValue::Counter(d) => d.to_string(),
                };
                let url = format!(
                    "{}/update/{}/{}/{}",
                    self.base_url,
                    metric.kind(),
                    metric.name,
                    value
                );
                self.client.post(url).header(CONTENT_TYPE, "text/plain")
            }
            WireFormat::Json => self
                .client
                .post(format!("{}/update/", self.base_url))
                .json(&MetricPayload::from(metric)),
        }
    }
}

#[async_trait]
impl MetricSender for HttpSender {
    async fn send_metrics(&self, metrics: &MetricSet) -> Result<(), SendError> {
        for (name, value) in metrics {
            let metric = classify(name, *value);
            let resp = self
                .request(&metric)
                .send()
                .await
                .map_err(|source| SendError::Transport {
                    name: name.clone(),
                    source,
                })?;

            let status = resp.status();
            if status != StatusCode::OK {
                return Err(SendError::Status {
                    name: name.clone(),
                    status,
                });
            }
        }

        tracing::trace!(count = metrics.len(), "Batch delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn metrics(entries: &[(&str, f64)]) -> MetricSet {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sender(url: &str, format: WireFormat) -> HttpSender {
        HttpSender::new(url, format, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn classify_only_poll_count_as_counter() {
        assert_eq!(classify("PollCount", 7.0), Metric::counter("PollCount", 7));
        assert_eq!(classify("Alloc", 7.5), Metric::gauge("Alloc", 7.5));
        assert_eq!(classify("RandomValue", 3.0), Metric::gauge("RandomValue", 3.0));
    }

    #[tokio::test]
    async fn path_format_encodes_kind_name_and_value() {
        let mut server = mockito::Server::new_async().await;
        let gauge = server
            .mock("POST", "/update/gauge/Alloc/1.5")
            .match_header("content-type", "text/plain")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;
        let counter = server
            .mock("POST", "/update/counter/PollCount/3")
            .with_status(200)
            .create_async()
            .await;

        let result = sender(&server.url(), WireFormat::Path)
            .send_metrics(&metrics(&[("Alloc", 1.5), ("PollCount", 3.0)]))
            .await;

        assert!(result.is_ok());
        gauge.assert_async().await;
        counter.assert_async().await;
    }

    #[tokio::test]
    async fn json_format_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/update/")
            .match_body(Matcher::Json(
                json!({"id": "PollCount", "type": "counter", "delta": 3}),
            ))
            .with_status(200)
            .create_async()
            .await;

        let result = sender(&server.url(), WireFormat::Json)
            .send_metrics(&metrics(&[("PollCount", 3.0)]))
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn first_rejection_aborts_the_batch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let result = sender(&server.url(), WireFormat::Path)
            .send_metrics(&metrics(&[("A", 1.0), ("B", 2.0), ("C", 3.0)]))
            .await;

        assert!(matches!(
            result,
            Err(SendError::Status { status, .. }) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let result = sender("http://127.0.0.1:1", WireFormat::Path)
            .send_metrics(&metrics(&[("Alloc", 1.0)]))
            .await;

        assert!(matches!(result, Err(SendError::Transport { .. })));
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let result = sender("http://127.0.0.1:1", WireFormat::Json)
            .send_metrics(&MetricSet::new())
            .await;

        assert!(result.is_ok());
    }
}
