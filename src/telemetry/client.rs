//! The http sender.
//!
use std::time::Instant;
use log::*;
use anyhow::{anyhow, Context, Result};
use reqwest::{header::{AUTHORIZATION, CONTENT_TYPE}, StatusCode};
use crate::telemetry::{Telemetry, TelemetryConfig};

/// Posts telemetry snapshots to the collection endpoint.
///
/// Holds no state besides its configuration, so it can be shared between reporters
/// or created per report.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    config: TelemetryConfig,
    client: reqwest::blocking::Client,
}

impl TelemetryClient {
    pub fn new(
        config: TelemetryConfig,
    ) -> Result<Self>
    {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .with_context(|| "Error creating telemetry http client")?;
        Ok(TelemetryClient { config, client })
    }
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
    /// The base url with the `/pings` or `/dev` suffix for this snapshot.
    pub fn endpoint_url(
        &self,
        telemetry: &Telemetry,
    ) -> String
    {
        format!("{}{}", self.config.url.trim_end_matches('/'), telemetry.endpoint_suffix())
    }
    /// Report the snapshot in a single attempt.
    ///
    /// Only `201 Created` is success. For any other status the error message is the response body.
    /// Transport errors keep the [reqwest::Error] as source, use `downcast_ref` to inspect them.
    /// The response is consumed by reading the body, so it is released once on every path.
    pub fn post(
        &self,
        telemetry: &Telemetry,
    ) -> Result<()>
    {
        let timer = Instant::now();
        let data = telemetry.to_json()?;
        let url = self.endpoint_url(telemetry);
        debug!("Telemetry post to: {}", url);

        let response = self.client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.config.auth_token.as_str())
            .body(data)
            .send()
            .with_context(|| format!("Error sending telemetry to: {}", url))?;

        let status = response.status();
        let body = response.text()
            .with_context(|| format!("Error reading telemetry response body from: {}", url))?;
        if status != StatusCode::CREATED {
            debug!("Telemetry non success response: {} = {}", url, status);
            return Err(anyhow!(body));
        }
        debug!("Telemetry response status: {}", status);
        debug!("Telemetry response body: {}", body);
        info!("Telemetry posted: {:?}", timer.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(url: &str) -> TelemetryClient {
        TelemetryClient::new(TelemetryConfig {
            url: url.to_string(),
            auth_token: "token".to_string(),
            timeout: Duration::from_secs(1),
        }).unwrap()
    }

    #[test]
    fn unit_endpoint_url() {
        let mut telemetry = Telemetry { version: "v24.0.0".to_string(), ..Default::default() };
        let client = client("https://collector.local/3.0/projects/p1/events");
        assert_eq!(client.endpoint_url(&telemetry), "https://collector.local/3.0/projects/p1/events/pings");
        telemetry.version = "dev".to_string();
        assert_eq!(client.endpoint_url(&telemetry), "https://collector.local/3.0/projects/p1/events/dev");
    }

    #[test]
    fn unit_endpoint_url_trailing_slash() {
        let telemetry = Telemetry { version: "dev".to_string(), ..Default::default() };
        let client = client("https://collector.local/events/");
        assert_eq!(client.endpoint_url(&telemetry), "https://collector.local/events/dev");
    }

    #[test]
    fn unit_invalid_auth_token_is_an_error() {
        let telemetry = Telemetry { cid: "x".to_string(), ..Default::default() };
        let client = TelemetryClient::new(TelemetryConfig {
            url: "http://127.0.0.1:9/events".to_string(),
            auth_token: "line\nbreak".to_string(),
            timeout: Duration::from_secs(1),
        }).unwrap();
        assert!(client.post(&telemetry).is_err());
    }
}
