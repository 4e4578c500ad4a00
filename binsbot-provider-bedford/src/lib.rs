//! Provider implementation for Bedford Borough Council using the Bartec collections API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono_tz::{Europe::London, Tz};
use reqwest::{Client, header};
use tracing::debug;

use binsbot_core::{
    model::{Collection, Uprn},
    normalize::Normalizer,
    ports::{BinsError, CollectionPort},
    service::BinsService,
};

/// Endpoint the UPRN is appended to.
pub const BASE_URL: &str =
    "https://bbaz-as-prod-bartecapi.azurewebsites.net/api/bincollections/residential/getbyuprn/";
/// Identifies the bot to the council.
pub const USER_AGENT: &str = "BinsBot/0.1";
/// Ceiling on a single request, whatever deadline the caller sets.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for talking to the Bedford API.
#[derive(Debug, Clone)]
pub struct BedfordConfig {
    /// Prefix the decimal UPRN is appended to.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Civil timezone of the council's timestamps.
    pub timezone: Tz,
}

impl Default for BedfordConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            timeout: REQUEST_TIMEOUT,
            timezone: London,
        }
    }
}

/// Collection schedule lookups for Bedford.
pub struct BedfordSchedulePort {
    client: Client,
    config: BedfordConfig,
    normalizer: Normalizer,
}

impl BedfordSchedulePort {
    /// Create a new schedule port bound to the given HTTP client with default settings.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_config(client, BedfordConfig::default())
    }

    /// Create a new schedule port bound to the given HTTP client and settings.
    #[must_use]
    pub fn with_config(client: Client, config: BedfordConfig) -> Self {
        let normalizer = Normalizer::new(config.timezone);
        Self {
            client,
            config,
            normalizer,
        }
    }

    /// URL holding the schedule for `uprn`.
    #[must_use]
    pub fn url(&self, uprn: Uprn) -> String {
        format!("{}{uprn}", self.config.base_url)
    }

    /// Download the raw schedule payload for a property.
    ///
    /// # Errors
    ///
    /// Returns [`BinsError::Transport`] when the request cannot be sent, times
    /// out, or gets a non-success status, and [`BinsError::Read`] when the body
    /// cannot be read.
    pub async fn fetch(&self, uprn: Uprn) -> Result<Vec<u8>, BinsError> {
        let url = self.url(uprn);
        debug!(%url, "fetching schedule");

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(BinsError::Transport)?
            .error_for_status()
            .map_err(BinsError::Transport)?;

        let body = response.bytes().await.map_err(BinsError::Read)?;
        debug!(bytes = body.len(), "schedule received");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CollectionPort for BedfordSchedulePort {
    async fn collections(&self, uprn: Uprn) -> Result<Vec<Collection>, BinsError> {
        let body = self.fetch(uprn).await?;
        self.normalizer.normalize(&body)
    }
}

/// Build a service backed by the Bedford provider.
#[must_use]
pub fn service(client: Client, config: BedfordConfig) -> BinsService {
    BinsService::new(Arc::new(BedfordSchedulePort::with_config(client, config)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use httpmock::prelude::*;

    use super::*;
    use binsbot_core::model::BinType;

    const FIXTURE: &str = include_str!("../tests/fixtures/bedford_collections.json");
    const UPRN: Uprn = Uprn(100_080_022_975);

    fn port_for(server: &MockServer, timeout: Duration) -> BedfordSchedulePort {
        let config = BedfordConfig {
            base_url: server.url("/getbyuprn/"),
            timeout,
            ..BedfordConfig::default()
        };
        BedfordSchedulePort::with_config(Client::new(), config)
    }

    #[test]
    fn default_url_appends_the_uprn() {
        let port = BedfordSchedulePort::new(Client::new());
        assert_eq!(
            port.url(UPRN),
            "https://bbaz-as-prod-bartecapi.azurewebsites.net/api/bincollections/residential/getbyuprn/100080022975",
            "decimal uprn appended"
        );
    }

    #[tokio::test]
    async fn fetch_sends_user_agent_and_returns_body() {
        // Arrange
        let server = MockServer::start_async().await;
        let schedule_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/getbyuprn/100080022975")
                    .header("user-agent", USER_AGENT);
                then.status(200).body(FIXTURE);
            })
            .await;
        let port = port_for(&server, REQUEST_TIMEOUT);

        // Act
        let body = port.fetch(UPRN).await.expect("fetch succeeds");

        // Assert
        assert_eq!(body, FIXTURE.as_bytes(), "raw body returned");
        schedule_mock.assert_async().await;
    }

    #[tokio::test]
    async fn collections_are_normalized_end_to_end() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/getbyuprn/100080022975");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(FIXTURE);
            })
            .await;
        let service = service(
            Client::new(),
            BedfordConfig {
                base_url: server.url("/getbyuprn/"),
                ..BedfordConfig::default()
            },
        );

        let collections = service.collections(UPRN).await.expect("schedule loads");

        assert_eq!(collections.len(), 11, "one per job-group");
        let second = collections.get(1).expect("second collection");
        assert_eq!(
            second.start,
            London
                .with_ymd_and_hms(2020, 11, 25, 0, 0, 0)
                .single()
                .expect("valid local date"),
            "shared visit date"
        );
        assert_eq!(second.bin_types, vec![BinType::Green, BinType::Orange], "both bins");
    }

    #[tokio::test]
    async fn bad_status_is_a_transport_error() {
        let server = MockServer::start_async().await;
        let schedule_mock = server
            .mock_async(|when, then| {
                when.path("/getbyuprn/100080022975");
                then.status(503);
            })
            .await;
        let port = port_for(&server, REQUEST_TIMEOUT);

        let result = port.collections(UPRN).await;

        assert!(
            matches!(result, Err(BinsError::Transport(_))),
            "expected transport error, got {result:?}"
        );
        schedule_mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/getbyuprn/100080022975");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;
        let port = port_for(&server, REQUEST_TIMEOUT);

        let result = port.collections(UPRN).await;

        assert!(
            matches!(result, Err(BinsError::Decode(_))),
            "expected decode error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn slow_server_hits_the_request_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/getbyuprn/100080022975");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .body(FIXTURE);
            })
            .await;
        let port = port_for(&server, Duration::from_millis(100));

        let result = port.fetch(UPRN).await;

        assert!(
            matches!(&result, Err(BinsError::Transport(err)) if err.is_timeout()),
            "expected request timeout, got {result:?}"
        );
    }

    #[tokio::test]
    async fn caller_deadline_can_be_shorter_than_request_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/getbyuprn/100080022975");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .body(FIXTURE);
            })
            .await;
        let service = BinsService::new(Arc::new(port_for(&server, REQUEST_TIMEOUT)));

        let result = service
            .collections_within(UPRN, Duration::from_millis(100))
            .await;

        assert!(
            matches!(result, Err(BinsError::Timeout(_))),
            "expected deadline to elapse, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let config = BedfordConfig {
            base_url: "http://test.invalid/".to_owned(),
            ..BedfordConfig::default()
        };
        let port = BedfordSchedulePort::with_config(Client::new(), config);

        let result = port.fetch(UPRN).await;

        assert!(
            matches!(result, Err(BinsError::Transport(_))),
            "expected transport error, got {result:?}"
        );
    }
}
