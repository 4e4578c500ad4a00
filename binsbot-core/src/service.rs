//! High-level service facade used by clients.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::timeout;
use tracing::debug;

use crate::model::{Collection, Uprn};
use crate::ports::{BinsError, CollectionPort};

/// Public entry point for looking up collection schedules.
///
/// Dropping any returned future aborts the request in flight.
pub struct BinsService {
    port: Arc<dyn CollectionPort>,
}

impl BinsService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(port: Arc<dyn CollectionPort>) -> Self {
        Self { port }
    }

    /// Load every collection upstream knows about for a property, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns a [`BinsError`] if the request fails or the payload cannot be decoded.
    pub async fn collections(&self, uprn: Uprn) -> Result<Vec<Collection>, BinsError> {
        self.port.collections(uprn).await
    }

    /// Like [`BinsService::collections`], giving up once `deadline` has elapsed.
    ///
    /// The backend's own request timeout still applies; whichever is shorter wins.
    ///
    /// # Errors
    ///
    /// Returns [`BinsError::Timeout`] when the deadline elapses, otherwise any
    /// error of [`BinsService::collections`].
    pub async fn collections_within(
        &self,
        uprn: Uprn,
        deadline: Duration,
    ) -> Result<Vec<Collection>, BinsError> {
        timeout(deadline, self.port.collections(uprn))
            .await
            .map_err(|_elapsed| {
                debug!(%uprn, ?deadline, "deadline elapsed");
                BinsError::Timeout(deadline)
            })?
    }

    /// Next collection happening on or after `today`.
    ///
    /// # Errors
    ///
    /// Returns a [`BinsError`] if the schedule cannot be loaded.
    pub async fn next_collection(
        &self,
        uprn: Uprn,
        today: NaiveDate,
    ) -> Result<Option<Collection>, BinsError> {
        let collections = self.collections(uprn).await?;
        Ok(first_on_or_after(&collections, today).cloned())
    }
}

/// First dated collection whose local day is not before `today`.
///
/// Upstream order is trusted; unscheduled collections are skipped.
#[must_use]
pub fn first_on_or_after(collections: &[Collection], today: NaiveDate) -> Option<&Collection> {
    collections.iter().find(|collection| {
        !collection.is_unscheduled() && collection.start.date_naive() >= today
    })
}
