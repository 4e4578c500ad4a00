//! Turns the job-oriented upstream payload into [`Collection`] values.
//!
//! Upstream sends one entry per physical job, already grouped into visits:
//!
//! ```json
//! { "BinCollections": [[ { "BinType": "Black bin", "JobScheduledStart": "2020-11-18T00:00:00" } ]] }
//! ```

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::model::{BinType, Collection};
use crate::ports::BinsError;

// Optional fractional seconds are tolerated.
const SCHEDULE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NULL_LITERAL: &str = "null";

/// Top-level response from `getbyuprn/{uprn}`
#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(rename = "BinCollections", default)]
    bin_collections: Option<Vec<JobGroup>>,
    // BinCollectionDays, CalendarUrl, ... are not needed
}

/// Jobs handled during one visit.
type JobGroup = Vec<JobEntry>;

/// Single collection job.
#[derive(Debug, Deserialize)]
struct JobEntry {
    #[serde(rename = "BinType", default)]
    bin_type: Option<String>,
    #[serde(rename = "JobScheduledStart", default)]
    scheduled_start: Option<String>,
}

/// Decodes schedule payloads in a fixed civil timezone.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    tz: Tz,
}

impl Normalizer {
    /// Create a normalizer interpreting offset-less timestamps in `tz`.
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Timezone used for scheduled starts.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Decode a raw response body into one [`Collection`] per job-group.
    ///
    /// Groups keep their upstream order. Unknown bin labels are skipped and
    /// missing dates become [`Collection::unscheduled_start`].
    ///
    /// # Errors
    ///
    /// Returns [`BinsError::Decode`] for malformed JSON and
    /// [`BinsError::Timestamp`] for an unparsable scheduled start.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<Collection>, BinsError> {
        let response: ScheduleResponse = serde_json::from_slice(body)?;
        let groups = response.bin_collections.unwrap_or_default();

        let collections = groups
            .iter()
            .map(|group| self.collection(group))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(collections = collections.len(), "normalized schedule");
        Ok(collections)
    }

    fn collection(&self, group: &[JobEntry]) -> Result<Collection, BinsError> {
        // Every start must parse; jobs share a visit so the first one dates it.
        let starts = group
            .iter()
            .map(|job| self.parse_start(job.scheduled_start.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        let start = starts
            .first()
            .copied()
            .unwrap_or_else(|| Collection::unscheduled_start(self.tz));

        let bin_types = group
            .iter()
            .filter_map(|job| {
                let label = job.bin_type.as_deref().unwrap_or_default();
                let bin = BinType::from_label(label);
                if bin.is_none() {
                    trace!(label, "skipping unknown bin type");
                }
                bin
            })
            .collect();

        Ok(Collection { start, bin_types })
    }

    fn parse_start(&self, raw: Option<&str>) -> Result<DateTime<Tz>, BinsError> {
        let Some(value) = raw.filter(|value| *value != NULL_LITERAL) else {
            return Ok(Collection::unscheduled_start(self.tz));
        };

        let naive = NaiveDateTime::parse_from_str(value, SCHEDULE_FORMAT).map_err(|source| {
            BinsError::Timestamp {
                value: value.to_owned(),
                source,
            }
        })?;

        Ok(resolve_local(self.tz, naive))
    }
}

/// Pin a wall-clock time to `tz`.
///
/// Folded times take the earlier instant. Times inside a spring-forward gap
/// are read with the offset in force before the transition.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => instant,
        LocalResult::None => {
            let before = naive - Duration::days(1);
            let offset = tz.offset_from_local_datetime(&before).earliest().map_or(0, |offset| {
                i64::from(offset.fix().local_minus_utc())
            });
            tz.from_utc_datetime(&(naive - Duration::seconds(offset)))
        }
    }
}
