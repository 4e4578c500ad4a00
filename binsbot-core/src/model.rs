//! Domain data structures for properties, bins, and collection days.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ports::BinsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Unique Property Reference Number used as the lookup key upstream.
pub struct Uprn(pub u64);

impl fmt::Display for Uprn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for Uprn {
    type Err = BinsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        // u64::from_str accepts a leading '+', which is not a valid reference number.
        if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(BinsError::InvalidUprn(raw.to_owned()));
        }
        trimmed
            .parse()
            .map(Uprn)
            .map_err(|_err| BinsError::InvalidUprn(raw.to_owned()))
    }
}

impl From<u64> for Uprn {
    fn from(value: u64) -> Self {
        Uprn(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Colour of a collected bin.
pub enum BinType {
    /// General waste.
    Black,
    /// Recycling.
    Orange,
    /// Garden waste.
    Green,
}

impl BinType {
    /// Every colour the council reports, in lookup order.
    pub const ALL: [BinType; 3] = [BinType::Black, BinType::Orange, BinType::Green];

    /// Map an upstream label such as `"Black bin"` to a colour.
    ///
    /// The match is exact; anything outside the known labels yields `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Black bin" => Some(BinType::Black),
            "Orange bin" => Some(BinType::Orange),
            "Green bin" => Some(BinType::Green),
            _ => None,
        }
    }

    /// The label the upstream API uses for this colour.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BinType::Black => "Black bin",
            BinType::Orange => "Orange bin",
            BinType::Green => "Green bin",
        }
    }
}

impl fmt::Display for BinType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colour = match self {
            BinType::Black => "Black",
            BinType::Orange => "Orange",
            BinType::Green => "Green",
        };
        write!(formatter, "{colour}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// All bins collected on a single visit.
pub struct Collection {
    /// Scheduled start, anchored to the council's civil timezone.
    ///
    /// Equals [`Collection::unscheduled_start`] when upstream sent no date.
    pub start: DateTime<Tz>,
    /// Bins collected, in upstream order. Duplicates are kept.
    pub bin_types: Vec<BinType>,
}

impl Collection {
    /// Sentinel start used for jobs without a scheduled date.
    ///
    /// This is midnight UTC on 1 January of year 1, a date no council
    /// schedule can carry, shown in `tz`.
    #[must_use]
    pub fn unscheduled_start(tz: Tz) -> DateTime<Tz> {
        zero_time().with_timezone(&tz)
    }

    /// Whether the start is the sentinel rather than a real date.
    #[must_use]
    pub fn is_unscheduled(&self) -> bool {
        self.start == zero_time()
    }

    /// Whether a bin of the given colour is part of this collection.
    #[must_use]
    pub fn includes(&self, bin: BinType) -> bool {
        self.bin_types.contains(&bin)
    }
}

fn zero_time() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(DateTime::<Utc>::MIN_UTC, |naive| naive.and_utc())
}
