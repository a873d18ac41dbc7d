use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::SeriesBundle;
use crate::error::DateParseError;

/// Named relative window used to slice a bundle for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeToken {
    Day,
    Week,
    Month,
    Quarter,
    #[default]
    All,
}

impl RangeToken {
    pub const TOKENS: [RangeToken; 5] = [
        RangeToken::Day,
        RangeToken::Week,
        RangeToken::Month,
        RangeToken::Quarter,
        RangeToken::All,
    ];

    /// Window length, `None` for `All`.
    #[must_use]
    pub fn window(self) -> Option<TimeDelta> {
        match self {
            Self::Day => Some(TimeDelta::hours(24)),
            Self::Week => Some(TimeDelta::days(7)),
            Self::Month => Some(TimeDelta::days(30)),
            Self::Quarter => Some(TimeDelta::days(90)),
            Self::All => None,
        }
    }

    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.window().map(|window| now - window)
    }
}

/// Zoned forms RFC 3339 parsing misses, e.g. basic `+0300` offsets.
const ZONED_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses one date label into an absolute instant.
///
/// Accepted encodings, tried in order:
/// - RFC 3339 timestamp with zone marker (`Z` or `±hh:mm`)
/// - timestamp with a basic `±hhmm` zone marker
/// - timestamp without zone marker, read in `local_offset`
/// - bare `YYYY-MM-DD`, read as local midnight
pub fn parse_date_label(
    label: &str,
    local_offset: FixedOffset,
) -> Result<DateTime<Utc>, DateParseError> {
    let text = label.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Ok(zoned.with_timezone(&Utc));
    }
    if let Some(zoned) = ZONED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Ok(zoned.with_timezone(&Utc));
    }

    let naive = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|naive| naive.and_local_timezone(local_offset).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| DateParseError {
            label: label.to_owned(),
        })
}

/// Per-token flag telling whether a window holds at least one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeAvailability {
    pub day: bool,
    pub week: bool,
    pub month: bool,
    pub quarter: bool,
    pub all: bool,
}

impl RangeAvailability {
    #[must_use]
    pub fn is_available(self, token: RangeToken) -> bool {
        match token {
            RangeToken::Day => self.day,
            RangeToken::Week => self.week,
            RangeToken::Month => self.month,
            RangeToken::Quarter => self.quarter,
            RangeToken::All => self.all,
        }
    }
}

/// Slices bundles to relative windows ending at a host-supplied instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRangeFilter {
    local_offset: FixedOffset,
}

impl Default for TimeRangeFilter {
    fn default() -> Self {
        Self::new(utc_offset())
    }
}

impl TimeRangeFilter {
    #[must_use]
    pub fn new(local_offset: FixedOffset) -> Self {
        Self { local_offset }
    }

    #[must_use]
    pub fn local_offset(self) -> FixedOffset {
        self.local_offset
    }

    /// First index, in stored order, whose date parses to an instant `>= cutoff`.
    ///
    /// Unparsable labels are skipped as candidates.
    #[must_use]
    pub fn first_index_at_or_after(self, dates: &[String], cutoff: DateTime<Utc>) -> Option<usize> {
        dates.iter().position(|label| {
            match parse_date_label(label, self.local_offset) {
                Ok(instant) => instant >= cutoff,
                Err(err) => {
                    debug!(error = %err, "skipping date label as range boundary");
                    false
                }
            }
        })
    }

    /// Tail slice of `bundle` covering `token`'s window.
    ///
    /// No qualifying date yields an empty bundle with the same keys.
    #[must_use]
    pub fn apply(self, bundle: &SeriesBundle, token: RangeToken, now: DateTime<Utc>) -> SeriesBundle {
        let Some(cutoff) = token.cutoff(now) else {
            return bundle.clone();
        };

        let start = self
            .first_index_at_or_after(bundle.dates(), cutoff)
            .unwrap_or(bundle.len());
        trace!(
            ?token,
            start,
            original_len = bundle.len(),
            "apply time range filter"
        );
        bundle.tail_from(start)
    }

    #[must_use]
    pub fn availability(self, bundle: &SeriesBundle, now: DateTime<Utc>) -> RangeAvailability {
        let has_data = |token: RangeToken| {
            token
                .cutoff(now)
                .is_some_and(|cutoff| self.first_index_at_or_after(bundle.dates(), cutoff).is_some())
        };

        RangeAvailability {
            day: has_data(RangeToken::Day),
            week: has_data(RangeToken::Week),
            month: has_data(RangeToken::Month),
            quarter: has_data(RangeToken::Quarter),
            all: !bundle.is_empty(),
        }
    }
}

#[must_use]
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
