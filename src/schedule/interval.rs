use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use super::repo_types::Scheduled;

/// Look-back window for filtered reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for Interval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(()),
        }
    }
}

impl Interval {
    /// Start of the window ending at `now`. Calendar months clamp to the
    /// last day of the shorter month.
    pub fn limit(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let earlier = match self {
            Self::Day => now.checked_sub_signed(Duration::days(1)),
            Self::Week => now.checked_sub_signed(Duration::days(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        };
        earlier.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Keeps entities strictly inside `(limit, now)`.
///
/// A missing or unrecognised keyword means no filter: every entity is kept.
pub fn filter_by_interval<T: Scheduled>(
    entities: Vec<T>,
    interval: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<T> {
    let Some(interval) = interval.and_then(|s| s.parse::<Interval>().ok()) else {
        return entities;
    };
    let limit = interval.limit(now);
    entities
        .into_iter()
        .filter(|e| {
            let t = e.time_utc();
            limit < t && t < now
        })
        .collect()
}
