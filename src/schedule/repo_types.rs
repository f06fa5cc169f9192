use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Shared shape of the time-stamped records kept in an entity store.
pub trait Scheduled: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn time_utc(&self) -> DateTime<Utc>;

    /// Derive the canonical instant from the client-supplied `time`.
    fn normalize(&mut self);

    /// Recompute `time` as `time_utc` seen from `tz`.
    fn render_in(&mut self, tz: &Tz);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time_utc: DateTime<Utc>,
    pub time: DateTime<FixedOffset>,
}

impl Scheduled for Event {
    const KIND: &'static str = "event";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn time_utc(&self) -> DateTime<Utc> {
        self.time_utc
    }

    fn normalize(&mut self) {
        self.time_utc = self.time.with_timezone(&Utc);
    }

    fn render_in(&mut self, tz: &Tz) {
        self.time = self.time_utc.with_timezone(tz).fixed_offset();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time_utc: DateTime<Utc>,
    pub time: DateTime<FixedOffset>,
}

impl Scheduled for Notification {
    const KIND: &'static str = "notification";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn time_utc(&self) -> DateTime<Utc> {
        self.time_utc
    }

    fn normalize(&mut self) {
        self.time_utc = self.time.with_timezone(&Utc);
    }

    fn render_in(&mut self, tz: &Tz) {
        self.time = self.time_utc.with_timezone(tz).fixed_offset();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn normalize_and_render_round_trip_through_utc() {
        let kyiv = FixedOffset::east_opt(3 * 3600).unwrap();
        let mut event = Event {
            id: 0,
            title: "standup".into(),
            description: String::new(),
            time_utc: DateTime::<Utc>::default(),
            time: kyiv.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        };
        event.normalize();
        assert_eq!(
            event.time_utc,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        );

        event.render_in(&Tz::America__New_York);
        assert_eq!(event.time.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(event.time.with_timezone(&Utc), event.time_utc);
    }

    #[test]
    fn deserializes_without_server_fields() {
        let n: Notification = serde_json::from_str(
            r#"{"title":"pay rent","time":"2024-01-31T08:00:00+01:00"}"#,
        )
        .unwrap();
        assert_eq!(n.id, 0);
        assert!(n.description.is_empty());
        assert_eq!(n.time.offset().local_minus_utc(), 3600);
    }
}
