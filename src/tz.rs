use chrono_tz::Tz;
use thiserror::Error;

/// Timezone identifier that could not be resolved against the IANA database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timezone: {0}")]
pub struct BadTimezone(pub String);

pub fn parse(name: &str) -> Result<Tz, BadTimezone> {
    name.parse::<Tz>().map_err(|_| BadTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_iana_names() {
        assert_eq!(parse("America/New_York").unwrap(), Tz::America__New_York);
        assert_eq!(parse("UTC").unwrap(), Tz::UTC);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("").unwrap_err(), BadTimezone(String::new()));
        assert!(parse("Not/AZone").is_err());
    }
}
