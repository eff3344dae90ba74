use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Instant normalized to UTC, rendered in the service's timestamp format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parses an RFC3339 timestamp with any offset.
    pub fn parse(input: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(input.trim(), &Rfc3339).map(Self::from_offset_datetime)
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .ok()
            .map(Self)
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// `YYYY-MM-DDTHH:mm:ss.000Z`. Milliseconds are always zero.
    pub fn to_wire(self) -> String {
        let (date, time) = (self.0.date(), self.0.time());
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.000Z",
            date.year(),
            u8::from(date.month()),
            date.day(),
            time.hour(),
            time.minute(),
            time.second()
        )
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_zeroes_milliseconds() {
        let ts = Timestamp::parse("2024-01-01T00:00:00.789Z").expect("must parse");
        assert_eq!(ts.to_wire(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = Timestamp::parse("2024-03-10T01:30:00+02:00").expect("must parse");
        assert_eq!(ts.to_wire(), "2024-03-09T23:30:00.000Z");
    }

    #[test]
    fn unix_seconds_round_to_wire() {
        let ts = Timestamp::from_unix_seconds(1_704_067_200).expect("in range");
        assert_eq!(ts.to_string(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn early_and_late_years_keep_their_own_value() {
        let early = Timestamp::parse("0999-02-03T04:05:06Z").expect("must parse");
        let late = Timestamp::parse("9999-12-31T23:59:59Z").expect("must parse");

        assert_eq!(early.to_wire(), "0999-02-03T04:05:06.000Z");
        assert_eq!(late.to_wire(), "9999-12-31T23:59:59.000Z");
    }
}
