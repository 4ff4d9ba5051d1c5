use chrono::{DateTime, FixedOffset, Utc};

/// Resolves current wall-clock time in India Standard Time.
///
/// All "today"/"yesterday" computations go through this trait, never through
/// the server locale or timestamps on the scraped page. Tests inject a fixed
/// instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// IST is UTC+05:30 with no daylight saving, so a fixed offset is exact.
pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset is in range")
}

pub struct IstClock;

impl Clock for IstClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&ist_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn ist_is_five_thirty_ahead_of_utc() {
        let utc = DateTime::parse_from_rfc3339("2024-06-01T20:00:00+00:00").unwrap();
        let ist = utc.with_timezone(&ist_offset());
        assert_eq!(ist.hour(), 1);
        assert_eq!(ist.minute(), 30);
    }
}
