use chrono::{DateTime, FixedOffset, Months, Utc};

/// `now` minus `months` calendar months. Day-of-month is clamped to the
/// target month's length (Mar 31 minus one month is Feb 28/29).
pub fn recency_cutoff(now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_months(Months::new(months))
}

/// Strictly later than the cutoff; a timestamp equal to it is outside.
pub fn is_within(date: &DateTime<FixedOffset>, cutoff: &DateTime<Utc>) -> bool {
    date.with_timezone(&Utc) > *cutoff
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}
