use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

enum StayInstant {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

fn parse_instant(input: &str) -> Option<StayInstant> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(StayInstant::Naive);
    }

    if let Some(instant) = parse_with_offset(input) {
        return Some(StayInstant::Offset(instant));
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(StayInstant::Naive)
}

/// RFC 3339, plus the minute-precision form browsers produce ("...T22:00Z").
fn parse_with_offset(input: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant);
    }

    let normalized = match input.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => input.to_string(),
    };
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z").ok()
}

/// Parse a stay boundary. Date-only input ("2025-06-01") is midnight of that
/// day and naive timestamps keep their time of day. Timestamps carrying an
/// offset are converted to UTC so boundaries in different offsets compare by
/// the instant they name.
pub fn parse_stay_instant(input: &str) -> Option<NaiveDateTime> {
    parse_instant(input).map(|instant| match instant {
        StayInstant::Naive(naive) => naive,
        StayInstant::Offset(instant) => instant.naive_utc(),
    })
}

/// Calendar date of a stay boundary as the guest wrote it, ignoring time of
/// day. An offset timestamp keeps its own local date.
pub fn parse_stay_date(input: &str) -> Option<NaiveDate> {
    parse_instant(input).map(|instant| match instant {
        StayInstant::Naive(naive) => naive.date(),
        StayInstant::Offset(instant) => instant.date_naive(),
    })
}

/// Nights between two stay boundaries as typed by the guest.
///
/// Missing or unparsable input is zero nights, as is any non-positive span.
/// A partial day rounds up to a full night.
pub fn nights_between(check_in: Option<&str>, check_out: Option<&str>) -> u32 {
    let (Some(start), Some(end)) = (
        check_in.and_then(parse_stay_instant),
        check_out.and_then(parse_stay_instant),
    ) else {
        return 0;
    };

    let diff_ms = (end - start).num_milliseconds();
    if diff_ms <= 0 {
        return 0;
    }

    let nights = (diff_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(nights).unwrap_or(u32::MAX)
}

pub fn nights_between_dates(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    if days <= 0 {
        0
    } else {
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

pub fn nights_label(nights: u32) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{} nights", nights)
    }
}
