//! Clock-string and minute arithmetic shared by every pipeline stage.
//!
//! Minutes are counted from the midnight preceding the wake time. A day that
//! crosses midnight keeps counting past 1440 so that every window stays
//! monotonically increasing; clock strings are only produced at the edges.

use chrono::Weekday;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Strict `H:MM` / `HH:MM` parser. Returns `None` for anything malformed.
pub fn try_parse_time(value: &str) -> Option<i64> {
    let mut split = value.trim().split(':');
    let hour = split.next()?.trim().parse::<u8>().ok()?;
    let minute = split.next()?.trim().parse::<u8>().ok()?;
    if split.next().is_some() || hour > 23 || minute > 59 {
        return None;
    }
    Some(i64::from(hour) * 60 + i64::from(minute))
}

/// Minutes since midnight for a clock string, or 0 when it cannot be parsed.
pub fn parse_time(value: &str) -> i64 {
    try_parse_time(value).unwrap_or(0)
}

/// Renders minutes as a 24-hour clock string, wrapping modulo one day.
pub fn minutes_to_time(minutes: i64) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Moves a clock value past midnight when it falls in the dead zone between
/// sleep and wake of a window that crosses midnight.
pub fn normalize_minutes(value: i64, wake: i64, sleep: i64, crosses_midnight: bool) -> i64 {
    if crosses_midnight && value < wake && value <= sleep {
        return value + MINUTES_PER_DAY;
    }
    value
}

pub fn normalize_window(
    start: i64,
    end: i64,
    wake: i64,
    sleep: i64,
    crosses_midnight: bool,
) -> (i64, i64) {
    let start = normalize_minutes(start, wake, sleep, crosses_midnight);
    let mut end = normalize_minutes(end, wake, sleep, crosses_midnight);
    if end <= start {
        end += MINUTES_PER_DAY;
    }
    (start, end)
}

/// `"13:05"` -> `"1:05 PM"`. Malformed input is returned unchanged.
pub fn to_12_hour(value: &str) -> String {
    let Some(minutes) = try_parse_time(value) else {
        return value.to_string();
    };
    let hour = minutes / 60;
    let minute = minutes % 60;
    let period = if hour < 12 { "AM" } else { "PM" };
    let hour_12 = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{hour_12}:{minute:02} {period}")
}

/// `"1:05 PM"` -> `"13:05"`. Accepts the period with or without a space.
pub fn from_12_hour(value: &str) -> Option<String> {
    let upper = value.trim().to_ascii_uppercase();
    let (clock, is_pm) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest, false)
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest, true)
    } else {
        return None;
    };

    let mut split = clock.trim().split(':');
    let hour = split.next()?.trim().parse::<u8>().ok()?;
    let minute = split.next()?.trim().parse::<u8>().ok()?;
    if split.next().is_some() || !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour_24 = u32::from(hour % 12) + if is_pm { 12 } else { 0 };
    Some(format!("{hour_24:02}:{minute:02}"))
}

pub fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
