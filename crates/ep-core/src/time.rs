//! UTC clock readings and millisecond ISO-8601 stamps for records, brackets
//! and fulfillments. No chrono; dates come from a small days-to-civil helper.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time as nanoseconds since the Unix epoch.
pub fn now_unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

/// Current UTC time as Unix milliseconds.
pub fn now_unix_millis() -> u64 {
    (now_unix_nanos() / 1_000_000) as u64
}

/// Current UTC timestamp in ISO-8601 format with millisecond precision.
pub fn now_iso8601() -> String {
    unix_millis_to_iso8601(now_unix_millis())
}

/// Convert Unix milliseconds to an ISO-8601 UTC string.
pub fn unix_millis_to_iso8601(millis: u64) -> String {
    let secs = millis / 1000;
    let ms = millis % 1000;
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (y, m, d) = civil_from_days(days);
    format!("{y:04}-{m:02}-{d:02}T{hours:02}:{minutes:02}:{seconds:02}.{ms:03}Z")
}

/// Days from 0000-03-01 to 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_FROM_MARCH_ZERO: u64 = 719_468;
/// Days in one 400-year Gregorian cycle.
const DAYS_PER_CYCLE: u64 = 146_097;

/// Days since the Unix epoch to a (year, month, day) civil date.
///
/// Years are counted from March so the leap day falls at the end of each year
/// (Hinnant's days-to-civil method). Only dates on or after 1970 occur here.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let shifted = days + EPOCH_FROM_MARCH_ZERO;
    let cycle = shifted / DAYS_PER_CYCLE;
    let day_of_cycle = shifted % DAYS_PER_CYCLE;

    let year_of_cycle =
        (day_of_cycle - day_of_cycle / 1_460 + day_of_cycle / 36_524 - day_of_cycle / 146_096) / 365;
    let day_of_year = day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);

    let month_from_march = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
    let (month, rolls_over) = if month_from_march < 10 {
        (month_from_march + 3, 0)
    } else {
        (month_from_march - 9, 1)
    };

    (cycle * 400 + year_of_cycle + rolls_over, month, day)
}
