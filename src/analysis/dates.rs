//! Resolution of free-form `since`/`until` expressions.
//!
//! libgit2 has no equivalent of `git log --since`, so the common approxidate
//! forms are handled here: `now`, `today`, `yesterday`, `N units ago`,
//! `last <unit>`, ISO dates and timestamps, RFC 3339/2822 and `@<unix>`.

use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{DigestError, Result};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Resolve a lower-bound expression. Bare dates mean the start of that day.
pub fn parse_date_expr(expr: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
    resolve(expr, now, false)
}

/// Resolve an upper-bound expression. Bare dates mean the end of that day.
pub fn parse_until_expr(expr: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
    resolve(expr, now, true)
}

fn resolve(expr: &str, now: DateTime<Local>, end_of_day: bool) -> Result<DateTime<Local>> {
    let invalid = || DigestError::InvalidDate(expr.to_string());
    let trimmed = expr.trim();
    let lower = trimmed.to_lowercase();

    match lower.as_str() {
        "" => return Err(invalid()),
        "now" | "today" => return Ok(now),
        "yesterday" => return Ok(now - Duration::days(1)),
        _ => {}
    }

    if let Some(seconds) = lower.strip_prefix('@') {
        return seconds
            .parse::<i64>()
            .ok()
            .and_then(|secs| Local.timestamp_opt(secs, 0).single())
            .ok_or_else(invalid);
    }

    if let Some(dt) = relative(&lower, now) {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        };
        return time
            .and_then(|t| Local.from_local_datetime(&date.and_time(t)).earliest())
            .ok_or_else(invalid);
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(invalid);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| invalid())
}

/// `N <unit>s ago`, `N.units.ago`, `a <unit> ago` and `last <unit>`.
fn relative(expr: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let normalized = expr.replace('.', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let (amount, unit) = match tokens.as_slice() {
        ["last", unit] => (1, *unit),
        [n, unit, "ago"] => {
            let amount = match *n {
                "a" | "an" => 1,
                n => n.parse::<u32>().ok()?,
            };
            (amount, *unit)
        }
        _ => return None,
    };

    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let amount_i64 = i64::from(amount);
    let delta = match unit {
        "second" | "sec" => Duration::try_seconds(amount_i64),
        "minute" | "min" => Duration::try_minutes(amount_i64),
        "hour" => Duration::try_hours(amount_i64),
        "day" => Duration::try_days(amount_i64),
        "week" => Duration::try_weeks(amount_i64),
        "month" => return now.checked_sub_months(Months::new(amount)),
        "year" => return now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    };
    now.checked_sub_signed(delta?)
}
