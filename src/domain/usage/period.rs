use chrono::{DateTime, Datelike, TimeZone, Utc};

/// True when `now` falls in a different calendar month (UTC) than the last reset.
pub fn needs_monthly_reset(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (last_reset.year(), last_reset.month()) != (now.year(), now.month())
}

/// First instant of the month following `now`
pub fn next_reset_at(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
