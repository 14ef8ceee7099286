use chrono::{DateTime, Local, SecondsFormat, Utc};

pub fn local_date_yyyy_mm_dd() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%Y-%m-%d").to_string()
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:30:00.123Z`.
pub fn iso_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso_millis() -> String {
    iso_millis(Utc::now())
}
