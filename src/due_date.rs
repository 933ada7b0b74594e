use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};

/// Parses a stored due date into a calendar date.
///
/// Accepts plain `YYYY-MM-DD` dates, RFC 3339 timestamps (converted to local
/// time) and naive `YYYY-MM-DDTHH:MM[:SS]` timestamps. Anything else is `None`.
pub fn parse_due_date(due_date: &str) -> Option<NaiveDate> {
    let due_date = due_date.trim();
    if let Ok(date) = NaiveDate::parse_from_str(due_date, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(due_date) {
        return Some(ts.with_timezone(&Local).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(due_date, fmt).ok())
        .map(|ts| ts.date())
}

/// Last day of the current week, Sunday being day 0.
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_sunday() as u64;
    today + Days::new(7 - weekday)
}

pub fn end_of_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(today)
}

/// Label shown next to a task: "Today", "Tomorrow" or the raw due date.
pub fn format_due_date(due_date: &str, today: NaiveDate) -> String {
    match parse_due_date(due_date) {
        Some(date) if date == today => "Today".to_string(),
        Some(date) if today.succ_opt() == Some(date) => "Tomorrow".to_string(),
        _ => due_date.to_string(),
    }
}
