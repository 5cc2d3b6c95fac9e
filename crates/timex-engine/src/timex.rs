//! Canonical timex construction.
//!
//! A timex is a partial ISO 8601 token where unknown components are written
//! as `X` wildcards: `XXXX-10-02`, `XXXX-WXX-1`, `2016-W45`, `T17:30`,
//! `(2016-11-04,2016-11-22,P18D)`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::model::{DurationUnit, Season};

/// Timex for "now".
pub const PRESENT_REF: &str = "PRESENT_REF";

/// Separator between the alternative timexes of a double resolution.
pub const ALTERNATION: char = '|';

pub fn date(d: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}

/// `XXXX-MM-DD`.
pub fn fuzzy_year_date(month: u32, day: u32) -> String {
    format!("XXXX-{month:02}-{day:02}")
}

/// `XXXX-XX-DD` for a bare day of month.
pub fn fuzzy_month_day(day: u32) -> String {
    format!("XXXX-XX-{day:02}")
}

/// `XXXX-WXX-n` with ISO weekday `n`.
pub fn fuzzy_weekday(weekday_iso: u32) -> String {
    format!("XXXX-WXX-{weekday_iso}")
}

/// `XXXX-MM-WXX-w-#c`, or with a concrete year when known.
pub fn nth_weekday(year: Option<i32>, month: u32, weekday_iso: u32, cardinal: u32) -> String {
    format!(
        "{}-{month:02}-WXX-{weekday_iso}-#{cardinal}",
        year_or_fuzzy(year)
    )
}

pub fn month(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

pub fn fuzzy_month(month: u32) -> String {
    format!("XXXX-{month:02}")
}

pub fn year(year: i32) -> String {
    format!("{year:04}")
}

/// ISO week, `2016-W45`.
pub fn week(d: NaiveDate) -> String {
    let iso = d.iso_week();
    format!("{:04}-W{:02}", iso.year(), iso.week())
}

/// `2016-W45-WE`.
pub fn weekend(d: NaiveDate) -> String {
    format!("{}-WE", week(d))
}

/// Week of month, `XXXX-11-W01`.
pub fn week_of_month(year: Option<i32>, month: u32, cardinal: u32) -> String {
    format!("{}-{month:02}-W{cardinal:02}", year_or_fuzzy(year))
}

/// `2016-SU`, `XXXX-SU`.
pub fn season(year: Option<i32>, season: Season) -> String {
    format!("{}-{}", year_or_fuzzy(year), season.code())
}

/// `2016-Q1`.
pub fn quarter(year: i32, quarter: u32) -> String {
    format!("{year:04}-Q{quarter}")
}

/// `2016-H1`.
pub fn half(year: i32, half: u32) -> String {
    format!("{year:04}-H{half}")
}

/// Clock time, trimmed to the finest non-zero component (`T05`, `T05:30`,
/// `T05:30:20`).
pub fn time(hour: u32, minute: u32, second: u32) -> String {
    if second > 0 {
        format!("T{hour:02}:{minute:02}:{second:02}")
    } else if minute > 0 {
        format!("T{hour:02}:{minute:02}")
    } else {
        format!("T{hour:02}")
    }
}

pub fn datetime(dt: NaiveDateTime) -> String {
    format!(
        "{}{}",
        date(dt.date()),
        time(dt.hour(), dt.minute(), dt.second())
    )
}

/// Drop trailing zero decimals (`3`, `1.5`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else if n.fract() == 0.0 {
        format!("{n}")
    } else {
        let s = format!("{n:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A duration timex from `(amount, unit)` parts, emitted coarse to fine.
pub fn duration(parts: &[(f64, DurationUnit)]) -> String {
    let mut sorted: Vec<(f64, DurationUnit)> = parts.to_vec();
    sorted.sort_by_key(|(_, unit)| *unit);

    let mut out = String::from("P");
    let mut in_time = false;
    for (amount, unit) in sorted {
        if unit.is_time() && !in_time {
            out.push('T');
            in_time = true;
        }
        out.push_str(&format_number(amount));
        out.push(unit.code());
    }
    out
}

/// Day-count duration between two dates, `P18D`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> String {
    format!("P{}D", (end - start).num_days())
}

/// Duration between two instants: whole days as `P<n>D`, anything else as
/// hours, minutes and seconds.
pub fn datetime_duration(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let secs = (end - start).num_seconds();
    if secs != 0 && secs % 86_400 == 0 {
        return format!("P{}D", secs / 86_400);
    }
    let parts: Vec<(f64, DurationUnit)> = [
        (secs / 3_600, DurationUnit::Hour),
        (secs % 3_600 / 60, DurationUnit::Minute),
        (secs % 60, DurationUnit::Second),
    ]
    .into_iter()
    .filter(|(n, _)| *n != 0)
    .map(|(n, unit)| (n as f64, unit))
    .collect();
    if parts.is_empty() {
        return "PT0S".to_string();
    }
    duration(&parts)
}

/// `UTC+05:30`, `UTC-08:00`.
pub fn utc_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    format!("UTC{sign}{:02}:{:02}", abs / 60, abs % 60)
}

/// Shift every clock hour in a timex by `hours` (`T05` becomes `T17`).
pub fn shift_hours(timex: &str, hours: u32) -> String {
    let mut out = String::with_capacity(timex.len());
    let mut rest = timex;
    while let Some(pos) = rest.find('T') {
        out.push_str(&rest[..=pos]);
        rest = &rest[pos + 1..];
        if out.ends_with("PT") {
            continue;
        }
        let digits: String = rest.chars().take(2).collect();
        match digits.parse::<u32>() {
            Ok(h) if digits.len() == 2 => {
                out.push_str(&format!("{:02}", (h + hours) % 24));
                rest = &rest[2..];
            }
            _ => {}
        }
    }
    out.push_str(rest);
    out
}

/// Range triple `(start,end,duration)`.
pub fn range(start: &str, end: &str, duration: &str) -> String {
    format!("({start},{end},{duration})")
}

/// Range over two dates with a day-count duration.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    range(&date(start), &date(end), &days_between(start, end))
}

pub fn is_fuzzy_year(timex: &str) -> bool {
    timex.starts_with("XXXX")
}

/// Swap the year component of a timex for `XXXX`.
pub fn fuzz_year(timex: &str) -> String {
    match timex.get(4..) {
        Some(rest) if timex.len() >= 4 => format!("XXXX{rest}"),
        _ => timex.to_string(),
    }
}

fn year_or_fuzzy(year: Option<i32>) -> String {
    year.map(|y| format!("{y:04}"))
        .unwrap_or_else(|| "XXXX".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_forms() {
        assert_eq!(date(d(2016, 11, 4)), "2016-11-04");
        assert_eq!(fuzzy_year_date(10, 2), "XXXX-10-02");
        assert_eq!(fuzzy_weekday(1), "XXXX-WXX-1");
        assert_eq!(nth_weekday(None, 7, 5, 5), "XXXX-07-WXX-5-#5");
    }

    #[test]
    fn test_period_forms() {
        assert_eq!(week(d(2016, 11, 7)), "2016-W45");
        assert_eq!(weekend(d(2016, 11, 7)), "2016-W45-WE");
        assert_eq!(week_of_month(None, 11, 1), "XXXX-11-W01");
        assert_eq!(season(None, Season::Summer), "XXXX-SU");
        assert_eq!(quarter(2016, 1), "2016-Q1");
        assert_eq!(half(2016, 2), "2016-H2");
    }

    #[test]
    fn test_range_timex() {
        assert_eq!(
            date_range(d(2016, 11, 4), d(2016, 11, 22)),
            "(2016-11-04,2016-11-22,P18D)"
        );
    }

    #[test]
    fn test_time_trims_zero_components() {
        assert_eq!(time(5, 0, 0), "T05");
        assert_eq!(time(17, 30, 0), "T17:30");
        assert_eq!(time(5, 30, 20), "T05:30:20");
    }

    #[test]
    fn test_duration_is_coarse_to_fine() {
        let parts = [(2.0, DurationUnit::Day), (1.0, DurationUnit::Month)];
        assert_eq!(duration(&parts), "P1M2D");
        let parts = [(30.0, DurationUnit::Minute), (1.0, DurationUnit::Hour)];
        assert_eq!(duration(&parts), "PT1H30M");
        assert_eq!(duration(&[(1.5, DurationUnit::Hour)]), "PT1.5H");
    }

    #[test]
    fn test_format_number_does_not_saturate() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(2.25), "2.25");
    }

    #[test]
    fn test_datetime_duration_units() {
        let s = d(2016, 11, 7).and_hms_opt(5, 0, 0).unwrap();
        assert_eq!(datetime_duration(s, s + chrono::Duration::hours(3)), "PT3H");
        assert_eq!(datetime_duration(s, s + chrono::Duration::days(2)), "P2D");
        assert_eq!(datetime_duration(s, s + chrono::Duration::minutes(90)), "PT1H30M");
    }

    #[test]
    fn test_utc_offset_and_hour_shift() {
        assert_eq!(utc_offset(-300), "UTC-05:00");
        assert_eq!(utc_offset(330), "UTC+05:30");
        assert_eq!(shift_hours("T05:30", 12), "T17:30");
        assert_eq!(shift_hours("XXXX-WXX-1T05", 12), "XXXX-WXX-1T17");
        assert_eq!(shift_hours("PRESENT_REF", 12), "PRESENT_REF");
        assert_eq!(shift_hours("(T05,T07,PT12H)", 12), "(T17,T19,PT12H)");
    }

    #[test]
    fn test_fuzz_year() {
        assert_eq!(fuzz_year("2016-02-28"), "XXXX-02-28");
        assert!(is_fuzzy_year("XXXX-03-01"));
    }
}
