//! Calendar arithmetic shared by the parsers.
//!
//! Everything here is a pure function of its inputs. Invalid (year, month,
//! day) triples are reported as `None` instead of panicking, so callers can
//! apply the shift-to-nearest-valid policy.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::model::FuturePast;

/// How far the leap-day probe walks before giving up on a valid year.
const MAX_YEAR_PROBE: i32 = 8;

/// Convert an ISO weekday number (Monday = 1 .. Sunday = 7).
pub fn weekday_from_iso(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = shift_month(year, month, 1);
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(ny, nm, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

/// Move `(year, month)` by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Add calendar months, clamping the day to the target month's length.
/// `None` when the result leaves chrono's date range.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Build a date, clamping the day into the month when it overflows.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)).max(1))
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The given ISO weekday inside the (Monday-based) week of `reference`.
pub fn this_weekday(reference: NaiveDate, weekday_iso: u32) -> NaiveDate {
    week_start(reference) + Duration::days(weekday_iso.clamp(1, 7) as i64 - 1)
}

/// The given weekday in the week after the reference week.
pub fn next_weekday(reference: NaiveDate, weekday_iso: u32) -> NaiveDate {
    this_weekday(reference, weekday_iso) + Duration::days(7)
}

/// The given weekday in the week before the reference week.
pub fn last_weekday(reference: NaiveDate, weekday_iso: u32) -> NaiveDate {
    this_weekday(reference, weekday_iso) - Duration::days(7)
}

/// Nearest occurrences of a weekday on or after / before the reference day.
///
/// The future branch may be the reference day itself; the past branch is
/// always strictly before it.
pub fn bracket_weekday(reference: NaiveDate, weekday_iso: u32) -> FuturePast<NaiveDate> {
    let this = this_weekday(reference, weekday_iso);
    let future = if this < reference {
        this + Duration::days(7)
    } else {
        this
    };
    let past = if this >= reference {
        this - Duration::days(7)
    } else {
        this
    };
    FuturePast::new(future, past)
}

/// The `cardinal`-th occurrence of a weekday in a month.
///
/// Cardinals that overflow the month (a "5th Friday" in a four-Friday month)
/// step back a week at a time, so the largest cardinal doubles as "last".
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday_iso: u32,
    cardinal: u32,
) -> Option<NaiveDate> {
    let first = first_of_month(year, month)?;
    let target = weekday_from_iso(weekday_iso)?;
    let offset = (target.num_days_from_monday() as i64 - first.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    let first_occurrence = first + Duration::days(offset);

    let mut cardinal = cardinal.max(1);
    let mut date = first_occurrence + Duration::weeks(cardinal as i64 - 1);
    while date.month() != month && cardinal > 1 {
        cardinal -= 1;
        date -= Duration::weeks(1);
    }
    Some(date)
}

/// Easter Sunday (Gregorian computus, anonymous algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Expand a two-digit year: below `split` lands in 20xx, otherwise 19xx.
pub fn expand_two_digit_year(year: i32, split: i32) -> i32 {
    if year >= 100 {
        year
    } else if year < split {
        2000 + year
    } else {
        1900 + year
    }
}

/// Walk from `year` in `step` direction until `month/day` is a real date.
fn probe_valid(year: i32, month: u32, day: u32, step: i32) -> Option<NaiveDate> {
    (0..=MAX_YEAR_PROBE).find_map(|i| NaiveDate::from_ymd_opt(year + i * step, month, day))
}

/// Resolve a month/day with no year against the reference date.
///
/// The future branch is the first occurrence on or after the reference day,
/// the past branch the last occurrence strictly before it. Dates that are
/// invalid in the candidate year (Feb 29) move to the nearest valid year in
/// the branch's direction; if none exists the day is clamped.
pub fn resolve_month_day(reference: NaiveDate, month: u32, day: u32) -> FuturePast<NaiveDate> {
    let year = reference.year();
    let fallback = clamped_date(year, month, day).unwrap_or(reference);

    let future = probe_valid(year, month, day, 1)
        .and_then(|d| {
            if d < reference {
                probe_valid(d.year() + 1, month, day, 1)
            } else {
                Some(d)
            }
        })
        .unwrap_or(fallback);

    let past = probe_valid(year, month, day, -1)
        .and_then(|d| {
            if d >= reference {
                probe_valid(d.year() - 1, month, day, -1)
            } else {
                Some(d)
            }
        })
        .unwrap_or(fallback);

    FuturePast::new(future, past)
}

/// Resolve a bare day-of-month ("on 15") against the reference date.
///
/// Months that lack the day (the 31st of November) are skipped.
pub fn resolve_day_of_month(reference: NaiveDate, day: u32) -> FuturePast<NaiveDate> {
    let (year, month) = (reference.year(), reference.month());
    let fallback = clamped_date(year, month, day).unwrap_or(reference);

    let future = (0..12)
        .filter_map(|i| {
            let (y, m) = shift_month(year, month, i);
            NaiveDate::from_ymd_opt(y, m, day)
        })
        .find(|d| *d >= reference)
        .unwrap_or(fallback);

    let past = (0..12)
        .filter_map(|i| {
            let (y, m) = shift_month(year, month, -i);
            NaiveDate::from_ymd_opt(y, m, day)
        })
        .find(|d| *d < reference)
        .unwrap_or(fallback);

    FuturePast::new(future, past)
}

/// Resolve a recurring calendar span (a month, a season, a quarter) given as
/// a function from a candidate year to a half-open date range.
///
/// The future branch is the first candidate that has not ended yet, the past
/// branch the last candidate that has already started.
pub fn resolve_recurring_range<F>(reference: NaiveDate, range_for_year: F) -> Option<FuturePast<(NaiveDate, NaiveDate)>>
where
    F: Fn(i32) -> Option<(NaiveDate, NaiveDate)>,
{
    let year = reference.year();
    let candidates: Vec<(NaiveDate, NaiveDate)> =
        (-2..=2).filter_map(|i| range_for_year(year + i)).collect();
    let future = candidates.iter().find(|(_, end)| *end > reference)?;
    let past = candidates.iter().rev().find(|(start, _)| *start <= reference)?;
    Some(FuturePast::new(*future, *past))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shift_month_wraps_years() {
        assert_eq!(shift_month(2016, 12, 1), (2017, 1));
        assert_eq!(shift_month(2016, 1, -1), (2015, 12));
        assert_eq!(shift_month(2016, 11, -23), (2014, 12));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2016, 2), 29);
        assert_eq!(days_in_month(2017, 2), 28);
        assert_eq!(days_in_month(2016, 12), 31);
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(date(2016, 1, 31), 1), Some(date(2016, 2, 29)));
        assert_eq!(add_months(date(2016, 3, 31), -1), Some(date(2016, 2, 29)));
    }

    #[test]
    fn test_add_months_out_of_range_is_none() {
        assert_eq!(add_months(date(2016, 11, 7), i32::MAX), None);
        assert_eq!(add_months(date(2016, 11, 7), 12 * 300_000), None);
    }

    #[test]
    fn test_weekday_helpers() {
        // 2016-11-07 is a Monday
        let reference = date(2016, 11, 7);
        assert_eq!(this_weekday(reference, 5), date(2016, 11, 11));
        assert_eq!(next_weekday(reference, 7), date(2016, 11, 20));
        assert_eq!(last_weekday(reference, 5), date(2016, 11, 4));
        assert_eq!(next_weekday(reference, 1), date(2016, 11, 14));
    }

    #[test]
    fn test_bracket_weekday_same_day() {
        let reference = date(2016, 11, 7);
        let fp = bracket_weekday(reference, 1);
        assert_eq!(fp.future, reference);
        assert_eq!(fp.past, date(2016, 10, 31));
    }

    #[test]
    fn test_nth_weekday_of_month() {
        // Thanksgiving 2016: fourth Thursday of November
        assert_eq!(nth_weekday_of_month(2016, 11, 4, 4), Some(date(2016, 11, 24)));
        // July 2016 has five Fridays
        assert_eq!(nth_weekday_of_month(2016, 7, 5, 5), Some(date(2016, 7, 29)));
        // November 2016 has four Mondays: "5th Monday" degrades to the last one
        assert_eq!(nth_weekday_of_month(2016, 11, 1, 5), Some(date(2016, 11, 28)));
    }

    #[test]
    fn test_easter_sunday() {
        assert_eq!(easter_sunday(2016), Some(date(2016, 3, 27)));
        assert_eq!(easter_sunday(2017), Some(date(2017, 4, 16)));
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_two_digit_year_split() {
        assert_eq!(expand_two_digit_year(16, 50), 2016);
        assert_eq!(expand_two_digit_year(49, 50), 2049);
        assert_eq!(expand_two_digit_year(50, 50), 1950);
        assert_eq!(expand_two_digit_year(99, 50), 1999);
        assert_eq!(expand_two_digit_year(2016, 50), 2016);
    }

    #[test]
    fn test_resolve_month_day_brackets_reference() {
        let fp = resolve_month_day(date(2016, 11, 7), 10, 2);
        assert_eq!(fp.future, date(2017, 10, 2));
        assert_eq!(fp.past, date(2016, 10, 2));
    }

    #[test]
    fn test_resolve_month_day_leap_day() {
        let fp = resolve_month_day(date(2017, 6, 1), 2, 29);
        assert_eq!(fp.future, date(2020, 2, 29));
        assert_eq!(fp.past, date(2016, 2, 29));
    }

    #[test]
    fn test_resolve_day_of_month() {
        let fp = resolve_day_of_month(date(2016, 11, 7), 15);
        assert_eq!(fp.future, date(2016, 11, 15));
        assert_eq!(fp.past, date(2016, 10, 15));

        let fp = resolve_day_of_month(date(2016, 11, 7), 31);
        assert_eq!(fp.future, date(2016, 12, 31));
        assert_eq!(fp.past, date(2016, 10, 31));
    }

    #[test]
    fn test_resolve_recurring_range() {
        let reference = date(2016, 11, 7);
        let fp = resolve_recurring_range(reference, |y| {
            Some((date(y, 6, 1), date(y, 9, 1)))
        })
        .unwrap();
        assert_eq!(fp.future.0, date(2017, 6, 1));
        assert_eq!(fp.past.0, date(2016, 6, 1));
    }
}
