use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use timex_engine::calendar;
use timex_engine::parsers::{DateParser, DatePeriodParser, TimePeriodParser};
use timex_engine::{GranularityParser, LocaleConfig, ResolvedValue};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn config() -> Arc<LocaleConfig> {
    Arc::new(LocaleConfig::english().unwrap())
}

fn reference_at(days: i64) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    calendar::midnight(base + Duration::days(days)) + Duration::hours(12)
}

fn instant(value: Option<&ResolvedValue>) -> NaiveDateTime {
    value.and_then(ResolvedValue::as_instant).unwrap()
}

fn range(value: Option<&ResolvedValue>) -> (NaiveDateTime, NaiveDateTime) {
    value.and_then(ResolvedValue::as_range).unwrap()
}

proptest! {
    /// An under-specified month/day brackets the reference day.
    #[test]
    fn month_day_brackets_reference(days in 0i64..20_000, month in 0usize..12, day in 1u32..=28) {
        let reference = reference_at(days);
        let text = format!("{} {}", MONTHS[month], day);
        let r = DateParser::new(config()).resolve(&text, reference).unwrap();
        prop_assert!(r.success, "{} did not resolve", text);

        let today = reference.date();
        let future = instant(r.future()).date();
        let past = instant(r.past()).date();
        prop_assert!(future >= today);
        prop_assert!(past < today);
        prop_assert_eq!(future.month() as usize, month + 1);
        prop_assert_eq!(past.day(), day);
    }

    /// A bare weekday lands on that weekday in both branches, one week apart.
    #[test]
    fn weekday_round_trips(days in 0i64..20_000, weekday in 0usize..7) {
        let reference = reference_at(days);
        let r = DateParser::new(config()).resolve(WEEKDAYS[weekday], reference).unwrap();
        prop_assert_eq!(&r.timex, &format!("XXXX-WXX-{}", weekday + 1));

        let future = instant(r.future()).date();
        let past = instant(r.past()).date();
        prop_assert_eq!(future.weekday().number_from_monday() as usize, weekday + 1);
        prop_assert_eq!(future - past, Duration::days(7));
        prop_assert!(future >= reference.date() && past < reference.date());
    }

    /// Relative spans never invert.
    #[test]
    fn relative_periods_are_ordered(days in 0i64..20_000, n in 1u32..60, forward in any::<bool>()) {
        let reference = reference_at(days);
        let text = format!("{} {} days", if forward { "next" } else { "past" }, n);
        let r = DatePeriodParser::new(config()).resolve(&text, reference).unwrap();
        prop_assert!(r.success, "{} did not resolve", text);
        for (start, end) in [range(r.future()), range(r.past())] {
            prop_assert!(start < end);
            prop_assert_eq!(end - start, Duration::days(n as i64));
        }
    }

    /// Clock ranges that cross midnight roll their end into the next day.
    #[test]
    fn clock_ranges_are_ordered(start in 1u32..=12, end in 1u32..=12) {
        let reference = reference_at(6_000);
        let text = format!("from {start}pm to {end}am");
        let r = TimePeriodParser::new(config()).resolve(&text, reference).unwrap();
        prop_assert!(r.success, "{} did not resolve", text);
        let (s, e) = range(r.future());
        prop_assert!(s < e);
        prop_assert!(e - s <= Duration::hours(24));
    }

    /// Two-digit years split at 50.
    #[test]
    fn two_digit_years_split_at_fifty(year in 0i32..100) {
        let expanded = calendar::expand_two_digit_year(year, 50);
        prop_assert_eq!(expanded % 100, year);
        if year < 50 {
            prop_assert_eq!(expanded / 100, 20);
        } else {
            prop_assert_eq!(expanded / 100, 19);
        }
    }

    /// Feb 29 resolves to a real leap day on both sides of any reference.
    #[test]
    fn leap_day_resolves_to_leap_years(days in 0i64..20_000) {
        let reference = reference_at(days);
        let r = DateParser::new(config()).resolve("Feb 29", reference).unwrap();
        prop_assert!(r.success);
        for d in [instant(r.future()).date(), instant(r.past()).date()] {
            prop_assert_eq!((d.month(), d.day()), (2, 29));
        }
    }
}
