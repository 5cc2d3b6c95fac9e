//! Date parser: single calendar days.
//!
//! Fully specified dates ("2016-11-04", "Nov 4, 2016") resolve to the same
//! value in both branches. Under-specified ones ("Oct. 2", "on 15",
//! "Friday") resolve to the nearest future and nearest past occurrence.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Captures;

use super::duration::DurationParser;
use super::holiday::HolidayParser;
use super::{
    cap, first_exact, names, parse_day, parse_month, parse_year, run_strategies, GranularityParser,
    Strategy,
};
use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{DateTimeResolutionResult, EntityType, FuturePast, ResolvedValue};
use crate::timex;

pub struct DateParser {
    config: Arc<LocaleConfig>,
    duration: DurationParser,
    holiday: HolidayParser,
}

impl DateParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "calendar",
            run: Self::calendar,
        },
        Strategy {
            name: "implicit_day",
            run: Self::implicit_day,
        },
        Strategy {
            name: "nth_weekday_of_month",
            run: Self::nth_weekday_of_month,
        },
        Strategy {
            name: "weekday",
            run: Self::weekday,
        },
        Strategy {
            name: "duration_relative",
            run: Self::duration_relative,
        },
        Strategy {
            name: "anchored_duration",
            run: Self::anchored_duration,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            duration: DurationParser::new(config.clone()),
            holiday: HolidayParser::new(config.clone()),
            config,
        }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    /// Resolve `text`, retrying with the locale's date token prepended
    /// ("15" becomes "on 15") when the bare text does not parse.
    pub fn resolve_lenient(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<DateTimeResolutionResult> {
        let result = self.resolve(text, reference)?;
        if result.success {
            return Ok(result);
        }
        let retry = format!("{}{}", self.config.token_before_date, text.trim());
        self.resolve(&retry, reference)
    }

    fn calendar(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date;
        let Some(caps) = first_exact(&[&p.iso, &p.numeric, &p.month_day, &p.day_month], text)
        else {
            return Ok(None);
        };
        let (Some(month), Some(day)) = (cap(&caps, "month"), cap(&caps, "day")) else {
            return Ok(None);
        };
        let (Some(month), Some(day)) = (
            parse_month(&self.config, month)?,
            parse_day(&self.config, day)?,
        ) else {
            return Ok(None);
        };

        if let Some(year) = cap(&caps, "year").and_then(|y| parse_year(&self.config, y)) {
            let Some(date) = calendar::clamped_date(year, month, day) else {
                return Ok(None);
            };
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        let dates = calendar::resolve_month_day(reference.date(), month, day);
        Ok(Some(DateTimeResolutionResult::date(
            timex::fuzzy_year_date(month, day),
            dates,
        )))
    }

    fn implicit_day(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date;
        let today = reference.date();

        if let Some(caps) = p.special_day.exact(text) {
            let Some(special) = cap(&caps, "special") else {
                return Ok(None);
            };
            let date = today + Duration::days(self.config.special_day(special)?);
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        if let Some(caps) = p.day_of_relative_month.exact(text) {
            let (Some(day), Some(rel)) = (cap(&caps, "day"), cap(&caps, "rel")) else {
                return Ok(None);
            };
            let Some(day) = parse_day(&self.config, day)? else {
                return Ok(None);
            };
            let (year, month) =
                calendar::shift_month(today.year(), today.month(), self.config.swift(rel)?);
            let Some(date) = calendar::clamped_date(year, month, day) else {
                return Ok(None);
            };
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        if let Some(caps) = p.bare_day.exact(text) {
            let Some(raw) = cap(&caps, "day").or_else(|| cap(&caps, "ord")) else {
                return Ok(None);
            };
            let Some(day) = parse_day(&self.config, raw)? else {
                return Ok(None);
            };
            return Ok(Some(DateTimeResolutionResult::date(
                timex::fuzzy_month_day(day),
                calendar::resolve_day_of_month(today, day),
            )));
        }

        Ok(None)
    }

    fn nth_weekday_of_month(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date.nth_weekday_of_month.exact(text) else {
            return Ok(None);
        };
        let (Some(cardinal), Some(weekday)) = (cap(&caps, "cardinal"), cap(&caps, "weekday"))
        else {
            return Ok(None);
        };
        let cardinal = self.config.cardinal(cardinal)?;
        let weekday = self.config.weekday(weekday)?;
        let today = reference.date();

        let fixed_month = if let Some(rel) = cap(&caps, "rel") {
            Some(calendar::shift_month(
                today.year(),
                today.month(),
                self.config.swift(rel)?,
            ))
        } else {
            match (cap(&caps, "month"), cap(&caps, "year")) {
                (Some(month), Some(year)) => parse_year(&self.config, year)
                    .map(|y| self.config.month(month).map(|m| (y, m)))
                    .transpose()?,
                _ => None,
            }
        };

        if let Some((year, month)) = fixed_month {
            let Some(date) = calendar::nth_weekday_of_month(year, month, weekday, cardinal) else {
                return Ok(None);
            };
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        let Some(month) = cap(&caps, "month") else {
            return Ok(None);
        };
        let month = self.config.month(month)?;
        let in_year = |y: i32| calendar::nth_weekday_of_month(y, month, weekday, cardinal);
        let (Some(this_year), Some(next_year), Some(last_year)) = (
            in_year(today.year()),
            in_year(today.year() + 1),
            in_year(today.year() - 1),
        ) else {
            return Ok(None);
        };
        let future = if this_year >= today { this_year } else { next_year };
        let past = if this_year < today { this_year } else { last_year };
        Ok(Some(DateTimeResolutionResult::date(
            timex::nth_weekday(None, month, weekday, cardinal),
            FuturePast::new(future, past),
        )))
    }

    fn weekday(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date;
        let today = reference.date();

        if let Some(caps) = p.relative_weekday.exact(text) {
            let Some((swift, weekday)) = self.swift_and_weekday(&caps)? else {
                return Ok(None);
            };
            let date = match swift {
                0 => calendar::this_weekday(today, weekday),
                s if s > 0 => calendar::next_weekday(today, weekday),
                _ => calendar::last_weekday(today, weekday),
            };
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        if let Some(caps) = p.weekday_of_relative_week.exact(text) {
            let Some((swift, weekday)) = self.swift_and_weekday(&caps)? else {
                return Ok(None);
            };
            let date = calendar::this_weekday(today + Duration::weeks(swift as i64), weekday);
            return Ok(Some(DateTimeResolutionResult::date(
                timex::date(date),
                FuturePast::same(date),
            )));
        }

        if let Some(caps) = p.weekday.exact(text) {
            let Some(weekday) = cap(&caps, "weekday") else {
                return Ok(None);
            };
            let weekday = self.config.weekday(weekday)?;
            return Ok(Some(DateTimeResolutionResult::date(
                timex::fuzzy_weekday(weekday),
                calendar::bracket_weekday(today, weekday),
            )));
        }

        Ok(None)
    }

    fn swift_and_weekday(&self, caps: &Captures<'_>) -> Result<Option<(i32, u32)>> {
        let (Some(rel), Some(weekday)) = (cap(caps, "rel"), cap(caps, "weekday")) else {
            return Ok(None);
        };
        Ok(Some((self.config.swift(rel)?, self.config.weekday(weekday)?)))
    }

    fn duration_relative(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date.duration_relative.exact(text) else {
            return Ok(None);
        };
        let today = reference.date();

        let (phrase, sign, base) = if let Some(ahead) = cap(&caps, "ahead") {
            (ahead, 1, today)
        } else if let Some(duration) = cap(&caps, "duration") {
            if let Some(dir) = cap(&caps, "dir") {
                (duration, self.config.duration_direction(dir)?, today)
            } else if let (Some(adir), Some(anchor)) = (cap(&caps, "adir"), cap(&caps, "anchor")) {
                let base = today + Duration::days(self.config.special_day(anchor)?);
                (duration, self.config.duration_direction(adir)?, base)
            } else {
                return Ok(None);
            }
        } else {
            return Ok(None);
        };

        let Some(value) = self.duration.parse_value(phrase)? else {
            return Ok(None);
        };
        let Some(at) = value.apply_to(calendar::midnight(base), sign) else {
            return Ok(None);
        };
        let date: NaiveDate = at.date();
        Ok(Some(DateTimeResolutionResult::date(
            timex::date(date),
            FuturePast::same(date),
        )))
    }

    /// "3 days before Oct 2": shift both branches of the anchor date. A
    /// year-less anchor keeps a year-less timex when both branches land on
    /// the same month and day.
    fn anchored_duration(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date.anchored_duration.exact(text) else {
            return Ok(None);
        };
        let (Some(phrase), Some(adir), Some(anchor)) =
            (cap(&caps, "duration"), cap(&caps, "adir"), cap(&caps, "anchor"))
        else {
            return Ok(None);
        };
        let Some(value) = self.duration.parse_value(phrase)? else {
            return Ok(None);
        };
        let sign = self.config.duration_direction(adir)?;

        let mut anchored = self.resolve(anchor, reference)?;
        if !anchored.success {
            anchored = self.holiday.resolve(anchor, reference)?;
        }
        if !anchored.success {
            return Ok(None);
        }
        let (Some(future), Some(past)) = (
            anchored.future().and_then(ResolvedValue::as_instant),
            anchored.past().and_then(ResolvedValue::as_instant),
        ) else {
            return Ok(None);
        };
        let (Some(future), Some(past)) = (value.apply_to(future, sign), value.apply_to(past, sign))
        else {
            return Ok(None);
        };
        let (future, past) = (future.date(), past.date());

        let same_day_of_year = (future.month(), future.day()) == (past.month(), past.day());
        let timex = if future != past && timex::is_fuzzy_year(&anchored.timex) && same_day_of_year {
            timex::fuzz_year(&timex::date(future))
        } else {
            timex::date(future)
        };
        Ok(Some(DateTimeResolutionResult::date(
            timex,
            FuturePast::new(future, past),
        )))
    }
}

impl GranularityParser for DateParser {
    fn entity_type(&self) -> EntityType {
        EntityType::Date
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "date", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractResult;
    use crate::parsers::test_support::*;

    fn parser() -> DateParser {
        DateParser::new(Arc::new(LocaleConfig::english().unwrap()))
    }

    fn resolve(text: &str) -> DateTimeResolutionResult {
        parser().resolve(text, reference()).unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            DateParser::strategy_names(),
            vec![
                "calendar",
                "implicit_day",
                "nth_weekday_of_month",
                "weekday",
                "duration_relative",
                "anchored_duration"
            ]
        );
    }

    #[test]
    fn test_on_15_rolls_within_months() {
        let r = resolve("on 15");
        assert_eq!(r.timex, "XXXX-XX-15");
        assert_eq!(future_date(&r), date(2016, 11, 15));
        assert_eq!(past_date(&r), date(2016, 10, 15));
    }

    #[test]
    fn test_month_day_without_year() {
        let r = resolve("Oct. 2");
        assert_eq!(r.timex, "XXXX-10-02");
        assert_eq!(future_date(&r), date(2017, 10, 2));
        assert_eq!(past_date(&r), date(2016, 10, 2));
    }

    #[test]
    fn test_fully_specified_dates_have_one_value() {
        for text in ["2016-11-04", "11/4/2016", "Nov 4, 2016", "4th of November 2016"] {
            let r = resolve(text);
            assert_eq!(r.timex, "2016-11-04", "{text}");
            assert!(!r.value.as_ref().unwrap().is_ambiguous(), "{text}");
        }
    }

    #[test]
    fn test_two_digit_year() {
        let r = resolve("11/4/16");
        assert_eq!(r.timex, "2016-11-04");
        let r = resolve("11/4/87");
        assert_eq!(r.timex, "1987-11-04");
    }

    #[test]
    fn test_leap_day_moves_to_valid_years() {
        let r = resolve("Feb 29");
        assert_eq!(r.timex, "XXXX-02-29");
        assert_eq!(future_date(&r), date(2020, 2, 29));
        assert_eq!(past_date(&r), date(2016, 2, 29));
    }

    #[test]
    fn test_special_days() {
        assert_eq!(future_date(&resolve("tomorrow")), date(2016, 11, 8));
        assert_eq!(future_date(&resolve("yesterday")), date(2016, 11, 6));
        assert_eq!(
            future_date(&resolve("the day after tomorrow")),
            date(2016, 11, 9)
        );
    }

    #[test]
    fn test_day_of_relative_month() {
        let r = resolve("the 31st of next month");
        assert_eq!(r.timex, "2016-12-31");
        let r = resolve("31st of this month");
        assert_eq!(future_date(&r), date(2016, 11, 30));
    }

    #[test]
    fn test_next_sunday_is_in_the_following_week() {
        let r = resolve("next Sunday");
        assert_eq!(r.timex, "2016-11-20");
        assert_eq!(future_date(&r), date(2016, 11, 20));
        assert_eq!(past_date(&r), date(2016, 11, 20));
    }

    #[test]
    fn test_this_and_last_weekday() {
        assert_eq!(future_date(&resolve("this Friday")), date(2016, 11, 11));
        assert_eq!(future_date(&resolve("last Friday")), date(2016, 11, 4));
        assert_eq!(future_date(&resolve("Friday next week")), date(2016, 11, 18));
    }

    #[test]
    fn test_bare_weekday_brackets_reference() {
        let r = resolve("Monday");
        assert_eq!(r.timex, "XXXX-WXX-1");
        assert_eq!(future_date(&r), date(2016, 11, 7));
        assert_eq!(past_date(&r), date(2016, 10, 31));
    }

    #[test]
    fn test_last_weekday_of_month() {
        let r = resolve("last Friday of July");
        assert_eq!(r.timex, "XXXX-07-WXX-5-#5");
        assert_eq!(future_date(&r), date(2017, 7, 28));
        assert_eq!(past_date(&r), date(2016, 7, 29));
    }

    #[test]
    fn test_nth_weekday_of_relative_month() {
        let r = resolve("second Monday of next month");
        assert_eq!(r.timex, "2016-12-12");
    }

    #[test]
    fn test_duration_relative() {
        let r = resolve("3 days ago");
        assert_eq!(r.timex, "2016-11-04");
        assert_eq!(future_date(&r), date(2016, 11, 4));
        assert_eq!(future_date(&resolve("in 2 weeks")), date(2016, 11, 21));
        assert_eq!(future_date(&resolve("2 months later")), date(2017, 1, 7));
        assert_eq!(
            future_date(&resolve("2 days after tomorrow")),
            date(2016, 11, 10)
        );
    }

    #[test]
    fn test_duration_counted_from_a_date() {
        let r = resolve("3 days before Oct 2");
        assert_eq!(r.timex, "XXXX-09-29");
        assert_eq!(future_date(&r), date(2017, 9, 29));
        assert_eq!(past_date(&r), date(2016, 9, 29));

        let r = resolve("2 weeks after Nov 4, 2016");
        assert_eq!(r.timex, "2016-11-18");
        assert_eq!(future_date(&r), date(2016, 11, 18));
        assert_eq!(past_date(&r), date(2016, 11, 18));
    }

    #[test]
    fn test_duration_counted_from_a_holiday() {
        let r = resolve("2 days after Christmas");
        assert_eq!(r.timex, "XXXX-12-27");
        assert_eq!(future_date(&r), date(2016, 12, 27));
        assert_eq!(past_date(&r), date(2015, 12, 27));
    }

    #[test]
    fn test_duration_past_calendar_range_is_not_a_date() {
        assert!(!resolve("999999999999 days ago").success);
        assert!(!resolve("in 300000 years").success);
    }

    #[test]
    fn test_lenient_retry_with_date_token() {
        let p = parser();
        assert!(!p.resolve("22", reference()).unwrap().success);
        let r = p.resolve_lenient("22", reference()).unwrap();
        assert_eq!(r.timex, "XXXX-XX-22");
    }

    #[test]
    fn test_parse_rejects_other_tags() {
        let er = ExtractResult::new(0, "tomorrow", EntityType::Time);
        let pr = parser().parse(&er, reference()).unwrap();
        assert!(!pr.success());
        assert!(pr.timex_str.is_none());
    }

    #[test]
    fn test_unparseable_text_is_not_an_error() {
        let r = resolve("the blue one");
        assert!(!r.success);
    }
}
