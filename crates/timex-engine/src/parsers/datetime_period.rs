//! DateTimePeriod parser: ranges that carry both a date and clock times.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::date::DateParser;
use super::datetime::DateTimeParser;
use super::duration::DurationParser;
use super::time::TimeParser;
use super::time_period::{clock_timex, order_points, ClockPoint, TimePeriodParser};
use super::{
    cap, leftover, longest_match, names, range_splits, run_strategies, GranularityParser, Strategy,
};
use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{Comment, DateTimeResolutionResult, EntityType, FuturePast};
use crate::timex;

/// One end of a two-point range: its date timex plus both candidate instants.
#[derive(Debug, Clone)]
struct Side {
    date_timex: String,
    at: FuturePast<NaiveDateTime>,
    ambiguous: bool,
}

impl Side {
    fn from_datetime(result: &DateTimeResolutionResult) -> Option<Self> {
        let future = result.future()?.as_instant()?;
        let past = result.past()?.as_instant()?;
        let date_timex = if result.timex == timex::PRESENT_REF {
            timex::date(future.date())
        } else {
            let split = result.timex.rfind('T')?;
            result.timex[..split].to_string()
        };
        Some(Self {
            date_timex,
            at: FuturePast::new(future, past),
            ambiguous: result.comment == Some(Comment::AmPm),
        })
    }

    /// A bare clock time placed on the other side's date.
    fn from_time(result: &DateTimeResolutionResult, dated: &Side) -> Option<Self> {
        let time = result.future()?.as_instant()?.time();
        Some(Self {
            date_timex: dated.date_timex.clone(),
            at: dated.at.map(|dt| dt.date().and_time(time)),
            ambiguous: result.comment == Some(Comment::AmPm),
        })
    }

    /// Date timex for an instant that may have rolled past this side's day.
    fn date_timex_at(&self, at: NaiveDateTime) -> String {
        if at.date() != self.at.future.date() && !self.date_timex.contains('X') {
            timex::date(at.date())
        } else {
            self.date_timex.clone()
        }
    }
}

pub struct DateTimePeriodParser {
    config: Arc<LocaleConfig>,
    date: DateParser,
    time: TimeParser,
    time_period: TimePeriodParser,
    datetime: DateTimeParser,
    duration: DurationParser,
}

impl DateTimePeriodParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "two_time_points",
            run: Self::two_time_points,
        },
        Strategy {
            name: "date_with_time_period",
            run: Self::date_with_time_period,
        },
        Strategy {
            name: "relative_duration",
            run: Self::relative_duration,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            date: DateParser::new(config.clone()),
            time: TimeParser::new(config.clone()),
            time_period: TimePeriodParser::new(config.clone()),
            datetime: DateTimeParser::new(config.clone()),
            duration: DurationParser::new(config.clone()),
            config,
        }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn order(start: NaiveDateTime, end: NaiveDateTime, start_amb: bool, end_amb: bool) -> (NaiveDateTime, NaiveDateTime) {
        if start.date() != end.date() {
            return (start, end);
        }
        order_points(
            ClockPoint {
                at: start,
                ambiguous: start_amb,
            },
            ClockPoint {
                at: end,
                ambiguous: end_amb,
            },
        )
    }

    fn join(start: &Side, end: &Side) -> DateTimeResolutionResult {
        let (mut fs, fe) = Self::order(start.at.future, end.at.future, start.ambiguous, end.ambiguous);
        let (ps, mut pe) = Self::order(start.at.past, end.at.past, start.ambiguous, end.ambiguous);
        if fe < fs {
            fs = ps;
        }
        if pe < ps {
            pe = fe;
        }
        let timex = timex::range(
            &format!("{}{}", start.date_timex_at(fs), clock_timex(fs)),
            &format!("{}{}", end.date_timex_at(fe), clock_timex(fe)),
            &timex::datetime_duration(fs, fe),
        );
        let result = DateTimeResolutionResult::range(timex, FuturePast::new((fs, fe), (ps, pe)));
        if start.ambiguous && end.ambiguous {
            result.with_comment(Comment::AmPm)
        } else {
            result
        }
    }

    fn two_time_points(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        for (left, right) in range_splits(&self.config, text) {
            let start = self.datetime.resolve(left, reference)?;
            let end = self.datetime.resolve(right, reference)?;
            let sides = match (start.success, end.success) {
                (true, true) => Side::from_datetime(&start).zip(Side::from_datetime(&end)),
                (true, false) => {
                    let time = self.time.resolve(right, reference)?;
                    let dated = Side::from_datetime(&start);
                    match dated {
                        Some(dated) if time.success => {
                            Side::from_time(&time, &dated).map(|end| (dated, end))
                        }
                        _ => None,
                    }
                }
                (false, true) => {
                    let time = self.time.resolve(left, reference)?;
                    let dated = Side::from_datetime(&end);
                    match dated {
                        Some(dated) if time.success => {
                            Side::from_time(&time, &dated).map(|start| (start, dated))
                        }
                        _ => None,
                    }
                }
                (false, false) => None,
            };
            if let Some((start, end)) = sides {
                return Ok(Some(Self::join(&start, &end)));
            }
        }
        Ok(None)
    }

    /// Place a time period's clock span on each candidate day of a date.
    fn on_date(
        date: &DateTimeResolutionResult,
        period: &DateTimeResolutionResult,
        reference: NaiveDateTime,
    ) -> Option<DateTimeResolutionResult> {
        let (start, end) = period.future()?.as_range()?;
        let base = calendar::midnight(reference.date());
        let (from, to) = (start - base, end - base);
        let place = |day: NaiveDateTime| {
            let midnight = calendar::midnight(day.date());
            (midnight + from, midnight + to)
        };
        let future = place(date.future()?.as_instant()?);
        let past = place(date.past()?.as_instant()?);

        let timex = if period.timex.starts_with('T') {
            format!("{}{}", date.timex, period.timex)
        } else {
            let end_date = if future.1.date() != future.0.date() && !date.timex.contains('X') {
                timex::date(future.1.date())
            } else {
                date.timex.clone()
            };
            timex::range(
                &format!("{}{}", date.timex, clock_timex(future.0)),
                &format!("{}{}", end_date, clock_timex(future.1)),
                &timex::datetime_duration(future.0, future.1),
            )
        };
        let mut result = DateTimeResolutionResult::range(timex, FuturePast::new(future, past));
        result.modifier = period.modifier;
        result.comment = period.comment;
        Some(result)
    }

    fn date_with_time_period(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns;

        if let Some(caps) = p.datetime_period.relative_segment.exact(text) {
            let (offset, segment) = if let Some(tonight) = cap(&caps, "tonight") {
                (0, tonight)
            } else if let (Some(rel), Some(segment)) = (cap(&caps, "rel"), cap(&caps, "segment")) {
                let offset = if self.config.dictionaries.special_days.contains(rel) {
                    self.config.special_day(rel)?
                } else {
                    i64::from(self.config.swift(rel)?)
                };
                (offset, segment)
            } else {
                return Ok(None);
            };
            let day = reference.date() + Duration::days(offset);
            let date = DateTimeResolutionResult::date(timex::date(day), FuturePast::same(day));
            let period = self.time_period.resolve(segment, reference)?;
            if !period.success {
                return Ok(None);
            }
            return Ok(Self::on_date(&date, &period, reference));
        }

        let Some(period_span) = longest_match(&p.time_period.all(), text, None) else {
            return Ok(None);
        };
        let Some(date_span) = longest_match(&p.date.all(), text, Some(period_span.clone())) else {
            return Ok(None);
        };
        let rest = leftover(text, &[period_span.clone(), date_span.clone()]);
        if !p.datetime_period.connector.is_match(&rest) {
            return Ok(None);
        }
        let date = self.date.resolve_lenient(&text[date_span], reference)?;
        let period = self.time_period.resolve(&text[period_span], reference)?;
        if !date.success || !period.success {
            return Ok(None);
        }
        Ok(Self::on_date(&date, &period, reference))
    }

    fn relative_duration(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.datetime_period.relative_duration.exact(text) else {
            return Ok(None);
        };
        let (Some(rel), Some(phrase)) = (cap(&caps, "rel"), cap(&caps, "duration")) else {
            return Ok(None);
        };
        let Some(value) = self.duration.parse_value(phrase)? else {
            return Ok(None);
        };
        let span = if self.config.swift(rel)? < 0 {
            value.apply_to(reference, -1).map(|start| (start, reference))
        } else {
            value.apply_to(reference, 1).map(|end| (reference, end))
        };
        let Some((start, end)) = span else {
            return Ok(None);
        };
        let timex = timex::range(
            &timex::datetime(start),
            &timex::datetime(end),
            &value.timex(),
        );
        Ok(Some(DateTimeResolutionResult::range(
            timex,
            FuturePast::same((start, end)),
        )))
    }
}

impl GranularityParser for DateTimePeriodParser {
    fn entity_type(&self) -> EntityType {
        EntityType::DateTimePeriod
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "datetime_period", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Modifier;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        DateTimePeriodParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            DateTimePeriodParser::strategy_names(),
            vec!["two_time_points", "date_with_time_period", "relative_duration"]
        );
    }

    #[test]
    fn test_two_points_share_the_date() {
        let r = resolve("tomorrow 5pm to 7pm");
        assert_eq!(r.timex, "(2016-11-08T17,2016-11-08T19,PT2H)");
        assert_eq!(future_range(&r), (at(2016, 11, 8, 17, 0), at(2016, 11, 8, 19, 0)));
    }

    #[test]
    fn test_two_points_cross_midnight() {
        let r = resolve("from 10pm tomorrow to 2am");
        assert_eq!(r.timex, "(2016-11-08T22,2016-11-09T02,PT4H)");
        assert_eq!(future_range(&r), (at(2016, 11, 8, 22, 0), at(2016, 11, 9, 2, 0)));
    }

    #[test]
    fn test_relative_segments() {
        let r = resolve("tomorrow morning");
        assert_eq!(r.timex, "2016-11-08TMO");
        assert_eq!(future_range(&r), (at(2016, 11, 8, 8, 0), at(2016, 11, 8, 12, 0)));

        let r = resolve("tonight");
        assert_eq!(r.timex, "2016-11-07TNI");
        assert_eq!(future_range(&r), (at(2016, 11, 7, 20, 0), at(2016, 11, 8, 0, 0)));

        assert_eq!(resolve("last night").timex, "2016-11-06TNI");
        assert_eq!(resolve("this afternoon").timex, "2016-11-07TAF");
    }

    #[test]
    fn test_date_with_hour_range() {
        let r = resolve("Friday from 5 to 7pm");
        assert_eq!(r.timex, "(XXXX-WXX-5T17,XXXX-WXX-5T19,PT2H)");
        assert_eq!(future_range(&r), (at(2016, 11, 11, 17, 0), at(2016, 11, 11, 19, 0)));
        assert_eq!(past_range(&r), (at(2016, 11, 4, 17, 0), at(2016, 11, 4, 19, 0)));
    }

    #[test]
    fn test_date_with_positioned_segment() {
        let r = resolve("tomorrow early morning");
        assert_eq!(r.timex, "2016-11-08TMO");
        assert_eq!(r.modifier, Some(Modifier::Early));
        assert_eq!(future_range(&r), (at(2016, 11, 8, 8, 0), at(2016, 11, 8, 10, 0)));
    }

    #[test]
    fn test_relative_duration() {
        let r = resolve("next 3 hours");
        assert_eq!(r.timex, "(2016-11-07T12,2016-11-07T15,PT3H)");
        assert_eq!(future_range(&r), (at(2016, 11, 7, 12, 0), at(2016, 11, 7, 15, 0)));

        let r = resolve("past 30 minutes");
        assert_eq!(r.timex, "(2016-11-07T11:30,2016-11-07T12,PT30M)");
    }

    #[test]
    fn test_relative_duration_past_calendar_range_fails() {
        assert!(!resolve("next 99999999999 hours").success);
    }

    #[test]
    fn test_time_only_range_is_not_a_datetime_period() {
        assert!(!resolve("from 5 to 7pm").success);
    }
}
