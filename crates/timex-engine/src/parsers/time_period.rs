//! TimePeriod parser: ranges within a day.
//!
//! Hour ranges ("5 to 6pm"), named day segments ("morning", "business
//! hours") and two joined clock times ("from 5:30 to 7"). All values sit on
//! the reference date; a range that crosses midnight ends on the next day.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Timelike};

use super::time::TimeParser;
use super::{cap, names, range_splits, run_strategies, GranularityParser, Strategy};
use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{Comment, DateTimeResolutionResult, EntityType, FuturePast, Modifier};
use crate::timex;

/// One end of a clock range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClockPoint {
    pub at: NaiveDateTime,
    /// A 12-hour reading with no half-of-day cue.
    pub ambiguous: bool,
}

impl ClockPoint {
    pub(crate) fn from_result(result: &DateTimeResolutionResult) -> Option<Self> {
        Some(Self {
            at: result.future()?.as_instant()?,
            ambiguous: result.comment == Some(Comment::AmPm),
        })
    }
}

/// Order two clock points into a range.
///
/// An uncued start moves to the afternoon when that still precedes a cued
/// end ("5 to 6pm"). An inverted range first tries the PM reading of an
/// uncued end, then rolls the end over to the next day.
pub(crate) fn order_points(start: ClockPoint, end: ClockPoint) -> (NaiveDateTime, NaiveDateTime) {
    let half_day = Duration::hours(12);
    let (mut s, mut e) = (start.at, end.at);
    if start.ambiguous && !end.ambiguous && s + half_day <= e {
        s += half_day;
    }
    if e <= s && end.ambiguous && e + half_day > s {
        e += half_day;
    }
    if e <= s {
        e += Duration::days(1);
    }
    (s, e)
}

pub(crate) fn clock_timex(at: NaiveDateTime) -> String {
    timex::time(at.hour(), at.minute(), at.second())
}

/// Timex `(Tstart,Tend,duration)` for a clock range.
pub(crate) fn clock_range_timex(start: NaiveDateTime, end: NaiveDateTime) -> String {
    timex::range(
        &clock_timex(start),
        &clock_timex(end),
        &timex::datetime_duration(start, end),
    )
}

pub struct TimePeriodParser {
    config: Arc<LocaleConfig>,
    time: TimeParser,
}

impl TimePeriodParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "hour_range",
            run: Self::hour_range,
        },
        Strategy {
            name: "day_segment",
            run: Self::day_segment,
        },
        Strategy {
            name: "two_time_points",
            run: Self::two_time_points,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            time: TimeParser::new(config.clone()),
            config,
        }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn joined(start: ClockPoint, end: ClockPoint) -> DateTimeResolutionResult {
        let (s, e) = order_points(start, end);
        let result = DateTimeResolutionResult::range(clock_range_timex(s, e), FuturePast::same((s, e)));
        if start.ambiguous && end.ambiguous {
            result.with_comment(Comment::AmPm)
        } else {
            result
        }
    }

    fn hour_point(
        &self,
        hour: &str,
        ampm: Option<&str>,
        reference: NaiveDateTime,
    ) -> Result<Option<ClockPoint>> {
        let Some(hour) = self.config.number(hour)?.filter(|h| (0.0..=24.0).contains(h)) else {
            return Ok(None);
        };
        let hour = hour as i64;
        let pm = ampm.map(|m| m.trim_start().to_lowercase().starts_with('p'));
        let hour = match pm {
            Some(true) if hour < 12 => hour + 12,
            Some(false) if hour == 12 => 0,
            _ => hour,
        };
        Ok(Some(ClockPoint {
            at: calendar::midnight(reference.date()) + Duration::hours(hour),
            ambiguous: pm.is_none() && (1..=12).contains(&hour),
        }))
    }

    fn hour_range(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self
            .config
            .patterns
            .time_period
            .hour_ranges
            .iter()
            .find_map(|p| p.exact(text))
        else {
            return Ok(None);
        };
        let (Some(start), Some(end)) = (cap(&caps, "start"), cap(&caps, "end")) else {
            return Ok(None);
        };
        let start = self.hour_point(start, cap(&caps, "start_ampm"), reference)?;
        let end = self.hour_point(end, cap(&caps, "end_ampm"), reference)?;
        Ok(start.zip(end).map(|(s, e)| Self::joined(s, e)))
    }

    fn day_segment(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.time_period.day_segment.exact(text) else {
            return Ok(None);
        };
        let Some(name) = cap(&caps, "segment") else {
            return Ok(None);
        };
        let segment = self.config.day_segment(name)?;
        let midnight = calendar::midnight(reference.date());
        let start = midnight + Duration::hours(segment.start as i64);
        let end = midnight + Duration::hours(segment.end as i64);

        let timex = match segment.code {
            Some(code) => format!("T{code}"),
            None => clock_range_timex(start, end),
        };
        let half = (end - start) / 2;
        let (position, span) = match cap(&caps, "pos").map(str::to_lowercase).as_deref() {
            Some("early") => (Some(Modifier::Early), (start, start + half)),
            Some("late") => (Some(Modifier::Late), (start + half, end)),
            _ => (None, (start, end)),
        };
        let result = DateTimeResolutionResult::range(timex, FuturePast::same(span));
        Ok(Some(match position {
            Some(m) => result.with_modifier(m),
            None => result,
        }))
    }

    fn two_time_points(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        for (left, right) in range_splits(&self.config, text) {
            let start = self.time.resolve(left, reference)?;
            if !start.success {
                continue;
            }
            let end = self.time.resolve(right, reference)?;
            if !end.success {
                continue;
            }
            if let (Some(s), Some(e)) = (ClockPoint::from_result(&start), ClockPoint::from_result(&end)) {
                return Ok(Some(Self::joined(s, e)));
            }
        }
        Ok(None)
    }
}

impl GranularityParser for TimePeriodParser {
    fn entity_type(&self) -> EntityType {
        EntityType::TimePeriod
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "time_period", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        TimePeriodParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            TimePeriodParser::strategy_names(),
            vec!["hour_range", "day_segment", "two_time_points"]
        );
    }

    #[test]
    fn test_hour_range_propagates_pm_to_start() {
        let r = resolve("5 to 6pm");
        assert_eq!(r.timex, "(T17,T18,PT1H)");
        assert_eq!(future_range(&r), (at(2016, 11, 7, 17, 0), at(2016, 11, 7, 18, 0)));

        let r = resolve("between 3 and 5 pm");
        assert_eq!(r.timex, "(T15,T17,PT2H)");

        let r = resolve("10 to 2pm");
        assert_eq!(r.timex, "(T10,T14,PT4H)");
    }

    #[test]
    fn test_day_segments() {
        let r = resolve("morning");
        assert_eq!(r.timex, "TMO");
        assert_eq!(future_range(&r), (at(2016, 11, 7, 8, 0), at(2016, 11, 7, 12, 0)));
        assert_eq!(resolve("in the afternoon").timex, "TAF");
        assert_eq!(resolve("business hours").timex, "TBH");

        let r = resolve("lunchtime");
        assert_eq!(r.timex, "(T11,T13,PT2H)");
    }

    #[test]
    fn test_early_late_segment_halves_span() {
        let r = resolve("early morning");
        assert_eq!(r.timex, "TMO");
        assert_eq!(r.modifier, Some(Modifier::Early));
        assert_eq!(future_range(&r), (at(2016, 11, 7, 8, 0), at(2016, 11, 7, 10, 0)));

        let r = resolve("late in the evening");
        assert_eq!(r.modifier, Some(Modifier::Late));
        assert_eq!(future_range(&r), (at(2016, 11, 7, 18, 0), at(2016, 11, 7, 20, 0)));
    }

    #[test]
    fn test_two_time_points() {
        let r = resolve("from 5:30 to 7pm");
        assert_eq!(r.timex, "(T17:30,T19,PT1H30M)");
        assert_eq!(r.comment, None);

        let r = resolve("from 5:30 to 7");
        assert_eq!(r.timex, "(T05:30,T07,PT1H30M)");
        assert_eq!(r.comment, Some(Comment::AmPm));
    }

    #[test]
    fn test_cross_midnight_moves_end_to_next_day() {
        let r = resolve("from 10pm to 2am");
        assert_eq!(r.timex, "(T22,T02,PT4H)");
        assert_eq!(future_range(&r), (at(2016, 11, 7, 22, 0), at(2016, 11, 8, 2, 0)));

        let r = resolve("from 11am to 1");
        assert_eq!(r.timex, "(T11,T13,PT2H)");
    }
}
