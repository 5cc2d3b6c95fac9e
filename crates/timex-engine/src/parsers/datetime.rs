//! DateTime parser: a calendar day joined with a clock time.
//!
//! The date half keeps its own future/past candidates; the time of day is
//! applied to both. A day-part word between the two ("tomorrow evening at
//! 7") settles an otherwise ambiguous 12-hour value.

use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use super::date::DateParser;
use super::duration::DurationParser;
use super::time::TimeParser;
use super::{cap, leftover, longest_match, names, run_strategies, GranularityParser, Strategy};
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{Comment, DateTimeResolutionResult, EntityType, FuturePast, ResolvedValue};
use crate::timex;

/// A resolved time of day plus whether its half of day is still open.
#[derive(Debug, Clone, Copy)]
struct ClockTime {
    time: NaiveTime,
    ambiguous: bool,
}

impl ClockTime {
    fn from_result(result: &DateTimeResolutionResult) -> Option<Self> {
        Some(Self {
            time: result.future()?.as_instant()?.time(),
            ambiguous: result.comment == Some(Comment::AmPm),
        })
    }

    /// Apply a day-part cue. `pm` moves a morning hour to the afternoon;
    /// either way the value stops being ambiguous.
    fn with_cue(self, pm: Option<bool>) -> Self {
        match pm {
            Some(true) if self.ambiguous && self.time.hour() < 12 => Self {
                time: self.time + chrono::Duration::hours(12),
                ambiguous: false,
            },
            Some(_) => Self {
                ambiguous: false,
                ..self
            },
            None => self,
        }
    }

    fn timex(&self) -> String {
        timex::time(self.time.hour(), self.time.minute(), self.time.second())
    }
}

pub struct DateTimeParser {
    config: Arc<LocaleConfig>,
    date: DateParser,
    time: TimeParser,
    duration: DurationParser,
}

impl DateTimeParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "now",
            run: Self::now,
        },
        Strategy {
            name: "date_and_time",
            run: Self::date_and_time,
        },
        Strategy {
            name: "time_of_today",
            run: Self::time_of_today,
        },
        Strategy {
            name: "duration_relative",
            run: Self::duration_relative,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            date: DateParser::new(config.clone()),
            time: TimeParser::new(config.clone()),
            duration: DurationParser::new(config.clone()),
            config,
        }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    /// Join a date result with a clock time into a datetime result.
    fn combine(date: &DateTimeResolutionResult, clock: ClockTime) -> Option<DateTimeResolutionResult> {
        let value = date.value.as_ref()?;
        let future = value.future.as_instant()?.date().and_time(clock.time);
        let past = value.past.as_instant()?.date().and_time(clock.time);
        let timex = format!("{}{}", date.timex, clock.timex());
        let result = DateTimeResolutionResult::resolved(
            timex,
            FuturePast::new(ResolvedValue::Instant(future), ResolvedValue::Instant(past)),
        );
        Some(if clock.ambiguous {
            result.with_comment(Comment::AmPm)
        } else {
            result
        })
    }

    fn now(&self, text: &str, reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        if !self.config.patterns.datetime.now.matches_exactly(text) {
            return Ok(None);
        }
        Ok(Some(DateTimeResolutionResult::instant(
            timex::PRESENT_REF,
            reference,
        )))
    }

    fn date_and_time(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns;
        let Some(time_span) = longest_match(&p.time.all(), text, None) else {
            return Ok(None);
        };
        let Some(date_span) = longest_match(&p.date.all(), text, Some(time_span.clone())) else {
            return Ok(None);
        };
        let rest = leftover(text, &[time_span.clone(), date_span.clone()]);
        let Some(connector) = p.datetime.connector.captures(&rest) else {
            return Ok(None);
        };

        let date = self.date.resolve(&text[date_span], reference)?;
        let time = self.time.resolve(&text[time_span], reference)?;
        if !date.success || !time.success {
            return Ok(None);
        }
        let Some(clock) = ClockTime::from_result(&time) else {
            return Ok(None);
        };
        let pm = match connector.name("segment") {
            Some(segment) => Some(self.config.day_segment(segment.as_str())?.is_pm),
            None => None,
        };
        Ok(Self::combine(&date, clock.with_cue(pm)))
    }

    /// The half-of-day cue carried by "tonight", "this morning" and the like.
    fn today_cue(&self, today: &str) -> Result<Option<bool>> {
        let Some(word) = today.split_whitespace().last() else {
            return Ok(None);
        };
        if word.eq_ignore_ascii_case("today") {
            return Ok(None);
        }
        Ok(Some(self.config.day_segment(word)?.is_pm))
    }

    fn time_of_today(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.datetime;
        let Some(caps) = p.time_of_today.exact(text).or_else(|| p.today_at_time.exact(text)) else {
            return Ok(None);
        };
        let (Some(time_text), Some(today)) = (cap(&caps, "time"), cap(&caps, "today")) else {
            return Ok(None);
        };

        let time = self.time.resolve(time_text, reference)?;
        let clock = if time.success {
            ClockTime::from_result(&time)
        } else {
            // A bare hour ("tonight at 8").
            self.config
                .number(time_text)?
                .filter(|h| h.fract() == 0.0 && (0.0..24.0).contains(h))
                .and_then(|h| NaiveTime::from_hms_opt(h as u32, 0, 0))
                .map(|time| ClockTime {
                    time,
                    ambiguous: (1..=12).contains(&time.hour()),
                })
        };
        let Some(clock) = clock else {
            return Ok(None);
        };
        let clock = clock.with_cue(self.today_cue(today)?);
        let today = DateTimeResolutionResult::date(
            timex::date(reference.date()),
            FuturePast::same(reference.date()),
        );
        Ok(Self::combine(&today, clock))
    }

    fn duration_relative(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.datetime.duration_relative.exact(text) else {
            return Ok(None);
        };
        let (phrase, sign) = if let Some(ahead) = cap(&caps, "ahead") {
            (ahead, 1)
        } else if let (Some(duration), Some(dir)) = (cap(&caps, "duration"), cap(&caps, "dir")) {
            (duration, self.config.duration_direction(dir)?)
        } else {
            return Ok(None);
        };
        let Some(value) = self.duration.parse_value(phrase)? else {
            return Ok(None);
        };
        let Some(at) = value.apply_to(reference, sign) else {
            return Ok(None);
        };
        Ok(Some(DateTimeResolutionResult::instant(timex::datetime(at), at)))
    }
}

impl GranularityParser for DateTimeParser {
    fn entity_type(&self) -> EntityType {
        EntityType::DateTime
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "datetime", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        DateTimeParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    fn future_at(r: &DateTimeResolutionResult) -> NaiveDateTime {
        r.future().and_then(ResolvedValue::as_instant).unwrap()
    }

    fn past_at(r: &DateTimeResolutionResult) -> NaiveDateTime {
        r.past().and_then(ResolvedValue::as_instant).unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            DateTimeParser::strategy_names(),
            vec!["now", "date_and_time", "time_of_today", "duration_relative"]
        );
    }

    #[test]
    fn test_now_is_present_ref() {
        let r = resolve("right now");
        assert_eq!(r.timex, "PRESENT_REF");
        assert_eq!(future_at(&r), reference());
    }

    #[test]
    fn test_date_and_time() {
        let r = resolve("tomorrow at 5pm");
        assert_eq!(r.timex, "2016-11-08T17");
        assert_eq!(future_at(&r), at(2016, 11, 8, 17, 0));
        assert_eq!(r.comment, None);

        let r = resolve("at 5pm on Monday");
        assert_eq!(r.timex, "XXXX-WXX-1T17");
    }

    #[test]
    fn test_fuzzy_date_keeps_both_branches() {
        let r = resolve("Oct. 2 at 5:30");
        assert_eq!(r.timex, "XXXX-10-02T05:30");
        assert_eq!(r.comment, Some(Comment::AmPm));
        assert_eq!(future_at(&r), at(2017, 10, 2, 5, 30));
        assert_eq!(past_at(&r), at(2016, 10, 2, 5, 30));
    }

    #[test]
    fn test_segment_between_date_and_time_sets_pm() {
        let r = resolve("tomorrow evening at 7");
        assert_eq!(r.timex, "2016-11-08T19");
        assert_eq!(r.comment, None);

        let r = resolve("tomorrow morning at 7");
        assert_eq!(r.timex, "2016-11-08T07");
        assert_eq!(r.comment, None);
    }

    #[test]
    fn test_time_of_today() {
        let r = resolve("tonight at 8");
        assert_eq!(r.timex, "2016-11-07T20");
        assert_eq!(future_at(&r), at(2016, 11, 7, 20, 0));

        assert_eq!(resolve("this morning at 7").timex, "2016-11-07T07");
        assert_eq!(resolve("8pm today").timex, "2016-11-07T20");
    }

    #[test]
    fn test_duration_relative_instants() {
        let r = resolve("3 hours ago");
        assert_eq!(r.timex, "2016-11-07T09");
        assert_eq!(future_at(&r), at(2016, 11, 7, 9, 0));

        let r = resolve("in 5 minutes");
        assert_eq!(r.timex, "2016-11-07T12:05");
    }

    #[test]
    fn test_duration_past_calendar_range_is_not_an_instant() {
        assert!(!resolve("99999999999 hours ago").success);
        assert!(!resolve("in 999999999999 days").success);
    }

    #[test]
    fn test_unmatched_text_fails() {
        assert!(!resolve("the blue one").success);
    }
}
