//! Time parser: clock times of day.
//!
//! A time resolves on the reference date in both branches. A 12-hour value
//! with no AM/PM or day-part cue keeps its literal hour and is tagged
//! [`Comment::AmPm`] so the PM reading can be offered alongside it.

use std::sync::Arc;

use chrono::NaiveDateTime;
use regex::Captures;

use super::{cap, first_exact, names, run_strategies, GranularityParser, Strategy};
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{Comment, DateTimeResolutionResult, EntityType};
use crate::timex;

/// Which half of the day a cue pins a clock value to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HalfDay {
    Am,
    Pm,
}

pub struct TimeParser {
    config: Arc<LocaleConfig>,
}

impl TimeParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "digital",
            run: Self::digital,
        },
        Strategy {
            name: "hour_with_ampm",
            run: Self::hour_with_ampm,
        },
        Strategy {
            name: "spoken",
            run: Self::spoken,
        },
        Strategy {
            name: "special",
            run: Self::special,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn number(&self, raw: &str) -> Result<Option<u32>> {
        Ok(self
            .config
            .number(raw)?
            .filter(|n| n.fract() == 0.0 && *n >= 0.0)
            .map(|n| n as u32))
    }

    /// The half of day named by an "am"/"pm" marker or a day-part phrase
    /// ("in the evening", "at night").
    fn half_day(&self, caps: &Captures<'_>) -> Result<Option<HalfDay>> {
        if let Some(ampm) = cap(caps, "ampm") {
            let pm = ampm.trim_start().to_lowercase().starts_with('p');
            return Ok(Some(if pm { HalfDay::Pm } else { HalfDay::Am }));
        }
        let Some(part) = cap(caps, "seg").or_else(|| cap(caps, "seg2")) else {
            return Ok(None);
        };
        let Some(segment) = part.split_whitespace().last() else {
            return Ok(None);
        };
        let segment = self.config.day_segment(segment)?;
        Ok(Some(if segment.is_pm { HalfDay::Pm } else { HalfDay::Am }))
    }

    /// Build the result for a clock reading, applying the half-of-day cue.
    fn clock(
        &self,
        hour: u32,
        minute: u32,
        second: u32,
        half: Option<HalfDay>,
        reference: NaiveDateTime,
    ) -> Option<DateTimeResolutionResult> {
        let hour = if hour == 24 { 0 } else { hour };
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        let hour = match half {
            Some(HalfDay::Pm) if hour < 12 => hour + 12,
            Some(HalfDay::Am) if hour == 12 => 0,
            _ => hour,
        };
        let at = reference.date().and_hms_opt(hour, minute, second)?;
        let result = DateTimeResolutionResult::instant(timex::time(hour, minute, second), at);
        if half.is_none() && (1..=12).contains(&hour) {
            Some(result.with_comment(Comment::AmPm))
        } else {
            Some(result)
        }
    }

    fn digital(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.time.digital.exact(text) else {
            return Ok(None);
        };
        let parse = |name: &str| cap(&caps, name).and_then(|v| v.parse::<u32>().ok());
        let (Some(hour), Some(minute)) = (parse("hour"), parse("min")) else {
            return Ok(None);
        };
        let second = parse("sec").unwrap_or(0);
        let half = self.half_day(&caps)?;
        Ok(self.clock(hour, minute, second, half, reference))
    }

    fn hour_with_ampm(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.time;
        let Some(caps) = first_exact(&[&p.hour_with_ampm, &p.at_hour], text) else {
            return Ok(None);
        };
        let Some(hour) = cap(&caps, "hour") else {
            return Ok(None);
        };
        let Some(hour) = self.number(hour)? else {
            return Ok(None);
        };
        let half = self.half_day(&caps)?;
        Ok(self.clock(hour, 0, 0, half, reference))
    }

    fn spoken(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.time;

        if let Some(caps) = p.spoken.exact(text) {
            let minutes = if cap(&caps, "half").is_some() {
                Some(30)
            } else if cap(&caps, "quarter").is_some() {
                Some(15)
            } else if let Some(words) = cap(&caps, "min") {
                self.number(words)?
            } else {
                cap(&caps, "min_digits").and_then(|d| d.parse::<u32>().ok())
            };
            let (Some(minutes), Some(hour), Some(dir)) =
                (minutes, cap(&caps, "hour"), cap(&caps, "dir"))
            else {
                return Ok(None);
            };
            let Some(hour) = self.number(hour)? else {
                return Ok(None);
            };
            if minutes == 0 || minutes >= 60 {
                return Ok(None);
            }
            let half = self.half_day(&caps)?;
            let (hour, minute) = match dir.to_lowercase().as_str() {
                "past" | "after" => (hour, minutes),
                // Counting down to "one" on a 12-hour clock lands on twelve.
                _ => match hour {
                    0 => (23, 60 - minutes),
                    1 => (12, 60 - minutes),
                    h => (h - 1, 60 - minutes),
                },
            };
            return Ok(self.clock(hour, minute, 0, half, reference));
        }

        if let Some(caps) = p.hour_minute_words.exact(text) {
            let (Some(hour), Some(minute)) = (cap(&caps, "hour"), cap(&caps, "min")) else {
                return Ok(None);
            };
            let (Some(hour), Some(minute)) = (self.number(hour)?, self.number(minute)?) else {
                return Ok(None);
            };
            let half = self.half_day(&caps)?;
            return Ok(self.clock(hour, minute, 0, half, reference));
        }

        Ok(None)
    }

    fn special(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.time.special.exact(text) else {
            return Ok(None);
        };
        let Some(special) = cap(&caps, "special") else {
            return Ok(None);
        };
        let (hour, minute) = self.config.special_time(special)?;
        let Some(at) = reference.date().and_hms_opt(hour, minute, 0) else {
            return Ok(None);
        };
        Ok(Some(DateTimeResolutionResult::instant(
            timex::time(hour, minute, 0),
            at,
        )))
    }
}

impl GranularityParser for TimeParser {
    fn entity_type(&self) -> EntityType {
        EntityType::Time
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "time", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolvedValue;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        TimeParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    fn instant(r: &DateTimeResolutionResult) -> NaiveDateTime {
        r.future().and_then(ResolvedValue::as_instant).unwrap()
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            TimeParser::strategy_names(),
            vec!["digital", "hour_with_ampm", "spoken", "special"]
        );
    }

    #[test]
    fn test_digital_times() {
        let r = resolve("5:30pm");
        assert_eq!(r.timex, "T17:30");
        assert_eq!(instant(&r), at(2016, 11, 7, 17, 30));
        assert_eq!(r.comment, None);

        let r = resolve("17:45:10");
        assert_eq!(r.timex, "T17:45:10");
        assert_eq!(r.comment, None);
    }

    #[test]
    fn test_uncued_twelve_hour_value_gets_ampm_comment() {
        let r = resolve("5:30");
        assert_eq!(r.timex, "T05:30");
        assert_eq!(r.comment, Some(Comment::AmPm));

        let r = resolve("at 5");
        assert_eq!(r.timex, "T05");
        assert_eq!(r.comment, Some(Comment::AmPm));
    }

    #[test]
    fn test_hour_with_cues() {
        assert_eq!(resolve("5 p.m.").timex, "T17");
        assert_eq!(resolve("12am").timex, "T00");
        assert_eq!(resolve("12 pm").timex, "T12");
        assert_eq!(resolve("7 o'clock in the evening").timex, "T19");
        assert_eq!(resolve("eight in the morning").timex, "T08");
    }

    #[test]
    fn test_spoken_times() {
        assert_eq!(resolve("half past five").timex, "T05:30");
        assert_eq!(resolve("quarter to six").timex, "T05:45");
        assert_eq!(resolve("ten past seven pm").timex, "T19:10");
        assert_eq!(resolve("twenty minutes to one").timex, "T12:40");
        assert_eq!(resolve("five thirty").timex, "T05:30");
        assert_eq!(resolve("five thirty in the afternoon").timex, "T17:30");
    }

    #[test]
    fn test_special_times() {
        let r = resolve("noon");
        assert_eq!(r.timex, "T12");
        assert_eq!(r.comment, None);
        assert_eq!(resolve("midnight").timex, "T00");
    }

    #[test]
    fn test_out_of_range_clock_fails() {
        assert!(!resolve("25:10").success);
    }
}
