//! Set parser: recurrences ("daily", "every other week", "every Monday at
//! 5pm"). Both branches hold the same [`ResolvedValue::Recurrence`].

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::date::DateParser;
use super::datetime::DateTimeParser;
use super::duration::DurationParser;
use super::time::TimeParser;
use super::time_period::TimePeriodParser;
use super::{cap, names, run_strategies, GranularityParser, Strategy};
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{DateTimeResolutionResult, EntityType, FuturePast, ResolvedValue};
use crate::timex;

fn recurrence(timex: String) -> DateTimeResolutionResult {
    let value = ResolvedValue::recurrence(&timex);
    DateTimeResolutionResult::resolved(timex, FuturePast::same(value))
}

pub struct SetParser {
    config: Arc<LocaleConfig>,
    date: DateParser,
    time: TimeParser,
    time_period: TimePeriodParser,
    datetime: DateTimeParser,
    duration: DurationParser,
}

impl SetParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "periodic",
            run: Self::periodic,
        },
        Strategy {
            name: "every_unit",
            run: Self::every_unit,
        },
        Strategy {
            name: "every_duration",
            run: Self::every_duration,
        },
        Strategy {
            name: "every_phrase",
            run: Self::every_phrase,
        },
        Strategy {
            name: "plural_weekday",
            run: Self::plural_weekday,
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

    fn periodic(&self, text: &str, _reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.set.periodic.exact(text) else {
            return Ok(None);
        };
        let Some(word) = cap(&caps, "periodic") else {
            return Ok(None);
        };
        Ok(Some(recurrence(self.config.periodic_set(word)?.to_string())))
    }

    fn every_unit(&self, text: &str, _reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.set.every_unit.exact(text) else {
            return Ok(None);
        };
        let Some(unit) = cap(&caps, "unit") else {
            return Ok(None);
        };
        let unit = self.config.duration_unit(unit)?;
        let step = if cap(&caps, "other").is_some() { 2.0 } else { 1.0 };
        Ok(Some(recurrence(timex::duration(&[(step, unit)]))))
    }

    fn every_duration(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.set.every_duration.exact(text) else {
            return Ok(None);
        };
        let Some(phrase) = cap(&caps, "duration") else {
            return Ok(None);
        };
        Ok(self
            .duration
            .parse_value(phrase)?
            .map(|value| recurrence(value.timex())))
    }

    /// "every <phrase>": the phrase is resolved by the finest parser that
    /// accepts it and its timex becomes the recurrence.
    fn every_phrase(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.set.every_phrase.exact(text) else {
            return Ok(None);
        };
        let Some(phrase) = cap(&caps, "phrase") else {
            return Ok(None);
        };
        let delegates: [&dyn GranularityParser; 4] =
            [&self.datetime, &self.date, &self.time_period, &self.time];
        for parser in delegates {
            let result = parser.resolve(phrase, reference)?;
            if result.success {
                return Ok(Some(recurrence(result.timex)));
            }
        }
        Ok(None)
    }

    fn plural_weekday(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.set.plural_weekday.exact(text) else {
            return Ok(None);
        };
        let Some(weekday) = cap(&caps, "weekday") else {
            return Ok(None);
        };
        let weekday = self.config.weekday(weekday)?;
        Ok(Some(recurrence(timex::fuzzy_weekday(weekday))))
    }
}

impl GranularityParser for SetParser {
    fn entity_type(&self) -> EntityType {
        EntityType::Set
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "set", Self::STRATEGIES, text, reference)
    }
}
