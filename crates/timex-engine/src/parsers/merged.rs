//! Merged parser: the single entry point for extracted spans.
//!
//! A span moves through four steps: a modifier cue ("before", "no later
//! than", "since", ...) is stripped, the bare span goes to the parser for
//! its granularity tag, the original span is restored, and the modifier is
//! re-applied to the resolution.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::{
    DateParser, DatePeriodParser, DateTimeParser, DateTimePeriodParser, DurationParser,
    GranularityParser, HolidayParser, SetParser, TimeParser, TimePeriodParser, TimeZoneParser,
};
use crate::config::{Cue, LocaleConfig};
use crate::error::Result;
use crate::model::{DateTimeParseResult, EntityType, ExtractResult, Modifier};

/// A modifier cue found at the edge of a span.
#[derive(Debug, Clone, PartialEq)]
struct StrippedCue {
    modifier: Option<Modifier>,
    /// Byte range of the entity inside the span.
    entity: std::ops::Range<usize>,
}

pub struct MergedParser {
    config: Arc<LocaleConfig>,
    date: DateParser,
    date_period: DatePeriodParser,
    time: TimeParser,
    time_period: TimePeriodParser,
    datetime: DateTimeParser,
    datetime_period: DateTimePeriodParser,
    duration: DurationParser,
    holiday: HolidayParser,
    set: SetParser,
    timezone: TimeZoneParser,
}

impl MergedParser {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            date: DateParser::new(config.clone()),
            date_period: DatePeriodParser::new(config.clone()),
            time: TimeParser::new(config.clone()),
            time_period: TimePeriodParser::new(config.clone()),
            datetime: DateTimeParser::new(config.clone()),
            datetime_period: DateTimePeriodParser::new(config.clone()),
            duration: DurationParser::new(config.clone()),
            holiday: HolidayParser::new(config.clone()),
            set: SetParser::new(config.clone()),
            timezone: TimeZoneParser::new(config.clone()),
            config,
        }
    }

    fn parser_for(&self, entity_type: EntityType) -> Option<&dyn GranularityParser> {
        Some(match entity_type {
            EntityType::Date => &self.date,
            EntityType::DatePeriod => &self.date_period,
            EntityType::Time => &self.time,
            EntityType::TimePeriod => &self.time_period,
            EntityType::DateTime => &self.datetime,
            EntityType::DateTimePeriod => &self.datetime_period,
            EntityType::Duration => &self.duration,
            EntityType::Holiday => &self.holiday,
            EntityType::Set => &self.set,
            EntityType::TimeZone => &self.timezone,
            EntityType::DateTimeAlt => return None,
        })
    }

    fn cue_modifier(name: &str, inclusive: bool) -> Option<Modifier> {
        match (name, inclusive) {
            ("before", false) => Some(Modifier::Before),
            ("before", true) | ("until", _) => Some(Modifier::Until),
            ("after", false) => Some(Modifier::After),
            ("after", true) | ("since", _) => Some(Modifier::Since),
            _ => None,
        }
    }

    /// The highest-priority cue at either edge of `er`, if any. Spans
    /// flagged as "3 days ago"-style durations keep a trailing before/after
    /// word, which belongs to the duration.
    fn strip_cue(&self, er: &ExtractResult) -> Option<StrippedCue> {
        let modifiers = &self.config.patterns.modifiers;
        let text = er.text.as_str();
        let flagged = er.is_duration_with_ago_or_later();

        for (name, cue) in modifiers.in_priority_order() {
            let allow_trailing = !(flagged && matches!(name, "before" | "after"));
            let Some((cue_text, entity)) = Self::locate(cue, text, allow_trailing) else {
                continue;
            };
            if entity.is_empty() || text[entity.clone()].trim().is_empty() {
                continue;
            }
            let inclusive = modifiers.inclusive.is_match(cue_text);
            return Some(StrippedCue {
                modifier: Self::cue_modifier(name, inclusive),
                entity,
            });
        }
        None
    }

    fn locate<'t>(
        cue: &Cue,
        text: &'t str,
        allow_trailing: bool,
    ) -> Option<(&'t str, std::ops::Range<usize>)> {
        if let Some(end) = cue.strip_leading(text) {
            return Some((&text[..end], end..text.len()));
        }
        if !allow_trailing {
            return None;
        }
        cue.strip_trailing(text)
            .map(|start| (&text[start..], 0..start))
    }

    /// Parse one extracted span. Spans tagged [`EntityType::DateTimeAlt`]
    /// have no parser and yield `Ok(None)`.
    pub fn parse(
        &self,
        er: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeParseResult>> {
        let Some(parser) = self.parser_for(er.entity_type) else {
            tracing::debug!(entity_type = %er.entity_type, text = %er.text, "no parser for tag");
            return Ok(None);
        };

        let Some(cue) = self.strip_cue(er) else {
            return parser.parse(er, reference).map(Some);
        };
        tracing::debug!(
            text = %er.text,
            modifier = ?cue.modifier,
            "stripped modifier cue"
        );

        let mut inner = ExtractResult::new(
            er.start + cue.entity.start,
            er.text[cue.entity.clone()].trim(),
            er.entity_type,
        );
        inner.data = er.data.clone();
        let mut result = parser.parse(&inner, reference)?;

        result.start = er.start;
        result.length = er.length;
        result.text = er.text.clone();
        if let Some(modifier) = cue.modifier.filter(|_| result.success()) {
            result.resolution.modifier = Some(modifier);
            result.range_changing = modifier.is_range_changing();
        }
        Ok(Some(result))
    }
}
