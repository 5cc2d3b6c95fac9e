//! Per-granularity parsers.
//!
//! Every parser is a plain struct holding an `Arc<LocaleConfig>` (plus the
//! sub-parsers it delegates to) and resolves text through an ordered table of
//! [`Strategy`] functions: the first strategy that returns a successful
//! result wins. The tables are exposed through `strategy_names()` so the
//! resolution order can be inspected and tested.

pub mod date;
pub mod date_period;
pub mod datetime;
pub mod datetime_period;
pub mod duration;
pub mod holiday;
pub mod merged;
pub mod set;
pub mod time;
pub mod time_period;
pub mod timezone;

use std::ops::Range;

use chrono::NaiveDateTime;
use regex::Captures;

use crate::config::{LocaleConfig, Pattern};
use crate::error::Result;
use crate::model::{
    DateTimeParseResult, DateTimeResolutionResult, EntityType, ExtractResult,
};

pub use date::DateParser;
pub use date_period::DatePeriodParser;
pub use datetime::DateTimeParser;
pub use datetime_period::DateTimePeriodParser;
pub use duration::{DurationParser, DurationValue};
pub use holiday::HolidayParser;
pub use merged::MergedParser;
pub use set::SetParser;
pub use time::TimeParser;
pub use time_period::TimePeriodParser;
pub use timezone::TimeZoneParser;

/// One named resolution strategy of parser `P`.
pub struct Strategy<P> {
    pub name: &'static str,
    pub run: fn(&P, &str, NaiveDateTime) -> Result<Option<DateTimeResolutionResult>>,
}

/// A parser for one granularity tag.
pub trait GranularityParser: Send + Sync {
    fn entity_type(&self) -> EntityType;

    /// Resolve bare text. `success == false` when nothing matched.
    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult>;

    /// Resolve an extracted span. A span with another tag is not an error,
    /// just an unsuccessful result.
    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> Result<DateTimeParseResult> {
        if er.entity_type != self.entity_type() {
            return Ok(DateTimeParseResult::new(
                er,
                DateTimeResolutionResult::failed(),
            ));
        }
        let resolution = self.resolve(&er.text, reference)?;
        Ok(DateTimeParseResult::new(er, resolution))
    }
}

/// Try each strategy in order; the first success wins.
pub(crate) fn run_strategies<P>(
    parser: &P,
    parser_name: &'static str,
    strategies: &[Strategy<P>],
    text: &str,
    reference: NaiveDateTime,
) -> Result<DateTimeResolutionResult> {
    let text = text.trim();
    for strategy in strategies {
        if let Some(result) = (strategy.run)(parser, text, reference)? {
            if result.success {
                tracing::debug!(
                    parser = parser_name,
                    strategy = strategy.name,
                    text,
                    timex = %result.timex,
                    "strategy matched"
                );
                return Ok(result);
            }
        }
    }
    tracing::trace!(parser = parser_name, text, "no strategy matched");
    Ok(DateTimeResolutionResult::failed())
}

pub(crate) fn names<P>(strategies: &[Strategy<P>]) -> Vec<&'static str> {
    strategies.iter().map(|s| s.name).collect()
}

/// A named capture group as text.
pub(crate) fn cap<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

/// Exact captures from the first pattern that covers the whole text.
pub(crate) fn first_exact<'t>(patterns: &[&Pattern], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|p| p.exact(text))
}

/// The longest span any of `patterns` finds in `text`, skipping `exclude`.
pub(crate) fn longest_match(
    patterns: &[&Pattern],
    text: &str,
    exclude: Option<Range<usize>>,
) -> Option<Range<usize>> {
    patterns
        .iter()
        .flat_map(|p| p.find_iter(text))
        .map(|m| m.range())
        .filter(|r| match &exclude {
            Some(ex) => r.end <= ex.start || r.start >= ex.end,
            None => true,
        })
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.start.cmp(&a.start)))
}

/// Text with the given spans removed.
pub(crate) fn leftover(text: &str, spans: &[Range<usize>]) -> String {
    let mut sorted: Vec<&Range<usize>> = spans.iter().collect();
    sorted.sort_by_key(|r| r.start);
    let mut out = String::new();
    let mut pos = 0;
    for span in sorted {
        if span.start > pos {
            out.push_str(&text[pos..span.start]);
        }
        pos = pos.max(span.end);
    }
    out.push_str(&text[pos.min(text.len())..]);
    out
}

/// Every way to cut `text` around one range connector, with a leading
/// "from"/"between" removed from the first half.
pub(crate) fn range_splits<'t>(config: &LocaleConfig, text: &'t str) -> Vec<(&'t str, &'t str)> {
    let connectors = &config.patterns.connectors;
    let body = match connectors.range_prefix.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    connectors
        .range
        .find_iter(body)
        .map(|m| (body[..m.start()].trim(), body[m.end()..].trim()))
        .filter(|(a, b)| !a.is_empty() && !b.is_empty())
        .collect()
}

/// A four-digit year, or a two-digit one expanded with the locale split.
pub(crate) fn parse_year(config: &LocaleConfig, text: &str) -> Option<i32> {
    let digits = text.trim().trim_start_matches('\'');
    let year: i32 = digits.parse().ok()?;
    if digits.len() <= 2 {
        Some(crate::calendar::expand_two_digit_year(
            year,
            config.two_digit_year_split,
        ))
    } else {
        Some(year)
    }
}

/// Month number from either digits or a month word.
pub(crate) fn parse_month(config: &LocaleConfig, text: &str) -> Result<Option<u32>> {
    let month = match text.trim().parse::<u32>() {
        Ok(m) => m,
        Err(_) => config.month(text)?,
    };
    Ok((1..=12).contains(&month).then_some(month))
}

/// Day of month through the number parser ("15", "15th", "fifteenth").
pub(crate) fn parse_day(config: &LocaleConfig, text: &str) -> Result<Option<u32>> {
    Ok(config
        .ordinal(text)?
        .filter(|d| (1..=31).contains(d))
        .map(|d| d as u32))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftover_removes_spans() {
        let text = "tomorrow at 5pm";
        assert_eq!(leftover(text, &[0..8, 12..15]), " at ");
    }

    #[test]
    fn test_range_splits_strip_prefix() {
        let config = LocaleConfig::english().unwrap();
        let splits = range_splits(&config, "from Oct 2 to Oct 9");
        assert!(splits.contains(&("Oct 2", "Oct 9")));
    }

    #[test]
    fn test_parse_year_two_digits() {
        let config = LocaleConfig::english().unwrap();
        assert_eq!(parse_year(&config, "16"), Some(2016));
        assert_eq!(parse_year(&config, "87"), Some(1987));
        assert_eq!(parse_year(&config, "1999"), Some(1999));
    }
}
