//! Locale configuration injected into every parser.
//!
//! A [`LocaleConfig`] bundles the compiled regex [`Pattern`]s each parser
//! strategy matches against, the word dictionaries those patterns are built
//! from, holiday rules, day segment boundaries and a few thresholds. It is
//! immutable after construction and shared behind an `Arc`, so any number of
//! parsers can read it concurrently.
//!
//! Lookups return [`TimexError::MissingLookup`] for absent keys: a pattern
//! matched a word its own dictionary does not know, which is a configuration
//! bug rather than unparseable input.

pub mod english;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::{Captures, Match, Regex};

use crate::error::{Result, TimexError};
use crate::model::{DurationUnit, Modifier, Season};
use crate::number::NumberParser;

// ── Patterns ────────────────────────────────────────────────────────────────

/// A compiled pattern in two forms: `find` scans free text on word
/// boundaries, `exact` must cover the whole (trimmed) input.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: &'static str,
    find: Regex,
    exact: Regex,
}

impl Pattern {
    pub fn new(name: &'static str, source: &str) -> Result<Self> {
        Ok(Self {
            name,
            find: Regex::new(&format!(r"(?i)\b(?:{source})\b"))?,
            exact: Regex::new(&format!(r"(?i)^\s*(?:{source})\s*$"))?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Match<'t>> + 't {
        self.find.find_iter(text)
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find.find(text)
    }

    /// Captures when the pattern spans the whole input.
    pub fn exact<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.exact.captures(text)
    }

    pub fn matches_exactly(&self, text: &str) -> bool {
        self.exact.is_match(text)
    }
}

/// A modifier cue in the four positions the extractor and the merged parser
/// look for it.
#[derive(Debug, Clone)]
pub struct Cue {
    /// Cue at the start of a span, followed by the entity.
    pub leading: Option<Regex>,
    /// Cue at the end of a span, after the entity.
    pub trailing: Option<Regex>,
    /// Cue immediately before a span in the surrounding text.
    pub preceding: Option<Regex>,
    /// Cue immediately after a span in the surrounding text.
    pub following: Option<Regex>,
}

impl Cue {
    pub fn new(leading: Option<&str>, trailing: Option<&str>) -> Result<Self> {
        let compile = |src: String| Regex::new(&src).map_err(TimexError::from);
        Ok(Self {
            leading: leading
                .map(|s| compile(format!(r"(?i)^\s*(?:{s})\s+")))
                .transpose()?,
            trailing: trailing
                .map(|s| compile(format!(r"(?i)\s+(?:{s})\s*$")))
                .transpose()?,
            preceding: leading
                .map(|s| compile(format!(r"(?i)\b(?:{s})\s+$")))
                .transpose()?,
            following: trailing
                .map(|s| compile(format!(r"(?i)^\s+(?:{s})\b")))
                .transpose()?,
        })
    }

    /// Byte length of a leading cue match, if any.
    pub fn strip_leading(&self, text: &str) -> Option<usize> {
        self.leading
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.end())
    }

    /// Byte offset where a trailing cue starts, if any.
    pub fn strip_trailing(&self, text: &str) -> Option<usize> {
        self.trailing
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.start())
    }
}

/// Replace `%NAME%` placeholders with their alternation sources.
pub(crate) fn expand(template: &str, placeholders: &HashMap<&'static str, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in placeholders {
        out = out.replace(&format!("%{name}%"), value);
    }
    out
}

/// Non-capturing alternation of literal words, longest first, with spaces
/// matching any whitespace run.
pub(crate) fn alternation<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    let escaped: Vec<String> = words
        .iter()
        .map(|w| regex::escape(w).replace(' ', r"\s+"))
        .collect();
    format!("(?:{})", escaped.join("|"))
}

// ── Lookup tables ───────────────────────────────────────────────────────────

/// Normalize a matched word for dictionary lookup.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .trim_end_matches('.')
        .to_lowercase()
        .replace('\u{2019}', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A string-keyed dictionary that reports misses as configuration errors.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    table: &'static str,
    entries: HashMap<String, T>,
}

impl<T: Clone> Lookup<T> {
    pub fn new<K: AsRef<str>>(table: &'static str, entries: impl IntoIterator<Item = (K, T)>) -> Self {
        Self {
            table,
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Result<T> {
        self.entries
            .get(&normalize_key(key))
            .cloned()
            .ok_or_else(|| TimexError::MissingLookup {
                table: self.table,
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// ── Domain entries ──────────────────────────────────────────────────────────

/// How a holiday's date is computed for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    Fixed { month: u32, day: u32 },
    /// `cardinal` -1 selects the last occurrence in the month.
    NthWeekday { month: u32, weekday: u32, cardinal: i32 },
    /// Days relative to Easter Sunday.
    EasterOffset { days: i64 },
}

/// A named part of the day with hour boundaries. `end` may be 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySegment {
    /// Timex code (`MO`, `AF`, ...); segments without one render as ranges.
    pub code: Option<&'static str>,
    pub start: u32,
    pub end: u32,
    /// Clock times qualified by this segment read as PM.
    pub is_pm: bool,
}

/// The lookup tables a locale supplies.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub months: Lookup<u32>,
    pub weekdays: Lookup<u32>,
    pub cardinals: Lookup<u32>,
    pub relative_swift: Lookup<i32>,
    pub special_days: Lookup<i64>,
    pub duration_units: Lookup<DurationUnit>,
    pub duration_direction: Lookup<i32>,
    pub duration_modifiers: Lookup<Modifier>,
    pub period_positions: Lookup<Modifier>,
    pub seasons: Lookup<Season>,
    pub decade_words: Lookup<u32>,
    pub holidays: Lookup<HolidayRule>,
    pub day_segments: Lookup<DaySegment>,
    pub periodic_sets: Lookup<&'static str>,
    pub special_times: Lookup<(u32, u32)>,
    pub timezone_abbreviations: Lookup<i32>,
    pub timezone_names: Lookup<&'static str>,
}

// ── Pattern groups ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DatePatterns {
    pub iso: Pattern,
    pub numeric: Pattern,
    pub month_day: Pattern,
    pub day_month: Pattern,
    pub special_day: Pattern,
    pub bare_day: Pattern,
    pub day_of_relative_month: Pattern,
    pub nth_weekday_of_month: Pattern,
    pub relative_weekday: Pattern,
    pub weekday_of_relative_week: Pattern,
    pub weekday: Pattern,
    pub duration_relative: Pattern,
    /// "3 days before Oct 2": a duration counted from any date. Only used
    /// to resolve spans the extractor has already composed.
    pub anchored_duration: Pattern,
}

impl DatePatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![
            &self.iso,
            &self.numeric,
            &self.month_day,
            &self.day_month,
            &self.special_day,
            &self.bare_day,
            &self.day_of_relative_month,
            &self.nth_weekday_of_month,
            &self.relative_weekday,
            &self.weekday_of_relative_week,
            &self.weekday,
            &self.duration_relative,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct DatePeriodPatterns {
    pub month_with_day_range: Pattern,
    pub month_first_day_range: Pattern,
    pub relative_unit: Pattern,
    pub relative_month: Pattern,
    pub bare_month: Pattern,
    pub half: Pattern,
    pub to_date: Pattern,
    pub relative_duration: Pattern,
    pub year_and_month: Pattern,
    pub numeric_year_month: Pattern,
    pub month_of_relative_year: Pattern,
    pub year_range: Pattern,
    pub month_range: Pattern,
    pub day_range: Pattern,
    pub year: Pattern,
    pub week_of_month: Pattern,
    pub iso_week: Pattern,
    pub season: Pattern,
    pub quarter: Pattern,
    pub quarter_abbr: Pattern,
    pub decade: Pattern,
}

impl DatePeriodPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![
            &self.month_with_day_range,
            &self.month_first_day_range,
            &self.relative_unit,
            &self.relative_month,
            &self.bare_month,
            &self.half,
            &self.to_date,
            &self.relative_duration,
            &self.year_and_month,
            &self.numeric_year_month,
            &self.month_of_relative_year,
            &self.year_range,
            &self.month_range,
            &self.day_range,
            &self.year,
            &self.week_of_month,
            &self.iso_week,
            &self.season,
            &self.quarter,
            &self.quarter_abbr,
            &self.decade,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TimePatterns {
    pub digital: Pattern,
    pub hour_with_ampm: Pattern,
    pub at_hour: Pattern,
    pub spoken: Pattern,
    pub hour_minute_words: Pattern,
    pub special: Pattern,
}

impl TimePatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![
            &self.digital,
            &self.hour_with_ampm,
            &self.at_hour,
            &self.spoken,
            &self.hour_minute_words,
            &self.special,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TimePeriodPatterns {
    /// Hour ranges, each with `start`, `start_ampm`, `end`, `end_ampm` groups.
    pub hour_ranges: Vec<Pattern>,
    pub day_segment: Pattern,
}

impl TimePeriodPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        let mut all: Vec<&Pattern> = self.hour_ranges.iter().collect();
        all.push(&self.day_segment);
        all
    }
}

#[derive(Debug, Clone)]
pub struct DateTimePatterns {
    pub now: Pattern,
    pub time_of_today: Pattern,
    pub today_at_time: Pattern,
    pub duration_relative: Pattern,
    /// Text allowed between a date and a time; group `segment` carries a
    /// day-part cue.
    pub connector: Regex,
}

impl DateTimePatterns {
    /// Patterns that can be scanned over free text. The `time_of_today`
    /// forms only apply to spans the extractor has already composed.
    pub fn all(&self) -> Vec<&Pattern> {
        vec![&self.now, &self.duration_relative]
    }
}

#[derive(Debug, Clone)]
pub struct DateTimePeriodPatterns {
    pub relative_segment: Pattern,
    pub relative_duration: Pattern,
    /// Leftover words between a date and a time period (`this`, `last`, ...).
    pub connector: Regex,
}

impl DateTimePeriodPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![&self.relative_segment, &self.relative_duration]
    }
}

#[derive(Debug, Clone)]
pub struct DurationPatterns {
    pub number_with_unit: Pattern,
    pub half_unit: Pattern,
    /// One `(num, unit)` pair; iterated over a compound duration.
    pub part: Regex,
}

impl DurationPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![&self.number_with_unit, &self.half_unit]
    }
}

#[derive(Debug, Clone)]
pub struct HolidayPatterns {
    pub holiday: Pattern,
}

impl HolidayPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![&self.holiday]
    }
}

#[derive(Debug, Clone)]
pub struct SetPatterns {
    pub periodic: Pattern,
    pub every_unit: Pattern,
    pub every_duration: Pattern,
    pub every_phrase: Pattern,
    pub plural_weekday: Pattern,
    /// Recurrence cue immediately before another entity.
    pub preceding_cue: Regex,
}

impl SetPatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![
            &self.periodic,
            &self.every_unit,
            &self.every_duration,
            &self.plural_weekday,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TimeZonePatterns {
    pub utc_offset: Pattern,
    pub abbreviation: Pattern,
    pub named: Pattern,
    pub iana: Pattern,
}

impl TimeZonePatterns {
    pub fn all(&self) -> Vec<&Pattern> {
        vec![&self.utc_offset, &self.abbreviation, &self.named, &self.iana]
    }
}

#[derive(Debug, Clone)]
pub struct ModifierPatterns {
    pub before: Cue,
    pub after: Cue,
    pub until: Cue,
    pub equal: Cue,
    pub since: Cue,
    /// Cue wording that includes the boundary itself ("on or before").
    pub inclusive: Regex,
}

impl ModifierPatterns {
    /// Cues in priority order.
    pub fn in_priority_order(&self) -> [(&'static str, &Cue); 5] {
        [
            ("before", &self.before),
            ("after", &self.after),
            ("until", &self.until),
            ("equal", &self.equal),
            ("since", &self.since),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct ConnectorPatterns {
    /// Range connector between two points ("to", "-", "and").
    pub range: Regex,
    /// Range marker at the start of a span ("from", "between").
    pub range_prefix: Regex,
    /// Range marker right before a span in the surrounding text.
    pub preceding_range_prefix: Regex,
    /// Gap between a duration and the date it counts from ("before", "after").
    pub duration_anchor: Regex,
}

#[derive(Debug, Clone)]
pub struct Patterns {
    pub date: DatePatterns,
    pub date_period: DatePeriodPatterns,
    pub time: TimePatterns,
    pub time_period: TimePeriodPatterns,
    pub datetime: DateTimePatterns,
    pub datetime_period: DateTimePeriodPatterns,
    pub duration: DurationPatterns,
    pub holiday: HolidayPatterns,
    pub set: SetPatterns,
    pub timezone: TimeZonePatterns,
    pub modifiers: ModifierPatterns,
    pub connectors: ConnectorPatterns,
}

// ── LocaleConfig ────────────────────────────────────────────────────────────

/// Everything locale-specific the engine consumes.
#[derive(Clone)]
pub struct LocaleConfig {
    pub name: &'static str,
    pub patterns: Patterns,
    pub dictionaries: Dictionaries,
    /// Two-digit years below this land in the current century.
    pub two_digit_year_split: i32,
    /// Token prepended to a bare day when re-parsing it as a date.
    pub token_before_date: &'static str,
    number_parser: Option<Arc<dyn NumberParser>>,
}

impl fmt::Debug for LocaleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleConfig")
            .field("name", &self.name)
            .field("two_digit_year_split", &self.two_digit_year_split)
            .field("token_before_date", &self.token_before_date)
            .field("number_parser", &self.number_parser)
            .finish_non_exhaustive()
    }
}

impl LocaleConfig {
    pub fn with_number_parser(mut self, parser: Arc<dyn NumberParser>) -> Self {
        self.number_parser = Some(parser);
        self
    }

    /// Drop the numeric collaborator. Every parse that needs a number then
    /// fails with [`TimexError::MissingCollaborator`].
    pub fn without_number_parser(mut self) -> Self {
        self.number_parser = None;
        self
    }

    pub fn number_parser(&self) -> Result<&dyn NumberParser> {
        self.number_parser
            .as_deref()
            .ok_or(TimexError::MissingCollaborator("number parser"))
    }

    /// Parse a cardinal quantity through the injected number parser.
    pub fn number(&self, text: &str) -> Result<Option<f64>> {
        Ok(self.number_parser()?.parse(text))
    }

    /// Parse a day-of-month or other ordinal ("15", "15th", "fifteenth").
    pub fn ordinal(&self, text: &str) -> Result<Option<i64>> {
        Ok(self.number_parser()?.parse_ordinal(text))
    }

    pub fn month(&self, key: &str) -> Result<u32> {
        self.dictionaries.months.get(key)
    }

    pub fn weekday(&self, key: &str) -> Result<u32> {
        self.dictionaries.weekdays.get(key)
    }

    pub fn cardinal(&self, key: &str) -> Result<u32> {
        self.dictionaries.cardinals.get(key)
    }

    pub fn swift(&self, key: &str) -> Result<i32> {
        self.dictionaries.relative_swift.get(key)
    }

    pub fn special_day(&self, key: &str) -> Result<i64> {
        self.dictionaries.special_days.get(key)
    }

    pub fn duration_unit(&self, key: &str) -> Result<DurationUnit> {
        self.dictionaries.duration_units.get(key)
    }

    pub fn duration_direction(&self, key: &str) -> Result<i32> {
        self.dictionaries.duration_direction.get(key)
    }

    pub fn duration_modifier(&self, key: &str) -> Result<Modifier> {
        self.dictionaries.duration_modifiers.get(key)
    }

    pub fn period_position(&self, key: &str) -> Result<Modifier> {
        self.dictionaries.period_positions.get(key)
    }

    pub fn season(&self, key: &str) -> Result<Season> {
        self.dictionaries.seasons.get(key)
    }

    pub fn decade_word(&self, key: &str) -> Result<u32> {
        self.dictionaries.decade_words.get(key)
    }

    pub fn holiday(&self, key: &str) -> Result<HolidayRule> {
        self.dictionaries.holidays.get(key)
    }

    pub fn day_segment(&self, key: &str) -> Result<DaySegment> {
        self.dictionaries.day_segments.get(key)
    }

    pub fn periodic_set(&self, key: &str) -> Result<&'static str> {
        self.dictionaries.periodic_sets.get(key)
    }

    pub fn special_time(&self, key: &str) -> Result<(u32, u32)> {
        self.dictionaries.special_times.get(key)
    }

    pub fn timezone_abbreviation(&self, key: &str) -> Result<i32> {
        self.dictionaries.timezone_abbreviations.get(key)
    }

    pub fn timezone_name(&self, key: &str) -> Result<&'static str> {
        self.dictionaries.timezone_names.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_find_and_exact() {
        let p = Pattern::new("weekday", "monday|tuesday").unwrap();
        assert_eq!(p.find("see you Monday!").map(|m| m.as_str()), Some("Monday"));
        assert!(p.find("mondays").is_none());
        assert!(p.matches_exactly("  tuesday "));
        assert!(!p.matches_exactly("next tuesday"));
    }

    #[test]
    fn test_alternation_prefers_longest() {
        let alt = alternation(["a", "a couple of", "an"]);
        assert_eq!(alt, r"(?:a\s+couple\s+of|an|a)");
    }

    #[test]
    fn test_expand_placeholders() {
        let mut ph = HashMap::new();
        ph.insert("MONTH", "(?:jan|feb)".to_string());
        assert_eq!(expand("(?P<m>%MONTH%) x", &ph), "(?P<m>(?:jan|feb)) x");
    }

    #[test]
    fn test_lookup_normalizes_keys() {
        let table = Lookup::new("months", [("Oct", 10u32)]);
        assert_eq!(table.get("  OCT. ").unwrap(), 10);
        let err = table.get("octember").unwrap_err();
        assert!(matches!(err, TimexError::MissingLookup { table: "months", .. }));
    }

    #[test]
    fn test_cue_positions() {
        let cue = Cue::new(Some("before|prior to"), Some(r"or\s+before")).unwrap();
        assert_eq!(cue.strip_leading("prior to Monday"), Some(9));
        assert_eq!(cue.strip_trailing("Monday or before"), Some(6));
        assert!(cue.preceding.as_ref().unwrap().is_match("leave before "));
        assert!(cue.following.as_ref().unwrap().is_match(" or before noon"));
    }
}
