//! Value and result model shared by the extractor, the parsers and the
//! recognizer.
//!
//! Everything here is created fresh per call. Results are plain data with
//! serde derives so callers can ship them as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Annotation key set by the extractor on spans built from a duration plus an
/// "ago"/"later" cue. The merged parser must not read a trailing
/// "before"/"after" on such spans as a range modifier.
pub const DURATION_WITH_AGO_OR_LATER: &str = "duration_with_ago_or_later";

// ── EntityType ──────────────────────────────────────────────────────────────

/// Granularity tag attached to every extracted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "daterange")]
    DatePeriod,
    #[serde(rename = "timerange")]
    TimePeriod,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "datetimerange")]
    DateTimePeriod,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "set")]
    Set,
    #[serde(rename = "holiday")]
    Holiday,
    #[serde(rename = "datetimealt")]
    DateTimeAlt,
    #[serde(rename = "timezone")]
    TimeZone,
}

impl EntityType {
    pub const ALL: [EntityType; 11] = [
        EntityType::Date,
        EntityType::Time,
        EntityType::DatePeriod,
        EntityType::TimePeriod,
        EntityType::DateTime,
        EntityType::DateTimePeriod,
        EntityType::Duration,
        EntityType::Set,
        EntityType::Holiday,
        EntityType::DateTimeAlt,
        EntityType::TimeZone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Date => "date",
            EntityType::Time => "time",
            EntityType::DatePeriod => "daterange",
            EntityType::TimePeriod => "timerange",
            EntityType::DateTime => "datetime",
            EntityType::DateTimePeriod => "datetimerange",
            EntityType::Duration => "duration",
            EntityType::Set => "set",
            EntityType::Holiday => "holiday",
            EntityType::DateTimeAlt => "datetimealt",
            EntityType::TimeZone => "timezone",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "unknown entity type '{s}'. Valid: {}",
                    EntityType::ALL
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

// ── ExtractResult ───────────────────────────────────────────────────────────

/// A tagged text span found by the extractor.
///
/// `start` and `length` are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    pub start: usize,
    pub length: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ExtractResult {
    pub fn new(start: usize, text: impl Into<String>, entity_type: EntityType) -> Self {
        let text = text.into();
        Self {
            start,
            length: text.len(),
            text,
            entity_type,
            data: None,
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn overlaps(&self, other: &ExtractResult) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    pub fn covers(&self, other: &ExtractResult) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    pub fn is_duration_with_ago_or_later(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.get(DURATION_WITH_AGO_OR_LATER))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

// ── FuturePast ──────────────────────────────────────────────────────────────

/// The two candidate resolutions of a mention.
///
/// For an under-specified mention `past <= reference <= future`; for a fully
/// specified one both branches hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuturePast<T> {
    pub future: T,
    pub past: T,
}

impl<T: Clone> FuturePast<T> {
    pub fn same(value: T) -> Self {
        Self {
            future: value.clone(),
            past: value,
        }
    }
}

impl<T> FuturePast<T> {
    pub fn new(future: T, past: T) -> Self {
        Self { future, past }
    }

    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> FuturePast<U> {
        FuturePast {
            future: f(self.future),
            past: f(self.past),
        }
    }

    pub fn as_ref(&self) -> FuturePast<&T> {
        FuturePast {
            future: &self.future,
            past: &self.past,
        }
    }
}

impl<T: PartialEq> FuturePast<T> {
    pub fn is_ambiguous(&self) -> bool {
        self.future != self.past
    }
}

// ── ResolvedValue ───────────────────────────────────────────────────────────

/// One resolved candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedValue {
    Instant(NaiveDateTime),
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Length in seconds.
    Duration(f64),
    /// A recurrence, rendered as `Set: <timex>`.
    Recurrence(String),
    /// Offset from UTC in minutes.
    UtcOffset(i32),
}

impl ResolvedValue {
    pub fn date(date: NaiveDate) -> Self {
        ResolvedValue::Instant(calendar::midnight(date))
    }

    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        ResolvedValue::Range {
            start: calendar::midnight(start),
            end: calendar::midnight(end),
        }
    }

    pub fn recurrence(timex: &str) -> Self {
        ResolvedValue::Recurrence(format!("Set: {timex}"))
    }

    pub fn as_instant(&self) -> Option<NaiveDateTime> {
        match self {
            ResolvedValue::Instant(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match self {
            ResolvedValue::Range { start, end } => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<f64> {
        match self {
            ResolvedValue::Duration(secs) => Some(*secs),
            _ => None,
        }
    }
}

// ── Modifier & comment ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Before,
    After,
    Since,
    Until,
    Early,
    Mid,
    Late,
    More,
    Less,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Before => "before",
            Modifier::After => "after",
            Modifier::Since => "since",
            Modifier::Until => "until",
            Modifier::Early => "start",
            Modifier::Mid => "mid",
            Modifier::Late => "end",
            Modifier::More => "more",
            Modifier::Less => "less",
        }
    }

    /// Modifiers that turn a point or a period into an open-ended range.
    pub fn is_range_changing(&self) -> bool {
        matches!(
            self,
            Modifier::Before | Modifier::After | Modifier::Since | Modifier::Until
        )
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comment {
    /// A 12-hour clock value with no cue for its half of the day.
    AmPm,
}

// ── Calendar units ──────────────────────────────────────────────────────────

/// Duration units ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DurationUnit {
    /// Nominal length in seconds (months are 30 days, years 365).
    pub fn seconds(&self) -> f64 {
        match self {
            DurationUnit::Year => 31_536_000.0,
            DurationUnit::Month => 2_592_000.0,
            DurationUnit::Week => 604_800.0,
            DurationUnit::Day => 86_400.0,
            DurationUnit::Hour => 3_600.0,
            DurationUnit::Minute => 60.0,
            DurationUnit::Second => 1.0,
        }
    }

    /// Single-letter unit code used in duration timexes.
    pub fn code(&self) -> char {
        match self {
            DurationUnit::Year => 'Y',
            DurationUnit::Month | DurationUnit::Minute => 'M',
            DurationUnit::Week => 'W',
            DurationUnit::Day => 'D',
            DurationUnit::Hour => 'H',
            DurationUnit::Second => 'S',
        }
    }

    /// Sub-day units live after the `T` marker.
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            DurationUnit::Hour | DurationUnit::Minute | DurationUnit::Second
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn code(&self) -> &'static str {
        match self {
            Season::Spring => "SP",
            Season::Summer => "SU",
            Season::Fall => "FA",
            Season::Winter => "WI",
        }
    }

    /// Meteorological start month; each season lasts three months.
    pub fn start_month(&self) -> u32 {
        match self {
            Season::Spring => 3,
            Season::Summer => 6,
            Season::Fall => 9,
            Season::Winter => 12,
        }
    }
}

// ── Resolution results ──────────────────────────────────────────────────────

/// The working and output value of every granularity parser.
///
/// `success == false` means "no match" and is never an error. The `Default`
/// value is the failed result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTimeResolutionResult {
    pub success: bool,
    pub timex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FuturePast<ResolvedValue>>,
    #[serde(rename = "mod", skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(default)]
    pub is_lunar: bool,
}

impl DateTimeResolutionResult {
    pub fn failed() -> Self {
        Self::default()
    }

    pub fn resolved(timex: impl Into<String>, value: FuturePast<ResolvedValue>) -> Self {
        Self {
            success: true,
            timex: timex.into(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A fully specified instant.
    pub fn instant(timex: impl Into<String>, at: NaiveDateTime) -> Self {
        Self::resolved(timex, FuturePast::same(ResolvedValue::Instant(at)))
    }

    pub fn date(timex: impl Into<String>, dates: FuturePast<NaiveDate>) -> Self {
        Self::resolved(timex, dates.map(ResolvedValue::date))
    }

    pub fn range(
        timex: impl Into<String>,
        ranges: FuturePast<(NaiveDateTime, NaiveDateTime)>,
    ) -> Self {
        Self::resolved(
            timex,
            ranges.map(|(start, end)| ResolvedValue::Range { start, end }),
        )
    }

    pub fn date_range(timex: impl Into<String>, ranges: FuturePast<(NaiveDate, NaiveDate)>) -> Self {
        Self::resolved(
            timex,
            ranges.map(|(start, end)| ResolvedValue::date_range(start, end)),
        )
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn future(&self) -> Option<&ResolvedValue> {
        self.value.as_ref().map(|v| &v.future)
    }

    pub fn past(&self) -> Option<&ResolvedValue> {
        self.value.as_ref().map(|v| &v.past)
    }
}

/// The externally visible unit: a span plus its resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeParseResult {
    pub start: usize,
    pub length: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub resolution: DateTimeResolutionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timex_str: Option<String>,
    #[serde(default)]
    pub range_changing: bool,
}

impl DateTimeParseResult {
    pub fn new(er: &ExtractResult, resolution: DateTimeResolutionResult) -> Self {
        let timex_str = resolution
            .success
            .then(|| resolution.timex.clone())
            .filter(|t| !t.is_empty());
        Self {
            start: er.start,
            length: er.length,
            text: er.text.clone(),
            entity_type: er.entity_type,
            resolution,
            timex_str,
            range_changing: false,
        }
    }

    pub fn success(&self) -> bool {
        self.resolution.success
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_type_round_trips_through_str() {
        for t in EntityType::ALL {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), t);
        }
        assert!("weekday".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_entity_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&EntityType::DateTimePeriod).unwrap(),
            "\"datetimerange\""
        );
    }

    #[test]
    fn test_extract_result_overlap() {
        let a = ExtractResult::new(0, "next week", EntityType::DatePeriod);
        let b = ExtractResult::new(5, "week on", EntityType::Date);
        let c = ExtractResult::new(9, " x", EntityType::Date);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.end(), 9);
    }

    #[test]
    fn test_duration_flag() {
        let er = ExtractResult::new(0, "3 days ago", EntityType::Date)
            .with_data(json!({ "duration_with_ago_or_later": true }));
        assert!(er.is_duration_with_ago_or_later());
        assert!(!ExtractResult::new(0, "x", EntityType::Date).is_duration_with_ago_or_later());
    }

    #[test]
    fn test_future_past_helpers() {
        let fp = FuturePast::same(3);
        assert!(!fp.is_ambiguous());
        let fp = FuturePast::new(1, 2).map(|v| v * 10);
        assert_eq!(fp, FuturePast::new(10, 20));
        assert!(fp.is_ambiguous());
    }

    #[test]
    fn test_failed_result_has_no_timex_str() {
        let er = ExtractResult::new(0, "blah", EntityType::Date);
        let pr = DateTimeParseResult::new(&er, DateTimeResolutionResult::failed());
        assert!(!pr.success());
        assert_eq!(pr.timex_str, None);
    }

    #[test]
    fn test_duration_unit_order_is_coarse_to_fine() {
        let mut units = vec![DurationUnit::Minute, DurationUnit::Year, DurationUnit::Day];
        units.sort();
        assert_eq!(
            units,
            vec![DurationUnit::Year, DurationUnit::Day, DurationUnit::Minute]
        );
    }

    #[test]
    fn test_range_changing_modifiers() {
        assert!(Modifier::Before.is_range_changing());
        assert!(Modifier::Until.is_range_changing());
        assert!(!Modifier::Early.is_range_changing());
        assert!(!Modifier::More.is_range_changing());
    }
}
