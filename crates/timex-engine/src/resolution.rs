//! Flattening of parse results into serializable resolution entries.
//!
//! A parse result carries a future and a past candidate; callers usually want
//! a flat list in the `{timex, type, value | start/end, mod}` shape instead.
//! The past candidate comes first and the future one follows only when it
//! differs. A value that lacks an am/pm cue contributes a second entry for
//! the afternoon reading, and a range-changing modifier turns a point or a
//! period into an open-ended range.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{
    Comment, DateTimeParseResult, EntityType, FuturePast, Modifier, ResolvedValue,
};
use crate::timex;

/// One flattened resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEntry {
    pub timex: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "mod", default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A parse result together with its flattened entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognized {
    pub start: usize,
    pub length: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub resolution: Vec<ResolutionEntry>,
}

impl From<&DateTimeParseResult> for Recognized {
    fn from(result: &DateTimeParseResult) -> Self {
        Self {
            start: result.start,
            length: result.length,
            text: result.text.clone(),
            entity_type: result.entity_type,
            resolution: resolve(result),
        }
    }
}

/// Flatten one parse result. Unsuccessful results yield no entries.
pub fn resolve(result: &DateTimeParseResult) -> Vec<ResolutionEntry> {
    let resolution = &result.resolution;
    let Some(value) = resolution.value.as_ref().filter(|_| resolution.success) else {
        return Vec::new();
    };

    let mut readings = vec![(resolution.timex.clone(), value.clone())];
    if resolution.comment == Some(Comment::AmPm) {
        readings.push((
            timex::shift_hours(&resolution.timex, 12),
            value.clone().map(|v| shift_value(v, 12)),
        ));
    }

    let mut entries = Vec::new();
    for (timex, candidates) in readings {
        let FuturePast { future, past } = candidates;
        let ambiguous = future != past;
        entries.push(entry(result, &timex, &past));
        if ambiguous {
            entries.push(entry(result, &timex, &future));
        }
    }
    entries.dedup();
    entries
}

fn shift_value(value: ResolvedValue, hours: i64) -> ResolvedValue {
    let shift = Duration::hours(hours);
    match value {
        ResolvedValue::Instant(at) => ResolvedValue::Instant(at + shift),
        ResolvedValue::Range { start, end } => ResolvedValue::Range {
            start: start + shift,
            end: end + shift,
        },
        other => other,
    }
}

fn entry(result: &DateTimeParseResult, timex: &str, value: &ResolvedValue) -> ResolutionEntry {
    let entity_type = result.entity_type;
    let modifier = result.resolution.modifier;
    let mut entry = ResolutionEntry {
        timex: timex.to_string(),
        kind: kind_of(entity_type).to_string(),
        modifier: modifier.map(|m| m.as_str().to_string()),
        value: None,
        start: None,
        end: None,
    };

    let format = |at: NaiveDateTime| format_point(entity_type, at);
    match (value, modifier.filter(|_| result.range_changing)) {
        (ResolvedValue::Instant(at), Some(m)) => {
            entry.kind = range_kind(entity_type).to_string();
            match m {
                Modifier::Before | Modifier::Until => entry.end = Some(format(*at)),
                _ => entry.start = Some(format(*at)),
            }
        }
        (ResolvedValue::Range { start, end }, Some(m)) => {
            entry.kind = range_kind(entity_type).to_string();
            match m {
                Modifier::Before => entry.end = Some(format(*start)),
                Modifier::Until => entry.end = Some(format(*end)),
                Modifier::After => entry.start = Some(format(*end)),
                _ => entry.start = Some(format(*start)),
            }
        }
        (ResolvedValue::Instant(at), None) => entry.value = Some(format(*at)),
        (ResolvedValue::Range { start, end }, None) => {
            entry.start = Some(format(*start));
            entry.end = Some(format(*end));
        }
        (ResolvedValue::Duration(seconds), _) => {
            entry.value = Some(timex::format_number(*seconds));
        }
        (ResolvedValue::Recurrence(set), _) => entry.value = Some(set.clone()),
        (ResolvedValue::UtcOffset(minutes), _) => entry.value = Some(minutes.to_string()),
    }
    entry
}

/// Holidays resolve to plain dates.
fn kind_of(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Holiday => EntityType::Date.as_str(),
        other => other.as_str(),
    }
}

fn range_kind(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Date | EntityType::Holiday | EntityType::DatePeriod => {
            EntityType::DatePeriod.as_str()
        }
        EntityType::Time | EntityType::TimePeriod => EntityType::TimePeriod.as_str(),
        EntityType::DateTime | EntityType::DateTimePeriod => EntityType::DateTimePeriod.as_str(),
        other => other.as_str(),
    }
}

fn format_point(entity_type: EntityType, at: NaiveDateTime) -> String {
    match entity_type {
        EntityType::Date | EntityType::DatePeriod | EntityType::Holiday => {
            at.format("%Y-%m-%d").to_string()
        }
        EntityType::Time | EntityType::TimePeriod => at.format("%H:%M:%S").to_string(),
        _ => at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
