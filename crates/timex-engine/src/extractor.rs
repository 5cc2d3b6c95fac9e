//! Regex-driven span extraction.
//!
//! Extraction is independent of the reference instant. It runs in two
//! stages:
//!
//! 1. **Points**: every granularity's patterns are scanned over the text and
//!    overlapping candidates are resolved, longest first, then by tag
//!    priority.
//! 2. **Composition**: adjacent points are merged into larger spans (a date
//!    and a time become a datetime, two dates over "to" become a date
//!    range, ...), and recurrence and modifier cues next to a span are
//!    pulled into it.

use std::sync::Arc;

use serde_json::json;

use crate::config::{LocaleConfig, Pattern};
use crate::model::{EntityType, ExtractResult, DURATION_WITH_AGO_OR_LATER};

/// Tags in overlap-resolution order: on equal length the earlier tag wins.
const PRIORITY: [EntityType; 10] = [
    EntityType::DateTimePeriod,
    EntityType::DateTime,
    EntityType::DatePeriod,
    EntityType::TimePeriod,
    EntityType::Set,
    EntityType::Holiday,
    EntityType::Date,
    EntityType::Time,
    EntityType::Duration,
    EntityType::TimeZone,
];

fn priority(entity_type: EntityType) -> usize {
    PRIORITY
        .iter()
        .position(|t| *t == entity_type)
        .unwrap_or(PRIORITY.len())
}

/// Pattern name shared by the Date and DateTime "3 days ago" forms.
const DURATION_RELATIVE: &str = "duration_relative";

pub struct DateTimeExtractor {
    config: Arc<LocaleConfig>,
}

impl DateTimeExtractor {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    fn patterns_for(&self, entity_type: EntityType) -> Vec<&Pattern> {
        let p = &self.config.patterns;
        match entity_type {
            EntityType::Date => p.date.all(),
            EntityType::DatePeriod => p.date_period.all(),
            EntityType::Time => p.time.all(),
            EntityType::TimePeriod => p.time_period.all(),
            EntityType::DateTime => p.datetime.all(),
            EntityType::DateTimePeriod => p.datetime_period.all(),
            EntityType::Duration => p.duration.all(),
            EntityType::Holiday => p.holiday.all(),
            EntityType::Set => p.set.all(),
            EntityType::TimeZone => p.timezone.all(),
            EntityType::DateTimeAlt => Vec::new(),
        }
    }

    /// All spans, composed and cue-extended, in text order.
    pub fn extract(&self, text: &str) -> Vec<ExtractResult> {
        let points = self.extract_points(text);
        let merged = self.merge_duration_anchor(text, points);
        let merged = self.merge_date_and_time(text, merged);
        let merged = self.merge_time_of_today(text, merged);
        let merged = self.merge_date_and_time_period(text, merged);
        let merged = self.merge_segment_and_time(text, merged);
        let merged = self.merge_ranges(text, merged);
        let merged: Vec<ExtractResult> = merged
            .into_iter()
            .map(|er| self.extend_set_cue(text, er))
            .collect();
        let extracted = self.extend_modifier_cues(text, merged);
        tracing::debug!(count = extracted.len(), "extracted spans");
        extracted
    }

    /// Spans of one tag only.
    pub fn extract_type(&self, text: &str, entity_type: EntityType) -> Vec<ExtractResult> {
        self.extract(text)
            .into_iter()
            .filter(|er| er.entity_type == entity_type)
            .collect()
    }

    /// Non-overlapping single-pattern matches, before any composition.
    pub fn extract_points(&self, text: &str) -> Vec<ExtractResult> {
        let mut candidates = Vec::new();
        for entity_type in PRIORITY {
            for pattern in self.patterns_for(entity_type) {
                let flag = matches!(entity_type, EntityType::Date | EntityType::DateTime)
                    && pattern.name() == DURATION_RELATIVE;
                for m in pattern.find_iter(text) {
                    let er = ExtractResult::new(m.start(), m.as_str(), entity_type);
                    candidates.push(if flag {
                        er.with_data(json!({ DURATION_WITH_AGO_OR_LATER: true }))
                    } else {
                        er
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.length
                .cmp(&a.length)
                .then_with(|| priority(a.entity_type).cmp(&priority(b.entity_type)))
                .then_with(|| a.start.cmp(&b.start))
        });
        let mut accepted: Vec<ExtractResult> = Vec::new();
        for candidate in candidates {
            if accepted.iter().all(|kept| !kept.overlaps(&candidate)) {
                tracing::trace!(
                    entity_type = %candidate.entity_type,
                    text = %candidate.text,
                    "accepted point"
                );
                accepted.push(candidate);
            }
        }
        accepted.sort_by_key(|er| er.start);
        accepted
    }

    // ── Composition ────────────────────────────────────────────────────────

    /// Merge each adjacent pair for which `combine` returns a tag. `combine`
    /// sees both spans and the text between them, and may claim extra text
    /// before the first span by returning an earlier start. Merged spans
    /// carry `data`.
    fn merge_adjacent<F>(
        &self,
        text: &str,
        items: Vec<ExtractResult>,
        data: Option<&serde_json::Value>,
        combine: F,
    ) -> Vec<ExtractResult>
    where
        F: Fn(&ExtractResult, &ExtractResult, &str) -> Option<(usize, EntityType)>,
    {
        let mut out: Vec<ExtractResult> = Vec::with_capacity(items.len());
        let mut iter = items.into_iter().peekable();
        while let Some(current) = iter.next() {
            let merged = iter.peek().and_then(|next| {
                if next.start < current.end() {
                    return None;
                }
                let gap = &text[current.end()..next.start];
                combine(&current, next, gap).map(|(start, entity_type)| {
                    let er = ExtractResult::new(start, &text[start..next.end()], entity_type);
                    match data {
                        Some(data) => er.with_data(data.clone()),
                        None => er,
                    }
                })
            });
            match merged {
                Some(er) => {
                    iter.next();
                    tracing::trace!(entity_type = %er.entity_type, text = %er.text, "merged spans");
                    out.push(er);
                }
                None => out.push(current),
            }
        }
        out
    }

    /// A duration counted from a date ("3 days before Oct 2", "2 days after
    /// Christmas") becomes one flagged Date.
    fn merge_duration_anchor(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let anchor = &self.config.patterns.connectors.duration_anchor;
        let flag = json!({ DURATION_WITH_AGO_OR_LATER: true });
        self.merge_adjacent(text, items, Some(&flag), |a, b, gap| {
            let counted = a.entity_type == EntityType::Duration
                && matches!(b.entity_type, EntityType::Date | EntityType::Holiday);
            (counted && anchor.is_match(gap)).then_some((a.start, EntityType::Date))
        })
    }

    /// Date + Time (either order) become a DateTime.
    fn merge_date_and_time(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let connector = &self.config.patterns.datetime.connector;
        self.merge_adjacent(text, items, None, |a, b, gap| {
            let pair = (a.entity_type, b.entity_type);
            let date_time = matches!(
                pair,
                (EntityType::Date, EntityType::Time) | (EntityType::Time, EntityType::Date)
            );
            let flagged = a.is_duration_with_ago_or_later() || b.is_duration_with_ago_or_later();
            (date_time && !flagged && connector.is_match(gap)).then_some((a.start, EntityType::DateTime))
        })
    }

    /// A time next to "tonight", "this morning" and the like.
    fn merge_time_of_today(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let p = &self.config.patterns.datetime;
        self.merge_adjacent(text, items, None, |a, b, _gap| {
            if a.entity_type != EntityType::Time && b.entity_type != EntityType::Time {
                return None;
            }
            let joined = &text[a.start..b.end()];
            (p.time_of_today.matches_exactly(joined) || p.today_at_time.matches_exactly(joined))
                .then_some((a.start, EntityType::DateTime))
        })
    }

    /// Date + TimePeriod (either order) become a DateTimePeriod.
    fn merge_date_and_time_period(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let connector = &self.config.patterns.datetime_period.connector;
        self.merge_adjacent(text, items, None, |a, b, gap| {
            let pair = (a.entity_type, b.entity_type);
            let date_period = matches!(
                pair,
                (EntityType::Date, EntityType::TimePeriod) | (EntityType::TimePeriod, EntityType::Date)
            );
            (date_period && connector.is_match(gap)).then_some((a.start, EntityType::DateTimePeriod))
        })
    }

    /// "tomorrow evening" followed by a time becomes a DateTime; the parser
    /// reads the segment as the half-of-day cue.
    fn merge_segment_and_time(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let p = &self.config.patterns;
        self.merge_adjacent(text, items, None, |a, b, gap| {
            if (a.entity_type, b.entity_type) != (EntityType::DateTimePeriod, EntityType::Time)
                || !p.datetime.connector.is_match(gap)
            {
                return None;
            }
            let segment = p.time_period.day_segment.find(&a.text)?;
            let day = format!("{}{}", &a.text[..segment.start()], &a.text[segment.end()..]);
            p.date
                .all()
                .iter()
                .any(|pattern| pattern.matches_exactly(&day))
                .then_some((a.start, EntityType::DateTime))
        })
    }

    /// Two points over a range connector become a period, including a
    /// leading "from"/"between". A bare "and" needs "between".
    fn merge_ranges(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let connectors = &self.config.patterns.connectors;
        self.merge_adjacent(text, items, None, |a, b, gap| {
            let range_type = match (a.entity_type, b.entity_type) {
                (EntityType::Date, EntityType::Date) => EntityType::DatePeriod,
                (EntityType::Time, EntityType::Time) => EntityType::TimePeriod,
                (EntityType::DateTime, EntityType::DateTime | EntityType::Time)
                | (EntityType::Time, EntityType::DateTime) => EntityType::DateTimePeriod,
                _ => return None,
            };
            let connector = connectors.range.find(gap)?;
            if connector.start() != 0 || connector.end() != gap.len() {
                return None;
            }
            let prefix = connectors.preceding_range_prefix.find(&text[..a.start]);
            if gap.trim().eq_ignore_ascii_case("and")
                && !prefix.is_some_and(|m| m.as_str().to_lowercase().starts_with("between"))
            {
                return None;
            }
            let start = prefix.map_or(a.start, |m| m.start());
            Some((start, range_type))
        })
    }

    /// "every"/"each" right before a point turns it into a Set.
    fn extend_set_cue(&self, text: &str, er: ExtractResult) -> ExtractResult {
        let recurring = matches!(
            er.entity_type,
            EntityType::Date | EntityType::Time | EntityType::DateTime | EntityType::TimePeriod
        );
        if !recurring {
            return er;
        }
        match self.config.patterns.set.preceding_cue.find(&text[..er.start]) {
            Some(cue) => ExtractResult::new(cue.start(), &text[cue.start()..er.end()], EntityType::Set),
            None => er,
        }
    }

    /// Pull modifier cues immediately before or after a span into it.
    fn extend_modifier_cues(&self, text: &str, items: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let modifiers = &self.config.patterns.modifiers;
        let mut out: Vec<ExtractResult> = Vec::with_capacity(items.len());
        for (i, er) in items.iter().enumerate() {
            let floor = out.last().map_or(0, ExtractResult::end);
            let ceiling = items.get(i + 1).map_or(text.len(), |next| next.start);
            let flagged = er.is_duration_with_ago_or_later();

            let (mut start, mut end) = (er.start, er.end());
            for (name, cue) in modifiers.in_priority_order() {
                if start == er.start {
                    if let Some(m) = cue.preceding.as_ref().and_then(|re| re.find(&text[floor..er.start])) {
                        start = floor + m.start();
                    }
                }
                // A trailing before/after stays outside a flagged duration.
                if flagged && matches!(name, "before" | "after") {
                    continue;
                }
                if end == er.end() {
                    if let Some(m) = cue.following.as_ref().and_then(|re| re.find(&text[er.end()..ceiling])) {
                        end = er.end() + m.end();
                    }
                }
            }

            if (start, end) == (er.start, er.end()) {
                out.push(er.clone());
            } else {
                let mut extended = ExtractResult::new(start, &text[start..end], er.entity_type);
                extended.data = er.data.clone();
                out.push(extended);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DateTimeExtractor {
        DateTimeExtractor::new(Arc::new(LocaleConfig::english().unwrap()))
    }

    fn spans(text: &str) -> Vec<(String, EntityType)> {
        extractor()
            .extract(text)
            .into_iter()
            .map(|er| (er.text, er.entity_type))
            .collect()
    }

    fn one(span: &str, entity_type: EntityType) -> Vec<(String, EntityType)> {
        vec![(span.to_string(), entity_type)]
    }

    #[test]
    fn test_points_prefer_longest_then_priority() {
        assert_eq!(
            spans("I'll be back tomorrow morning"),
            one("tomorrow morning", EntityType::DateTimePeriod)
        );
        assert_eq!(
            spans("the party is tonight"),
            one("tonight", EntityType::DateTimePeriod)
        );
        assert_eq!(
            spans("see you next week"),
            one("next week", EntityType::DatePeriod)
        );
    }

    #[test]
    fn test_offsets_are_bytes_into_input() {
        let text = "meet on Oct. 2 please";
        let found = extractor().extract(text);
        assert_eq!(found.len(), 1);
        let er = &found[0];
        assert_eq!(&text[er.start..er.end()], er.text);
        assert_eq!(er.entity_type, EntityType::Date);
    }

    #[test]
    fn test_duration_relative_spans_are_flagged() {
        let found = extractor().extract("it shipped 3 days ago");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "3 days ago");
        assert!(found[0].is_duration_with_ago_or_later());

        let found = extractor().extract("for 3 days");
        assert_eq!(found[0].entity_type, EntityType::Duration);
        assert!(!found[0].is_duration_with_ago_or_later());
    }

    #[test]
    fn test_date_and_time_compose() {
        assert_eq!(
            spans("call me tomorrow at 5pm"),
            one("tomorrow at 5pm", EntityType::DateTime)
        );
        assert_eq!(
            spans("at 5pm on Monday works"),
            one("at 5pm on Monday", EntityType::DateTime)
        );
        assert_eq!(
            spans("tonight at 8 then"),
            one("tonight at 8", EntityType::DateTime)
        );
    }

    #[test]
    fn test_segment_and_time_compose() {
        assert_eq!(
            spans("see you tomorrow evening at 7"),
            one("tomorrow evening at 7", EntityType::DateTime)
        );
        assert_eq!(
            spans("tonight"),
            one("tonight", EntityType::DateTimePeriod)
        );
    }

    #[test]
    fn test_date_and_time_period_compose() {
        assert_eq!(
            spans("Friday from 5 to 7pm"),
            one("Friday from 5 to 7pm", EntityType::DateTimePeriod)
        );
    }

    #[test]
    fn test_ranges_compose_with_prefix() {
        assert_eq!(
            spans("away from Oct 2 to Oct 9"),
            one("from Oct 2 to Oct 9", EntityType::DatePeriod)
        );
        assert_eq!(
            spans("between Monday and Friday"),
            one("between Monday and Friday", EntityType::DatePeriod)
        );
        assert_eq!(
            spans("tomorrow 5pm to 7pm"),
            one("tomorrow 5pm to 7pm", EntityType::DateTimePeriod)
        );
    }

    #[test]
    fn test_bare_and_does_not_make_a_range() {
        assert_eq!(
            spans("Monday and Friday"),
            vec![
                ("Monday".to_string(), EntityType::Date),
                ("Friday".to_string(), EntityType::Date)
            ]
        );
    }

    #[test]
    fn test_set_cue() {
        assert_eq!(spans("every Monday"), one("every Monday", EntityType::Set));
        assert_eq!(
            spans("every Monday at 5pm"),
            one("every Monday at 5pm", EntityType::Set)
        );
        assert_eq!(spans("we meet weekly"), one("weekly", EntityType::Set));
    }

    #[test]
    fn test_modifier_cues_extend_spans() {
        assert_eq!(
            spans("finish before next Monday"),
            one("before next Monday", EntityType::Date)
        );
        assert_eq!(
            spans("Oct. 2 or later"),
            one("Oct. 2 or later", EntityType::Date)
        );
        assert_eq!(
            spans("on or before Christmas"),
            one("on or before Christmas", EntityType::Holiday)
        );
    }

    #[test]
    fn test_duration_counted_from_a_date_is_one_span() {
        let found = extractor().extract("submit it 3 days before Oct 2 please");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "3 days before Oct 2");
        assert_eq!(found[0].entity_type, EntityType::Date);
        assert!(found[0].is_duration_with_ago_or_later());

        assert_eq!(
            spans("2 days after Christmas"),
            one("2 days after Christmas", EntityType::Date)
        );
    }

    #[test]
    fn test_leading_before_extends_flagged_duration() {
        let found = extractor().extract("it happened before 3 days ago");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "before 3 days ago");
        assert!(found[0].is_duration_with_ago_or_later());
    }

    #[test]
    fn test_through_cue_extends_span() {
        assert_eq!(
            spans("open through Friday"),
            one("through Friday", EntityType::Date)
        );
    }

    #[test]
    fn test_extract_type_filters() {
        let found = extractor().extract_type("next week at 5pm PST", EntityType::TimeZone);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "PST");
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        assert!(extractor().extract("nothing to see here").is_empty());
    }
}
