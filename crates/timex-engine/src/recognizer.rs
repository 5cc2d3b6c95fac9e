//! Top-level recognizer: extraction followed by merged parsing.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::{Result, TimexError};
use crate::extractor::DateTimeExtractor;
use crate::model::{DateTimeParseResult, EntityType};
use crate::parsers::MergedParser;

const REFERENCE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a reference instant. A bare date is taken at midnight.
///
/// ```
/// use timex_engine::parse_reference;
///
/// let at = parse_reference("2016-11-07T12:00").unwrap();
/// assert_eq!(at.to_string(), "2016-11-07 12:00:00");
/// assert!(parse_reference("someday").is_err());
/// ```
pub fn parse_reference(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    REFERENCE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(calendar::midnight)
        })
        .ok_or_else(|| {
            TimexError::InvalidReference(format!(
                "'{s}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]"
            ))
        })
}

pub struct DateTimeRecognizer {
    extractor: DateTimeExtractor,
    parser: MergedParser,
}

impl DateTimeRecognizer {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            extractor: DateTimeExtractor::new(config.clone()),
            parser: MergedParser::new(config),
        }
    }

    /// A recognizer over the bundled English locale.
    pub fn english() -> Result<Self> {
        Ok(Self::new(Arc::new(LocaleConfig::english()?)))
    }

    pub fn extractor(&self) -> &DateTimeExtractor {
        &self.extractor
    }

    pub fn parser(&self) -> &MergedParser {
        &self.parser
    }

    /// Recognize every date/time mention in `text` relative to `reference`.
    ///
    /// Spans that no parser resolves are dropped; the result is ordered by
    /// start offset.
    ///
    /// # Errors
    ///
    /// Returns [`TimexError::MissingLookup`] when a pattern matches a word
    /// the locale's lookup tables lack. Text without any date is not an
    /// error; it yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use timex_engine::DateTimeRecognizer;
    ///
    /// let recognizer = DateTimeRecognizer::english().unwrap();
    /// let reference = NaiveDate::from_ymd_opt(2016, 11, 7)
    ///     .unwrap()
    ///     .and_hms_opt(12, 0, 0)
    ///     .unwrap();
    ///
    /// let results = recognizer.recognize("I'll go back Oct. 2", reference).unwrap();
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].text, "Oct. 2");
    /// assert_eq!(results[0].timex_str.as_deref(), Some("XXXX-10-02"));
    /// ```
    pub fn recognize(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Vec<DateTimeParseResult>> {
        let mut results = Vec::new();
        for er in self.extractor.extract(text) {
            match self.parser.parse(&er, reference)? {
                Some(result) if result.success() => results.push(result),
                _ => {
                    tracing::debug!(text = %er.text, entity_type = %er.entity_type, "span not resolved");
                }
            }
        }
        Ok(results)
    }

    /// Like [`recognize`](Self::recognize), keeping only the listed tags.
    pub fn recognize_types(
        &self,
        text: &str,
        reference: NaiveDateTime,
        types: &[EntityType],
    ) -> Result<Vec<DateTimeParseResult>> {
        let mut results = self.recognize(text, reference)?;
        if !types.is_empty() {
            results.retain(|r| types.contains(&r.entity_type));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifier, ResolvedValue};
    use crate::parsers::test_support::*;

    fn recognize(text: &str) -> Vec<DateTimeParseResult> {
        DateTimeRecognizer::english()
            .unwrap()
            .recognize(text, reference())
            .unwrap()
    }

    fn only(text: &str) -> DateTimeParseResult {
        let mut results = recognize(text);
        assert_eq!(results.len(), 1, "{text}: {results:?}");
        results.remove(0)
    }

    fn future_instant(r: &DateTimeParseResult) -> NaiveDateTime {
        r.resolution.future().and_then(ResolvedValue::as_instant).unwrap()
    }

    fn past_instant(r: &DateTimeParseResult) -> NaiveDateTime {
        r.resolution.past().and_then(ResolvedValue::as_instant).unwrap()
    }

    #[test]
    fn test_parse_reference_formats() {
        assert_eq!(parse_reference("2016-11-07T12:00").unwrap(), reference());
        assert_eq!(parse_reference("2016-11-07 12:00:00").unwrap(), reference());
        assert_eq!(
            parse_reference("2016-11-07").unwrap(),
            at(2016, 11, 7, 0, 0)
        );
        assert!(matches!(
            parse_reference("next tuesday"),
            Err(TimexError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_bare_day_of_month() {
        let r = only("see you on 15");
        assert_eq!(r.timex_str.as_deref(), Some("XXXX-XX-15"));
        assert_eq!(future_instant(&r).date(), date(2016, 11, 15));
        assert_eq!(past_instant(&r).date(), date(2016, 10, 15));
    }

    #[test]
    fn test_month_day_brackets_reference() {
        let r = only("I'll go back Oct. 2");
        assert_eq!(r.timex_str.as_deref(), Some("XXXX-10-02"));
        assert_eq!(future_instant(&r).date(), date(2017, 10, 2));
        assert_eq!(past_instant(&r).date(), date(2016, 10, 2));
    }

    #[test]
    fn test_relative_weekday() {
        let r = only("I'll go back next Sunday");
        assert_eq!(r.timex_str.as_deref(), Some("2016-11-20"));
        assert_eq!(r.start, "I'll go back ".len());
    }

    #[test]
    fn test_duration_ago() {
        let r = only("I went back 3 days ago");
        assert_eq!(r.entity_type, EntityType::Date);
        assert_eq!(r.timex_str.as_deref(), Some("2016-11-04"));
    }

    #[test]
    fn test_modifier_is_applied() {
        let r = only("finish it before next Monday");
        assert_eq!(r.text, "before next Monday");
        assert_eq!(r.resolution.modifier, Some(Modifier::Before));
        assert!(r.range_changing);
    }

    #[test]
    fn test_several_mentions_in_order() {
        let results = recognize("let's meet tomorrow at 5pm for 2 hours");
        let tags: Vec<(EntityType, Option<&str>)> = results
            .iter()
            .map(|r| (r.entity_type, r.timex_str.as_deref()))
            .collect();
        assert_eq!(
            tags,
            vec![
                (EntityType::DateTime, Some("2016-11-08T17")),
                (EntityType::Duration, Some("PT2H")),
            ]
        );
    }

    #[test]
    fn test_type_filter() {
        let recognizer = DateTimeRecognizer::english().unwrap();
        let results = recognizer
            .recognize_types(
                "let's meet tomorrow at 5pm for 2 hours",
                reference(),
                &[EntityType::Duration],
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "2 hours");
    }

    #[test]
    fn test_duration_counted_from_a_date() {
        let r = only("submit it 3 days before Oct 2");
        assert_eq!(r.entity_type, EntityType::Date);
        assert_eq!(r.text, "3 days before Oct 2");
        assert_eq!(r.timex_str.as_deref(), Some("XXXX-09-29"));
        assert_eq!(r.resolution.modifier, None);
        assert!(!r.range_changing);
        assert_eq!(future_instant(&r).date(), date(2017, 9, 29));
        assert_eq!(past_instant(&r).date(), date(2016, 9, 29));
    }

    #[test]
    fn test_segment_then_time() {
        let r = only("call me tomorrow afternoon at 3");
        assert_eq!(r.entity_type, EntityType::DateTime);
        assert_eq!(r.timex_str.as_deref(), Some("2016-11-08T15"));
    }

    #[test]
    fn test_huge_durations_are_dropped() {
        for text in [
            "it was 999999999999 days ago",
            "back in 300000 years",
            "99999999999 hours ago",
        ] {
            let results = recognize(text);
            assert!(
                results.iter().all(|r| r.entity_type != EntityType::Date
                    && r.entity_type != EntityType::DateTime),
                "{text}: {results:?}"
            );
        }
    }

    #[test]
    fn test_plain_text_is_empty() {
        assert!(recognize("the quick brown fox").is_empty());
    }
}
