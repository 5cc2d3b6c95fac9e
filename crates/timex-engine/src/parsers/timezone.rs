//! TimeZone parser: UTC offsets, zone abbreviations, spelled-out zone names
//! and IANA identifiers, all resolved to a fixed offset in minutes.
//!
//! Named and IANA zones go through `chrono-tz`, so their offset is the one in
//! force at the reference instant (daylight saving included).

use std::sync::Arc;

use chrono::{NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use super::{cap, names, run_strategies, GranularityParser, Strategy};
use crate::config::LocaleConfig;
use crate::error::{Result, TimexError};
use crate::model::{DateTimeResolutionResult, EntityType, FuturePast, ResolvedValue};
use crate::timex;

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| TimexError::InvalidTimezone(format!("'{s}'")))
}

/// Restore IANA capitalization on a lowercased identifier
/// (`america/new_york` becomes `America/New_York`).
fn iana_case(s: &str) -> String {
    s.split('/')
        .map(|segment| {
            segment
                .split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join("_")
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Offset from UTC in minutes for `tz` at the (UTC) reference instant.
fn offset_minutes(tz: Tz, reference: NaiveDateTime) -> i32 {
    tz.offset_from_utc_datetime(&reference).fix().local_minus_utc() / 60
}

fn offset_result(minutes: i32) -> DateTimeResolutionResult {
    DateTimeResolutionResult::resolved(
        timex::utc_offset(minutes),
        FuturePast::same(ResolvedValue::UtcOffset(minutes)),
    )
}

pub struct TimeZoneParser {
    config: Arc<LocaleConfig>,
}

impl TimeZoneParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "utc_offset",
            run: Self::utc_offset,
        },
        Strategy {
            name: "abbreviation",
            run: Self::abbreviation,
        },
        Strategy {
            name: "named",
            run: Self::named,
        },
        Strategy {
            name: "iana",
            run: Self::iana,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn utc_offset(&self, text: &str, _reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.timezone.utc_offset.exact(text) else {
            return Ok(None);
        };
        let hours: i32 = cap(&caps, "hours").and_then(|h| h.parse().ok()).unwrap_or(0);
        let minutes: i32 = cap(&caps, "minutes").and_then(|m| m.parse().ok()).unwrap_or(0);
        let sign = if cap(&caps, "sign") == Some("-") { -1 } else { 1 };
        Ok(Some(offset_result(sign * (hours * 60 + minutes))))
    }

    fn abbreviation(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.timezone.abbreviation.exact(text) else {
            return Ok(None);
        };
        let Some(abbr) = cap(&caps, "abbr") else {
            return Ok(None);
        };
        Ok(Some(offset_result(self.config.timezone_abbreviation(abbr)?)))
    }

    /// Locale zone names map to IANA identifiers; a table entry that is not
    /// a real zone is a configuration error.
    fn named(&self, text: &str, reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.timezone.named.exact(text) else {
            return Ok(None);
        };
        let Some(name) = cap(&caps, "name") else {
            return Ok(None);
        };
        let tz = parse_timezone(self.config.timezone_name(name)?)?;
        Ok(Some(offset_result(offset_minutes(tz, reference))))
    }

    fn iana(&self, text: &str, reference: NaiveDateTime) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.timezone.iana.exact(text) else {
            return Ok(None);
        };
        let Some(id) = cap(&caps, "iana") else {
            return Ok(None);
        };
        match parse_timezone(&iana_case(id)) {
            Ok(tz) => Ok(Some(offset_result(offset_minutes(tz, reference)))),
            Err(err) => {
                tracing::debug!(zone = id, error = %err, "unknown zone identifier");
                Ok(None)
            }
        }
    }
}

impl GranularityParser for TimeZoneParser {
    fn entity_type(&self) -> EntityType {
        EntityType::TimeZone
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "timezone", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        TimeZoneParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    fn minutes(r: &DateTimeResolutionResult) -> i32 {
        match r.future() {
            Some(ResolvedValue::UtcOffset(m)) => *m,
            other => panic!("expected an offset, got {other:?}"),
        }
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            TimeZoneParser::strategy_names(),
            vec!["utc_offset", "abbreviation", "named", "iana"]
        );
    }

    #[test]
    fn test_utc_offsets() {
        let r = resolve("UTC+5:30");
        assert_eq!(r.timex, "UTC+05:30");
        assert_eq!(minutes(&r), 330);
        assert_eq!(minutes(&resolve("GMT-8")), -480);
        assert_eq!(resolve("utc").timex, "UTC+00:00");
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(minutes(&resolve("PST")), -480);
        assert_eq!(resolve("CEST").timex, "UTC+02:00");
    }

    #[test]
    fn test_named_zone_uses_offset_at_reference() {
        // Daylight saving ended in the US on 2016-11-06.
        assert_eq!(minutes(&resolve("pacific time")), -480);
        assert_eq!(minutes(&resolve("london time")), 0);
    }

    #[test]
    fn test_iana_identifiers() {
        assert_eq!(iana_case("america/new_york"), "America/New_York");
        assert_eq!(minutes(&resolve("America/New_York")), -300);
        assert_eq!(minutes(&resolve("asia/kolkata")), 330);
        assert!(!resolve("Europe/Atlantis").success);
    }

    #[test]
    fn test_parse_timezone_rejects_unknown_names() {
        let err = parse_timezone("Mars/Olympus").unwrap_err();
        assert!(matches!(err, TimexError::InvalidTimezone(_)));
    }
}
