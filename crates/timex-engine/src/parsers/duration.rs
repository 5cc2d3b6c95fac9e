//! Duration parser: "3 days", "1 month 2 days", "an hour and a half",
//! "more than 2 weeks".

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::{cap, names, run_strategies, GranularityParser, Strategy};
use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{
    DateTimeResolutionResult, DurationUnit, EntityType, FuturePast, Modifier, ResolvedValue,
};
use crate::timex;

/// A parsed duration: unit-tagged amounts plus an optional More/Less bound.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationValue {
    pub parts: Vec<(f64, DurationUnit)>,
    pub modifier: Option<Modifier>,
}

impl DurationValue {
    /// Nominal length in seconds.
    pub fn seconds(&self) -> f64 {
        self.parts.iter().map(|(n, unit)| n * unit.seconds()).sum()
    }

    pub fn timex(&self) -> String {
        timex::duration(&self.parts)
    }

    /// Whether every part is a calendar unit (days or coarser).
    pub fn is_date_only(&self) -> bool {
        self.parts.iter().all(|(_, unit)| !unit.is_time())
    }

    /// Move `from` by this duration in direction `sign` (+1 or -1).
    ///
    /// Months and years move on the calendar (clamping the day); fractional
    /// months fall back to 30-day months. `None` when the result leaves the
    /// representable date range.
    pub fn apply_to(&self, from: NaiveDateTime, sign: i32) -> Option<NaiveDateTime> {
        let mut months = 0.0;
        let mut seconds = 0.0;
        for (amount, unit) in &self.parts {
            match unit {
                DurationUnit::Year => months += amount * 12.0,
                DurationUnit::Month => months += amount,
                other => seconds += amount * other.seconds(),
            }
        }
        let whole_months = months.trunc();
        seconds += (months - whole_months) * DurationUnit::Month.seconds();
        if whole_months.abs() > i32::MAX as f64 || !(seconds.abs() < i64::MAX as f64) {
            return None;
        }

        let shifted_date = calendar::add_months(from.date(), sign * whole_months as i32)?;
        let delta = Duration::try_seconds(sign as i64 * seconds.round() as i64)?;
        NaiveDateTime::new(shifted_date, from.time()).checked_add_signed(delta)
    }
}

/// Largest amount whose integer part an `f64` holds exactly.
const MAX_AMOUNT: f64 = 9_007_199_254_740_992.0;

fn representable(amount: f64) -> bool {
    amount.is_finite() && amount.abs() <= MAX_AMOUNT
}

pub struct DurationParser {
    config: Arc<LocaleConfig>,
}

impl DurationParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "number_with_unit",
            run: Self::number_with_unit,
        },
        Strategy {
            name: "half_unit",
            run: Self::half_unit,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    /// Parse a duration phrase into its parts, for parsers that offset a
    /// reference by it.
    pub fn parse_value(&self, text: &str) -> Result<Option<DurationValue>> {
        let text = text.trim();
        if let Some(value) = self.number_with_unit_value(text)? {
            return Ok(Some(value));
        }
        self.half_unit_value(text)
    }

    fn modifier(&self, raw: Option<&str>) -> Result<Option<Modifier>> {
        raw.map(|m| self.config.duration_modifier(m)).transpose()
    }

    fn number_with_unit_value(&self, text: &str) -> Result<Option<DurationValue>> {
        let p = &self.config.patterns.duration;
        let Some(caps) = p.number_with_unit.exact(text) else {
            return Ok(None);
        };
        let Some(body) = cap(&caps, "body") else {
            return Ok(None);
        };
        let mut parts = Vec::new();
        for part in p.part.captures_iter(body) {
            let (Some(num), Some(unit)) = (cap(&part, "num"), cap(&part, "unit")) else {
                continue;
            };
            let Some(amount) = self.config.number(num)?.filter(|n| representable(*n)) else {
                return Ok(None);
            };
            parts.push((amount, self.config.duration_unit(unit)?));
        }
        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(DurationValue {
            parts,
            modifier: self.modifier(cap(&caps, "mod"))?,
        }))
    }

    fn half_unit_value(&self, text: &str) -> Result<Option<DurationValue>> {
        let Some(caps) = self.config.patterns.duration.half_unit.exact(text) else {
            return Ok(None);
        };
        let (whole, unit) = if let (Some(num), Some(unit)) = (cap(&caps, "num"), cap(&caps, "unit")) {
            (self.config.number(num)?, unit)
        } else if let (Some(num), Some(unit)) = (cap(&caps, "num_b"), cap(&caps, "unit_b")) {
            (self.config.number(num)?, unit)
        } else if let Some(unit) = cap(&caps, "unit_c") {
            (Some(0.0), unit)
        } else {
            return Ok(None);
        };
        let Some(whole) = whole.filter(|n| representable(*n)) else {
            return Ok(None);
        };
        Ok(Some(DurationValue {
            parts: vec![(whole + 0.5, self.config.duration_unit(unit)?)],
            modifier: self.modifier(cap(&caps, "mod"))?,
        }))
    }

    fn to_result(value: DurationValue) -> DateTimeResolutionResult {
        let result = DateTimeResolutionResult::resolved(
            value.timex(),
            FuturePast::same(ResolvedValue::Duration(value.seconds())),
        );
        match value.modifier {
            Some(m) => result.with_modifier(m),
            None => result,
        }
    }

    fn number_with_unit(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        Ok(self.number_with_unit_value(text)?.map(Self::to_result))
    }

    fn half_unit(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        Ok(self.half_unit_value(text)?.map(Self::to_result))
    }
}

impl GranularityParser for DurationParser {
    fn entity_type(&self) -> EntityType {
        EntityType::Duration
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "duration", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimexError;
    use crate::parsers::test_support::*;

    fn parser() -> DurationParser {
        DurationParser::new(Arc::new(LocaleConfig::english().unwrap()))
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            DurationParser::strategy_names(),
            vec!["number_with_unit", "half_unit"]
        );
    }

    #[test]
    fn test_simple_duration() {
        let r = parser().resolve("3 days", reference()).unwrap();
        assert!(r.success);
        assert_eq!(r.timex, "P3D");
        assert_eq!(r.future().and_then(ResolvedValue::as_duration), Some(259_200.0));
    }

    #[test]
    fn test_compound_duration_is_coarse_to_fine() {
        let r = parser().resolve("2 days and 1 month", reference()).unwrap();
        assert_eq!(r.timex, "P1M2D");
        let r = parser().resolve("1 hour 30 minutes", reference()).unwrap();
        assert_eq!(r.timex, "PT1H30M");
    }

    #[test]
    fn test_spelled_numbers() {
        let r = parser().resolve("twenty one days", reference()).unwrap();
        assert_eq!(r.timex, "P21D");
        let r = parser().resolve("an hour", reference()).unwrap();
        assert_eq!(r.timex, "PT1H");
    }

    #[test]
    fn test_half_units() {
        let r = parser().resolve("an hour and a half", reference()).unwrap();
        assert_eq!(r.timex, "PT1.5H");
        let r = parser().resolve("half an hour", reference()).unwrap();
        assert_eq!(r.timex, "PT0.5H");
        let r = parser().resolve("3 and a half days", reference()).unwrap();
        assert_eq!(r.timex, "P3.5D");
    }

    #[test]
    fn test_more_less_modifiers() {
        let r = parser().resolve("more than 2 weeks", reference()).unwrap();
        assert_eq!(r.timex, "P2W");
        assert_eq!(r.modifier, Some(Modifier::More));
        let r = parser().resolve("less than 5 minutes", reference()).unwrap();
        assert_eq!(r.modifier, Some(Modifier::Less));
    }

    #[test]
    fn test_apply_to_uses_calendar_months() {
        let value = parser().parse_value("1 month").unwrap().unwrap();
        let from = at(2016, 1, 31, 9, 0);
        assert_eq!(value.apply_to(from, 1), Some(at(2016, 2, 29, 9, 0)));
        assert_eq!(value.apply_to(from, -1), Some(at(2015, 12, 31, 9, 0)));
    }

    #[test]
    fn test_apply_to_out_of_range_is_none() {
        let p = parser();
        for text in ["999999999999 days", "999999999 days", "99999999999 hours", "300000 years"] {
            let value = p.parse_value(text).unwrap().unwrap();
            assert_eq!(value.apply_to(reference(), 1), None, "{text}");
            assert_eq!(value.apply_to(reference(), -1), None, "{text}");
        }
    }

    #[test]
    fn test_unrepresentable_amount_is_not_a_duration() {
        let r = parser().resolve("99999999999999999999 weeks", reference()).unwrap();
        assert!(!r.success);
        assert_eq!(parser().parse_value("99999999999999999999 weeks").unwrap(), None);
    }

    #[test]
    fn test_not_a_duration() {
        let r = parser().resolve("next week", reference()).unwrap();
        assert!(!r.success);
    }

    #[test]
    fn test_missing_number_parser_is_an_error() {
        let config = LocaleConfig::english().unwrap().without_number_parser();
        let parser = DurationParser::new(Arc::new(config));
        let err = parser.resolve("3 days", reference()).unwrap_err();
        assert!(matches!(err, TimexError::MissingCollaborator("number parser")));
    }
}
