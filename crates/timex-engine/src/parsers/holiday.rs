//! Holiday parser.
//!
//! Each named holiday maps to a [`HolidayRule`] that computes its date for a
//! given year. A year named in the text (or implied by "next"/"last") pins
//! one date; otherwise the nearest occurrences around the reference date
//! fill the future and past branches.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Captures;

use super::{cap, names, parse_year, run_strategies, GranularityParser, Strategy};
use crate::calendar;
use crate::config::{HolidayRule, LocaleConfig};
use crate::error::Result;
use crate::model::{DateTimeResolutionResult, EntityType, FuturePast};
use crate::timex;

/// Largest cardinal a month can hold; "last" resolves through it.
const LAST_CARDINAL: u32 = 5;

impl HolidayRule {
    /// The holiday's date in `year`, if the rule yields one.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            HolidayRule::NthWeekday {
                month,
                weekday,
                cardinal,
            } => calendar::nth_weekday_of_month(year, month, weekday, cardinal_of(cardinal)),
            HolidayRule::EasterOffset { days } => {
                calendar::easter_sunday(year).map(|easter| easter + Duration::days(days))
            }
        }
    }
}

fn cardinal_of(cardinal: i32) -> u32 {
    if cardinal < 0 {
        LAST_CARDINAL
    } else {
        cardinal as u32
    }
}

pub struct HolidayParser {
    config: Arc<LocaleConfig>,
}

impl HolidayParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "explicit_year",
            run: Self::explicit_year,
        },
        Strategy {
            name: "relative_year",
            run: Self::relative_year,
        },
        Strategy {
            name: "nearest",
            run: Self::nearest,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn matched<'t>(&self, text: &'t str) -> Result<Option<(Captures<'t>, HolidayRule)>> {
        let Some(caps) = self.config.patterns.holiday.holiday.exact(text) else {
            return Ok(None);
        };
        let Some(name) = cap(&caps, "holiday") else {
            return Ok(None);
        };
        let rule = self.config.holiday(name)?;
        Ok(Some((caps, rule)))
    }

    fn pinned(rule: HolidayRule, year: i32) -> Option<DateTimeResolutionResult> {
        let date = rule.date_in(year)?;
        Some(DateTimeResolutionResult::date(
            timex::date(date),
            FuturePast::same(date),
        ))
    }

    fn explicit_year(
        &self,
        text: &str,
        _reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some((caps, rule)) = self.matched(text)? else {
            return Ok(None);
        };
        if cap(&caps, "rel").is_some() {
            return Ok(None);
        }
        let Some(year) = cap(&caps, "year").and_then(|y| parse_year(&self.config, y)) else {
            return Ok(None);
        };
        Ok(Self::pinned(rule, year))
    }

    fn relative_year(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some((caps, rule)) = self.matched(text)? else {
            return Ok(None);
        };
        let Some(rel) = cap(&caps, "rel").or_else(|| cap(&caps, "rel_year")) else {
            return Ok(None);
        };
        let year = reference.year() + self.config.swift(rel)?;
        Ok(Self::pinned(rule, year))
    }

    fn nearest(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some((caps, rule)) = self.matched(text)? else {
            return Ok(None);
        };
        if cap(&caps, "year").is_some() {
            return Ok(None);
        }
        let today = reference.date();
        let year = today.year();
        let candidates: Vec<NaiveDate> = (year - 1..=year + 1)
            .filter_map(|y| rule.date_in(y))
            .collect();
        let (Some(future), Some(past)) = (
            candidates.iter().find(|d| **d >= today),
            candidates.iter().rev().find(|d| **d < today),
        ) else {
            return Ok(None);
        };

        let timex = match rule {
            HolidayRule::Fixed { month, day } => timex::fuzzy_year_date(month, day),
            HolidayRule::NthWeekday {
                month,
                weekday,
                cardinal,
            } => timex::nth_weekday(None, month, weekday, cardinal_of(cardinal)),
            HolidayRule::EasterOffset { .. } => match rule.date_in(year) {
                Some(d) => timex::fuzzy_year_date(d.month(), d.day()),
                None => return Ok(None),
            },
        };
        Ok(Some(DateTimeResolutionResult::date(
            timex,
            FuturePast::new(*future, *past),
        )))
    }
}

impl GranularityParser for HolidayParser {
    fn entity_type(&self) -> EntityType {
        EntityType::Holiday
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "holiday", Self::STRATEGIES, text, reference)
    }
}
