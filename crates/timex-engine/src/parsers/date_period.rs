//! DatePeriod parser: date ranges and named calendar periods.
//!
//! Named periods ("next week", "March", "summer 2017") resolve to half-open
//! ranges `[start, end)`. Ranges between two stated dates ("from 4 to 22 this
//! month") keep the stated end date. A leading early/mid/late position
//! narrows the range and sets the modifier; the timex names the whole period.

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use regex::Captures;

use super::date::DateParser;
use super::duration::DurationParser;
use super::{
    cap, first_exact, names, parse_day, parse_month, parse_year, range_splits, run_strategies,
    GranularityParser, Strategy,
};
use crate::calendar;
use crate::config::LocaleConfig;
use crate::error::Result;
use crate::model::{DateTimeResolutionResult, EntityType, FuturePast, Modifier, Season};
use crate::timex;

type Span = (NaiveDate, NaiveDate);

type UnitFn = fn(&DatePeriodParser, &str, NaiveDate) -> Result<Option<DateTimeResolutionResult>>;

/// One full leap cycle; a year-less range has a different length in some of
/// these years exactly when it spans Feb 29.
const LEAP_CYCLE: RangeInclusive<i32> = 2013..=2016;

// ── Span helpers ────────────────────────────────────────────────────────────

fn month_span(year: i32, month: u32) -> Option<Span> {
    let start = calendar::first_of_month(year, month)?;
    Some((start, calendar::add_months(start, 1)?))
}

fn year_span(year: i32) -> Option<Span> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
    ))
}

fn quarter_span(year: i32, quarter: u32) -> Option<Span> {
    let start = calendar::first_of_month(year, (quarter - 1) * 3 + 1)?;
    Some((start, calendar::add_months(start, 3)?))
}

fn season_span(year: i32, season: Season) -> Option<Span> {
    let start = calendar::first_of_month(year, season.start_month())?;
    Some((start, calendar::add_months(start, 3)?))
}

/// Narrow a period to its early, middle or late part.
fn narrow((start, end): Span, position: Option<Modifier>) -> Span {
    let days = (end - start).num_days();
    match position {
        Some(Modifier::Early) => (start, start + Duration::days(days / 2)),
        Some(Modifier::Mid) => (
            start + Duration::days(days / 4),
            start + Duration::days(days * 3 / 4),
        ),
        Some(Modifier::Late) => (start + Duration::days(days / 2), end),
        _ => (start, end),
    }
}

fn period(
    timex: impl Into<String>,
    spans: FuturePast<Span>,
    position: Option<Modifier>,
) -> DateTimeResolutionResult {
    let result = DateTimeResolutionResult::date_range(timex, spans.map(|s| narrow(s, position)));
    match position {
        Some(m) => result.with_modifier(m),
        None => result,
    }
}

fn fixed(timex: impl Into<String>, span: Option<Span>) -> Option<DateTimeResolutionResult> {
    span.map(|s| DateTimeResolutionResult::date_range(timex, FuturePast::same(s)))
}

/// Nearest stated range that has not ended and nearest one that has started;
/// both ends count as inside the range.
fn bracket_stated(today: NaiveDate, candidates: &[Span]) -> Option<FuturePast<Span>> {
    let future = candidates.iter().find(|(_, end)| *end >= today)?;
    let past = candidates.iter().rev().find(|(start, _)| *start <= today)?;
    Some(FuturePast::new(*future, *past))
}

fn month_day_parts(timex: &str) -> Option<(u32, u32)> {
    let (month, day) = timex.strip_prefix("XXXX-")?.split_once('-')?;
    Some((month.parse().ok()?, day.parse().ok()?))
}

/// Timex of a range between two year-less month/day dates. When the length
/// depends on a leap day both variants are emitted, leap year first.
fn fuzzy_range_timex(start: &str, end: &str) -> Option<String> {
    let (sm, sd) = month_day_parts(start)?;
    let (em, ed) = month_day_parts(end)?;
    let mut lengths: Vec<i64> = LEAP_CYCLE
        .filter_map(|year| {
            let s = NaiveDate::from_ymd_opt(year, sm, sd)?;
            let end_year = if (em, ed) < (sm, sd) { year + 1 } else { year };
            let e = NaiveDate::from_ymd_opt(end_year, em, ed)?;
            Some((e - s).num_days())
        })
        .collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    lengths.dedup();
    if lengths.is_empty() {
        return None;
    }
    let variants: Vec<String> = lengths
        .iter()
        .map(|n| timex::range(start, end, &format!("P{n}D")))
        .collect();
    Some(variants.join(&timex::ALTERNATION.to_string()))
}

fn instant_dates(result: &DateTimeResolutionResult) -> Option<FuturePast<NaiveDate>> {
    let value = result.value.as_ref()?;
    Some(FuturePast::new(
        value.future.as_instant()?.date(),
        value.past.as_instant()?.date(),
    ))
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DatePeriodParser {
    config: Arc<LocaleConfig>,
    date: DateParser,
    duration: DurationParser,
}

impl DatePeriodParser {
    const STRATEGIES: &'static [Strategy<Self>] = &[
        Strategy {
            name: "month_with_day_range",
            run: Self::month_with_day_range,
        },
        Strategy {
            name: "single_word_period",
            run: Self::single_word_period,
        },
        Strategy {
            name: "two_time_points",
            run: Self::two_time_points,
        },
        Strategy {
            name: "relative_duration",
            run: Self::relative_duration,
        },
        Strategy {
            name: "year_and_month",
            run: Self::year_and_month,
        },
        Strategy {
            name: "year_or_month_range",
            run: Self::year_or_month_range,
        },
        Strategy {
            name: "day_range",
            run: Self::day_range,
        },
        Strategy {
            name: "calendar_unit",
            run: Self::calendar_unit,
        },
    ];

    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            date: DateParser::new(config.clone()),
            duration: DurationParser::new(config.clone()),
            config,
        }
    }

    pub fn strategy_names() -> Vec<&'static str> {
        names(Self::STRATEGIES)
    }

    fn position(&self, caps: &Captures<'_>) -> Result<Option<Modifier>> {
        cap(caps, "pos")
            .map(|p| self.config.period_position(p))
            .transpose()
    }

    /// Year from an explicit year group, else from a relative-year word.
    fn year_of(&self, caps: &Captures<'_>, today: NaiveDate) -> Result<Option<i32>> {
        if let Some(year) = cap(caps, "year").and_then(|y| parse_year(&self.config, y)) {
            return Ok(Some(year));
        }
        cap(caps, "rel")
            .map(|rel| self.config.swift(rel).map(|swift| today.year() + swift))
            .transpose()
    }

    // ── month_with_day_range ────────────────────────────────────────────────

    fn month_with_day_range(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date_period;
        let Some(caps) = first_exact(&[&p.month_with_day_range, &p.month_first_day_range], text)
        else {
            return Ok(None);
        };
        let (Some(start), Some(end)) = (cap(&caps, "start"), cap(&caps, "end")) else {
            return Ok(None);
        };
        let (Some(first), Some(last)) = (
            parse_day(&self.config, start)?,
            parse_day(&self.config, end)?,
        ) else {
            return Ok(None);
        };
        if first > last {
            return Ok(None);
        }
        let today = reference.date();

        let (year, month) = if let Some(rel) = cap(&caps, "rel") {
            let (y, m) =
                calendar::shift_month(today.year(), today.month(), self.config.swift(rel)?);
            (Some(y), m)
        } else if let Some(month) = cap(&caps, "month") {
            let year = cap(&caps, "year").and_then(|y| parse_year(&self.config, y));
            (year, self.config.month(month)?)
        } else {
            return Ok(None);
        };

        let span_in = |y: i32| -> Option<Span> {
            Some((
                calendar::clamped_date(y, month, first)?,
                calendar::clamped_date(y, month, last)?,
            ))
        };

        if let Some(year) = year {
            let Some((s, e)) = span_in(year) else {
                return Ok(None);
            };
            return Ok(fixed(timex::date_range(s, e), Some((s, e))));
        }

        let candidates: Vec<Span> = (-2..=2).filter_map(|i| span_in(today.year() + i)).collect();
        let Some(spans) = bracket_stated(today, &candidates) else {
            return Ok(None);
        };
        let timex = timex::range(
            &timex::fuzzy_year_date(month, first),
            &timex::fuzzy_year_date(month, last),
            &format!("P{}D", last - first),
        );
        Ok(Some(DateTimeResolutionResult::date_range(timex, spans)))
    }

    // ── single_word_period ──────────────────────────────────────────────────

    fn single_word_period(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date_period;
        let today = reference.date();

        if let Some(caps) = p.relative_unit.exact(text) {
            return self.relative_unit(&caps, today);
        }
        if let Some(caps) = p.relative_month.exact(text) {
            let (Some(rel), Some(month)) = (cap(&caps, "rel"), cap(&caps, "month")) else {
                return Ok(None);
            };
            let year = today.year() + self.config.swift(rel)?;
            let month = self.config.month(month)?;
            let position = self.position(&caps)?;
            return Ok(month_span(year, month)
                .map(|s| period(timex::month(year, month), FuturePast::same(s), position)));
        }
        if let Some(caps) = p.half.exact(text) {
            return self.half(&caps, today);
        }
        if let Some(caps) = p.to_date.exact(text) {
            return Ok(self.to_date(&caps, today));
        }
        if let Some(caps) = p.bare_month.exact(text) {
            let Some(month) = cap(&caps, "month") else {
                return Ok(None);
            };
            let month = self.config.month(month)?;
            let position = self.position(&caps)?;
            return Ok(
                calendar::resolve_recurring_range(today, |y| month_span(y, month))
                    .map(|spans| period(timex::fuzzy_month(month), spans, position)),
            );
        }
        Ok(None)
    }

    fn relative_unit(
        &self,
        caps: &Captures<'_>,
        today: NaiveDate,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let (Some(rel), Some(unit)) = (cap(caps, "rel"), cap(caps, "unit")) else {
            return Ok(None);
        };
        let swift = self.config.swift(rel)?;
        let position = self.position(caps)?;
        let shifted = today + Duration::weeks(swift as i64);

        let (timex, span) = match unit.to_lowercase().as_str() {
            "week" => {
                let start = calendar::week_start(shifted);
                (timex::week(start), Some((start, start + Duration::weeks(1))))
            }
            "weekend" => {
                let saturday = calendar::this_weekday(shifted, 6);
                (
                    timex::weekend(saturday),
                    Some((saturday, saturday + Duration::days(2))),
                )
            }
            "month" => {
                let (y, m) = calendar::shift_month(today.year(), today.month(), swift);
                (timex::month(y, m), month_span(y, m))
            }
            "year" => {
                let y = today.year() + swift;
                (timex::year(y), year_span(y))
            }
            "quarter" => {
                let index = today.year() * 4 + ((today.month() - 1) / 3) as i32 + swift;
                let (y, q) = (index.div_euclid(4), index.rem_euclid(4) as u32 + 1);
                (timex::quarter(y, q), quarter_span(y, q))
            }
            _ => return Ok(None),
        };
        Ok(span.map(|s| period(timex, FuturePast::same(s), position)))
    }

    fn half(&self, caps: &Captures<'_>, today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(half) = cap(caps, "half") else {
            return Ok(None);
        };
        let half = match half.to_lowercase().as_str() {
            "first" | "1st" => 1,
            _ => 2,
        };
        let year = self.year_of(caps, today)?.unwrap_or(today.year());
        let span = calendar::first_of_month(year, if half == 1 { 1 } else { 7 })
            .and_then(|start| Some((start, calendar::add_months(start, 6)?)));
        Ok(fixed(timex::half(year, half), span))
    }

    fn to_date(&self, caps: &Captures<'_>, today: NaiveDate) -> Option<DateTimeResolutionResult> {
        let unit = match cap(caps, "unit") {
            Some(unit) => unit.to_lowercase(),
            None => match cap(caps, "abbr")?.to_lowercase().as_str() {
                "ytd" => "year".to_string(),
                "mtd" => "month".to_string(),
                _ => "week".to_string(),
            },
        };
        let start = match unit.as_str() {
            "year" => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            "month" => calendar::first_of_month(today.year(), today.month())?,
            _ => calendar::week_start(today),
        };
        fixed(timex::date_range(start, today), Some((start, today)))
    }

    // ── two_time_points ─────────────────────────────────────────────────────

    fn two_time_points(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        for (left, right) in range_splits(&self.config, text) {
            let start = self.date.resolve_lenient(left, reference)?;
            if !start.success {
                continue;
            }
            let end = self.date.resolve_lenient(right, reference)?;
            if !end.success {
                continue;
            }
            if let Some(result) = Self::merge_points(&start, &end) {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Join two resolved dates into a range. An inverted future range takes
    /// the start's past value; an inverted past range takes the end's future
    /// value.
    fn merge_points(
        start: &DateTimeResolutionResult,
        end: &DateTimeResolutionResult,
    ) -> Option<DateTimeResolutionResult> {
        let s = instant_dates(start)?;
        let e = instant_dates(end)?;
        let future = if s.future <= e.future {
            (s.future, e.future)
        } else {
            (s.past, e.future)
        };
        let past = if s.past <= e.past {
            (s.past, e.past)
        } else {
            (s.past, e.future)
        };
        if future.0 > future.1 || past.0 > past.1 {
            return None;
        }
        let timex = fuzzy_range_timex(&start.timex, &end.timex).unwrap_or_else(|| {
            timex::range(
                &start.timex,
                &end.timex,
                &timex::days_between(future.0, future.1),
            )
        });
        Some(DateTimeResolutionResult::date_range(
            timex,
            FuturePast::new(future, past),
        ))
    }

    // ── relative_duration ───────────────────────────────────────────────────

    fn relative_duration(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.relative_duration.exact(text) else {
            return Ok(None);
        };
        let (Some(rel), Some(duration)) = (cap(&caps, "rel"), cap(&caps, "duration")) else {
            return Ok(None);
        };
        let swift = self.config.swift(rel)?;
        let Some(value) = self.duration.parse_value(duration)? else {
            return Ok(None);
        };
        let today = calendar::midnight(reference.date());
        let span = if swift < 0 {
            value.apply_to(today, -1).map(|start| (start, today))
        } else {
            let start = today + Duration::days(swift.signum() as i64);
            value.apply_to(start, 1).map(|end| (start, end))
        };
        let Some((start, end)) = span else {
            return Ok(None);
        };
        let (start, end) = (start.date(), end.date());
        let timex = timex::range(&timex::date(start), &timex::date(end), &value.timex());
        Ok(fixed(timex, Some((start, end))))
    }

    // ── year_and_month ──────────────────────────────────────────────────────

    fn year_and_month(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date_period;
        let today = reference.date();
        let Some(caps) = first_exact(
            &[&p.year_and_month, &p.numeric_year_month, &p.month_of_relative_year],
            text,
        ) else {
            return Ok(None);
        };
        let Some(month) = cap(&caps, "month") else {
            return Ok(None);
        };
        let (Some(month), Some(year)) = (
            parse_month(&self.config, month)?,
            self.year_of(&caps, today)?,
        ) else {
            return Ok(None);
        };
        Ok(fixed(timex::month(year, month), month_span(year, month)))
    }

    // ── year_or_month_range ─────────────────────────────────────────────────

    fn year_or_month_range(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let p = &self.config.patterns.date_period;

        if let Some(caps) = p.year_range.exact(text) {
            let (Some(start), Some(end)) = (cap(&caps, "start"), cap(&caps, "end")) else {
                return Ok(None);
            };
            let Ok(start) = start.parse::<i32>() else {
                return Ok(None);
            };
            let Ok(mut end_year) = end.parse::<i32>() else {
                return Ok(None);
            };
            if end.len() == 2 {
                end_year += start.div_euclid(100) * 100;
            }
            if end_year <= start {
                return Ok(None);
            }
            let span =
                NaiveDate::from_ymd_opt(start, 1, 1).zip(NaiveDate::from_ymd_opt(end_year, 1, 1));
            let timex = timex::range(
                &timex::year(start),
                &timex::year(end_year),
                &format!("P{}Y", end_year - start),
            );
            return Ok(fixed(timex, span));
        }

        let Some(caps) = p.month_range.exact(text) else {
            return Ok(None);
        };
        let (Some(start), Some(end)) = (cap(&caps, "start"), cap(&caps, "end")) else {
            return Ok(None);
        };
        let (start, end) = (self.config.month(start)?, self.config.month(end)?);
        let months = (end as i32 - start as i32).rem_euclid(12);
        if months == 0 {
            return Ok(None);
        }
        let span_from = |year: i32| -> Option<Span> {
            let first = calendar::first_of_month(year, start)?;
            Some((first, calendar::add_months(first, months)?))
        };
        let duration = format!("P{months}M");

        if let Some(year) = cap(&caps, "year").and_then(|y| parse_year(&self.config, y)) {
            let start_year = if end < start { year - 1 } else { year };
            let Some(span) = span_from(start_year) else {
                return Ok(None);
            };
            let timex = timex::range(
                &timex::month(start_year, start),
                &timex::month(span.1.year(), end),
                &duration,
            );
            return Ok(fixed(timex, Some(span)));
        }

        let timex = timex::range(&timex::fuzzy_month(start), &timex::fuzzy_month(end), &duration);
        Ok(calendar::resolve_recurring_range(reference.date(), span_from)
            .map(|spans| DateTimeResolutionResult::date_range(timex, spans)))
    }

    // ── day_range ───────────────────────────────────────────────────────────

    fn day_range(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.day_range.exact(text) else {
            return Ok(None);
        };
        let (Some(start), Some(end)) = (cap(&caps, "start"), cap(&caps, "end")) else {
            return Ok(None);
        };
        let (Some(first), Some(last)) = (
            parse_day(&self.config, start)?,
            parse_day(&self.config, end)?,
        ) else {
            return Ok(None);
        };
        let today = reference.date();
        let candidates: Vec<Span> = (-12..=12)
            .filter_map(|i| {
                let (y, m) = calendar::shift_month(today.year(), today.month(), i);
                let s = NaiveDate::from_ymd_opt(y, m, first)?;
                let (ey, em) = if first > last {
                    calendar::shift_month(y, m, 1)
                } else {
                    (y, m)
                };
                Some((s, NaiveDate::from_ymd_opt(ey, em, last)?))
            })
            .collect();
        let Some(spans) = bracket_stated(today, &candidates) else {
            return Ok(None);
        };
        let timex = timex::range(
            &timex::fuzzy_month_day(first),
            &timex::fuzzy_month_day(last),
            &timex::days_between(spans.future.0, spans.future.1),
        );
        Ok(Some(DateTimeResolutionResult::date_range(timex, spans)))
    }

    // ── calendar_unit ───────────────────────────────────────────────────────

    fn calendar_unit(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let units: [UnitFn; 7] = [
            Self::bare_year,
            Self::week_of_month,
            Self::iso_week,
            Self::season,
            Self::quarter,
            Self::quarter_abbr,
            Self::decade,
        ];
        let today = reference.date();
        for unit in units {
            if let Some(result) = unit(self, text, today)? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    fn bare_year(&self, text: &str, _today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.year.exact(text) else {
            return Ok(None);
        };
        let Some(year) = cap(&caps, "year").and_then(|y| parse_year(&self.config, y)) else {
            return Ok(None);
        };
        Ok(fixed(timex::year(year), year_span(year)))
    }

    fn week_of_month(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.week_of_month.exact(text) else {
            return Ok(None);
        };
        let Some(cardinal) = cap(&caps, "cardinal") else {
            return Ok(None);
        };
        let cardinal = self.config.cardinal(cardinal)?;
        // The largest cardinal is "last": the final seven days of the month.
        let week_in = |year: i32, month: u32| -> Option<Span> {
            let first = calendar::first_of_month(year, month)?;
            let start = if cardinal >= 5 {
                first + Duration::days(calendar::days_in_month(year, month) as i64 - 7)
            } else {
                first + Duration::weeks(cardinal as i64 - 1)
            };
            Some((start, start + Duration::weeks(1)))
        };

        if let Some(rel) = cap(&caps, "rel") {
            let (y, m) = calendar::shift_month(today.year(), today.month(), self.config.swift(rel)?);
            return Ok(fixed(timex::week_of_month(Some(y), m, cardinal), week_in(y, m)));
        }
        let Some(month) = cap(&caps, "month") else {
            return Ok(None);
        };
        let month = self.config.month(month)?;
        if let Some(year) = cap(&caps, "year").and_then(|y| parse_year(&self.config, y)) {
            return Ok(fixed(
                timex::week_of_month(Some(year), month, cardinal),
                week_in(year, month),
            ));
        }
        Ok(calendar::resolve_recurring_range(today, |y| week_in(y, month)).map(|spans| {
            DateTimeResolutionResult::date_range(timex::week_of_month(None, month, cardinal), spans)
        }))
    }

    fn iso_week(&self, text: &str, today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.iso_week.exact(text) else {
            return Ok(None);
        };
        let (year, week) = if let Some(week) = cap(&caps, "week") {
            let year = cap(&caps, "year")
                .and_then(|y| parse_year(&self.config, y))
                .unwrap_or(today.year());
            (Some(year), week.parse::<u32>().ok())
        } else {
            (
                cap(&caps, "iso_year").and_then(|y| parse_year(&self.config, y)),
                cap(&caps, "iso_week").and_then(|w| w.parse::<u32>().ok()),
            )
        };
        let (Some(year), Some(week)) = (year, week) else {
            return Ok(None);
        };
        let Some(start) = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon) else {
            return Ok(None);
        };
        Ok(fixed(
            timex::week(start),
            Some((start, start + Duration::weeks(1))),
        ))
    }

    fn season(&self, text: &str, today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.season.exact(text) else {
            return Ok(None);
        };
        let Some(season) = cap(&caps, "season") else {
            return Ok(None);
        };
        let season = self.config.season(season)?;
        let position = self.position(&caps)?;

        if let Some(year) = self.year_of(&caps, today)? {
            return Ok(season_span(year, season).map(|s| {
                period(timex::season(Some(year), season), FuturePast::same(s), position)
            }));
        }
        Ok(
            calendar::resolve_recurring_range(today, |y| season_span(y, season))
                .map(|spans| period(timex::season(None, season), spans, position)),
        )
    }

    fn quarter(&self, text: &str, today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.quarter.exact(text) else {
            return Ok(None);
        };
        let Some(cardinal) = cap(&caps, "cardinal") else {
            return Ok(None);
        };
        let quarter = self.config.cardinal(cardinal)?.clamp(1, 4);
        let year = self.year_of(&caps, today)?.unwrap_or(today.year());
        Ok(fixed(timex::quarter(year, quarter), quarter_span(year, quarter)))
    }

    fn quarter_abbr(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.quarter_abbr.exact(text) else {
            return Ok(None);
        };
        let (quarter, year) = match (cap(&caps, "q"), cap(&caps, "q2")) {
            (Some(q), _) => (q, cap(&caps, "year")),
            (None, Some(q)) => (q, cap(&caps, "year2")),
            (None, None) => return Ok(None),
        };
        let Ok(quarter) = quarter.parse::<u32>() else {
            return Ok(None);
        };
        let year = year
            .and_then(|y| parse_year(&self.config, y))
            .unwrap_or(today.year());
        Ok(fixed(timex::quarter(year, quarter), quarter_span(year, quarter)))
    }

    /// "the 1990s", "the 90s", "the nineties". Without a century the decade
    /// closest to the reference year wins.
    fn decade(&self, text: &str, today: NaiveDate) -> Result<Option<DateTimeResolutionResult>> {
        let Some(caps) = self.config.patterns.date_period.decade.exact(text) else {
            return Ok(None);
        };
        let explicit = cap(&caps, "century")
            .zip(cap(&caps, "decade"))
            .and_then(|(c, d)| Some(c.parse::<i32>().ok()? * 100 + d.parse::<i32>().ok()? * 10));

        let start = match explicit {
            Some(start) => start,
            None => {
                let digit = match (cap(&caps, "short"), cap(&caps, "word")) {
                    (Some(short), _) => short.parse::<i32>().ok(),
                    (None, Some(word)) => Some(self.config.decade_word(word)? as i32),
                    (None, None) => None,
                };
                let Some(digit) = digit else {
                    return Ok(None);
                };
                let century = today.year().div_euclid(100) * 100;
                let Some(start) = [century - 100, century, century + 100]
                    .into_iter()
                    .map(|c| c + digit * 10)
                    .min_by_key(|y| (y + 5 - today.year()).abs())
                else {
                    return Ok(None);
                };
                start
            }
        };

        let span =
            NaiveDate::from_ymd_opt(start, 1, 1).zip(NaiveDate::from_ymd_opt(start + 10, 1, 1));
        let timex = timex::range(&timex::year(start), &timex::year(start + 10), "P10Y");
        Ok(fixed(timex, span))
    }
}

impl GranularityParser for DatePeriodParser {
    fn entity_type(&self) -> EntityType {
        EntityType::DatePeriod
    }

    fn resolve(&self, text: &str, reference: NaiveDateTime) -> Result<DateTimeResolutionResult> {
        run_strategies(self, "date_period", Self::STRATEGIES, text, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::*;

    fn resolve(text: &str) -> DateTimeResolutionResult {
        DatePeriodParser::new(Arc::new(LocaleConfig::english().unwrap()))
            .resolve(text, reference())
            .unwrap()
    }

    fn days(r: &DateTimeResolutionResult) -> (NaiveDate, NaiveDate) {
        let (s, e) = future_range(r);
        (s.date(), e.date())
    }

    fn past_days(r: &DateTimeResolutionResult) -> (NaiveDate, NaiveDate) {
        let (s, e) = past_range(r);
        (s.date(), e.date())
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            DatePeriodParser::strategy_names(),
            vec![
                "month_with_day_range",
                "single_word_period",
                "two_time_points",
                "relative_duration",
                "year_and_month",
                "year_or_month_range",
                "day_range",
                "calendar_unit"
            ]
        );
    }

    #[test]
    fn test_day_range_in_this_month_keeps_stated_end() {
        let r = resolve("from 4 to 22 this month");
        assert_eq!(r.timex, "(2016-11-04,2016-11-22,P18D)");
        assert_eq!(days(&r), (date(2016, 11, 4), date(2016, 11, 22)));
        assert_eq!(past_days(&r), days(&r));
    }

    #[test]
    fn test_month_first_day_range_with_year() {
        let r = resolve("Oct 4 - 22, 2017");
        assert_eq!(r.timex, "(2017-10-04,2017-10-22,P18D)");
    }

    #[test]
    fn test_day_range_of_month_without_year() {
        let r = resolve("from 4 to 22 of October");
        assert_eq!(r.timex, "(XXXX-10-04,XXXX-10-22,P18D)");
        assert_eq!(days(&r), (date(2017, 10, 4), date(2017, 10, 22)));
        assert_eq!(past_days(&r), (date(2016, 10, 4), date(2016, 10, 22)));
    }

    #[test]
    fn test_relative_week_and_weekend() {
        let r = resolve("next week");
        assert_eq!(r.timex, "2016-W46");
        assert_eq!(days(&r), (date(2016, 11, 14), date(2016, 11, 21)));

        let r = resolve("this weekend");
        assert_eq!(r.timex, "2016-W45-WE");
        assert_eq!(days(&r), (date(2016, 11, 12), date(2016, 11, 14)));
    }

    #[test]
    fn test_position_narrows_range_but_not_timex() {
        let r = resolve("early next week");
        assert_eq!(r.timex, "2016-W46");
        assert_eq!(r.modifier, Some(Modifier::Early));
        assert_eq!(days(&r), (date(2016, 11, 14), date(2016, 11, 17)));

        let r = resolve("late last month");
        assert_eq!(r.timex, "2016-10");
        assert_eq!(r.modifier, Some(Modifier::Late));
        assert_eq!(days(&r), (date(2016, 10, 16), date(2016, 11, 1)));
    }

    #[test]
    fn test_relative_month_year_quarter() {
        assert_eq!(resolve("last month").timex, "2016-10");
        assert_eq!(resolve("next year").timex, "2017");
        assert_eq!(resolve("next quarter").timex, "2017-Q1");
        assert_eq!(resolve("this quarter").timex, "2016-Q4");
    }

    #[test]
    fn test_bare_month_brackets_reference() {
        let r = resolve("March");
        assert_eq!(r.timex, "XXXX-03");
        assert_eq!(days(&r), (date(2017, 3, 1), date(2017, 4, 1)));
        assert_eq!(past_days(&r), (date(2016, 3, 1), date(2016, 4, 1)));
    }

    #[test]
    fn test_half_year_and_to_date() {
        let r = resolve("first half of 2017");
        assert_eq!(r.timex, "2017-H1");
        assert_eq!(days(&r), (date(2017, 1, 1), date(2017, 7, 1)));
        assert_eq!(resolve("year to date").timex, "(2016-01-01,2016-11-07,P311D)");
    }

    #[test]
    fn test_two_dates_merge_into_range() {
        let r = resolve("from Oct 2 to Oct 9");
        assert_eq!(r.timex, "(XXXX-10-02,XXXX-10-09,P7D)");
        assert_eq!(days(&r), (date(2017, 10, 2), date(2017, 10, 9)));

        let r = resolve("between Monday and Friday");
        assert_eq!(r.timex, "(XXXX-WXX-1,XXXX-WXX-5,P4D)");
        assert_eq!(days(&r), (date(2016, 11, 7), date(2016, 11, 11)));
        assert_eq!(past_days(&r), (date(2016, 10, 31), date(2016, 11, 4)));
    }

    #[test]
    fn test_leap_dependent_range_gets_dual_timex() {
        let r = resolve("from Feb 28 to Mar 1");
        assert_eq!(
            r.timex,
            "(XXXX-02-28,XXXX-03-01,P2D)|(XXXX-02-28,XXXX-03-01,P1D)"
        );
        assert_eq!(days(&r), (date(2017, 2, 28), date(2017, 3, 1)));
        assert_eq!(past_days(&r), (date(2016, 2, 28), date(2016, 3, 1)));
    }

    #[test]
    fn test_inverted_future_range_falls_back_to_past_start() {
        let r = resolve("from the 4th to the 22nd");
        assert_eq!(r.timex, "(XXXX-XX-04,XXXX-XX-22,P18D)");
        assert_eq!(days(&r), (date(2016, 11, 4), date(2016, 11, 22)));
    }

    #[test]
    fn test_relative_duration() {
        let r = resolve("next 3 days");
        assert_eq!(r.timex, "(2016-11-08,2016-11-11,P3D)");
        let r = resolve("past 2 weeks");
        assert_eq!(r.timex, "(2016-10-24,2016-11-07,P2W)");
    }

    #[test]
    fn test_relative_duration_past_calendar_range_fails() {
        assert!(!resolve("next 999999999 days").success);
        assert!(!resolve("past 300000 years").success);
    }

    #[test]
    fn test_year_and_month() {
        assert_eq!(resolve("November 2016").timex, "2016-11");
        assert_eq!(resolve("2016-11").timex, "2016-11");
        assert_eq!(resolve("March next year").timex, "2017-03");
    }

    #[test]
    fn test_year_and_month_ranges() {
        assert_eq!(resolve("2010 to 2015").timex, "(2010,2015,P5Y)");
        assert_eq!(resolve("2010-15").timex, "(2010,2015,P5Y)");

        let r = resolve("January to March");
        assert_eq!(r.timex, "(XXXX-01,XXXX-03,P2M)");
        assert_eq!(days(&r), (date(2017, 1, 1), date(2017, 3, 1)));

        let r = resolve("November to February 2017");
        assert_eq!(r.timex, "(2016-11,2017-02,P3M)");
    }

    #[test]
    fn test_calendar_units() {
        assert_eq!(resolve("2016").timex, "2016");
        assert_eq!(resolve("week 45 of 2016").timex, "2016-W45");
        assert_eq!(resolve("2016-W45").timex, "2016-W45");
        assert_eq!(resolve("summer").timex, "XXXX-SU");
        assert_eq!(resolve("summer 2017").timex, "2017-SU");
        assert_eq!(resolve("the third quarter of 2016").timex, "2016-Q3");
        assert_eq!(resolve("Q1 2017").timex, "2017-Q1");
        assert_eq!(resolve("2016 Q1").timex, "2016-Q1");
    }

    #[test]
    fn test_week_of_month() {
        let r = resolve("first week of November");
        assert_eq!(r.timex, "XXXX-11-W01");
        assert_eq!(days(&r), (date(2016, 11, 1), date(2016, 11, 8)));
        let r = resolve("the last week of next month");
        assert_eq!(r.timex, "2016-12-W05");
        assert_eq!(days(&r), (date(2016, 12, 25), date(2017, 1, 1)));
    }

    #[test]
    fn test_decades_use_closest_century() {
        let r = resolve("the 90s");
        assert_eq!(r.timex, "(1990,2000,P10Y)");
        assert_eq!(days(&r), (date(1990, 1, 1), date(2000, 1, 1)));
        assert_eq!(resolve("the 1970s").timex, "(1970,1980,P10Y)");
        assert_eq!(resolve("the eighties").timex, "(1980,1990,P10Y)");
    }
}
