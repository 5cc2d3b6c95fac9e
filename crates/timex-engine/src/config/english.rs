//! English locale data.
//!
//! Word tables come first; the pattern templates below reference them
//! through `%NAME%` placeholders so every word a pattern can match has a
//! dictionary entry.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use super::{
    alternation, expand, ConnectorPatterns, Cue, DatePatterns, DatePeriodPatterns,
    DateTimePatterns, DateTimePeriodPatterns, DaySegment, Dictionaries, DurationPatterns,
    HolidayPatterns, HolidayRule, LocaleConfig, Lookup, ModifierPatterns, Pattern, Patterns,
    SetPatterns, TimePatterns, TimePeriodPatterns, TimeZonePatterns,
};
use crate::error::Result;
use crate::model::{DurationUnit, Modifier, Season};
use crate::number::{cardinal_words, day_ordinal_words, EnglishNumberParser, TENS_WORDS, UNIT_WORDS};

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const WEEKDAYS: &[(&str, u32)] = &[
    ("monday", 1),
    ("mon", 1),
    ("tuesday", 2),
    ("tues", 2),
    ("tue", 2),
    ("wednesday", 3),
    ("wed", 3),
    ("thursday", 4),
    ("thurs", 4),
    ("thur", 4),
    ("thu", 4),
    ("friday", 5),
    ("fri", 5),
    ("saturday", 6),
    ("sat", 6),
    ("sunday", 7),
    ("sun", 7),
];

const CARDINALS: &[(&str, u32)] = &[
    ("first", 1),
    ("1st", 1),
    ("second", 2),
    ("2nd", 2),
    ("third", 3),
    ("3rd", 3),
    ("fourth", 4),
    ("4th", 4),
    ("fifth", 5),
    ("5th", 5),
    ("last", 5),
];

const RELATIVE_SWIFT: &[(&str, i32)] = &[
    ("this", 0),
    ("current", 0),
    ("next", 1),
    ("coming", 1),
    ("upcoming", 1),
    ("following", 1),
    ("the following", 1),
    ("last", -1),
    ("previous", -1),
    ("past", -1),
    ("prior", -1),
];

const SPECIAL_DAYS: &[(&str, i64)] = &[
    ("today", 0),
    ("tomorrow", 1),
    ("tmr", 1),
    ("yesterday", -1),
    ("the day after tomorrow", 2),
    ("day after tomorrow", 2),
    ("the day before yesterday", -2),
    ("day before yesterday", -2),
];

const DURATION_UNITS: &[(&str, DurationUnit)] = &[
    ("years", DurationUnit::Year),
    ("year", DurationUnit::Year),
    ("yrs", DurationUnit::Year),
    ("yr", DurationUnit::Year),
    ("months", DurationUnit::Month),
    ("month", DurationUnit::Month),
    ("weeks", DurationUnit::Week),
    ("week", DurationUnit::Week),
    ("wks", DurationUnit::Week),
    ("days", DurationUnit::Day),
    ("day", DurationUnit::Day),
    ("hours", DurationUnit::Hour),
    ("hour", DurationUnit::Hour),
    ("hrs", DurationUnit::Hour),
    ("hr", DurationUnit::Hour),
    ("minutes", DurationUnit::Minute),
    ("minute", DurationUnit::Minute),
    ("mins", DurationUnit::Minute),
    ("min", DurationUnit::Minute),
    ("seconds", DurationUnit::Second),
    ("second", DurationUnit::Second),
    ("secs", DurationUnit::Second),
    ("sec", DurationUnit::Second),
];

const DURATION_DIRECTION: &[(&str, i32)] = &[
    ("ago", -1),
    ("earlier", -1),
    ("before", -1),
    ("later", 1),
    ("after", 1),
    ("from", 1),
    ("from now", 1),
    ("hence", 1),
    ("in", 1),
];

const DURATION_MODIFIERS: &[(&str, Modifier)] = &[
    ("more than", Modifier::More),
    ("over", Modifier::More),
    ("at least", Modifier::More),
    ("longer than", Modifier::More),
    ("less than", Modifier::Less),
    ("under", Modifier::Less),
    ("at most", Modifier::Less),
    ("fewer than", Modifier::Less),
    ("shorter than", Modifier::Less),
];

const PERIOD_POSITIONS: &[(&str, Modifier)] = &[
    ("early", Modifier::Early),
    ("beginning", Modifier::Early),
    ("start", Modifier::Early),
    ("mid", Modifier::Mid),
    ("middle", Modifier::Mid),
    ("late", Modifier::Late),
    ("later", Modifier::Late),
    ("end", Modifier::Late),
];

const SEASONS: &[(&str, Season)] = &[
    ("spring", Season::Spring),
    ("summer", Season::Summer),
    ("fall", Season::Fall),
    ("autumn", Season::Fall),
    ("winter", Season::Winter),
];

const DECADE_WORDS: &[(&str, u32)] = &[
    ("twenties", 2),
    ("thirties", 3),
    ("forties", 4),
    ("fifties", 5),
    ("sixties", 6),
    ("seventies", 7),
    ("eighties", 8),
    ("nineties", 9),
];

const HOLIDAYS: &[(&str, HolidayRule)] = &[
    ("new year's day", HolidayRule::Fixed { month: 1, day: 1 }),
    ("new years day", HolidayRule::Fixed { month: 1, day: 1 }),
    ("new year", HolidayRule::Fixed { month: 1, day: 1 }),
    ("valentine's day", HolidayRule::Fixed { month: 2, day: 14 }),
    ("valentines day", HolidayRule::Fixed { month: 2, day: 14 }),
    ("valentine day", HolidayRule::Fixed { month: 2, day: 14 }),
    ("st patrick's day", HolidayRule::Fixed { month: 3, day: 17 }),
    ("st. patrick's day", HolidayRule::Fixed { month: 3, day: 17 }),
    ("saint patrick's day", HolidayRule::Fixed { month: 3, day: 17 }),
    ("st patricks day", HolidayRule::Fixed { month: 3, day: 17 }),
    ("april fools day", HolidayRule::Fixed { month: 4, day: 1 }),
    ("april fool's day", HolidayRule::Fixed { month: 4, day: 1 }),
    ("independence day", HolidayRule::Fixed { month: 7, day: 4 }),
    ("halloween", HolidayRule::Fixed { month: 10, day: 31 }),
    ("veterans day", HolidayRule::Fixed { month: 11, day: 11 }),
    ("veteran's day", HolidayRule::Fixed { month: 11, day: 11 }),
    ("christmas eve", HolidayRule::Fixed { month: 12, day: 24 }),
    ("christmas day", HolidayRule::Fixed { month: 12, day: 25 }),
    ("christmas", HolidayRule::Fixed { month: 12, day: 25 }),
    ("xmas", HolidayRule::Fixed { month: 12, day: 25 }),
    ("boxing day", HolidayRule::Fixed { month: 12, day: 26 }),
    ("new year's eve", HolidayRule::Fixed { month: 12, day: 31 }),
    ("new years eve", HolidayRule::Fixed { month: 12, day: 31 }),
    ("martin luther king day", HolidayRule::NthWeekday { month: 1, weekday: 1, cardinal: 3 }),
    ("mlk day", HolidayRule::NthWeekday { month: 1, weekday: 1, cardinal: 3 }),
    ("presidents day", HolidayRule::NthWeekday { month: 2, weekday: 1, cardinal: 3 }),
    ("presidents' day", HolidayRule::NthWeekday { month: 2, weekday: 1, cardinal: 3 }),
    ("president's day", HolidayRule::NthWeekday { month: 2, weekday: 1, cardinal: 3 }),
    ("mother's day", HolidayRule::NthWeekday { month: 5, weekday: 7, cardinal: 2 }),
    ("mothers day", HolidayRule::NthWeekday { month: 5, weekday: 7, cardinal: 2 }),
    ("memorial day", HolidayRule::NthWeekday { month: 5, weekday: 1, cardinal: -1 }),
    ("father's day", HolidayRule::NthWeekday { month: 6, weekday: 7, cardinal: 3 }),
    ("fathers day", HolidayRule::NthWeekday { month: 6, weekday: 7, cardinal: 3 }),
    ("labor day", HolidayRule::NthWeekday { month: 9, weekday: 1, cardinal: 1 }),
    ("labour day", HolidayRule::NthWeekday { month: 9, weekday: 1, cardinal: 1 }),
    ("columbus day", HolidayRule::NthWeekday { month: 10, weekday: 1, cardinal: 2 }),
    ("thanksgiving day", HolidayRule::NthWeekday { month: 11, weekday: 4, cardinal: 4 }),
    ("thanksgiving", HolidayRule::NthWeekday { month: 11, weekday: 4, cardinal: 4 }),
    ("easter sunday", HolidayRule::EasterOffset { days: 0 }),
    ("easter", HolidayRule::EasterOffset { days: 0 }),
    ("good friday", HolidayRule::EasterOffset { days: -2 }),
    ("easter monday", HolidayRule::EasterOffset { days: 1 }),
    ("ash wednesday", HolidayRule::EasterOffset { days: -46 }),
    ("palm sunday", HolidayRule::EasterOffset { days: -7 }),
];

const DAY_SEGMENTS: &[(&str, DaySegment)] = &[
    ("morning", DaySegment { code: Some("MO"), start: 8, end: 12, is_pm: false }),
    ("afternoon", DaySegment { code: Some("AF"), start: 12, end: 16, is_pm: true }),
    ("evening", DaySegment { code: Some("EV"), start: 16, end: 20, is_pm: true }),
    ("night", DaySegment { code: Some("NI"), start: 20, end: 24, is_pm: true }),
    ("tonight", DaySegment { code: Some("NI"), start: 20, end: 24, is_pm: true }),
    ("lunchtime", DaySegment { code: None, start: 11, end: 13, is_pm: true }),
    ("lunch time", DaySegment { code: None, start: 11, end: 13, is_pm: true }),
    ("business hours", DaySegment { code: Some("BH"), start: 8, end: 18, is_pm: false }),
    ("working hours", DaySegment { code: Some("BH"), start: 8, end: 18, is_pm: false }),
    ("office hours", DaySegment { code: Some("BH"), start: 8, end: 18, is_pm: false }),
];

const PERIODIC_SETS: &[(&str, &str)] = &[
    ("hourly", "PT1H"),
    ("daily", "P1D"),
    ("nightly", "TNI"),
    ("weekly", "P1W"),
    ("biweekly", "P2W"),
    ("bi-weekly", "P2W"),
    ("fortnightly", "P2W"),
    ("monthly", "P1M"),
    ("quarterly", "P3M"),
    ("semiannually", "P6M"),
    ("yearly", "P1Y"),
    ("annually", "P1Y"),
];

const SPECIAL_TIMES: &[(&str, (u32, u32))] = &[
    ("noon", (12, 0)),
    ("midday", (12, 0)),
    ("mid-day", (12, 0)),
    ("midnight", (0, 0)),
    ("mid-night", (0, 0)),
];

/// Fixed abbreviations, offset in minutes from UTC.
const TIMEZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("est", -300),
    ("edt", -240),
    ("cst", -360),
    ("cdt", -300),
    ("mst", -420),
    ("mdt", -360),
    ("pst", -480),
    ("pdt", -420),
    ("akst", -540),
    ("akdt", -480),
    ("hst", -600),
    ("bst", 60),
    ("cet", 60),
    ("cest", 120),
    ("eet", 120),
    ("eest", 180),
    ("ist", 330),
    ("jst", 540),
    ("kst", 540),
    ("aest", 600),
    ("aedt", 660),
    ("nzst", 720),
];

/// Spelled-out zones, resolved through the IANA database at the reference
/// instant.
const TIMEZONE_NAMES: &[(&str, &str)] = &[
    ("eastern time", "America/New_York"),
    ("eastern standard time", "America/New_York"),
    ("central time", "America/Chicago"),
    ("central standard time", "America/Chicago"),
    ("mountain time", "America/Denver"),
    ("mountain standard time", "America/Denver"),
    ("pacific time", "America/Los_Angeles"),
    ("pacific standard time", "America/Los_Angeles"),
    ("alaska time", "America/Anchorage"),
    ("hawaii time", "Pacific/Honolulu"),
    ("london time", "Europe/London"),
    ("british time", "Europe/London"),
    ("paris time", "Europe/Paris"),
    ("berlin time", "Europe/Berlin"),
    ("central european time", "Europe/Berlin"),
    ("india time", "Asia/Kolkata"),
    ("indian standard time", "Asia/Kolkata"),
    ("beijing time", "Asia/Shanghai"),
    ("china time", "Asia/Shanghai"),
    ("tokyo time", "Asia/Tokyo"),
    ("japan time", "Asia/Tokyo"),
    ("sydney time", "Australia/Sydney"),
];

const HOUR_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve",
];

const RANGE_CONNECTOR: &str = r"-|to|through|thru|until|till|and";

fn keys<T>(table: &[(&str, T)]) -> Vec<String> {
    table.iter().map(|(k, _)| k.to_string()).collect()
}

/// Minute words from ten to fifty-nine.
fn minute_words() -> Vec<String> {
    let mut words: Vec<String> = UNIT_WORDS
        .iter()
        .filter(|(_, v)| *v >= 10)
        .map(|(w, _)| w.to_string())
        .collect();
    for (tens, base) in TENS_WORDS.iter().filter(|(_, v)| *v < 60) {
        words.push(tens.to_string());
        for (unit, v) in UNIT_WORDS.iter().filter(|(_, v)| (1..10).contains(v)) {
            if base + v < 60 {
                words.push(format!("{tens}-{unit}"));
                words.push(format!("{tens} {unit}"));
            }
        }
    }
    words
}

fn placeholders() -> HashMap<&'static str, String> {
    let mut ph: HashMap<&'static str, String> = HashMap::new();

    let unit_words = |filter: fn(DurationUnit) -> bool| {
        alternation(
            DURATION_UNITS
                .iter()
                .filter(|(_, u)| filter(*u))
                .map(|(w, _)| *w),
        )
    };
    let mut numbers = cardinal_words();
    numbers.extend(["a", "an", "a couple of", "couple of", "a pair of"].map(String::from));
    let num = format!(r"(?:\d+(?:\.\d+)?|{})", alternation(&numbers));
    let date_unit = unit_words(|u| !u.is_time());
    let time_unit = unit_words(|u| u.is_time());
    let any_unit = unit_words(|_| true);

    let day_ord = format!(
        r"(?:(?:3[01]|[12]\d|0?[1-9])(?:st|nd|rd|th)|{})",
        alternation(day_ordinal_words())
    );

    ph.insert("MONTH", alternation(keys(MONTHS)));
    ph.insert(
        "MONTH_FULL",
        alternation(
            MONTHS
                .iter()
                .map(|(k, _)| *k)
                .filter(|k| k.len() > 3 && !matches!(*k, "sept" | "may")),
        ),
    );
    ph.insert("WEEKDAY", alternation(keys(WEEKDAYS)));
    ph.insert(
        "WEEKDAY_FULL",
        alternation(WEEKDAYS.iter().map(|(k, _)| *k).filter(|k| k.ends_with("day"))),
    );
    ph.insert("DAY", format!(r"(?:{day_ord}|3[01]|[12]\d|0?[1-9])"));
    ph.insert("DAY_ORD", day_ord);
    ph.insert("YEAR", r"(?:19|20)\d{2}".to_string());
    ph.insert("REL", alternation(keys(RELATIVE_SWIFT)));
    ph.insert("CARDINAL", alternation(keys(CARDINALS)));
    ph.insert("NUM", num.clone());
    ph.insert("UNIT", any_unit.clone());
    ph.insert(
        "UNIT_SINGULAR",
        alternation(["year", "month", "week", "day", "hour", "minute", "second"]),
    );
    ph.insert(
        "DATE_DURATION",
        format!(r"(?:{num}\s*{date_unit}(?:\s*,?\s*(?:and\s+)?{num}\s*{date_unit})*)"),
    );
    ph.insert(
        "TIME_DURATION",
        format!(r"(?:{num}\s*{time_unit}(?:\s*,?\s*(?:and\s+)?{num}\s*{time_unit})*)"),
    );
    ph.insert(
        "DURATION",
        format!(r"(?:{num}\s*{any_unit}(?:\s*,?\s*(?:and\s+)?{num}\s*{any_unit})*)"),
    );
    ph.insert(
        "DIRECTION",
        alternation(["ago", "later", "earlier", "from now", "hence"]),
    );
    ph.insert("HOUR_WORD", alternation(HOUR_WORDS));
    ph.insert(
        "HOUR",
        format!(r"(?:2[0-4]|1\d|0?\d|{})", alternation(HOUR_WORDS)),
    );
    ph.insert("MINWORDS", alternation(minute_words()));
    ph.insert("AMPM", r"(?:a\.?\s?m\.?|p\.?\s?m\.?)".to_string());
    ph.insert(
        "DAYPART",
        r"(?:in\s+the\s+(?:morning|afternoon|evening)|at\s+night|tonight)".to_string(),
    );
    ph.insert("SEGMENT", alternation(keys(DAY_SEGMENTS)));
    ph.insert("SPECIAL_DAY", alternation(keys(SPECIAL_DAYS)));
    ph.insert("SPECIAL_TIME", alternation(keys(SPECIAL_TIMES)));
    ph.insert("HOLIDAY", alternation(keys(HOLIDAYS)));
    ph.insert("SEASON", alternation(keys(SEASONS)));
    ph.insert("DECADE_WORD", alternation(keys(DECADE_WORDS)));
    ph.insert("PERIODIC", alternation(keys(PERIODIC_SETS)));
    ph.insert("POSITION", alternation(keys(PERIOD_POSITIONS)));
    ph.insert("MORE_LESS", alternation(keys(DURATION_MODIFIERS)));
    ph.insert("TZ_ABBR", alternation(keys(TIMEZONE_ABBREVIATIONS)));
    ph.insert("TZ_NAME", alternation(keys(TIMEZONE_NAMES)));
    ph.insert("CONNECTOR", format!("(?:{RANGE_CONNECTOR})"));
    ph
}

struct Builder {
    placeholders: HashMap<&'static str, String>,
}

impl Builder {
    fn pattern(&self, name: &'static str, template: &str) -> Result<Pattern> {
        Pattern::new(name, &expand(template, &self.placeholders))
    }

    fn regex(&self, template: &str) -> Result<Regex> {
        Ok(Regex::new(&expand(template, &self.placeholders))?)
    }
}

fn date_patterns(b: &Builder) -> Result<DatePatterns> {
    Ok(DatePatterns {
        iso: b.pattern(
            "iso",
            r"(?P<year>\d{4})[-/.](?P<month>1[0-2]|0?[1-9])[-/.](?P<day>3[01]|[12]\d|0?[1-9])",
        )?,
        numeric: b.pattern(
            "numeric",
            r"(?:(?P<weekday>%WEEKDAY%),?\s+)?(?P<month>1[0-2]|0?[1-9])/(?P<day>3[01]|[12]\d|0?[1-9])(?:/(?P<year>\d{4}|\d{2}))?",
        )?,
        month_day: b.pattern(
            "month_day",
            r"(?:(?P<weekday>%WEEKDAY%),?\s+)?(?:the\s+)?(?P<month>%MONTH%)\.?\s+(?:the\s+)?(?P<day>%DAY%)(?:,?\s+(?P<year>%YEAR%))?",
        )?,
        day_month: b.pattern(
            "day_month",
            r"(?:(?P<weekday>%WEEKDAY%),?\s+)?(?:the\s+)?(?P<day>%DAY%)\s+(?:of\s+)?(?P<month>%MONTH%)(?:,?\s+(?P<year>%YEAR%))?",
        )?,
        special_day: b.pattern("special_day", r"(?P<special>%SPECIAL_DAY%)")?,
        bare_day: b.pattern(
            "bare_day",
            r"on\s+(?:the\s+)?(?P<day>%DAY%)|the\s+(?P<ord>%DAY_ORD%)",
        )?,
        day_of_relative_month: b.pattern(
            "day_of_relative_month",
            r"(?:the\s+)?(?P<day>%DAY%)\s+of\s+(?:the\s+)?(?P<rel>%REL%)\s+month",
        )?,
        nth_weekday_of_month: b.pattern(
            "nth_weekday_of_month",
            r"(?:the\s+)?(?P<cardinal>%CARDINAL%)\s+(?P<weekday>%WEEKDAY%)\s+(?:of|in)\s+(?:(?:the\s+)?(?P<rel>%REL%)\s+month|(?P<month>%MONTH%)(?:,?\s+(?P<year>%YEAR%))?)",
        )?,
        relative_weekday: b.pattern(
            "relative_weekday",
            r"(?P<rel>%REL%)\s+(?P<weekday>%WEEKDAY%)",
        )?,
        weekday_of_relative_week: b.pattern(
            "weekday_of_relative_week",
            r"(?P<weekday>%WEEKDAY%)\s+(?:of\s+)?(?:the\s+)?(?P<rel>%REL%)\s+week",
        )?,
        weekday: b.pattern("weekday", r"(?P<weekday>%WEEKDAY_FULL%)")?,
        duration_relative: b.pattern(
            "duration_relative",
            r"in\s+(?P<ahead>%DATE_DURATION%)|(?P<duration>%DATE_DURATION%)\s+(?:(?P<dir>%DIRECTION%)|(?P<adir>before|after|from)\s+(?P<anchor>%SPECIAL_DAY%))",
        )?,
        anchored_duration: b.pattern(
            "anchored_duration",
            r"(?P<duration>%DATE_DURATION%)\s+(?P<adir>before|after)\s+(?P<anchor>.+)",
        )?,
    })
}

fn date_period_patterns(b: &Builder) -> Result<DatePeriodPatterns> {
    Ok(DatePeriodPatterns {
        month_with_day_range: b.pattern(
            "month_with_day_range",
            r"(?:(?:from|between)\s+)?(?:the\s+)?(?P<start>%DAY%)\s*%CONNECTOR%\s*(?:the\s+)?(?P<end>%DAY%)\s+(?:of\s+)?(?:(?:the\s+)?(?P<rel>%REL%)\s+month|(?P<month>%MONTH%)(?:,?\s+(?P<year>%YEAR%))?)",
        )?,
        month_first_day_range: b.pattern(
            "month_first_day_range",
            r"(?:(?:from|between)\s+)?(?P<month>%MONTH%)\.?\s+(?P<start>%DAY%)\s*%CONNECTOR%\s*(?P<end>%DAY%)(?:,?\s+(?P<year>%YEAR%))?",
        )?,
        relative_unit: b.pattern(
            "relative_unit",
            r"(?:(?:the\s+)?(?P<pos>%POSITION%)\s+(?:of\s+)?)?(?:the\s+)?(?P<rel>%REL%)\s+(?P<unit>weekend|week|month|year|quarter)",
        )?,
        relative_month: b.pattern(
            "relative_month",
            r"(?:(?:the\s+)?(?P<pos>%POSITION%)\s+(?:of\s+)?)?(?P<rel>%REL%)\s+(?P<month>%MONTH%)",
        )?,
        bare_month: b.pattern(
            "bare_month",
            r"(?:(?:the\s+)?(?P<pos>%POSITION%)\s+(?:of\s+)?)?(?P<month>%MONTH_FULL%)",
        )?,
        half: b.pattern(
            "half",
            r"(?:the\s+)?(?P<half>first|second|1st|2nd)\s+half\s+of\s+(?:(?P<year>%YEAR%)|(?:the\s+)?(?P<rel>%REL%)\s+year|the\s+year)",
        )?,
        to_date: b.pattern(
            "to_date",
            r"(?P<unit>year|month|week)\s+to\s+date|(?P<abbr>ytd|mtd|wtd)",
        )?,
        relative_duration: b.pattern(
            "relative_duration",
            r"(?:the\s+)?(?P<rel>%REL%)\s+(?P<duration>%DATE_DURATION%)",
        )?,
        year_and_month: b.pattern(
            "year_and_month",
            r"(?P<month>%MONTH%)\.?,?\s+(?:of\s+)?(?P<year>%YEAR%)",
        )?,
        numeric_year_month: b.pattern(
            "numeric_year_month",
            r"(?P<year>%YEAR%)[-/](?P<month>1[0-2]|0[1-9])",
        )?,
        month_of_relative_year: b.pattern(
            "month_of_relative_year",
            r"(?P<month>%MONTH%)\s+(?:of\s+)?(?:the\s+)?(?P<rel>%REL%)\s+year",
        )?,
        year_range: b.pattern(
            "year_range",
            r"(?:(?:from|between)\s+)?(?P<start>%YEAR%)\s*%CONNECTOR%\s*(?P<end>%YEAR%|\d{2})",
        )?,
        month_range: b.pattern(
            "month_range",
            r"(?:(?:from|between)\s+)?(?P<start>%MONTH%)\s*%CONNECTOR%\s*(?P<end>%MONTH%)(?:,?\s+(?:of\s+)?(?P<year>%YEAR%))?",
        )?,
        day_range: b.pattern(
            "day_range",
            r"(?:(?:from|between)\s+)?the\s+(?P<start>%DAY_ORD%)\s*%CONNECTOR%\s*(?:the\s+)?(?P<end>%DAY_ORD%)",
        )?,
        year: b.pattern("year", r"(?:(?:the\s+)?year\s+)?(?P<year>%YEAR%)")?,
        week_of_month: b.pattern(
            "week_of_month",
            r"(?:the\s+)?(?P<cardinal>%CARDINAL%)\s+week\s+(?:of|in)\s+(?:(?:the\s+)?(?P<rel>%REL%)\s+month|(?P<month>%MONTH%)(?:,?\s+(?P<year>%YEAR%))?)",
        )?,
        iso_week: b.pattern(
            "iso_week",
            r"week\s+(?P<week>5[0-3]|[1-4]\d|0?[1-9])(?:\s+(?:of|in)\s+(?P<year>%YEAR%))?|(?P<iso_year>%YEAR%)-?w(?P<iso_week>5[0-3]|[0-4]\d)",
        )?,
        season: b.pattern(
            "season",
            r"(?:(?:the\s+)?(?P<pos>%POSITION%)\s+(?:of\s+)?)?(?:(?:the\s+)?(?P<rel>%REL%)\s+|the\s+)?(?P<season>%SEASON%)(?:\s+(?:of\s+)?(?P<year>%YEAR%))?",
        )?,
        quarter: b.pattern(
            "quarter",
            r"(?:the\s+)?(?P<cardinal>%CARDINAL%)\s+quarter(?:\s+of\s+(?:(?P<year>%YEAR%)|(?:the\s+)?(?P<rel>%REL%)\s+year|the\s+year))?",
        )?,
        quarter_abbr: b.pattern(
            "quarter_abbr",
            r"q(?P<q>[1-4])(?:\s+(?P<year>%YEAR%))?|(?P<year2>%YEAR%)\s*-?\s*q(?P<q2>[1-4])",
        )?,
        decade: b.pattern(
            "decade",
            r"(?:the\s+)?(?:(?P<century>1\d|20)(?P<decade>\d)0'?s|(?P<short>\d)0'?s|(?P<word>%DECADE_WORD%))",
        )?,
    })
}

fn time_patterns(b: &Builder) -> Result<TimePatterns> {
    Ok(TimePatterns {
        digital: b.pattern(
            "digital",
            r"(?:(?:at|around)\s+)?(?P<hour>2[0-3]|[01]?\d):(?P<min>[0-5]\d)(?::(?P<sec>[0-5]\d))?(?:\s*(?P<ampm>%AMPM%))?(?:\s+(?P<seg>%DAYPART%))?",
        )?,
        hour_with_ampm: b.pattern(
            "hour_with_ampm",
            r"(?:(?:at|around)\s+)?(?P<hour>%HOUR%)(?:\s*(?P<ampm>%AMPM%)|\s+o'?\s*clock(?:\s+(?P<seg>%DAYPART%))?|\s+(?P<seg2>%DAYPART%))",
        )?,
        at_hour: b.pattern("at_hour", r"(?:at|around)\s+(?P<hour>2[0-4]|1\d|0?\d)")?,
        spoken: b.pattern(
            "spoken",
            r"(?:(?:at|around)\s+)?(?:(?P<half>half)|(?P<quarter>(?:a\s+)?quarter)|(?P<min>%MINWORDS%|one|two|three|four|five|six|seven|eight|nine)(?:\s+minutes?)?|(?P<min_digits>[1-5]?\d)\s+minutes?)\s+(?P<dir>past|after|to|before|till|til)\s+(?P<hour>%HOUR%)(?:\s*(?P<ampm>%AMPM%)|\s+(?P<seg>%DAYPART%))?",
        )?,
        hour_minute_words: b.pattern(
            "hour_minute_words",
            r"(?:(?:at|around)\s+)?(?P<hour>%HOUR_WORD%)\s+(?P<min>%MINWORDS%)(?:\s*(?P<ampm>%AMPM%)|\s+(?P<seg>%DAYPART%))?",
        )?,
        special: b.pattern(
            "special",
            r"(?:(?:at|around)\s+)?(?P<special>%SPECIAL_TIME%)",
        )?,
    })
}

fn time_period_patterns(b: &Builder) -> Result<TimePeriodPatterns> {
    let side = |name: &str| format!(r"(?P<{name}>%HOUR%)(?:\s*(?P<{name}_ampm>%AMPM%))?");
    let start = side("start");
    let end = side("end");
    Ok(TimePeriodPatterns {
        hour_ranges: vec![
            b.pattern(
                "hour_range",
                r"(?P<start>%HOUR%)(?:\s*(?P<start_ampm>%AMPM%))?\s*(?:-|to|till|until)\s*(?P<end>%HOUR%)\s*(?P<end_ampm>%AMPM%)",
            )?,
            b.pattern(
                "hour_range_between",
                &format!(r"between\s+{start}\s+and\s+{end}"),
            )?,
            b.pattern(
                "hour_range_from",
                &format!(r"from\s+{start}\s*(?:-|to|till|until)\s*{end}"),
            )?,
        ],
        day_segment: b.pattern(
            "day_segment",
            r"(?:(?P<pos>early|late)\s+(?:in\s+the\s+)?)?(?:(?:in|during)\s+the\s+)?(?P<segment>%SEGMENT%)",
        )?,
    })
}

fn datetime_patterns(b: &Builder) -> Result<DateTimePatterns> {
    Ok(DateTimePatterns {
        now: b.pattern(
            "now",
            r"(?P<now>right\s+now|just\s+now|now|at\s+the\s+moment|currently|as\s+soon\s+as\s+possible|asap)",
        )?,
        time_of_today: b.pattern(
            "time_of_today",
            r"(?P<time>.+?)\s+(?P<today>tonight|today|this\s+(?:morning|afternoon|evening))",
        )?,
        today_at_time: b.pattern(
            "today_at_time",
            r"(?P<today>tonight|today|this\s+(?:morning|afternoon|evening))\s*,?\s+(?:at\s+|around\s+)?(?P<time>.+)",
        )?,
        duration_relative: b.pattern(
            "duration_relative",
            r"in\s+(?P<ahead>%TIME_DURATION%)|(?P<duration>%TIME_DURATION%)\s+(?P<dir>%DIRECTION%)",
        )?,
        connector: b.regex(
            r"(?i)^(?:\s|,|@|\bat\b|\bon\b|\bin\b|\bof\b|\bthe\b|\bthis\b|\baround\b|\babout\b|\b(?P<segment>%SEGMENT%)\b)*$",
        )?,
    })
}

fn datetime_period_patterns(b: &Builder) -> Result<DateTimePeriodPatterns> {
    Ok(DateTimePeriodPatterns {
        relative_segment: b.pattern(
            "relative_segment",
            r"(?P<rel>this|last|next|today|tomorrow|yesterday)\s+(?P<segment>%SEGMENT%)|(?P<tonight>tonight)",
        )?,
        relative_duration: b.pattern(
            "relative_duration",
            r"(?:the\s+)?(?P<rel>%REL%)\s+(?P<duration>%TIME_DURATION%)",
        )?,
        connector: b.regex(
            r"(?i)^(?:\s|,|\bin\b|\bon\b|\bthe\b|\bof\b|\bfrom\b|\bbetween\b|\bduring\b|\b(?P<rel>this|last|next)\b)*$",
        )?,
    })
}

fn duration_patterns(b: &Builder) -> Result<DurationPatterns> {
    Ok(DurationPatterns {
        number_with_unit: b.pattern(
            "number_with_unit",
            r"(?:(?P<mod>%MORE_LESS%)\s+)?(?P<body>%DURATION%)",
        )?,
        half_unit: b.pattern(
            "half_unit",
            r"(?:(?P<mod>%MORE_LESS%)\s+)?(?:(?P<num>%NUM%)\s+(?P<unit>%UNIT%)\s+and\s+a\s+half|(?P<num_b>%NUM%)\s+and\s+a\s+half\s+(?P<unit_b>%UNIT%)|half\s+an?\s+(?P<unit_c>%UNIT%))",
        )?,
        part: b.regex(r"(?i)(?P<num>%NUM%)\s*(?P<unit>%UNIT%)\b")?,
    })
}

fn set_patterns(b: &Builder) -> Result<SetPatterns> {
    Ok(SetPatterns {
        periodic: b.pattern("periodic", r"(?P<periodic>%PERIODIC%)")?,
        every_unit: b.pattern(
            "every_unit",
            r"(?:every|each)\s+(?P<other>other\s+)?(?P<unit>%UNIT_SINGULAR%)",
        )?,
        every_duration: b.pattern(
            "every_duration",
            r"(?:every|each)\s+(?P<duration>%DURATION%)",
        )?,
        every_phrase: b.pattern("every_phrase", r"(?:every|each)\s+(?P<phrase>.+)")?,
        plural_weekday: b.pattern(
            "plural_weekday",
            r"(?:on\s+)?(?P<weekday>%WEEKDAY_FULL%)s",
        )?,
        preceding_cue: b.regex(r"(?i)\b(?:every|each)\s+$")?,
    })
}

fn timezone_patterns(b: &Builder) -> Result<TimeZonePatterns> {
    Ok(TimeZonePatterns {
        utc_offset: b.pattern(
            "utc_offset",
            r"(?P<base>utc|gmt)(?:\s*(?P<sign>[+-])\s*(?P<hours>1[0-4]|0?\d)(?::?(?P<minutes>[0-5]\d))?)?",
        )?,
        abbreviation: b.pattern("abbreviation", r"(?P<abbr>%TZ_ABBR%)")?,
        named: b.pattern("named", r"(?P<name>%TZ_NAME%)")?,
        iana: b.pattern(
            "iana",
            r"(?P<iana>(?:africa|america|antarctica|asia|atlantic|australia|europe|indian|pacific)/[a-z_]+(?:/[a-z_]+)?)",
        )?,
    })
}

fn modifier_patterns() -> Result<ModifierPatterns> {
    Ok(ModifierPatterns {
        before: Cue::new(
            Some(r"on\s+or\s+before|no\s+later\s+than|prior\s+to|earlier\s+than|ahead\s+of|before|by"),
            Some(r"or\s+(?:before|earlier)"),
        )?,
        after: Cue::new(
            Some(r"on\s+or\s+after|no\s+earlier\s+than|later\s+than|after"),
            Some(r"or\s+(?:after|later)"),
        )?,
        until: Cue::new(Some(r"through|thru|up\s+until|up\s+to|until|till|til"), None)?,
        equal: Cue::new(Some(r"(?:on\s+)?(?:exactly|precisely)"), None)?,
        since: Cue::new(
            Some(r"since|as\s+of|starting(?:\s+(?:from|on|at))?|beginning(?:\s+(?:from|on|at))?"),
            Some(r"onwards?|and\s+(?:after|later|beyond)"),
        )?,
        inclusive: Regex::new(r"(?i)\bor\b|\bno\s+(?:later|earlier)\s+than\b")?,
    })
}

fn connector_patterns() -> Result<ConnectorPatterns> {
    Ok(ConnectorPatterns {
        range: Regex::new(
            r"(?i)\s*(?:-|–|~|\bto\b|\bthrough\b|\bthru\b|\buntil\b|\btill\b|\band\b)\s*",
        )?,
        range_prefix: Regex::new(r"(?i)^\s*(?:from|between)\s+")?,
        preceding_range_prefix: Regex::new(r"(?i)\b(?:from|between)\s+$")?,
        duration_anchor: Regex::new(r"(?i)^\s+(?:before|after)\s+$")?,
    })
}

fn dictionaries() -> Dictionaries {
    Dictionaries {
        months: Lookup::new("months", MONTHS.iter().copied()),
        weekdays: Lookup::new("weekdays", WEEKDAYS.iter().copied()),
        cardinals: Lookup::new("cardinals", CARDINALS.iter().copied()),
        relative_swift: Lookup::new("relative_swift", RELATIVE_SWIFT.iter().copied()),
        special_days: Lookup::new("special_days", SPECIAL_DAYS.iter().copied()),
        duration_units: Lookup::new("duration_units", DURATION_UNITS.iter().copied()),
        duration_direction: Lookup::new("duration_direction", DURATION_DIRECTION.iter().copied()),
        duration_modifiers: Lookup::new("duration_modifiers", DURATION_MODIFIERS.iter().copied()),
        period_positions: Lookup::new("period_positions", PERIOD_POSITIONS.iter().copied()),
        seasons: Lookup::new("seasons", SEASONS.iter().copied()),
        decade_words: Lookup::new("decade_words", DECADE_WORDS.iter().copied()),
        holidays: Lookup::new("holidays", HOLIDAYS.iter().copied()),
        day_segments: Lookup::new("day_segments", DAY_SEGMENTS.iter().copied()),
        periodic_sets: Lookup::new("periodic_sets", PERIODIC_SETS.iter().copied()),
        special_times: Lookup::new("special_times", SPECIAL_TIMES.iter().copied()),
        timezone_abbreviations: Lookup::new(
            "timezone_abbreviations",
            TIMEZONE_ABBREVIATIONS.iter().copied(),
        ),
        timezone_names: Lookup::new("timezone_names", TIMEZONE_NAMES.iter().copied()),
    }
}

impl LocaleConfig {
    /// The bundled English locale with [`EnglishNumberParser`] attached.
    pub fn english() -> Result<Self> {
        let b = Builder {
            placeholders: placeholders(),
        };
        let patterns = Patterns {
            date: date_patterns(&b)?,
            date_period: date_period_patterns(&b)?,
            time: time_patterns(&b)?,
            time_period: time_period_patterns(&b)?,
            datetime: datetime_patterns(&b)?,
            datetime_period: datetime_period_patterns(&b)?,
            duration: duration_patterns(&b)?,
            holiday: HolidayPatterns {
                holiday: b.pattern(
                    "holiday",
                    r"(?:(?:the\s+)?(?P<rel>%REL%)\s+)?(?P<holiday>%HOLIDAY%)(?:\s+(?:of\s+)?(?:(?P<year>%YEAR%)|(?:the\s+)?(?P<rel_year>%REL%)\s+year))?",
                )?,
            },
            set: set_patterns(&b)?,
            timezone: timezone_patterns(&b)?,
            modifiers: modifier_patterns()?,
            connectors: connector_patterns()?,
        };
        tracing::trace!(locale = "en", "compiled locale patterns");

        Ok(Self {
            name: "en",
            patterns,
            dictionaries: dictionaries(),
            two_digit_year_split: 50,
            token_before_date: "on ",
            number_parser: Some(Arc::new(EnglishNumberParser::new())),
        })
    }
}
