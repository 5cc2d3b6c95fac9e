//! Numeric sub-parser.
//!
//! Date/time resolution needs to turn short numeral-bearing substrings ("3",
//! "twenty one", "a couple of", "15th", "thirty-first") into numbers. The core
//! consumes this through the [`NumberParser`] trait so a locale can bring its
//! own numeral grammar; [`EnglishNumberParser`] is the bundled implementation.

use std::fmt::Debug;

/// Turns spelled-out or digit quantities into numeric values.
pub trait NumberParser: Debug + Send + Sync {
    /// Parse a cardinal quantity ("3", "1.5", "twenty one", "an").
    fn parse(&self, text: &str) -> Option<f64>;

    /// Parse an ordinal ("3rd", "twenty-first"). Plain digits are accepted too.
    fn parse_ordinal(&self, text: &str) -> Option<i64>;
}

pub(crate) const UNIT_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

pub(crate) const TENS_WORDS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

pub(crate) const ORDINAL_WORDS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("thirtieth", 30),
];

/// All cardinal words from one to ninety-nine, both hyphenated and spaced.
pub(crate) fn cardinal_words() -> Vec<String> {
    let mut words: Vec<String> = UNIT_WORDS
        .iter()
        .filter(|(_, v)| *v > 0)
        .map(|(w, _)| w.to_string())
        .collect();
    for (tens, _) in TENS_WORDS {
        words.push(tens.to_string());
        for (unit, _) in UNIT_WORDS.iter().filter(|(_, v)| (1..10).contains(v)) {
            words.push(format!("{tens}-{unit}"));
            words.push(format!("{tens} {unit}"));
        }
    }
    words
}

/// Ordinal words for days of the month (first .. thirty-first).
pub(crate) fn day_ordinal_words() -> Vec<String> {
    let mut words: Vec<String> = ORDINAL_WORDS.iter().map(|(w, _)| w.to_string()).collect();
    for (tens, base) in [("twenty", 20), ("thirty", 30)] {
        for (ord, v) in ORDINAL_WORDS.iter().filter(|(_, v)| *v < 10) {
            if base + v > 31 {
                continue;
            }
            words.push(format!("{tens}-{ord}"));
            words.push(format!("{tens} {ord}"));
        }
    }
    words
}

/// English numerals: digits, words up to the thousands, and a few idioms.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNumberParser;

impl EnglishNumberParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_words(tokens: &[&str]) -> Option<f64> {
        if tokens.is_empty() {
            return None;
        }
        let mut total = 0u64;
        let mut current = 0u64;
        for token in tokens {
            if *token == "and" {
                continue;
            }
            if let Some((_, v)) = UNIT_WORDS.iter().find(|(w, _)| w == token) {
                current += *v as u64;
            } else if let Some((_, v)) = TENS_WORDS.iter().find(|(w, _)| w == token) {
                current += *v as u64;
            } else if *token == "hundred" {
                current = current.max(1) * 100;
            } else if *token == "thousand" {
                total += current.max(1) * 1000;
                current = 0;
            } else {
                return None;
            }
        }
        Some((total + current) as f64)
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl NumberParser for EnglishNumberParser {
    fn parse(&self, text: &str) -> Option<f64> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        if let Ok(n) = normalized.replace(',', "").parse::<f64>() {
            return Some(n);
        }
        match normalized.as_str() {
            "a" | "an" => return Some(1.0),
            "a couple" | "a couple of" | "couple of" | "a pair of" => return Some(2.0),
            "half" | "a half" => return Some(0.5),
            _ => {}
        }
        let tokens: Vec<&str> = normalized.split(' ').collect();
        Self::parse_words(&tokens)
    }

    fn parse_ordinal(&self, text: &str) -> Option<i64> {
        let normalized = normalize(text);
        let digits = normalized
            .strip_suffix("st")
            .or_else(|| normalized.strip_suffix("nd"))
            .or_else(|| normalized.strip_suffix("rd"))
            .or_else(|| normalized.strip_suffix("th"))
            .unwrap_or(&normalized);
        if let Ok(n) = digits.parse::<i64>() {
            return Some(n);
        }

        let tokens: Vec<&str> = normalized.split(' ').collect();
        let (last, head) = tokens.split_last()?;
        let (_, unit) = ORDINAL_WORDS.iter().find(|(w, _)| w == last)?;
        let prefix = if head.is_empty() {
            0.0
        } else {
            Self::parse_words(head)?
        };
        Some(prefix as i64 + *unit as i64)
    }
}
