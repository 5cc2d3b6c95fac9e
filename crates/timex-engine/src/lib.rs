//! # timex-engine
//!
//! Natural-language date and time recognition.
//!
//! Given free text and a reference instant, the engine finds date/time
//! mentions ("tomorrow at 5pm", "the first week of November", "every other
//! Monday", "3 days ago") and resolves each one to a canonical timex string
//! plus a future and a past candidate value. Under-specified mentions such as
//! "Oct. 2" bracket the reference instant; fully specified ones carry the
//! same value in both candidates.
//!
//! ## Modules
//!
//! - [`extractor`]: text → tagged spans (longest match, compositions, modifier cues)
//! - [`parsers`]: one parser per granularity plus the [`MergedParser`] dispatcher
//! - [`config`]: locale tables and compiled patterns (`LocaleConfig`)
//! - [`timex`]: timex string builders
//! - [`calendar`]: calendar arithmetic (weekday bracketing, Easter, nth weekday)
//! - [`number`]: numeric sub-parser behind the [`NumberParser`] trait
//! - [`resolution`]: parse results → flat `{timex, type, value | start/end, mod}` entries
//! - [`recognizer`]: [`DateTimeRecognizer`], extraction followed by parsing
//! - [`model`]: shared result types
//! - [`error`]: Error types

pub mod calendar;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod number;
pub mod parsers;
pub mod recognizer;
pub mod resolution;
pub mod timex;

pub use config::LocaleConfig;
pub use error::{Result, TimexError};
pub use extractor::DateTimeExtractor;
pub use model::{
    Comment, DateTimeParseResult, DateTimeResolutionResult, DurationUnit, EntityType,
    ExtractResult, FuturePast, Modifier, ResolvedValue, Season, DURATION_WITH_AGO_OR_LATER,
};
pub use number::{EnglishNumberParser, NumberParser};
pub use parsers::{GranularityParser, MergedParser};
pub use recognizer::{parse_reference, DateTimeRecognizer};
pub use resolution::{resolve, Recognized, ResolutionEntry};
