//! Best-effort extraction of a yield figure from a vendor reply.

use derive_getters::Getters;
use rainyield_error::{PredictionError, PredictionErrorKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+(?:\.\d+)?|\.\d+)").expect("number pattern is valid")
});

static LEADING_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:metric\s+)?(?:t|tons?|tonnes?)(?:\s*/\s*ha|\s+per\s+hectare)\b\.?",
    )
    .expect("unit pattern is valid")
});

static RAINFALL_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mm|millimet(?:er|re)s?)\b").expect("rainfall unit pattern is valid")
});

const SEPARATORS: &[char] = &['-', ':', ',', ';', '|', '.'];

/// A value and optional remark extracted from a provider reply.
///
/// # Examples
///
/// ```
/// use rainyield_core::RawPrediction;
///
/// let raw = RawPrediction::from_text("3.4\nRainfall is near optimal.").unwrap();
/// assert_eq!(*raw.value(), 3.4);
/// assert_eq!(raw.comment().as_deref(), Some("Rainfall is near optimal."));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RawPrediction {
    /// Predicted yield in t/ha
    value: f64,
    /// Free-text explanation, if any
    comment: Option<String>,
}

impl RawPrediction {
    /// Creates a prediction, dropping blank comments.
    pub fn new(value: f64, comment: Option<String>) -> Self {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { value, comment }
    }

    /// Parse "a number followed by a comment" from free text.
    ///
    /// Numbers tagged as rainfall (`850 mm`) are skipped. The first number
    /// tagged with a yield unit wins, otherwise the first remaining number.
    /// Whatever follows it, minus a leading unit and separators, is the
    /// comment.
    #[track_caller]
    pub fn from_text(reply: &str) -> Result<Self, PredictionError> {
        let candidates: Vec<Candidate> = NUMBER
            .find_iter(reply)
            .map(|found| Candidate::new(reply, found.start(), found.end()))
            .filter(|candidate| !RAINFALL_UNIT.is_match(candidate.rest))
            .collect();
        let chosen = candidates
            .iter()
            .find(|candidate| LEADING_UNIT.is_match(candidate.rest))
            .or_else(|| candidates.first())
            .ok_or_else(|| unparseable(reply))?;

        let value: f64 = chosen.text.parse().map_err(|_| unparseable(reply))?;
        if !value.is_finite() {
            return Err(unparseable(reply));
        }

        let rest = LEADING_UNIT
            .find(chosen.rest)
            .map(|unit| &chosen.rest[unit.end()..])
            .unwrap_or(chosen.rest);
        let comment = rest.trim_start_matches(|c: char| c.is_whitespace() || SEPARATORS.contains(&c));

        Ok(Self::new(value, Some(comment.to_string())))
    }
}

/// A number found in a reply and the text after it.
struct Candidate<'a> {
    text: &'a str,
    rest: &'a str,
}

impl<'a> Candidate<'a> {
    fn new(reply: &'a str, start: usize, end: usize) -> Self {
        let mut text = &reply[start..end];
        // "1.0-6.0" is a range, not a negative number
        let after_digit = reply[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        if after_digit {
            text = text.trim_start_matches(['-', '+']);
        }
        Self {
            text,
            rest: reply[end..].trim_start(),
        }
    }
}

#[track_caller]
fn unparseable(reply: &str) -> PredictionError {
    let preview: String = reply.chars().take(200).collect();
    PredictionError::new(PredictionErrorKind::Unparseable(preview))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_number() {
        let raw = RawPrediction::from_text("  4.25 ").unwrap();
        assert_eq!(*raw.value(), 4.25);
        assert_eq!(*raw.comment(), None);
    }

    #[test]
    fn test_number_with_unit_and_comment() {
        let raw = RawPrediction::from_text("3.1 t/ha - Slightly below the optimal band.").unwrap();
        assert_eq!(*raw.value(), 3.1);
        assert_eq!(
            raw.comment().as_deref(),
            Some("Slightly below the optimal band.")
        );
    }

    #[test]
    fn test_number_after_preamble() {
        let raw =
            RawPrediction::from_text("Predicted yield: 2.8 metric tons per hectare. Dry year.")
                .unwrap();
        assert_eq!(*raw.value(), 2.8);
        assert_eq!(raw.comment().as_deref(), Some("Dry year."));
    }

    #[test]
    fn test_integer_and_leading_dot() {
        assert_eq!(*RawPrediction::from_text("5").unwrap().value(), 5.0);
        assert_eq!(*RawPrediction::from_text(".75 tonnes/ha").unwrap().value(), 0.75);
    }

    #[test]
    fn test_no_number_is_unparseable() {
        let err = RawPrediction::from_text("I cannot predict that.").unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::Unparseable(_)));
    }

    #[test]
    fn test_blank_comment_dropped() {
        let raw = RawPrediction::new(1.0, Some("   ".into()));
        assert_eq!(*raw.comment(), None);
    }

    #[test]
    fn test_restated_rainfall_is_skipped() {
        let raw = RawPrediction::from_text("With 850 mm of rainfall, expect about 3.2 t/ha.").unwrap();
        assert_eq!(*raw.value(), 3.2);
        assert_eq!(*raw.comment(), None);

        let raw = RawPrediction::from_text("At 1200 millimetres expect 4.1\nWet but manageable.").unwrap();
        assert_eq!(*raw.value(), 4.1);
        assert_eq!(raw.comment().as_deref(), Some("Wet but manageable."));
    }

    #[test]
    fn test_yield_unit_preferred_over_earlier_number() {
        let raw =
            RawPrediction::from_text("Of 3 scenarios the likely one is 2.6 tonnes/ha. Dry spring.")
                .unwrap();
        assert_eq!(*raw.value(), 2.6);
        assert_eq!(raw.comment().as_deref(), Some("Dry spring."));
    }

    #[test]
    fn test_range_dash_is_not_a_sign() {
        let raw = RawPrediction::from_text("Expect 1.0-6.0 in general, 3.5 here").unwrap();
        assert_eq!(*raw.value(), 1.0);
        assert_eq!(*RawPrediction::from_text("2.0-3.0 t/ha").unwrap().value(), 3.0);
    }

    #[test]
    fn test_only_rainfall_numbers_is_unparseable() {
        let err = RawPrediction::from_text("Rainfall of 700 mm is typical.").unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::Unparseable(_)));
    }
}
