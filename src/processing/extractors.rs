// Field-specific extraction over filtered OCR text
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{ExtractionConfig, NameScoring};

lazy_static! {
    // Passport number search patterns, most specific first. Order is contractual.
    static ref PASSPORT_NUMBER_PATTERNS: Vec<Regex> = vec![
        // E + 8 digits
        Regex::new(r"(?i)\bE[0-9]{8}\b").unwrap(),
        // 9 digits
        Regex::new(r"\b[0-9]{9}\b").unwrap(),
        // 2 letters + 7 digits
        Regex::new(r"(?i)\b[A-Z]{2}[0-9]{7}\b").unwrap(),
        // Generic alphanumeric code
        Regex::new(r"(?i)\b[A-Z0-9]{6,12}\b").unwrap(),
    ];

    // Case-sensitive re-check of the same shapes; drops matches only the
    // case-insensitive search accepted.
    static ref PASSPORT_NUMBER_SHAPES: Vec<Regex> = vec![
        Regex::new(r"^E[0-9]{8}$").unwrap(),
        Regex::new(r"^[0-9]{9}$").unwrap(),
        Regex::new(r"^[A-Z]{2}[0-9]{7}$").unwrap(),
        Regex::new(r"^[A-Z0-9]{6,12}$").unwrap(),
    ];

    static ref FOUR_DIGIT_RUN: Regex = Regex::new(r"[0-9]{4}").unwrap();
    static ref ALL_DIGITS: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref NAME_CHARSET: Regex = Regex::new(r"^[A-Z\s'\-]+$").unwrap();
    static ref OUTSIDE_NAME_CHARSET: Regex = Regex::new(r"[^A-Z\s'\-]").unwrap();

    static ref COUNTRY_CODE: Regex = Regex::new(r"\b[A-Z]{3}\b").unwrap();
    static ref GENDER_TOKEN: Regex = Regex::new(r"\b([MFX])\b").unwrap();
}

// Name scores are sums of tenths; absorbs f32 rounding at the threshold.
const SCORE_TOLERANCE: f32 = 1e-6;

const MALE_MARKERS: [&str; 3] = [" m ", " male", "<m>"];
const FEMALE_MARKERS: [&str; 3] = [" f ", " female", "<f>"];

pub struct FieldExtractor;

impl FieldExtractor {
    /// First validated match of the highest-priority pattern that yields one.
    pub fn extract_passport_number(text: &str) -> Option<String> {
        for (priority, pattern) in PASSPORT_NUMBER_PATTERNS.iter().enumerate() {
            let found = pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .find(|candidate| Self::is_valid_passport_number(candidate));
            if let Some(value) = found {
                debug!("Passport number matched pattern #{}", priority);
                return Some(value.to_uppercase());
            }
        }
        None
    }

    pub fn is_valid_passport_number(candidate: &str) -> bool {
        let len = candidate.chars().count();
        (6..=12).contains(&len) && PASSPORT_NUMBER_SHAPES.iter().any(|shape| shape.is_match(candidate))
    }

    /// Highest-ranked plausible name line, returned unmodified.
    pub fn extract_full_name(lines: &[&str], scoring: &NameScoring) -> Option<String> {
        let mut best: Option<(&str, f32)> = None;
        for &line in lines {
            if !Self::is_name_candidate(line, scoring) {
                continue;
            }
            let score = Self::name_confidence(line, scoring);
            if score <= scoring.acceptance_threshold + SCORE_TOLERANCE {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((line, score));
            }
        }
        best.map(|(line, score)| {
            debug!("Full name chosen with score {:.2}", score);
            line.to_string()
        })
    }

    fn is_name_candidate(line: &str, scoring: &NameScoring) -> bool {
        let len = line.chars().count();
        if len < scoring.min_length || len > scoring.max_length {
            return false;
        }
        if FOUR_DIGIT_RUN.is_match(line) || ALL_DIGITS.is_match(line) {
            return false;
        }
        // MRZ filler syntax
        !(line.contains('<') && line.contains('>'))
    }

    /// Heuristic likelihood that a line is a holder's name, in [0, 1].
    pub fn name_confidence(line: &str, scoring: &NameScoring) -> f32 {
        let mut score = scoring.base;

        let len = line.chars().count();
        if len >= scoring.preferred_length.0 && len <= scoring.preferred_length.1 {
            score += scoring.length_bonus;
        }

        let words = line.split_whitespace().count();
        if words >= scoring.preferred_words.0 && words <= scoring.preferred_words.1 {
            score += scoring.word_count_bonus;
        }

        if line == line.to_uppercase() {
            score += scoring.uppercase_bonus;
        }

        if NAME_CHARSET.is_match(line) {
            score += scoring.charset_bonus;
        }

        if line.chars().any(|c| c.is_ascii_digit()) {
            score -= scoring.digit_penalty;
        }

        if OUTSIDE_NAME_CHARSET.is_match(line) {
            score -= scoring.charset_penalty;
        }

        score.clamp(0.0, 1.0)
    }

    /// First three-letter code present in the allow-list.
    pub fn extract_nationality(text: &str, config: &ExtractionConfig) -> Option<String> {
        COUNTRY_CODE
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|code| config.is_supported_nationality(code))
            .map(str::to_string)
    }

    pub fn extract_gender(text: &str) -> Option<String> {
        // Line breaks are kept: a unit at the end of one line is not a marker.
        let lower = text.to_lowercase();

        if MALE_MARKERS.iter().any(|m| lower.contains(m)) {
            return Some("M".to_string());
        }
        if FEMALE_MARKERS.iter().any(|m| lower.contains(m)) {
            return Some("F".to_string());
        }

        GENDER_TOKEN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Partial MRZ read: the segment after the first `<` on a filler line,
    /// cut to `length` characters. No check digits are verified.
    pub fn extract_personal_number(text: &str, length: usize) -> Option<String> {
        text.lines()
            .filter(|line| line.contains('<'))
            .filter_map(|line| line.split('<').nth(1))
            .find(|segment| segment.chars().count() >= length)
            .map(|segment| segment.chars().take(length).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e_series_number_beats_nine_digit_noise() {
        let text = "REF 987654321\nPASSPORT NO E12345678";
        assert_eq!(FieldExtractor::extract_passport_number(text), Some("E12345678".to_string()));
    }

    #[test]
    fn test_nine_digit_number_beats_two_letter_form() {
        let text = "AB1234567 123456789";
        assert_eq!(FieldExtractor::extract_passport_number(text), Some("123456789".to_string()));
    }

    #[test]
    fn test_two_letter_seven_digit_number() {
        assert_eq!(
            FieldExtractor::extract_passport_number("No. GB1234567 issued"),
            Some("GB1234567".to_string())
        );
    }

    #[test]
    fn test_lowercase_matches_are_rejected() {
        // Found by the case-insensitive search but fails the case-sensitive re-check.
        assert_eq!(FieldExtractor::extract_passport_number("passport holder"), None);
        assert_eq!(FieldExtractor::extract_passport_number("e12345678"), None);
    }

    #[test]
    fn test_generic_code_fallback() {
        assert_eq!(FieldExtractor::extract_passport_number("doc K7X99Q2"), Some("K7X99Q2".to_string()));
        assert_eq!(FieldExtractor::extract_passport_number("12345"), None);
    }

    #[test]
    fn test_name_confidence_weights() {
        let scoring = NameScoring::default();
        assert!((FieldExtractor::name_confidence("JOHN SMITH", &scoring) - 1.0).abs() < 1e-6);
        // mixed case: no uppercase or charset bonus, charset penalty
        assert!((FieldExtractor::name_confidence("John Smith", &scoring) - 0.7).abs() < 1e-6);
        // single word, long enough, upper case
        assert!((FieldExtractor::name_confidence("PASSPORT", &scoring) - 0.9).abs() < 1e-6);
        // digits and punctuation
        assert!(FieldExtractor::name_confidence("No. 12", &scoring) < 0.6);
    }

    #[test]
    fn test_name_at_threshold_is_rejected() {
        let scoring = NameScoring::default();
        // 0.5 + 0.2 length + 0.1 upper case - 0.2 outside charset
        assert!((FieldExtractor::name_confidence("JOHN.", &scoring) - 0.6).abs() < 1e-6);
        assert_eq!(FieldExtractor::extract_full_name(&["JOHN."], &scoring), None);
    }

    #[test]
    fn test_full_name_prefers_highest_score() {
        let scoring = NameScoring::default();
        let lines = ["PASSPORT", "P<USASMITH<<JOHN<<<<<<<<<", "JOHN SMITH", "Date 12/03/1986"];
        assert_eq!(FieldExtractor::extract_full_name(&lines, &scoring), Some("JOHN SMITH".to_string()));
    }

    #[test]
    fn test_full_name_rejects_structural_noise() {
        let scoring = NameScoring::default();
        let too_long = "X".repeat(51);
        let lines = ["1986", "123", "A", "<JOHN>", too_long.as_str()];
        assert_eq!(FieldExtractor::extract_full_name(&lines, &scoring), None);
    }

    #[test]
    fn test_full_name_returns_raw_line() {
        let scoring = NameScoring::default();
        let lines = ["Mary-Jane O'Neil"];
        assert_eq!(
            FieldExtractor::extract_full_name(&lines, &scoring),
            Some("Mary-Jane O'Neil".to_string())
        );
    }

    #[test]
    fn test_nationality_allow_list() {
        let config = ExtractionConfig::default();
        assert_eq!(
            FieldExtractor::extract_nationality("TYPE P CODE XYZ NATIONALITY CAN", &config),
            Some("CAN".to_string())
        );
        assert_eq!(FieldExtractor::extract_nationality("ABC DEF", &config), None);
    }

    #[test]
    fn test_gender_markers() {
        assert_eq!(FieldExtractor::extract_gender("Sex / Sexe\nM\n"), Some("M".to_string()));
        assert_eq!(FieldExtractor::extract_gender("SEX: FEMALE"), Some("F".to_string()));
        assert_eq!(FieldExtractor::extract_gender("code <F> here"), Some("F".to_string()));
        assert_eq!(FieldExtractor::extract_gender("SEX X"), Some("X".to_string()));
        assert_eq!(FieldExtractor::extract_gender("NO MARKER HERE"), None);
    }

    #[test]
    fn test_gender_marker_does_not_span_lines() {
        assert_eq!(FieldExtractor::extract_gender("Height 1.70 m\nSex F"), Some("F".to_string()));
        assert_eq!(FieldExtractor::extract_gender("Height 1.62 f\nSex M"), Some("M".to_string()));
    }

    #[test]
    fn test_personal_number_from_filler_line() {
        let text = "P<USASMITH<<JOHN<<<<\nL898902C3<6UTO7408122F1204159ZE184226B<<<<<10";
        assert_eq!(
            FieldExtractor::extract_personal_number(text, 14),
            Some("6UTO7408122F12".to_string())
        );
        assert_eq!(FieldExtractor::extract_personal_number("no filler here", 14), None);
    }
}
