use chrono::{Datelike, Months, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};

use crate::models::DateScoring;

lazy_static! {
    // D/M/YYYY or YYYY/M/D with `/`, `.` or `-` separators
    static ref DATE_PATTERN: Regex =
        Regex::new(r"([0-9]{4}|[0-9]{1,2})[/.\-]([0-9]{1,2})[/.\-]([0-9]{4}|[0-9]{1,2})").unwrap();
}

/// A date found in the raw text, with the text around it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub canonical: String,
    /// Byte offset of the match in the raw text.
    pub position: usize,
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRoles {
    pub date_of_birth: Option<String>,
    pub expiration_date: Option<String>,
}

pub struct DateExtractor;

impl DateExtractor {
    pub fn extract_dates(text: &str, scoring: &DateScoring) -> Vec<ExtractedDate> {
        DATE_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let date = Self::parse_captures(&caps, scoring)?;
                Some(ExtractedDate {
                    canonical: Self::canonical(date),
                    date,
                    position: whole.start(),
                    context: context_window(text, whole.start(), whole.end(), scoring.context_radius)
                        .to_string(),
                })
            })
            .collect()
    }

    /// Day-month-year, or year-month-day when the first group has four digits.
    fn parse_captures(caps: &Captures, scoring: &DateScoring) -> Option<NaiveDate> {
        let first = caps.get(1)?.as_str();
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let third = caps.get(3)?.as_str();

        let (year, day): (i32, u32) = if first.len() == 4 {
            (first.parse().ok()?, third.parse().ok()?)
        } else {
            (third.parse().ok()?, first.parse().ok()?)
        };

        if year < scoring.min_year || year > scoring.max_year {
            return None;
        }
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        // Rejects days past the end of the month, e.g. 31/02.
        NaiveDate::from_ymd_opt(year, month, day)
    }

    pub fn canonical(date: NaiveDate) -> String {
        format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
    }

    pub fn parse_canonical(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    }

    /// Assign dates to birth and expiry roles.
    ///
    /// A lone date is placed by plausibility alone. With several dates each one
    /// is scored for both roles and the best positive score wins each role
    /// independently, so one date can take both roles.
    pub fn classify(dates: &[ExtractedDate], today: NaiveDate, scoring: &DateScoring) -> DateRoles {
        match dates {
            [] => DateRoles::default(),
            [only] => {
                if is_future_within(only.date, today, scoring.expiry_horizon_years) {
                    DateRoles {
                        date_of_birth: None,
                        expiration_date: Some(only.canonical.clone()),
                    }
                } else {
                    DateRoles {
                        date_of_birth: Some(only.canonical.clone()),
                        expiration_date: None,
                    }
                }
            }
            _ => {
                let birth = Self::best_by(dates, |d| Self::birth_score(d, today, scoring));
                let expiry = Self::best_by(dates, |d| Self::expiry_score(d, today, scoring));
                debug!(
                    "Classified {} dates: birth={} expiry={}",
                    dates.len(),
                    birth.is_some(),
                    expiry.is_some()
                );
                DateRoles {
                    date_of_birth: birth.map(|d| d.canonical.clone()),
                    expiration_date: expiry.map(|d| d.canonical.clone()),
                }
            }
        }
    }

    pub fn birth_score(date: &ExtractedDate, today: NaiveDate, scoring: &DateScoring) -> u32 {
        let mut score = 0;
        if is_past_within(date.date, today, scoring.birth_horizon_years) {
            score += scoring.plausibility_score;
        }
        if context_mentions(&date.context, &scoring.birth_keywords) {
            score += scoring.keyword_score;
        }
        score
    }

    pub fn expiry_score(date: &ExtractedDate, today: NaiveDate, scoring: &DateScoring) -> u32 {
        let mut score = 0;
        if is_future_within(date.date, today, scoring.expiry_horizon_years) {
            score += scoring.plausibility_score;
        }
        if context_mentions(&date.context, &scoring.expiry_keywords) {
            score += scoring.keyword_score;
        }
        score
    }

    // Earliest date wins ties.
    fn best_by<F>(dates: &[ExtractedDate], score: F) -> Option<&ExtractedDate>
    where
        F: Fn(&ExtractedDate) -> u32,
    {
        let mut best: Option<(&ExtractedDate, u32)> = None;
        for date in dates {
            let s = score(date);
            if s > 0 && best.map_or(true, |(_, top)| s > top) {
                best = Some((date, s));
            }
        }
        best.map(|(date, _)| date)
    }
}

pub fn is_future_within(date: NaiveDate, today: NaiveDate, years: u32) -> bool {
    let horizon = today
        .checked_add_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MAX);
    date > today && date <= horizon
}

pub fn is_past_within(date: NaiveDate, today: NaiveDate, years: u32) -> bool {
    let horizon = today
        .checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN);
    date < today && date >= horizon
}

/// Whole years elapsed from `from` to `to`; negative when `from` is later.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut years = (to.year() - from.year()) as i64;
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

fn context_mentions(context: &str, keywords: &[String]) -> bool {
    let lower = context.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Up to `radius` characters either side of `start..end`, on char boundaries.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn extract(text: &str) -> Vec<ExtractedDate> {
        DateExtractor::extract_dates(text, &DateScoring::default())
    }

    fn classify(text: &str) -> DateRoles {
        DateExtractor::classify(&extract(text), today(), &DateScoring::default())
    }

    #[test]
    fn test_day_first_and_year_first_orderings() {
        let dates = extract("15/03/1986 and 2031.05.20 and 1-2-2000");
        let canonical: Vec<&str> = dates.iter().map(|d| d.canonical.as_str()).collect();
        assert_eq!(canonical, vec!["1986-03-15", "2031-05-20", "2000-02-01"]);
    }

    #[test]
    fn test_out_of_range_components_are_rejected() {
        assert!(extract("15/13/1986").is_empty());
        assert!(extract("00/03/1986").is_empty());
        assert!(extract("15/03/1899").is_empty());
        assert!(extract("15/03/2101").is_empty());
        assert!(extract("31/02/2000").is_empty());
        assert!(extract("15/03/86").is_empty());
    }

    #[test]
    fn test_context_window_is_bounded() {
        let text = format!("{}DATE OF BIRTH 15/03/1986{}", "x".repeat(80), "y".repeat(80));
        let dates = extract(&text);
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].context.chars().count(), 50 + "15/03/1986".len() + 50);
        assert!(dates[0].context.contains("DATE OF BIRTH"));
        assert_eq!(dates[0].position, 80 + "DATE OF BIRTH ".len());
    }

    #[test]
    fn test_context_window_handles_multibyte_text() {
        let dates = extract("Né à Montréal — date de naissance 01.02.1990 ééé");
        assert_eq!(dates.len(), 1);
        assert!(dates[0].context.starts_with("Né"));
    }

    #[test]
    fn test_single_future_date_is_expiry() {
        let roles = classify("20/05/2030");
        assert_eq!(roles.expiration_date, Some("2030-05-20".to_string()));
        assert_eq!(roles.date_of_birth, None);
    }

    #[test]
    fn test_single_past_or_distant_date_is_birth() {
        assert_eq!(classify("15/03/1986").date_of_birth, Some("1986-03-15".to_string()));
        // beyond the 20 year horizon
        assert_eq!(classify("01/01/2060").date_of_birth, Some("2060-01-01".to_string()));
    }

    #[test]
    fn test_no_dates_leaves_roles_unset() {
        assert_eq!(classify("NO DATES HERE"), DateRoles::default());
    }

    #[test]
    fn test_context_keywords_separate_roles() {
        let roles = classify("DATE OF BIRTH 15/03/1986\nVALID UNTIL 20/05/2033");
        assert_eq!(roles.date_of_birth, Some("1986-03-15".to_string()));
        assert_eq!(roles.expiration_date, Some("2033-05-20".to_string()));
    }

    #[test]
    fn test_one_date_can_win_both_roles() {
        let filler = "-".repeat(60);
        let text = format!("born 01/01/1990 expires{}01/01/1910", filler);
        let roles = classify(&text);
        assert_eq!(roles.date_of_birth, Some("1990-01-01".to_string()));
        assert_eq!(roles.expiration_date, Some("1990-01-01".to_string()));
    }

    #[test]
    fn test_zero_scores_leave_role_unset() {
        let filler = "-".repeat(60);
        let text = format!("01/01/1910{}02/02/1911", filler);
        let roles = classify(&text);
        assert_eq!(roles.date_of_birth, None);
        assert_eq!(roles.expiration_date, None);
    }

    #[test]
    fn test_ties_keep_earliest_date() {
        let filler = "-".repeat(60);
        let text = format!("01/01/1980{}01/01/1990", filler);
        let roles = classify(&text);
        assert_eq!(roles.date_of_birth, Some("1980-01-01".to_string()));
    }

    #[test]
    fn test_plausibility_windows() {
        let t = today();
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert!(is_future_within(d(2045, 6, 1), t, 20));
        assert!(!is_future_within(d(2045, 6, 2), t, 20));
        assert!(!is_future_within(t, t, 20));
        assert!(is_past_within(d(1925, 6, 1), t, 100));
        assert!(!is_past_within(d(1925, 5, 31), t, 100));
        assert!(!is_past_within(t, t, 100));
    }

    #[test]
    fn test_years_between() {
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert_eq!(years_between(d(1986, 3, 15), d(2025, 6, 1)), 39);
        assert_eq!(years_between(d(1986, 6, 2), d(2025, 6, 1)), 38);
        assert_eq!(years_between(d(2030, 1, 1), d(2025, 6, 1)), -5);
    }
}
