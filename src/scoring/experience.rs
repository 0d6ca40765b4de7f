//! Experience match scoring

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const NEUTRAL: f64 = 0.5;
const BONUS_PER_EXTRA_YEAR: f64 = 0.05;
const MAX_BONUS: f64 = 0.2;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+\.?\d*").expect("Invalid experience regex"))
}

/// First numeric token in free text ("3-5 years" -> 3.0, "about 6.5" -> 6.5).
pub fn parse_experience_years(text: &str) -> Option<f64> {
    number_pattern()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|years| years.is_finite())
}

/// Experience compatibility in [0, 1].
///
/// Meeting the requirement scores 1.0. The surplus-years bonus is computed but
/// clamped away, so any candidate at or above the minimum scores exactly 1.0.
/// Falling short earns `cv / required` partial credit.
pub fn score_experience(jd_requirement: Option<&str>, cv_years: Option<f64>) -> f64 {
    let required = jd_requirement.and_then(parse_experience_years);

    let Some(required) = required else {
        let score = match cv_years {
            Some(years) if years.is_finite() && years > 0.0 => NEUTRAL,
            _ => 0.0,
        };
        debug!("  Experience match: no stated minimum -> {score:.3}");
        return score;
    };

    let years = match cv_years {
        Some(years) if years.is_finite() && years >= 0.0 => years,
        _ => {
            debug!("  Experience match: {required} years required, candidate unknown -> 0.000");
            return 0.0;
        }
    };

    let score = if years >= required {
        let bonus = ((years - required) * BONUS_PER_EXTRA_YEAR).min(MAX_BONUS);
        (1.0 + bonus).min(1.0)
    } else {
        // required > years >= 0 here, so the division is safe
        (years / required).max(0.0)
    };

    debug!("  Experience match: {years} of {required} years -> {score:.3}");
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_number() {
        assert_eq!(parse_experience_years("3-5 years"), Some(3.0));
        assert_eq!(parse_experience_years("minimum 2.5 yrs"), Some(2.5));
        assert_eq!(parse_experience_years("10+"), Some(10.0));
        assert_eq!(parse_experience_years("several"), None);
        assert_eq!(parse_experience_years(""), None);
    }

    #[test]
    fn test_partial_credit() {
        assert_eq!(score_experience(Some("5 years"), Some(2.5)), 0.5);
        assert_eq!(score_experience(Some("4 years"), Some(1.0)), 0.25);
    }

    #[test]
    fn test_meeting_minimum_is_full_score() {
        assert_eq!(score_experience(Some("5 years"), Some(5.0)), 1.0);
        assert_eq!(score_experience(Some("3 years"), Some(4.0)), 1.0);
        assert_eq!(score_experience(Some("1 year"), Some(30.0)), 1.0);
    }

    #[test]
    fn test_unknown_candidate_fails_concrete_requirement() {
        assert_eq!(score_experience(Some("5 years"), None), 0.0);
        assert_eq!(score_experience(Some("5 years"), Some(-1.0)), 0.0);
        assert_eq!(score_experience(Some("5 years"), Some(f64::NAN)), 0.0);
    }

    #[test]
    fn test_no_stated_minimum() {
        assert_eq!(score_experience(None, Some(3.0)), 0.5);
        assert_eq!(score_experience(None, None), 0.0);
        assert_eq!(score_experience(Some("not specified"), Some(0.0)), 0.0);
        assert_eq!(score_experience(Some("not specified"), Some(2.0)), 0.5);
    }

    #[test]
    fn test_zero_year_requirement() {
        assert_eq!(score_experience(Some("0 years"), Some(0.0)), 1.0);
        assert_eq!(score_experience(Some("0 years"), None), 0.0);
    }
}
