//! Education match scoring against a fixed degree hierarchy

use aho_corasick::AhoCorasick;
use log::debug;
use std::sync::OnceLock;

const NEUTRAL: f64 = 0.5;
const NOT_SPECIFIED: [&str; 3] = ["none", "none specified", "n/a"];

/// Keyword substrings and the degree level each one signals.
const DEGREE_KEYWORDS: &[(&str, u8)] = &[
    ("phd", 4),
    ("doctorate", 4),
    ("master", 3),
    ("mba", 3),
    ("msc", 3),
    ("meng", 3),
    ("m.sc", 3),
    ("m.eng", 3),
    ("bachelor", 2),
    ("undergraduate", 2),
    ("bs", 2),
    ("ba", 2),
    ("beng", 2),
    ("b.s", 2),
    ("b.a", 2),
    ("b.eng", 2),
    ("associate", 1),
    ("diploma", 1),
    ("certificate", 1),
];

/// Substring matcher over the degree keywords.
pub struct DegreeLevels {
    matcher: AhoCorasick,
}

impl DegreeLevels {
    pub fn new() -> Self {
        let patterns = DEGREE_KEYWORDS.iter().map(|(keyword, _)| *keyword);
        let matcher = AhoCorasick::new(patterns).expect("Invalid degree keyword set");
        Self { matcher }
    }

    /// Highest level any keyword in `text` signals, 0 when none appear.
    /// Matches may overlap, so keywords nested in longer ones still count.
    pub fn level_of(&self, text: &str) -> u8 {
        self.matcher
            .find_overlapping_iter(text)
            .map(|m| DEGREE_KEYWORDS[m.pattern().as_usize()].1)
            .max()
            .unwrap_or(0)
    }

    pub fn highest_level<S: AsRef<str>>(&self, phrases: &[S]) -> u8 {
        phrases
            .iter()
            .map(|phrase| self.level_of(&phrase.as_ref().to_lowercase()))
            .max()
            .unwrap_or(0)
    }
}

impl Default for DegreeLevels {
    fn default() -> Self {
        Self::new()
    }
}

fn degree_levels() -> &'static DegreeLevels {
    static LEVELS: OnceLock<DegreeLevels> = OnceLock::new();
    LEVELS.get_or_init(DegreeLevels::new)
}

/// Education compatibility: 1.0 when the candidate's highest degree meets the
/// job's level, 0.0 when it falls short. Requirements that name no
/// recognizable degree are neutral.
pub fn score_education<S: AsRef<str>>(jd_education: Option<&str>, cv_education: &[S]) -> f64 {
    let jd = match jd_education.map(|s| s.trim().to_lowercase()) {
        Some(jd) if !jd.is_empty() && !NOT_SPECIFIED.contains(&jd.as_str()) => jd,
        _ => {
            debug!("  Education match: not specified by job -> {NEUTRAL}");
            return NEUTRAL;
        }
    };

    let levels = degree_levels();
    let jd_level = levels.level_of(&jd);
    if jd_level == 0 {
        debug!("  Education match: '{jd}' names no degree level -> {NEUTRAL}");
        return NEUTRAL;
    }

    if cv_education.is_empty() {
        debug!("  Education match: candidate lists no education -> 0.000");
        return 0.0;
    }

    let cv_level = levels.highest_level(cv_education);
    let score = if cv_level >= jd_level { 1.0 } else { 0.0 };
    debug!("  Education match: level {cv_level} vs required {jd_level} -> {score:.3}");
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_EDUCATION: [&str; 0] = [];

    #[test]
    fn test_level_detection() {
        let levels = DegreeLevels::new();
        assert_eq!(levels.level_of("phd in physics"), 4);
        assert_eq!(levels.level_of("m.sc. computer science"), 3);
        assert_eq!(levels.level_of("bachelor of science"), 2);
        assert_eq!(levels.level_of("high school diploma"), 1);
        assert_eq!(levels.level_of("self taught"), 0);
        assert_eq!(levels.highest_level(&["diploma", "master of arts"]), 3);
    }

    #[test]
    fn test_hard_threshold() {
        let jd = Some("master's degree required");
        assert_eq!(score_education(jd, &["bachelor of science"]), 0.0);
        assert_eq!(score_education(jd, &["master of science"]), 1.0);
        assert_eq!(score_education(jd, &["phd in physics"]), 1.0);
    }

    #[test]
    fn test_unspecified_job_requirement_is_neutral() {
        assert_eq!(score_education(None, &["phd"]), 0.5);
        assert_eq!(score_education(Some(""), &["phd"]), 0.5);
        assert_eq!(score_education(Some("None Specified"), &NO_EDUCATION), 0.5);
        assert_eq!(score_education(Some("n/a"), &NO_EDUCATION), 0.5);
    }

    #[test]
    fn test_unrecognized_requirement_is_neutral() {
        assert_eq!(score_education(Some("related field"), &NO_EDUCATION), 0.5);
        assert_eq!(score_education(Some("any"), &["phd"]), 0.5);
    }

    #[test]
    fn test_missing_candidate_education_fails() {
        assert_eq!(score_education(Some("bachelor's degree"), &NO_EDUCATION), 0.0);
        assert_eq!(score_education(Some("bachelor's degree"), &["self taught"]), 0.0);
    }
}
