//! Match scoring between job summaries and candidate profiles
//!
//! Each component scorer is a pure function returning a value in [0, 1].
//! The [`Matcher`] combines them with configurable weights and the
//! [`Shortlister`] turns stored scores into per-candidate decisions.

pub mod aggregator;
pub mod education;
pub mod experience;
pub mod requirements;
pub mod shortlist;
pub mod skills;
pub mod synonyms;

pub use aggregator::{
    round3, MatchBreakdown, MatchDetails, MatchResult, MatchWeights, Matcher, PayloadFailure,
    INVALID_PAYLOAD,
};
pub use education::{score_education, DegreeLevels};
pub use experience::{parse_experience_years, score_experience};
pub use requirements::score_requirements;
pub use shortlist::{ShortlistDecision, Shortlister, ShortlistedCandidate, DEFAULT_THRESHOLD};
pub use skills::score_skills;
pub use synonyms::SynonymTable;
