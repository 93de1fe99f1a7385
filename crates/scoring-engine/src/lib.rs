//! Scoring grid and grade classification.
//!
//! Ratios are mapped to points through a declarative threshold table
//! ([`rules::SCORING_RULES`]), summed per category and rescaled into a
//! global score out of 100, which [`classification::classify`] turns into
//! a letter grade.

pub mod classification;
pub mod engine;
pub mod rules;

pub use classification::{classify, grade_for};
pub use engine::{global_score, ScoringEngine};
pub use rules::{Polarity, ScoringRule, SCORING_RULES};
