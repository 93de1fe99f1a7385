use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RatioKey, RatioUnit};

/// Sum of every category maximum.
pub const RAW_SCORE_MAX: u32 = 140;

/// Evaluation category of the scoring grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Liquidite,
    Solvabilite,
    Rentabilite,
    Activite,
    Gestion,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Liquidite,
        Category::Solvabilite,
        Category::Rentabilite,
        Category::Activite,
        Category::Gestion,
    ];

    pub fn max_points(&self) -> u32 {
        match self {
            Category::Liquidite => 40,
            Category::Solvabilite => 40,
            Category::Rentabilite => 30,
            Category::Activite => 15,
            Category::Gestion => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Liquidite => "liquidite",
            Category::Solvabilite => "solvabilite",
            Category::Rentabilite => "rentabilite",
            Category::Activite => "activite",
            Category::Gestion => "gestion",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category point totals plus the global score out of 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub liquidite: u32,
    pub solvabilite: u32,
    pub rentabilite: u32,
    pub activite: u32,
    pub gestion: u32,
    pub global: u32,
}

impl ScoreSet {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Liquidite => self.liquidite,
            Category::Solvabilite => self.solvabilite,
            Category::Rentabilite => self.rentabilite,
            Category::Activite => self.activite,
            Category::Gestion => self.gestion,
        }
    }

    /// Sets a category total, clamped to the category maximum.
    pub fn set(&mut self, category: Category, points: u32) {
        let points = points.min(category.max_points());
        match category {
            Category::Liquidite => self.liquidite = points,
            Category::Solvabilite => self.solvabilite = points,
            Category::Rentabilite => self.rentabilite = points,
            Category::Activite => self.activite = points,
            Category::Gestion => self.gestion = points,
        }
    }

    /// Sum of the category totals, out of [`RAW_SCORE_MAX`].
    pub fn raw_total(&self) -> u32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Qualitative tier of a single ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Faible,
    Acceptable,
    Bon,
    Excellent,
}

/// Points earned by one ratio against its scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioAssessment {
    pub ratio: RatioKey,
    /// French display label of the ratio.
    pub label: String,
    pub unit: RatioUnit,
    pub category: Category,
    pub value: f64,
    pub tier: Tier,
    pub points: u32,
    pub max_points: u32,
}

/// Letter grade, ordered from worst (`E`) to best (`APlus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "E")]
    E,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            Grade::APlus => "Excellent",
            Grade::A => "Satisfaisant",
            Grade::B => "Bon",
            Grade::C => "Moyen",
            Grade::D => "Faible",
            Grade::E => "Critique",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub grade: Grade,
    pub interpretation: String,
    pub conclusion: String,
}
