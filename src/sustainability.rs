//! Sustainability score classification.
//!
//! Maps a nullable score from the scoring service onto the fixed category
//! buckets shown throughout the storefront. Thresholds are inclusive at the
//! lower bound: 7.5 is High, 4.5 is Medium. Inputs outside 0–10 are not
//! clamped.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the High category.
pub const HIGH_THRESHOLD: f64 = 7.5;
/// Lower bound (inclusive) of the Medium category.
pub const MEDIUM_THRESHOLD: f64 = 4.5;

/// Smallest score the catalog will persist.
pub const MIN_SCORE: f64 = 0.0;
/// Largest score the catalog will persist.
pub const MAX_SCORE: f64 = 10.0;

/// Discrete sustainability bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    High,
    Medium,
    Low,
    Unknown,
}

impl Category {
    /// All categories, best first.
    pub const ALL: [Category; 4] = [
        Category::High,
        Category::Medium,
        Category::Low,
        Category::Unknown,
    ];

    /// Short label used on the wire ("High", "Medium", "Low", "Unknown").
    pub fn label(self) -> &'static str {
        match self {
            Category::High => "High",
            Category::Medium => "Medium",
            Category::Low => "Low",
            Category::Unknown => "Unknown",
        }
    }

    /// Color tag for badges.
    pub fn color(self) -> &'static str {
        match self {
            Category::High => "green",
            Category::Medium => "yellow",
            Category::Low => "red",
            Category::Unknown => "gray",
        }
    }

    /// Glyph returned by the API.
    pub fn emoji(self) -> &'static str {
        match self {
            Category::High => "🟢",
            Category::Medium => "🟡",
            Category::Low => "🔴",
            Category::Unknown => "❓",
        }
    }

    /// Storefront badge glyph. Unrated products get a hollow circle instead
    /// of the question mark.
    pub fn badge(self) -> &'static str {
        match self {
            Category::Unknown => "⚪",
            other => other.emoji(),
        }
    }

    /// Customer-facing description.
    pub fn display_text(self) -> &'static str {
        match self {
            Category::High => "Eco-Friendly",
            Category::Medium => "Moderate",
            Category::Low => "Low Sustainability",
            Category::Unknown => "Not Rated",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score. Total over every `f64`; NaN counts as unscored.
pub fn classify(score: Option<f64>) -> Category {
    match score {
        None => Category::Unknown,
        Some(s) if s.is_nan() => Category::Unknown,
        Some(s) if s >= HIGH_THRESHOLD => Category::High,
        Some(s) if s >= MEDIUM_THRESHOLD => Category::Medium,
        Some(_) => Category::Low,
    }
}

/// Whether a score may be stored on a product.
pub fn is_storable(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Derived category fields attached to every product-shaped response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub sustainability_category: String,
    pub sustainability_color: String,
    pub sustainability_emoji: String,
}

impl From<Category> for CategoryFields {
    fn from(category: Category) -> Self {
        Self {
            sustainability_category: category.label().to_string(),
            sustainability_color: category.color().to_string(),
            sustainability_emoji: category.emoji().to_string(),
        }
    }
}
