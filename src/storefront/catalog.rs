//! Client-side catalog view: search, filter and sort over the product list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ProductView;
use crate::sustainability::{classify, Category};

/// Sustainability filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    #[default]
    All,
    EcoFriendly,
    Moderate,
    LowSustainability,
    NotRated,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::All,
        Filter::EcoFriendly,
        Filter::Moderate,
        Filter::LowSustainability,
        Filter::NotRated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::EcoFriendly => "eco-friendly",
            Filter::Moderate => "moderate",
            Filter::LowSustainability => "low-sustainability",
            Filter::NotRated => "not-rated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Products",
            Filter::EcoFriendly => Category::High.display_text(),
            Filter::Moderate => Category::Medium.display_text(),
            Filter::LowSustainability => Category::Low.display_text(),
            Filter::NotRated => Category::Unknown.display_text(),
        }
    }

    /// Category the filter selects, `None` for [`Filter::All`].
    pub fn category(self) -> Option<Category> {
        match self {
            Filter::All => None,
            Filter::EcoFriendly => Some(Category::High),
            Filter::Moderate => Some(Category::Medium),
            Filter::LowSustainability => Some(Category::Low),
            Filter::NotRated => Some(Category::Unknown),
        }
    }

    pub fn matches(self, score: Option<f64>) -> bool {
        self.category().map_or(true, |category| classify(score) == category)
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    SustainabilityHigh,
    SustainabilityLow,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Name,
        SortOrder::PriceLow,
        SortOrder::PriceHigh,
        SortOrder::SustainabilityHigh,
        SortOrder::SustainabilityLow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::PriceLow => "price-low",
            SortOrder::PriceHigh => "price-high",
            SortOrder::SustainabilityHigh => "sustainability-high",
            SortOrder::SustainabilityLow => "sustainability-low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Name => "Name (A-Z)",
            SortOrder::PriceLow => "Price: Low to High",
            SortOrder::PriceHigh => "Price: High to Low",
            SortOrder::SustainabilityHigh => "Most Sustainable",
            SortOrder::SustainabilityLow => "Least Sustainable",
        }
    }

    fn compare(self, a: &ProductView, b: &ProductView) -> Ordering {
        let (a, b) = (&a.product, &b.product);
        match self {
            SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::PriceLow => a.price.cmp(&b.price),
            SortOrder::PriceHigh => b.price.cmp(&a.price),
            SortOrder::SustainabilityHigh => by_score(a.sustainability_index, b.sustainability_index, true),
            SortOrder::SustainabilityLow => by_score(a.sustainability_index, b.sustainability_index, false),
        }
    }
}

/// Unscored products sort last in either direction.
fn by_score(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Error parsing a filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl FromStr for Filter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseOptionError {
                kind: "filter",
                value: s.to_string(),
            })
    }
}

impl FromStr for SortOrder {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ParseOptionError {
                kind: "sort order",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the catalog view is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search: String,
    pub filter: Filter,
    pub sort: SortOrder,
}

impl CatalogQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Compute the visible products.
    ///
    /// Search is case-insensitive over name and description. Ties in the
    /// chosen order fall back to id order.
    pub fn apply(&self, products: &[ProductView]) -> Vec<ProductView> {
        let needle = self.search.trim().to_lowercase();

        let mut visible: Vec<ProductView> = products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.product.name.to_lowercase().contains(&needle)
                    || p.product.description.to_lowercase().contains(&needle)
            })
            .filter(|p| self.filter.matches(p.product.sustainability_index))
            .cloned()
            .collect();

        visible.sort_by(|a, b| {
            self.sort
                .compare(a, b)
                .then_with(|| a.product.id.cmp(&b.product.id))
        });
        visible
    }
}
