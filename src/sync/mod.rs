//! Sustainability score backfill.
//!
//! Walks the products that have no score yet, asks the scoring service for
//! each one and writes the result back. Strictly sequential with a fixed
//! pause between calls; a product that can't be scored is skipped and the
//! batch carries on.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::scoring::{ScoringError, ScoringService, PROBE_DESCRIPTION};
use crate::storage::{ProductStore, StorageError};
use crate::sustainability::{classify, Category};

/// Backfill configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pause between scoring calls, in milliseconds.
    pub delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

impl SyncConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Why a product was left unscored.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The service answered without a usable score.
    NoScore,
    /// The scoring call failed.
    Scoring(String),
    /// The score could not be stored.
    Storage(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoScore => f.write_str("no score in response"),
            SkipReason::Scoring(reason) => write!(f, "scoring failed: {reason}"),
            SkipReason::Storage(reason) => write!(f, "update failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub id: i64,
    pub name: String,
    pub score: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProduct {
    pub id: i64,
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of one backfill pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillReport {
    /// Products that were unscored when the pass started.
    pub total: usize,
    pub scored: Vec<ScoredProduct>,
    pub skipped: Vec<SkippedProduct>,
}

impl fmt::Display for BackfillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return writeln!(f, "All products already have sustainability scores.");
        }
        writeln!(
            f,
            "Scored {} of {} products ({} skipped).",
            self.scored.len(),
            self.total,
            self.skipped.len()
        )?;
        for skipped in &self.skipped {
            writeln!(f, "  skipped #{} {}: {}", skipped.id, skipped.name, skipped.reason)?;
        }
        Ok(())
    }
}

/// One line of the score summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub name: String,
    pub score: Option<f64>,
    pub category: Category,
}

/// Products in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    /// Highest-ranked product in the category.
    pub sample: String,
}

/// Every product by score (highest first, unscored last) plus a breakdown
/// by category (largest first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSummary {
    pub entries: Vec<SummaryEntry>,
    pub breakdown: Vec<CategoryCount>,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SUSTAINABILITY SCORE SUMMARY")?;
        writeln!(f, "{}", "=".repeat(50))?;
        for entry in &self.entries {
            let category = format!("{} {}", entry.category.label(), entry.category.emoji());
            let score = entry
                .score
                .map(|s| format!("{s:.1}"))
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(f, "{category:<12} | {score:<6} | {}", entry.name)?;
        }

        writeln!(f)?;
        writeln!(f, "CATEGORY BREAKDOWN")?;
        for row in &self.breakdown {
            writeln!(
                f,
                "{}: {} products (e.g. {})",
                row.category.label(),
                row.count,
                row.sample
            )?;
        }
        Ok(())
    }
}

/// Sequential score backfill over the product store.
pub struct Backfill {
    products: Arc<dyn ProductStore>,
    scorer: Arc<dyn ScoringService>,
    delay: Duration,
}

impl Backfill {
    pub fn new(products: Arc<dyn ProductStore>, scorer: Arc<dyn ScoringService>, delay: Duration) -> Self {
        Self {
            products,
            scorer,
            delay,
        }
    }

    /// Score every unscored product.
    ///
    /// Only listing the products can fail the pass; per-product failures
    /// are recorded in the report.
    pub async fn run(&self) -> Result<BackfillReport, StorageError> {
        let products = self.products.list_unscored().await?;
        let total = products.len();
        info!(total, "starting sustainability backfill");

        let mut report = BackfillReport {
            total,
            ..Default::default()
        };

        for (i, product) in products.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            info!(
                progress = %format!("{}/{}", i + 1, total),
                product_id = product.id,
                name = %product.name,
                "scoring product"
            );

            let outcome = match self.scorer.predict(&product.description).await {
                Ok(Some(score)) => match self.products.update_score(product.id, score).await {
                    Ok(()) => Ok(score),
                    Err(e) => Err(SkipReason::Storage(e.to_string())),
                },
                Ok(None) => Err(SkipReason::NoScore),
                Err(e) => Err(SkipReason::Scoring(e.to_string())),
            };

            match outcome {
                Ok(score) => {
                    let category = classify(Some(score));
                    info!(
                        product_id = product.id,
                        score,
                        category = %category,
                        "{} {}",
                        category.emoji(),
                        category.label()
                    );
                    report.scored.push(ScoredProduct {
                        id: product.id,
                        name: product.name,
                        score,
                        category,
                    });
                }
                Err(reason) => {
                    warn!(product_id = product.id, reason = %reason, "skipping product");
                    report.skipped.push(SkippedProduct {
                        id: product.id,
                        name: product.name,
                        reason,
                    });
                }
            }
        }

        info!(
            scored = report.scored.len(),
            skipped = report.skipped.len(),
            "sustainability backfill finished"
        );
        Ok(report)
    }

    /// Summarize the catalog's scores.
    pub async fn summary(&self) -> Result<ScoreSummary, StorageError> {
        let products = self.products.list_by_score().await?;

        let entries: Vec<SummaryEntry> = products
            .into_iter()
            .map(|p| SummaryEntry {
                category: classify(p.sustainability_index),
                score: p.sustainability_index,
                name: p.name,
            })
            .collect();

        let mut breakdown: Vec<CategoryCount> = Vec::new();
        for entry in &entries {
            match breakdown.iter_mut().find(|row| row.category == entry.category) {
                Some(row) => row.count += 1,
                None => breakdown.push(CategoryCount {
                    category: entry.category,
                    count: 1,
                    sample: entry.name.clone(),
                }),
            }
        }
        // Stable: equal counts keep score order.
        breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(ScoreSummary { entries, breakdown })
    }
}

/// Check the scoring service answers a known description.
pub async fn probe(scorer: &dyn ScoringService) -> Result<Option<f64>, ScoringError> {
    let score = scorer.predict(PROBE_DESCRIPTION).await?;
    info!(score = ?score, "scoring service probe succeeded");
    Ok(score)
}
