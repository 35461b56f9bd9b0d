//! Family scoring pipeline: aggregate, score, recommend.

pub mod aggregate;
pub mod domain;
pub mod recommendation;
pub mod rules;

pub use aggregate::{aggregate, FamilyTotals};
pub use domain::{FamilyId, FamilyIndicators, FamilySummary, ScoredFamily, Transaction};
pub use recommendation::Recommendation;
pub use rules::ScoreBreakdown;

use tracing::{debug, info};

/// How indicator fields repeated across a family's rows are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyPolicy {
    /// Rows of one family must agree on every indicator field.
    #[default]
    Strict,
    /// Indicator fields are averaged across the family's rows.
    Average,
}

impl ConsistencyPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "average" | "mean" => Some(Self::Average),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Average => "average",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(
        "family {family_id} has inconsistent '{field}' values ({expected} vs {found}) across its transactions"
    )]
    InconsistentFamily {
        family_id: FamilyId,
        field: &'static str,
        expected: f64,
        found: f64,
    },
}

/// Stateless engine turning a transaction batch into scored families.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    policy: ConsistencyPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ConsistencyPolicy) -> Self {
        Self { policy }
    }

    /// Scores every family in `transactions`, ordered by family id.
    pub fn score(&self, transactions: &[Transaction]) -> Result<Vec<ScoredFamily>, ScoringError> {
        let totals = aggregate(transactions, self.policy)?;
        let scored: Vec<ScoredFamily> = totals.into_iter().map(score_totals).collect();

        info!(
            transactions = transactions.len(),
            families = scored.len(),
            policy = self.policy.label(),
            "scored transaction batch"
        );

        Ok(scored)
    }
}

fn score_totals(totals: FamilyTotals) -> ScoredFamily {
    let FamilyTotals {
        summary,
        discretionary_spending,
    } = totals;

    let breakdown = rules::score_family(&summary, discretionary_spending);
    let recommendation = Recommendation::for_score(breakdown.final_score);

    debug!(
        family_id = %summary.family_id,
        base_score = breakdown.base_score,
        penalty = breakdown.penalty,
        score = breakdown.final_score,
        tier = recommendation.tier(),
        "scored family"
    );

    ScoredFamily {
        summary,
        financial_score: breakdown.final_score,
        recommendation,
        breakdown,
    }
}
