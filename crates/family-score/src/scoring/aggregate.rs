use std::collections::BTreeMap;

use tracing::debug;

use super::domain::{FamilyId, FamilyIndicators, FamilySummary, Transaction};
use super::rules::is_discretionary;
use super::{ConsistencyPolicy, ScoringError};

const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// Family summary together with its travel/entertainment subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyTotals {
    pub summary: FamilySummary,
    pub discretionary_spending: f64,
}

struct Accumulator {
    first: FamilyIndicators,
    sums: [f64; 6],
    total_spending: f64,
    discretionary_spending: f64,
    count: usize,
}

impl Accumulator {
    fn new(first: FamilyIndicators) -> Self {
        Self {
            first,
            sums: [0.0; 6],
            total_spending: 0.0,
            discretionary_spending: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, transaction: &Transaction) {
        for (sum, value) in self.sums.iter_mut().zip(transaction.indicators.values()) {
            *sum += value;
        }
        self.total_spending += transaction.amount;
        if is_discretionary(&transaction.category) {
            self.discretionary_spending += transaction.amount;
        }
        self.count += 1;
    }

    fn finish(self, family_id: FamilyId) -> FamilyTotals {
        let count = self.count as f64;
        let means = self.sums.map(|sum| sum / count);

        FamilyTotals {
            summary: FamilySummary {
                family_id,
                total_spending: self.total_spending,
                indicators: FamilyIndicators::from_values(means),
                transaction_count: self.count,
            },
            discretionary_spending: self.discretionary_spending,
        }
    }
}

fn approximately_equal(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= CONSISTENCY_TOLERANCE * scale
}

fn check_consistency(
    family_id: &FamilyId,
    expected: &FamilyIndicators,
    found: &FamilyIndicators,
) -> Result<(), ScoringError> {
    let fields = FamilyIndicators::FIELD_NAMES
        .into_iter()
        .zip(expected.values().into_iter().zip(found.values()));

    for (field, (expected, found)) in fields {
        if !approximately_equal(expected, found) {
            return Err(ScoringError::InconsistentFamily {
                family_id: family_id.clone(),
                field,
                expected,
                found,
            });
        }
    }

    Ok(())
}

/// Groups transactions by family in a single pass, ordered by family id.
///
/// Each family's travel/entertainment subtotal is gathered in the same pass so
/// scoring never rescans the transaction set.
pub fn aggregate(
    transactions: &[Transaction],
    policy: ConsistencyPolicy,
) -> Result<Vec<FamilyTotals>, ScoringError> {
    let mut families: BTreeMap<&FamilyId, Accumulator> = BTreeMap::new();

    for transaction in transactions {
        let accumulator = families
            .entry(&transaction.family_id)
            .or_insert_with(|| Accumulator::new(transaction.indicators));

        if policy == ConsistencyPolicy::Strict {
            check_consistency(
                &transaction.family_id,
                &accumulator.first,
                &transaction.indicators,
            )?;
        }

        accumulator.push(transaction);
    }

    debug!(
        transactions = transactions.len(),
        families = families.len(),
        "aggregated transactions by family"
    );

    Ok(families
        .into_iter()
        .map(|(family_id, accumulator)| accumulator.finish(family_id.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(income: f64) -> FamilyIndicators {
        FamilyIndicators {
            income,
            savings: 200.0,
            monthly_expenses: 300.0,
            loan_payments: 100.0,
            credit_card_spending: 50.0,
            goals_met_pct: 80.0,
        }
    }

    fn transaction(family: &str, amount: f64, category: &str, income: f64) -> Transaction {
        Transaction {
            family_id: FamilyId::from(family),
            amount,
            category: category.to_string(),
            indicators: indicators(income),
        }
    }

    #[test]
    fn empty_input_yields_no_families() {
        let totals = aggregate(&[], ConsistencyPolicy::Strict).expect("aggregates");
        assert!(totals.is_empty());
    }

    #[test]
    fn sums_amounts_and_tracks_discretionary_subtotal() {
        let transactions = vec![
            transaction("F2", 40.0, "Entertainment", 900.0),
            transaction("F1", 100.0, "Travel", 1000.0),
            transaction("F1", 400.0, "Groceries", 1000.0),
            transaction("F2", 60.0, "Utilities", 900.0),
            transaction("F1", 25.0, "Entertainment", 1000.0),
        ];

        let totals = aggregate(&transactions, ConsistencyPolicy::Strict).expect("aggregates");
        assert_eq!(totals.len(), 2);

        let f1 = &totals[0];
        assert_eq!(f1.summary.family_id, FamilyId::from("F1"));
        assert_eq!(f1.summary.total_spending, 525.0);
        assert_eq!(f1.summary.transaction_count, 3);
        assert_eq!(f1.summary.indicators.income, 1000.0);
        assert_eq!(f1.discretionary_spending, 125.0);

        let f2 = &totals[1];
        assert_eq!(f2.summary.total_spending, 100.0);
        assert_eq!(f2.discretionary_spending, 40.0);
        assert_eq!(f2.summary.indicators.goals_met_pct, 80.0);
    }

    #[test]
    fn average_policy_blends_inconsistent_indicators() {
        let transactions = vec![
            transaction("F1", 10.0, "Groceries", 1000.0),
            transaction("F1", 10.0, "Groceries", 2000.0),
        ];

        let totals = aggregate(&transactions, ConsistencyPolicy::Average).expect("aggregates");
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].summary.indicators.income, 1500.0);
    }

    #[test]
    fn strict_policy_rejects_inconsistent_indicators() {
        let transactions = vec![
            transaction("F9", 10.0, "Groceries", 1000.0),
            transaction("F9", 10.0, "Groceries", 1200.0),
        ];

        let error = aggregate(&transactions, ConsistencyPolicy::Strict)
            .expect_err("inconsistent income rejected");
        match error {
            ScoringError::InconsistentFamily {
                family_id,
                field,
                expected,
                found,
            } => {
                assert_eq!(family_id, FamilyId::from("F9"));
                assert_eq!(field, "Income");
                assert_eq!(expected, 1000.0);
                assert_eq!(found, 1200.0);
            }
        }
    }

    #[test]
    fn strict_policy_tolerates_float_noise() {
        let transactions = vec![
            transaction("F1", 10.0, "Groceries", 1000.0),
            transaction("F1", 10.0, "Groceries", 1000.0 + 1e-10),
        ];

        assert!(aggregate(&transactions, ConsistencyPolicy::Strict).is_ok());
    }

    #[test]
    fn orders_integer_families_before_text_families() {
        let mut numeric = transaction("ignored", 5.0, "Groceries", 1000.0);
        numeric.family_id = FamilyId::Number(7);
        let transactions = vec![transaction("A", 5.0, "Groceries", 1000.0), numeric];

        let totals = aggregate(&transactions, ConsistencyPolicy::Average).expect("aggregates");
        assert_eq!(totals[0].summary.family_id, FamilyId::Number(7));
        assert_eq!(totals[1].summary.family_id, FamilyId::from("A"));
    }
}
