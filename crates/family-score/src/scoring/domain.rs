use serde::{Deserialize, Serialize};
use std::fmt;

use super::recommendation::Recommendation;
use super::rules::ScoreBreakdown;

/// Opaque household key. Integer keys order before text keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FamilyId {
    Number(i64),
    Text(String),
}

impl FamilyId {
    /// Builds an id from a text cell, keeping integer-looking keys numeric.
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<i64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyId::Number(number) => write!(f, "{number}"),
            FamilyId::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FamilyId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FamilyId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Family-level indicator snapshot repeated on every transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FamilyIndicators {
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "Savings")]
    pub savings: f64,
    #[serde(rename = "Monthly Expenses")]
    pub monthly_expenses: f64,
    #[serde(rename = "Loan Payments")]
    pub loan_payments: f64,
    #[serde(rename = "Credit Card Spending")]
    pub credit_card_spending: f64,
    #[serde(rename = "Financial Goals Met (%)")]
    pub goals_met_pct: f64,
}

impl FamilyIndicators {
    pub const FIELD_NAMES: [&'static str; 6] = [
        "Income",
        "Savings",
        "Monthly Expenses",
        "Loan Payments",
        "Credit Card Spending",
        "Financial Goals Met (%)",
    ];

    /// Values in [`Self::FIELD_NAMES`] order.
    pub fn values(&self) -> [f64; 6] {
        [
            self.income,
            self.savings,
            self.monthly_expenses,
            self.loan_payments,
            self.credit_card_spending,
            self.goals_met_pct,
        ]
    }

    pub fn from_values(values: [f64; 6]) -> Self {
        let [income, savings, monthly_expenses, loan_payments, credit_card_spending, goals_met_pct] =
            values;
        Self {
            income,
            savings,
            monthly_expenses,
            loan_payments,
            credit_card_spending,
            goals_met_pct,
        }
    }
}

/// One raw spending record tagged with its family's indicator snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Family ID")]
    pub family_id: FamilyId,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(flatten)]
    pub indicators: FamilyIndicators,
}

/// Per-family aggregate: summed spending and mean indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    #[serde(rename = "Family ID")]
    pub family_id: FamilyId,
    #[serde(rename = "Amount")]
    pub total_spending: f64,
    #[serde(flatten)]
    pub indicators: FamilyIndicators,
    #[serde(skip)]
    pub transaction_count: usize,
}

/// Terminal pipeline row returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFamily {
    #[serde(flatten)]
    pub summary: FamilySummary,
    #[serde(rename = "Financial Score")]
    pub financial_score: f64,
    #[serde(rename = "Recommendation")]
    pub recommendation: Recommendation,
    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_id_keeps_integer_keys_numeric() {
        assert_eq!(FamilyId::from_text(" 1001 "), FamilyId::Number(1001));
        assert_eq!(FamilyId::from_text("F1"), FamilyId::Text("F1".to_string()));
        assert!(FamilyId::Number(99) < FamilyId::from("A"));
    }

    #[test]
    fn transaction_uses_tabular_column_names() {
        let value = serde_json::json!({
            "Family ID": "F7",
            "Amount": 12.5,
            "Category": "Groceries",
            "Income": 1000.0,
            "Savings": 200.0,
            "Monthly Expenses": 300.0,
            "Loan Payments": 100.0,
            "Credit Card Spending": 50.0,
            "Financial Goals Met (%)": 80.0
        });

        let transaction: Transaction = serde_json::from_value(value).expect("typed row");
        assert_eq!(transaction.family_id, FamilyId::from("F7"));
        assert_eq!(transaction.indicators.monthly_expenses, 300.0);
    }
}
