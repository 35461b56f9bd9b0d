use serde::Deserialize;

use super::cell::Cell;
use super::normalizer::normalize_text;
use super::IngestError;
use crate::scoring::{FamilyId, FamilyIndicators, Transaction};

/// Untyped row as decoded from a source document, before validation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "Family ID", alias = "family_id")]
    family_id: Option<Cell>,
    #[serde(rename = "Amount", alias = "amount")]
    amount: Option<Cell>,
    #[serde(rename = "Category", alias = "category")]
    category: Option<Cell>,
    #[serde(rename = "Income", alias = "income")]
    income: Option<Cell>,
    #[serde(rename = "Savings", alias = "savings")]
    savings: Option<Cell>,
    #[serde(rename = "Monthly Expenses", alias = "monthly_expenses")]
    monthly_expenses: Option<Cell>,
    #[serde(rename = "Loan Payments", alias = "loan_payments")]
    loan_payments: Option<Cell>,
    #[serde(rename = "Credit Card Spending", alias = "credit_card_spending")]
    credit_card_spending: Option<Cell>,
    #[serde(rename = "Financial Goals Met (%)", alias = "goals_met_pct")]
    goals_met_pct: Option<Cell>,
}

struct RowContext {
    row: usize,
    family_id: Option<FamilyId>,
}

impl RowContext {
    fn malformed(&self, field: &'static str, reason: impl Into<String>) -> IngestError {
        IngestError::MalformedRecord {
            row: self.row,
            family: self.family_id.clone(),
            field,
            reason: reason.into(),
        }
    }

    fn number(&self, field: &'static str, cell: Option<Cell>) -> Result<f64, IngestError> {
        let cell = cell.ok_or_else(|| self.malformed(field, "is missing"))?;
        cell.as_number().map_err(|reason| self.malformed(field, reason))
    }
}

fn family_id_from_cell(cell: Cell) -> Option<FamilyId> {
    match cell {
        Cell::Integer(value) => Some(FamilyId::Number(value)),
        Cell::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            Some(FamilyId::Number(value as i64))
        }
        other => {
            let text = normalize_text(&other.into_text());
            (!text.is_empty()).then(|| FamilyId::from_text(&text))
        }
    }
}

impl RawRow {
    /// Validates the row into a typed transaction. `row` is the 1-based data row.
    pub(crate) fn into_transaction(self, row: usize) -> Result<Transaction, IngestError> {
        let context = RowContext {
            row,
            family_id: self.family_id.and_then(family_id_from_cell),
        };
        let family_id = context
            .family_id
            .clone()
            .ok_or_else(|| context.malformed("Family ID", "is missing"))?;

        let amount = context.number("Amount", self.amount)?;
        if amount < 0.0 {
            return Err(context.malformed(
                "Amount",
                format!("must not be negative, found '{amount}'"),
            ));
        }

        let category = self
            .category
            .map(|cell| normalize_text(&cell.into_text()))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| context.malformed("Category", "is missing"))?;

        let indicators = FamilyIndicators {
            income: context.number("Income", self.income)?,
            savings: context.number("Savings", self.savings)?,
            monthly_expenses: context.number("Monthly Expenses", self.monthly_expenses)?,
            loan_payments: context.number("Loan Payments", self.loan_payments)?,
            credit_card_spending: context
                .number("Credit Card Spending", self.credit_card_spending)?,
            goals_met_pct: context.number("Financial Goals Met (%)", self.goals_met_pct)?,
        };

        Ok(Transaction {
            family_id,
            amount,
            category,
            indicators,
        })
    }
}
