use super::domain::FamilySummary;

pub const SAVINGS_WEIGHT: f64 = 30.0;
pub const EXPENSES_WEIGHT: f64 = 20.0;
pub const LOANS_WEIGHT: f64 = 20.0;
pub const CREDIT_CARD_WEIGHT: f64 = 20.0;
pub const GOALS_WEIGHT: f64 = 10.0;

/// Categories counted toward the concentration penalty. Matching is exact.
pub const DISCRETIONARY_CATEGORIES: [&str; 2] = ["Travel", "Entertainment"];
/// Discretionary share of total spending that must be exceeded to be penalised.
pub const CONCENTRATION_THRESHOLD: f64 = 0.2;
pub const CONCENTRATION_PENALTY: f64 = 5.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Weighted contributions behind a single family's score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub savings: f64,
    pub expenses: f64,
    pub loans: f64,
    pub credit_card: f64,
    pub goals: f64,
    pub base_score: f64,
    pub discretionary_spending: f64,
    pub penalty: f64,
    pub final_score: f64,
}

pub fn is_discretionary(category: &str) -> bool {
    DISCRETIONARY_CATEGORIES.contains(&category)
}

/// `value / income`, with zero income yielding zero.
pub fn income_ratio(value: f64, income: f64) -> f64 {
    if income == 0.0 {
        0.0
    } else {
        value / income
    }
}

pub fn concentration_penalty(discretionary_spending: f64, total_spending: f64) -> f64 {
    if total_spending > 0.0 && discretionary_spending / total_spending > CONCENTRATION_THRESHOLD {
        CONCENTRATION_PENALTY
    } else {
        0.0
    }
}

/// Clamps to the score range, then rounds half away from zero to two decimals.
///
/// Ratios against a vanishingly small income can overflow and cancel into NaN;
/// that composite scores as the floor.
pub fn finalize_score(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    let clamped = score.clamp(MIN_SCORE, MAX_SCORE);
    (clamped * 100.0).round() / 100.0
}

pub fn score_family(summary: &FamilySummary, discretionary_spending: f64) -> ScoreBreakdown {
    let indicators = &summary.indicators;
    let income = indicators.income;

    let savings = income_ratio(indicators.savings, income) * SAVINGS_WEIGHT;
    let expenses = (1.0 - income_ratio(indicators.monthly_expenses, income)) * EXPENSES_WEIGHT;
    let loans = (1.0 - income_ratio(indicators.loan_payments, income)) * LOANS_WEIGHT;
    let credit_card =
        (1.0 - income_ratio(indicators.credit_card_spending, income)) * CREDIT_CARD_WEIGHT;
    let goals = indicators.goals_met_pct / 100.0 * GOALS_WEIGHT;

    // Weights sum to 100, so the composite is already on the 0-100 scale.
    let base_score = savings + expenses + loans + credit_card + goals;
    let penalty = concentration_penalty(discretionary_spending, summary.total_spending);

    ScoreBreakdown {
        savings,
        expenses,
        loans,
        credit_card,
        goals,
        base_score,
        discretionary_spending,
        penalty,
        final_score: finalize_score(base_score - penalty),
    }
}
