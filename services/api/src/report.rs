use clap::{Args, ValueEnum};
use family_score::config::AppConfig;
use family_score::error::AppError;
use family_score::ingest::TransactionDecoder;
use family_score::scoring::{ConsistencyPolicy, ScoredFamily, ScoringEngine};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV or JSON transaction file to score
    pub(crate) path: PathBuf,
    /// Output layout for the scored families
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Include the weighted factor breakdown for every family
    #[arg(long)]
    pub(crate) breakdown: bool,
    /// How to treat families whose rows disagree on indicator fields (strict or average)
    #[arg(long, value_parser = parse_policy)]
    pub(crate) consistency: Option<ConsistencyPolicy>,
}

fn parse_policy(raw: &str) -> Result<ConsistencyPolicy, String> {
    ConsistencyPolicy::parse(raw)
        .ok_or_else(|| format!("unknown consistency policy '{raw}' (expected strict or average)"))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        path,
        format,
        breakdown,
        consistency,
    } = args;

    let policy = match consistency {
        Some(policy) => policy,
        None => AppConfig::load()?.scoring.consistency,
    };

    let transactions = TransactionDecoder::from_path(&path)?;
    let scored = ScoringEngine::new(policy).score(&transactions)?;

    match format {
        OutputFormat::Table => println!("{}", render_table(&path, &scored, breakdown)),
        OutputFormat::Json => println!("{}", render_json(&scored)?),
    }

    Ok(())
}

pub(crate) fn render_json(scored: &[ScoredFamily]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(scored)?)
}

pub(crate) fn render_table(source: &Path, scored: &[ScoredFamily], breakdown: bool) -> String {
    let transaction_count: usize = scored
        .iter()
        .map(|family| family.summary.transaction_count)
        .sum();

    let mut lines = vec![format!(
        "Financial scores for {} ({} families, {} transactions)",
        source.display(),
        scored.len(),
        transaction_count
    )];

    if scored.is_empty() {
        lines.push("No transactions found.".to_string());
        return lines.join("\n");
    }

    for family in scored {
        let summary = &family.summary;
        lines.push(format!(
            "- Family {}: score {:.2} (tier {}) | spent {:.2} across {} transactions",
            summary.family_id,
            family.financial_score,
            family.recommendation.tier(),
            summary.total_spending,
            summary.transaction_count
        ));
        lines.push(format!("  {}", family.recommendation.message()));

        if breakdown {
            let factors = &family.breakdown;
            lines.push(format!(
                "  savings {:.2} | expenses {:.2} | loans {:.2} | credit card {:.2} | goals {:.2}",
                factors.savings, factors.expenses, factors.loans, factors.credit_card, factors.goals
            ));
            lines.push(format!(
                "  base {:.2} | travel & entertainment {:.2} | penalty {:.2}",
                factors.base_score, factors.discretionary_spending, factors.penalty
            ));
        }
    }

    lines.join("\n")
}
