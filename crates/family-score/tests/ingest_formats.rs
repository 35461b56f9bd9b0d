use family_score::ingest::{IngestError, SourceFormat, TransactionDecoder};
use family_score::scoring::{FamilyId, Recommendation, ScoringEngine};

const CSV_FIXTURE: &[u8] = include_bytes!("../fixtures/family_transactions.csv");
const JSON_FIXTURE: &[u8] = include_bytes!("../fixtures/family_transactions.json");

#[test]
fn csv_fixture_scores_each_family() {
    let transactions = TransactionDecoder::from_reader(SourceFormat::Csv, CSV_FIXTURE)
        .expect("csv fixture decodes");
    assert_eq!(transactions.len(), 8);

    let scored = ScoringEngine::default()
        .score(&transactions)
        .expect("fixture scores");

    let ids: Vec<FamilyId> = scored
        .iter()
        .map(|family| family.summary.family_id.clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            FamilyId::Number(1001),
            FamilyId::Number(1002),
            FamilyId::Number(1003)
        ]
    );

    let steady = &scored[0];
    assert_eq!(steady.summary.total_spending, 800.0);
    assert_eq!(steady.breakdown.penalty, 5.0);
    assert_eq!(steady.financial_score, 61.8);
    assert_eq!(steady.recommendation, Recommendation::MaintainSavings);

    let healthy = &scored[1];
    assert_eq!(healthy.breakdown.penalty, 0.0);
    assert_eq!(healthy.financial_score, 79.0);
    assert_eq!(healthy.recommendation, Recommendation::Healthy);

    let stretched = &scored[2];
    assert_eq!(stretched.breakdown.penalty, 5.0);
    assert_eq!(stretched.financial_score, 28.0);
    assert_eq!(stretched.recommendation, Recommendation::ReduceDiscretionary);
}

#[test]
fn csv_and_json_fixtures_decode_identically() {
    let from_csv = TransactionDecoder::from_reader(SourceFormat::Csv, CSV_FIXTURE)
        .expect("csv fixture decodes");
    let from_json = TransactionDecoder::from_reader(SourceFormat::Json, JSON_FIXTURE)
        .expect("json fixture decodes");

    assert_eq!(from_csv, from_json);
}

#[test]
fn json_column_layout_matches_record_layout() {
    let records = r#"[
        {"Family ID": "F1", "Amount": 100, "Category": "Travel", "Income": 1000, "Savings": 200,
         "Monthly Expenses": 300, "Loan Payments": 100, "Credit Card Spending": 50, "Financial Goals Met (%)": 80},
        {"Family ID": "F1", "Amount": 400, "Category": "Groceries", "Income": 1000, "Savings": 200,
         "Monthly Expenses": 300, "Loan Payments": 100, "Credit Card Spending": 50, "Financial Goals Met (%)": 80}
    ]"#;
    let columns = r#"{
        "Family ID": {"0": "F1", "1": "F1"},
        "Amount": {"0": 100, "1": 400},
        "Category": {"0": "Travel", "1": "Groceries"},
        "Income": {"0": 1000, "1": 1000},
        "Savings": {"0": 200, "1": 200},
        "Monthly Expenses": {"0": 300, "1": 300},
        "Loan Payments": {"0": 100, "1": 100},
        "Credit Card Spending": {"0": 50, "1": 50},
        "Financial Goals Met (%)": {"0": 80, "1": 80}
    }"#;

    let from_records = TransactionDecoder::from_reader(SourceFormat::Json, records.as_bytes())
        .expect("records decode");
    let from_columns = TransactionDecoder::from_reader(SourceFormat::Json, columns.as_bytes())
        .expect("columns decode");
    assert_eq!(from_records, from_columns);

    let scored = ScoringEngine::default()
        .score(&from_columns)
        .expect("scores");
    assert_eq!(scored[0].financial_score, 65.0);
}

#[test]
fn malformed_cell_fails_the_whole_batch() {
    let csv = "Family ID,Amount,Category,Income,Savings,Monthly Expenses,Loan Payments,Credit Card Spending,Financial Goals Met (%)\n\
F1,100,Travel,1000,200,300,100,50,80\n\
F2,40,Groceries,plenty,200,300,100,50,80\n";

    let error = TransactionDecoder::from_reader(SourceFormat::Csv, csv.as_bytes())
        .expect_err("text income rejected");

    match error {
        IngestError::MalformedRecord {
            row, family, field, ..
        } => {
            assert_eq!(row, 2);
            assert_eq!(family, Some(FamilyId::from("F2")));
            assert_eq!(field, "Income");
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[test]
fn missing_column_is_reported_per_row() {
    let csv = "Family ID,Amount,Category,Income,Savings,Monthly Expenses,Loan Payments,Credit Card Spending\n\
F1,100,Travel,1000,200,300,100,50\n";

    let error = TransactionDecoder::from_reader(SourceFormat::Csv, csv.as_bytes())
        .expect_err("goals column missing");
    assert_eq!(
        error.to_string(),
        "malformed record at row 1 (family F1): field 'Financial Goals Met (%)' is missing"
    );
}
