use std::env;

use anyhow::{bail, Context};
use backend_api::{FinanceRepository, JsonFileRepository};
use spreadsheet_import::{parse_import_rows, read_spreadsheet_rows};

/// Imports debts from a spreadsheet file straight into the data file,
/// without going through the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let spreadsheet = env::args()
        .nth(1)
        .context("usage: import <spreadsheet.(xlsx|xls|csv)>")?;
    let data_path = env::var("DATA_PATH").unwrap_or_else(|_| "data/finance.json".to_string());

    let rows = read_spreadsheet_rows(&spreadsheet)?;
    if rows.is_empty() {
        bail!("spreadsheet has no data rows: {spreadsheet}");
    }

    let repo = JsonFileRepository::new(&data_path);
    let existing = repo.fetch_all().await?.debts;
    let outcome = parse_import_rows(&rows, &existing);

    if outcome.is_failure() {
        bail!("{}", outcome.failure_message());
    }

    let imported = outcome.debts.len();
    for debt in outcome.debts {
        repo.upsert_debt(debt).await?;
    }

    println!("Imported {} debt(s) into {}", imported, data_path);
    for error in &outcome.errors {
        eprintln!("[SKIP] {}", error);
    }

    Ok(())
}
