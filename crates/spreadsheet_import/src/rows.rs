//! Row-by-row normalization of imported spreadsheet data.

use models::Debt;
use serde_json::{Map, Value};
use uuid::Uuid;

use calculations::{regular_installment_value, to_count, to_number};

use crate::columns::{resolve, Column};

/// Row labels that mark a spreadsheet totals/summary line. Such rows are
/// dropped silently, without counting as errors.
const TOTALS_ROW_LABELS: &[&str] = &["totais", "total", "sem financ", "sem financiamento"];

/// Result of an import batch: the debts that validated plus one message
/// per rejected row, in row order.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub debts: Vec<Debt>,
    pub errors: Vec<String>,
}

impl ImportOutcome {
    /// A batch only fails outright when not a single row validated.
    pub fn is_failure(&self) -> bool {
        self.debts.is_empty()
    }

    /// User-facing failure message: the first five row errors plus a
    /// count of the rest.
    pub fn failure_message(&self) -> String {
        if self.errors.is_empty() {
            return "no valid debts found in the spreadsheet".to_string();
        }
        let shown: Vec<&str> = self.errors.iter().take(5).map(String::as_str).collect();
        let mut message = format!("no valid debts found:\n{}", shown.join("\n"));
        if self.errors.len() > 5 {
            message.push_str(&format!("\n... and {} more error(s)", self.errors.len() - 5));
        }
        message
    }
}

/// Renders a cell for display inside error messages.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Maps raw spreadsheet rows onto validated debt records.
///
/// Rows are processed sequentially and never abort the batch: totals rows
/// and blank rows are skipped silently, invalid rows are skipped with a
/// collected message, and valid rows come out as debts. A row that names
/// an existing debt (by id, or by creditor when no id is supplied) reuses
/// that debt's id so the save becomes an update; anything else gets a
/// fresh id.
pub fn parse_import_rows(rows: &[Map<String, Value>], existing: &[Debt]) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        // Row numbers in messages are spreadsheet lines: header is line 1.
        let line = index + 2;

        let id = resolve(row, Column::Id).map(|v| cell_text(v).trim().to_string());
        let creditor_raw = resolve(row, Column::Creditor).map(cell_text);
        let total_raw = resolve(row, Column::TotalValue);

        let creditor_norm = creditor_raw.as_deref().map(normalized).unwrap_or_default();
        if TOTALS_ROW_LABELS.contains(&creditor_norm.as_str()) {
            continue;
        }

        let has_creditor = !creditor_norm.is_empty();
        if !has_creditor && total_raw.is_none() {
            // Blank row.
            continue;
        }

        let creditor = if has_creditor {
            creditor_raw.unwrap_or_default().trim().to_string()
        } else {
            format!("Dívida {}", index + 1)
        };

        let total_raw = match total_raw {
            Some(v) => v,
            None => {
                outcome.errors.push(format!(
                    "Row {line} ({creditor}): total value column missing or empty"
                ));
                continue;
            }
        };
        let total_value = to_number(total_raw);
        if total_value <= 0.0 {
            outcome.errors.push(format!(
                "Row {line} ({creditor}): total value must be greater than zero, got \"{}\"",
                cell_text(total_raw)
            ));
            continue;
        }

        let installments = resolve(row, Column::Installments).map_or(0, to_count);
        if installments <= 0 {
            outcome.errors.push(format!(
                "Row {line} ({creditor}): installments must be greater than zero"
            ));
            continue;
        }

        // Due day 0 means unspecified, same as the manual form.
        let due_day = match resolve(row, Column::DueDay).map_or(0, to_count) {
            0 => None,
            d if (1..=31).contains(&d) => Some(d as u32),
            _ => {
                outcome.errors.push(format!(
                    "Row {line} ({creditor}): due day must be between 1 and 31"
                ));
                continue;
            }
        };

        let paid_installments = resolve(row, Column::PaidInstallments)
            .map_or(0, to_count)
            .max(0);
        if paid_installments > installments {
            outcome.errors.push(format!(
                "Row {line} ({creditor}): paid installments ({paid_installments}) cannot exceed total installments ({installments})"
            ));
            continue;
        }

        let installments = match u32::try_from(installments) {
            Ok(v) => v,
            Err(_) => {
                outcome.errors.push(format!(
                    "Row {line} ({creditor}): installments value {installments} is out of range"
                ));
                continue;
            }
        };
        let paid_installments = paid_installments as u32;

        let first_installment_value =
            match resolve(row, Column::FirstInstallmentValue).map_or(0.0, to_number) {
                v if v > 0.0 => Some(v),
                _ => None,
            };

        let mut paid_value = resolve(row, Column::PaidValue).map_or(0.0, to_number);
        if paid_installments == 0 {
            // Whatever the sheet says, nothing paid means nothing paid.
            paid_value = 0.0;
        } else if paid_value == 0.0 {
            // Back-calculate. A "remaining after payment" column wins: it
            // holds total minus paid (sometimes exported as a negative).
            let remaining_after =
                resolve(row, Column::RemainingAfterPayment).map_or(0.0, to_number);
            if remaining_after != 0.0 {
                paid_value = (total_value - remaining_after.abs()).max(0.0);
            }
            if paid_value == 0.0 {
                paid_value = paid_installments as f64 * (total_value / installments as f64);
            }
        }

        let notes = resolve(row, Column::Notes)
            .map(|v| cell_text(v).trim().to_string())
            .unwrap_or_default();

        let id = resolve_identity(id, &creditor, existing);

        outcome.debts.push(Debt {
            id,
            creditor,
            total_value,
            paid_value,
            installments,
            paid_installments,
            installment_value: regular_installment_value(
                total_value,
                installments,
                first_installment_value,
            ),
            due_day,
            first_installment_value,
            notes,
        });
    }

    outcome
}

/// Picks the id an imported row should be stored under: the supplied id,
/// else the id of an existing debt with the same normalized creditor
/// name, else a fresh one.
fn resolve_identity(supplied: Option<String>, creditor: &str, existing: &[Debt]) -> String {
    if let Some(id) = supplied.filter(|s| !s.is_empty()) {
        return id;
    }
    let wanted = normalized(creditor);
    if let Some(known) = existing.iter().find(|d| normalized(&d.creditor) == wanted) {
        return known.id.clone();
    }
    Uuid::new_v4().to_string()
}
