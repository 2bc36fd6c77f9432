//! Fuzzy column resolution for imported spreadsheets.
//!
//! Users export from whatever tool they have, so header names vary. Each
//! logical field carries a ranked alias list: the canonical frontend name
//! first, then common variations and English equivalents. Resolution tries
//! exact case-insensitive matches for every alias before falling back to
//! substring matches in either direction; the first hit wins. The substring
//! pass never considers a header that exactly names a different field, so
//! "parcelas pagas" stays out of reach of the "descontando parcelas pagas"
//! alias.

use serde_json::{Map, Value};

/// One logical debt field that can be sourced from a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Creditor,
    TotalValue,
    Installments,
    PaidInstallments,
    PaidValue,
    RemainingAfterPayment,
    DueDay,
    FirstInstallmentValue,
    Notes,
}

impl Column {
    /// Accepted header names in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Id => &["id", "codigo", "code"],
            Column::Creditor => &[
                "credor",
                "dividas ativas",
                "dividasativas",
                "divida ativa",
                "dividaativa",
                "creditor",
                "banco",
                "instituição",
                "instituicao",
                "nome",
            ],
            Column::TotalValue => &["valor total", "valortotal", "valor", "total", "totalvalue"],
            Column::Installments => &["parcelas", "installments", "quantidade", "qtd"],
            Column::PaidInstallments => &[
                "parcelas pagas",
                "parcelaspagas",
                "parcelas paga",
                "parcelaspaga",
                "paidinstallments",
                "pagas",
            ],
            Column::PaidValue => &["valor pago", "valorpago", "paidvalue", "pago"],
            Column::RemainingAfterPayment => &[
                "total restante",
                "valor restante",
                "valorestante",
                "restante",
                "descontando parcelas pagas",
                "descontandoparcelaspagas",
            ],
            Column::DueDay => &[
                "dia vencimento",
                "diavencimento",
                "vencimento",
                "data de vencimento",
                "datadevencimento",
                "dueday",
                "dia",
            ],
            Column::FirstInstallmentValue => &[
                "1ª parcela",
                "1a parcela",
                "primeira parcela",
                "primeiraparcela",
                "firstinstallmentvalue",
                "entrada",
            ],
            Column::Notes => &["observações", "observacoes", "notes", "notas", "obs"],
        }
    }
}

const ALL_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Creditor,
    Column::TotalValue,
    Column::Installments,
    Column::PaidInstallments,
    Column::PaidValue,
    Column::RemainingAfterPayment,
    Column::DueDay,
    Column::FirstInstallmentValue,
    Column::Notes,
];

/// True when `header` is the exact name of some other logical column.
fn claimed_by_other(header: &str, column: Column) -> bool {
    ALL_COLUMNS.iter().any(|&other| {
        other != column
            && other
                .aliases()
                .iter()
                .any(|alias| alias.trim().to_lowercase() == header)
    })
}

/// True when a cell actually carries data. Empty strings count as absent,
/// matching how spreadsheet readers fill unset cells.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Resolves the cell for a logical column in one row, or `None` when no
/// header matches or every matching cell is empty.
pub fn resolve<'a>(row: &'a Map<String, Value>, column: Column) -> Option<&'a Value> {
    // Pass 1: exact case-insensitive match, aliases in priority order.
    for alias in column.aliases() {
        let wanted = alias.trim().to_lowercase();
        for (key, value) in row {
            if key.trim().to_lowercase() == wanted && is_present(value) {
                return Some(value);
            }
        }
    }

    // Pass 2: substring match in either direction, skipping headers that
    // belong verbatim to another column.
    for alias in column.aliases() {
        let wanted = alias.trim().to_lowercase();
        for (key, value) in row {
            let header = key.trim().to_lowercase();
            if claimed_by_other(&header, column) {
                continue;
            }
            if (header.contains(&wanted) || wanted.contains(&header)) && is_present(value) {
                return Some(value);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let r = row(&[("CREDOR", json!("Itau"))]);
        assert_eq!(resolve(&r, Column::Creditor), Some(&json!("Itau")));
    }

    #[test]
    fn canonical_name_wins_over_synonym() {
        let r = row(&[("banco", json!("wrong")), ("credor", json!("Itau"))]);
        assert_eq!(resolve(&r, Column::Creditor), Some(&json!("Itau")));
    }

    #[test]
    fn substring_match_in_either_direction() {
        // Header contains the alias.
        let r = row(&[("valor total da divida", json!(100))]);
        assert_eq!(resolve(&r, Column::TotalValue), Some(&json!(100)));
        // Alias contains the header.
        let r = row(&[("venciment", json!(11))]);
        assert_eq!(resolve(&r, Column::DueDay), Some(&json!(11)));
    }

    #[test]
    fn exact_pass_runs_before_substring_pass() {
        // "valor pago" would substring-match "valor", but the exact
        // "total" alias of TotalValue must not be shadowed by it.
        let r = row(&[("valor pago", json!(50)), ("total", json!(100))]);
        assert_eq!(resolve(&r, Column::TotalValue), Some(&json!(100)));
    }

    #[test]
    fn substring_pass_skips_headers_claimed_by_other_columns() {
        // "descontando parcelas pagas" contains "parcelas pagas", but
        // that header belongs to PaidInstallments.
        let r = row(&[("parcelas pagas", json!(3))]);
        assert_eq!(resolve(&r, Column::RemainingAfterPayment), None);
        assert_eq!(resolve(&r, Column::PaidInstallments), Some(&json!(3)));

        // Same for "parcelas pagas" against a plain "parcelas" header.
        let r = row(&[("parcelas", json!(12))]);
        assert_eq!(resolve(&r, Column::PaidInstallments), None);
        assert_eq!(resolve(&r, Column::Installments), Some(&json!(12)));
    }

    #[test]
    fn empty_cells_count_as_absent() {
        let r = row(&[("credor", json!("")), ("nome", json!("Santander"))]);
        assert_eq!(resolve(&r, Column::Creditor), Some(&json!("Santander")));

        let r = row(&[("credor", json!(""))]);
        assert_eq!(resolve(&r, Column::Creditor), None);
    }

    #[test]
    fn unmatched_field_resolves_to_none() {
        let r = row(&[("whatever", json!(1))]);
        assert_eq!(resolve(&r, Column::FirstInstallmentValue), None);
    }
}
