use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single debt record. `total_value` is the remaining principal owed,
/// not the original loan amount; it decreases as payments are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub creditor: String,
    pub total_value: f64,
    pub paid_value: f64,
    pub installments: u32,
    pub paid_installments: u32,
    pub installment_value: f64,
    #[serde(default)]
    pub due_day: Option<u32>,
    #[serde(default)]
    pub first_installment_value: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

/// Repayment status derived from installment counts, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "pending")]
    Pending,
}

/// Singleton salary record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub discounts: f64,
    #[serde(default)]
    pub thirteenth: bool,
    #[serde(default)]
    pub vacation: bool,
}

/// Singleton savings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    #[serde(default)]
    pub saved_balance: f64,
    #[serde(default)]
    pub current_goal: f64,
    #[serde(default)]
    pub last_saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

/// Monthly planning entry, keyed by a year-month id such as "2026-03".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub total: f64,
}

/// Dashboard shortcut, identified by its navigation route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub route: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
}

/// The whole persisted document, read and written as one JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub savings: Savings,
    #[serde(default)]
    pub months: Vec<Month>,
    #[serde(default)]
    pub quick_actions: Vec<QuickAction>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub profile: Profile,
}

impl FinanceData {
    /// Starter document written on first run.
    pub fn seeded() -> Self {
        fn debt(
            id: &str,
            creditor: &str,
            total_value: f64,
            paid_value: f64,
            installments: u32,
            paid_installments: u32,
            installment_value: f64,
            due_day: Option<u32>,
            first_installment_value: Option<f64>,
        ) -> Debt {
            Debt {
                id: id.to_string(),
                creditor: creditor.to_string(),
                total_value,
                paid_value,
                installments,
                paid_installments,
                installment_value,
                due_day,
                first_installment_value,
                notes: String::new(),
            }
        }

        let months = [
            ("2026-01", "janeiro/2026"),
            ("2026-02", "fevereiro/2026"),
            ("2026-03", "marco/2026"),
            ("2026-04", "abril/2026"),
            ("2026-05", "maio/2026"),
            ("2026-06", "junho/2026"),
            ("2026-07", "julho/2026"),
            ("2026-08", "agosto/2026"),
            ("2026-09", "setembro/2026"),
            ("2026-10", "outubro/2026"),
        ]
        .into_iter()
        .map(|(id, label)| Month {
            id: id.to_string(),
            label: label.to_string(),
            total: 0.0,
        })
        .collect();

        Self {
            debts: vec![
                debt("itau", "Itau", 887.28, 739.4, 12, 2, 73.94, Some(11), Some(270.27)),
                debt("santander", "Santander", 1055.8, 0.0, 5, 0, 211.16, Some(11), None),
                debt(
                    "financiamento",
                    "Imobiliaria/Financiamento",
                    15494.65,
                    0.0,
                    7,
                    0,
                    2084.95,
                    None,
                    None,
                ),
                debt("lojas-cem", "Lojas CEM", 2500.0, 0.0, 10, 0, 130.0, None, None),
                debt("casas-bahia", "Casas Bahia", 3353.3, 0.0, 6, 0, 550.56, Some(11), None),
                debt("nubank", "Nubank", 217.94, 0.0, 2, 0, 108.97, Some(11), None),
                debt("faculdade", "Faculdade", 900.0, 0.0, 4, 0, 400.0, Some(11), None),
                debt(
                    "magazine-luiza",
                    "Magazine Luiza",
                    2000.0,
                    0.0,
                    12,
                    0,
                    133.0,
                    Some(11),
                    None,
                ),
                debt("recarga-pay", "Recarga Pay", 300.0, 0.0, 2, 0, 192.0, Some(11), None),
            ],
            salary: Salary {
                monthly_income: 5900.0,
                discounts: 1000.0,
                thirteenth: true,
                vacation: true,
            },
            savings: Savings {
                saved_balance: 100.0,
                current_goal: 100.0,
                last_saved_at: None,
                notes: String::new(),
            },
            months,
            quick_actions: Vec::new(),
            preferences: Preferences::default(),
            profile: Profile::default(),
        }
    }
}

// Derived summary models. Recomputed on every read, never persisted.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtTotals {
    pub total: f64,
    pub paid: f64,
    pub remaining: f64,
    pub installment_value: f64,
    pub remaining_installments: u32,
    pub average_installment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySummary {
    pub monthly_income: f64,
    pub discounts: f64,
    pub net_income: f64,
    pub has_thirteenth: bool,
    pub has_vacation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub saved_balance: f64,
    pub current_goal: f64,
    pub progress: f64,
    pub last_saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub available_after_debts: f64,
    pub is_negative: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub debts_totals: DebtTotals,
    pub salary: SalarySummary,
    pub savings: SavingsSummary,
    pub cash_flow: CashFlowSummary,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl Summary {
    /// Rounds all monetary values to 2 decimals for presentation.
    pub fn rounded(mut self) -> Self {
        self.debts_totals.total = round2(self.debts_totals.total);
        self.debts_totals.paid = round2(self.debts_totals.paid);
        self.debts_totals.remaining = round2(self.debts_totals.remaining);
        self.debts_totals.installment_value = round2(self.debts_totals.installment_value);
        self.debts_totals.average_installment = round2(self.debts_totals.average_installment);
        self.salary.monthly_income = round2(self.salary.monthly_income);
        self.salary.discounts = round2(self.salary.discounts);
        self.salary.net_income = round2(self.salary.net_income);
        self.savings.saved_balance = round2(self.savings.saved_balance);
        self.savings.current_goal = round2(self.savings.current_goal);
        self.cash_flow.available_after_debts = round2(self.cash_flow.available_after_debts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn debt_json_uses_camel_case_field_names() {
        let debt: Debt = serde_json::from_value(json!({
            "id": "santander",
            "creditor": "Santander",
            "totalValue": 1055.8,
            "paidValue": 0.0,
            "installments": 5,
            "paidInstallments": 0,
            "installmentValue": 211.16,
            "dueDay": 11,
            "firstInstallmentValue": null,
            "notes": ""
        }))
        .unwrap();

        assert_eq!(debt.creditor, "Santander");
        assert_eq!(debt.due_day, Some(11));
        assert_eq!(debt.first_installment_value, None);

        let back = serde_json::to_value(&debt).unwrap();
        assert_eq!(back["totalValue"], json!(1055.8));
        assert_eq!(back["paidInstallments"], json!(0));
    }

    #[test]
    fn status_serializes_to_kebab_case_labels() {
        assert_eq!(
            serde_json::to_value(DebtStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!(serde_json::to_value(DebtStatus::Paid).unwrap(), json!("paid"));
    }

    #[test]
    fn finance_data_tolerates_missing_sections() {
        let data: FinanceData = serde_json::from_value(json!({ "debts": [] })).unwrap();
        assert!(data.debts.is_empty());
        assert_eq!(data.salary.monthly_income, 0.0);
        assert_eq!(data.preferences.theme, "");
    }

    #[test]
    fn seeded_document_carries_the_starter_records() {
        let data = FinanceData::seeded();
        assert_eq!(data.debts.len(), 9);
        assert_eq!(data.debts[0].id, "itau");
        assert_eq!(data.debts[0].first_installment_value, Some(270.27));
        assert_eq!(data.salary.monthly_income, 5900.0);
        assert_eq!(data.savings.saved_balance, 100.0);
        assert_eq!(data.months.len(), 10);
        assert_eq!(data.months[2].id, "2026-03");
        // Due day 0 in the source sheets means unspecified.
        assert_eq!(data.debts[2].due_day, None);
    }

    #[test]
    fn summary_rounding_keeps_two_decimals() {
        let summary = Summary {
            debts_totals: DebtTotals {
                average_installment: 33.333333,
                ..Default::default()
            },
            ..Default::default()
        }
        .rounded();
        assert_eq!(summary.debts_totals.average_installment, 33.33);
    }
}
