//! Folds the stored records into the derived financial summary.

use models::{
    CashFlowSummary, Debt, DebtTotals, Salary, SalarySummary, Savings, SavingsSummary, Summary,
};

use crate::debt::{remaining, remaining_installments};

/// Computes the full summary from the current records. Pure and total:
/// no I/O, same inputs always give the same output, and empty or zeroed
/// inputs never produce NaN or infinity.
pub fn calculate_summary(debts: &[Debt], salary: &Salary, savings: &Savings) -> Summary {
    let debts_totals = calculate_debt_totals(debts);

    let net_income = salary.monthly_income - salary.discounts;
    let available_after_debts = net_income - debts_totals.installment_value;

    let progress = if savings.current_goal > 0.0 {
        savings.saved_balance / savings.current_goal
    } else {
        0.0
    };

    Summary {
        debts_totals,
        salary: SalarySummary {
            monthly_income: salary.monthly_income,
            discounts: salary.discounts,
            net_income,
            has_thirteenth: salary.thirteenth,
            has_vacation: salary.vacation,
        },
        savings: SavingsSummary {
            saved_balance: savings.saved_balance,
            current_goal: savings.current_goal,
            progress,
            last_saved_at: savings.last_saved_at,
        },
        cash_flow: CashFlowSummary {
            available_after_debts,
            is_negative: available_after_debts < 0.0,
        },
    }
}

/// Sums the per-debt figures. `installment_value` adds each debt's regular
/// installment as-is (unweighted), which is what the monthly obligation is.
pub fn calculate_debt_totals(debts: &[Debt]) -> DebtTotals {
    let mut totals = DebtTotals::default();
    for debt in debts {
        totals.total += debt.total_value;
        totals.paid += debt.paid_value;
        totals.remaining += remaining(debt);
        totals.installment_value += debt.installment_value;
        totals.remaining_installments += remaining_installments(debt);
    }
    totals.average_installment = if totals.remaining_installments > 0 {
        totals.remaining / totals.remaining_installments as f64
    } else {
        0.0
    };
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debt(total: f64, paid: f64, installments: u32, paid_installments: u32) -> Debt {
        Debt {
            id: format!("d{total}"),
            creditor: "Credor".to_string(),
            total_value: total,
            paid_value: paid,
            installments,
            paid_installments,
            installment_value: total / installments as f64,
            due_day: None,
            first_installment_value: None,
            notes: String::new(),
        }
    }

    #[test]
    fn empty_inputs_give_all_zero_totals() {
        let summary = calculate_summary(&[], &Salary::default(), &Savings::default());
        assert_eq!(summary.debts_totals, DebtTotals::default());
        assert_eq!(summary.salary.net_income, 0.0);
        assert_eq!(summary.savings.progress, 0.0);
        assert_eq!(summary.cash_flow.available_after_debts, 0.0);
        assert!(!summary.cash_flow.is_negative);
    }

    #[test]
    fn totals_fold_over_all_debts() {
        let debts = vec![debt(1200.0, 200.0, 12, 2), debt(600.0, 0.0, 6, 0)];
        let totals = calculate_debt_totals(&debts);
        assert_eq!(totals.total, 1800.0);
        assert_eq!(totals.paid, 200.0);
        assert_eq!(totals.remaining, 1600.0);
        assert_eq!(totals.installment_value, 200.0);
        assert_eq!(totals.remaining_installments, 16);
        assert_eq!(totals.average_installment, 100.0);
    }

    #[test]
    fn average_installment_is_zero_when_everything_paid() {
        let totals = calculate_debt_totals(&[debt(1200.0, 1200.0, 12, 12)]);
        assert_eq!(totals.remaining_installments, 0);
        assert_eq!(totals.average_installment, 0.0);
        assert!(totals.average_installment.is_finite());
    }

    #[test]
    fn negative_cash_flow_is_flagged_not_fatal() {
        let salary = Salary {
            monthly_income: 1000.0,
            discounts: 200.0,
            ..Default::default()
        };
        let debts = vec![debt(12000.0, 0.0, 12, 0)];
        let summary = calculate_summary(&debts, &salary, &Savings::default());
        assert_eq!(summary.salary.net_income, 800.0);
        assert_eq!(summary.cash_flow.available_after_debts, -200.0);
        assert!(summary.cash_flow.is_negative);
    }

    #[test]
    fn savings_progress_guards_zero_goal() {
        let savings = Savings {
            saved_balance: 50.0,
            current_goal: 0.0,
            ..Default::default()
        };
        let summary = calculate_summary(&[], &Salary::default(), &savings);
        assert_eq!(summary.savings.progress, 0.0);

        let with_goal = Savings {
            saved_balance: 50.0,
            current_goal: 200.0,
            ..Default::default()
        };
        let summary = calculate_summary(&[], &Salary::default(), &with_goal);
        assert_eq!(summary.savings.progress, 0.25);
    }

    #[test]
    fn summary_is_deterministic() {
        let debts = vec![debt(1200.0, 100.0, 12, 1)];
        let salary = Salary {
            monthly_income: 5900.0,
            discounts: 1000.0,
            thirteenth: true,
            vacation: true,
        };
        let a = calculate_summary(&debts, &salary, &Savings::default());
        let b = calculate_summary(&debts, &salary, &Savings::default());
        assert_eq!(a, b);
        assert!(a.salary.has_thirteenth);
    }
}
