//! Marking installments as paid.

use models::Debt;
use thiserror::Error;

use crate::debt::remaining_installments;

#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    #[error("all installments are already paid")]
    NothingRemaining,
    #[error("count must be between 1 and {remaining} remaining installment(s)")]
    CountOutOfRange { remaining: u32 },
}

/// Monetary value of marking `count` additional installments as paid.
///
/// An unpaid down payment is settled first and does not share the regular
/// per-installment value: the remaining principal spreads over
/// `installments - 1`. Without a down payment in play, the remaining
/// principal spreads evenly over the remaining installments.
pub fn payment_value(debt: &Debt, count: u32) -> f64 {
    let remaining = remaining_installments(debt);
    if remaining == 0 || count == 0 {
        return 0.0;
    }

    let down_payment = debt.first_installment_value.filter(|v| *v > 0.0);
    if debt.paid_installments == 0 {
        if let Some(first) = down_payment {
            if count == 1 {
                return first;
            }
            let regular_count = debt.installments.saturating_sub(1);
            let regular = if regular_count == 0 {
                0.0
            } else {
                debt.total_value / regular_count as f64
            };
            return first + regular * (count - 1) as f64;
        }
    }

    (debt.total_value / remaining as f64) * count as f64
}

/// Applies a confirmed payment of `count` installments and returns the
/// updated record. Rejects out-of-range counts without touching state.
///
/// Deliberately not idempotent: each call consumes principal, so the
/// caller must apply exactly one call per confirmed user action.
pub fn apply_payment(debt: &Debt, count: u32) -> Result<Debt, PaymentError> {
    let remaining = remaining_installments(debt);
    if remaining == 0 {
        return Err(PaymentError::NothingRemaining);
    }
    if count == 0 || count > remaining {
        return Err(PaymentError::CountOutOfRange { remaining });
    }

    let value = payment_value(debt, count);

    let mut updated = debt.clone();
    updated.total_value = (debt.total_value - value).max(0.0);
    updated.paid_value = debt.paid_value + value;
    updated.paid_installments = debt.paid_installments + count;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_debt() -> Debt {
        Debt {
            id: "plain".to_string(),
            creditor: "Santander".to_string(),
            total_value: 1200.0,
            paid_value: 0.0,
            installments: 12,
            paid_installments: 0,
            installment_value: 100.0,
            due_day: Some(11),
            first_installment_value: None,
            notes: String::new(),
        }
    }

    fn down_payment_debt() -> Debt {
        Debt {
            id: "entry".to_string(),
            creditor: "Itau".to_string(),
            total_value: 1100.0,
            paid_value: 0.0,
            installments: 12,
            paid_installments: 0,
            installment_value: 100.0,
            due_day: Some(11),
            first_installment_value: Some(200.0),
            notes: String::new(),
        }
    }

    #[test]
    fn single_regular_installment() {
        let updated = apply_payment(&plain_debt(), 1).unwrap();
        assert_eq!(updated.paid_installments, 1);
        assert_eq!(updated.paid_value, 100.0);
        assert_eq!(updated.total_value, 1100.0);
        // The stored regular installment value is untouched.
        assert_eq!(updated.installment_value, 100.0);
    }

    #[test]
    fn multiple_regular_installments() {
        let updated = apply_payment(&plain_debt(), 3).unwrap();
        assert_eq!(updated.paid_installments, 3);
        assert_eq!(updated.paid_value, 300.0);
        assert_eq!(updated.total_value, 900.0);
    }

    #[test]
    fn later_payments_spread_remaining_principal() {
        let after_first = apply_payment(&plain_debt(), 1).unwrap();
        // 1100 left over 11 installments: still 100 each.
        let after_second = apply_payment(&after_first, 1).unwrap();
        assert_eq!(after_second.paid_value, 200.0);
        assert_eq!(after_second.total_value, 1000.0);
    }

    #[test]
    fn down_payment_settles_first() {
        let updated = apply_payment(&down_payment_debt(), 1).unwrap();
        assert_eq!(updated.paid_value, 200.0);
        assert_eq!(updated.total_value, 900.0);
        assert_eq!(updated.paid_installments, 1);
    }

    #[test]
    fn down_payment_plus_regular_installments() {
        // 200 down payment plus two regular installments of 1100 / 11.
        let updated = apply_payment(&down_payment_debt(), 3).unwrap();
        assert_eq!(updated.paid_value, 400.0);
        assert_eq!(updated.total_value, 700.0);
        assert_eq!(updated.paid_installments, 3);
    }

    #[test]
    fn fully_paid_debt_rejects_payment() {
        let mut debt = plain_debt();
        debt.paid_installments = 12;
        assert_eq!(apply_payment(&debt, 1), Err(PaymentError::NothingRemaining));
    }

    #[test]
    fn out_of_range_count_leaves_state_untouched() {
        let debt = plain_debt();
        assert_eq!(
            apply_payment(&debt, 13),
            Err(PaymentError::CountOutOfRange { remaining: 12 })
        );
        assert_eq!(
            apply_payment(&debt, 0),
            Err(PaymentError::CountOutOfRange { remaining: 12 })
        );
        // Borrowed debt is unchanged by construction, but make sure the
        // happy path still starts from the original figures.
        assert_eq!(debt.total_value, 1200.0);
        assert_eq!(debt.paid_installments, 0);
    }

    #[test]
    fn principal_never_goes_negative() {
        let mut debt = plain_debt();
        debt.total_value = 50.0;
        debt.installments = 2;
        let updated = apply_payment(&debt, 2).unwrap();
        assert_eq!(updated.total_value, 0.0);
        assert_eq!(updated.paid_value, 50.0);
    }

    #[test]
    fn paying_everything_marks_debt_paid() {
        let updated = apply_payment(&plain_debt(), 12).unwrap();
        assert_eq!(updated.paid_installments, 12);
        assert_eq!(updated.total_value, 0.0);
        assert_eq!(updated.paid_value, 1200.0);
    }
}
