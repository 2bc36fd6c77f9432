//! Per-debt derived fields and write-path normalization.

use models::{Debt, DebtStatus};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::numeric::{to_count, to_number};

/// Validation failures for a single debt save. Import collects these per
/// row; a manual save surfaces the first one to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("creditor name is required")]
    MissingCreditor,
    #[error("total value must be greater than zero")]
    NonPositiveTotal,
    #[error("installments must be greater than zero")]
    NonPositiveInstallments,
    #[error("installments value {0} is out of range")]
    InstallmentsOutOfRange(i64),
    #[error("due day must be between 1 and 31, got {0}")]
    DueDayOutOfRange(i64),
    #[error("paid installments ({paid}) cannot exceed total installments ({total})")]
    PaidExceedsTotal { paid: i64, total: i64 },
}

/// Incoming debt payload before normalization. Numeric fields are kept
/// loosely typed so that form input like "1.055,80" survives the trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub creditor: String,
    #[serde(default)]
    pub total_value: Value,
    #[serde(default)]
    pub paid_value: Value,
    #[serde(default)]
    pub installments: Value,
    #[serde(default)]
    pub paid_installments: Value,
    #[serde(default)]
    pub due_day: Value,
    #[serde(default)]
    pub first_installment_value: Value,
    #[serde(default)]
    pub notes: String,
}

/// Repayment status: paid once every installment is marked, pending while
/// none are, in-progress in between.
pub fn status(debt: &Debt) -> DebtStatus {
    if debt.paid_installments >= debt.installments {
        DebtStatus::Paid
    } else if debt.paid_installments > 0 {
        DebtStatus::InProgress
    } else {
        DebtStatus::Pending
    }
}

/// Outstanding amount, floored at zero.
pub fn remaining(debt: &Debt) -> f64 {
    (debt.total_value - debt.paid_value).max(0.0)
}

/// Installments still to pay, floored at zero.
pub fn remaining_installments(debt: &Debt) -> u32 {
    debt.installments.saturating_sub(debt.paid_installments)
}

/// Value of one regular installment. A down payment is excluded from the
/// regular schedule, so the remaining principal spreads over
/// `installments - 1`; a single down-payment-only debt has no regular
/// installments at all and yields 0.
pub fn regular_installment_value(
    total_value: f64,
    installments: u32,
    first_installment_value: Option<f64>,
) -> f64 {
    let has_down_payment = first_installment_value.is_some_and(|v| v > 0.0);
    let divisor = if has_down_payment {
        installments.saturating_sub(1)
    } else {
        installments
    };
    if divisor == 0 {
        0.0
    } else {
        total_value / divisor as f64
    }
}

/// Normalizes a draft into a persistable [`Debt`], applied on every create
/// and update before the record reaches the store.
///
/// All numeric fields go through the lenient parser, `installment_value`
/// is recomputed from the totals (a supplied value is ignored), and
/// `paid_value` is forced to 0 whenever no installment has been paid.
pub fn normalize_debt(draft: &DebtDraft) -> Result<Debt, ValidationError> {
    let creditor = draft.creditor.trim();
    if creditor.is_empty() {
        return Err(ValidationError::MissingCreditor);
    }

    let total_value = to_number(&draft.total_value);
    if total_value <= 0.0 {
        return Err(ValidationError::NonPositiveTotal);
    }

    let installments = to_count(&draft.installments);
    if installments <= 0 {
        return Err(ValidationError::NonPositiveInstallments);
    }

    let paid_installments = to_count(&draft.paid_installments).max(0);
    if paid_installments > installments {
        return Err(ValidationError::PaidExceedsTotal {
            paid: paid_installments,
            total: installments,
        });
    }

    // 0 means "unspecified", same as an absent column.
    let due_day = match to_count(&draft.due_day) {
        0 => None,
        d if (1..=31).contains(&d) => Some(d as u32),
        d => return Err(ValidationError::DueDayOutOfRange(d)),
    };

    let first_installment_value = match to_number(&draft.first_installment_value) {
        v if v > 0.0 => Some(v),
        _ => None,
    };

    let installments = u32::try_from(installments)
        .map_err(|_| ValidationError::InstallmentsOutOfRange(installments))?;
    // Bounded by installments above, so the cast is lossless.
    let paid_installments = paid_installments as u32;

    let paid_value = if paid_installments == 0 {
        0.0
    } else {
        to_number(&draft.paid_value).max(0.0)
    };

    Ok(Debt {
        id: draft.id.clone().unwrap_or_default(),
        creditor: creditor.to_string(),
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
        notes: draft.notes.trim().to_string(),
    })
}

/// Re-asserts the unpaid-debt invariant on a record about to be stored.
/// Every write path funnels through this.
pub fn enforce_paid_invariant(debt: &mut Debt) {
    if debt.paid_installments == 0 {
        debt.paid_value = 0.0;
    }
}
