//! Pure derived-financial computations: lenient numeric parsing, per-debt
//! derived fields, the aggregated summary, and installment payments.
//!
//! Everything here is synchronous and side-effect free; persistence and
//! HTTP live in `backend_api`.

pub mod debt;
pub mod numeric;
pub mod payment;
pub mod summary;

pub use debt::{
    enforce_paid_invariant, normalize_debt, regular_installment_value, remaining,
    remaining_installments, status, DebtDraft, ValidationError,
};
pub use numeric::{parse_decimal, to_count, to_number};
pub use payment::{apply_payment, payment_value, PaymentError};
pub use summary::{calculate_debt_totals, calculate_summary};
