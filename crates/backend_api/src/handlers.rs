use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use calculations::{apply_payment, calculate_summary, normalize_debt, status, DebtDraft};
use models::{
    Debt, DebtStatus, Month, Preferences, Profile, QuickAction, Salary, Savings, Summary,
};
use spreadsheet_import::parse_import_rows;

use crate::{error::ApiError, repository::FinanceRepository, Result};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn FinanceRepository>,
    pub api_token: Option<String>,
}

/// A debt as the clients see it: the stored record plus its derived status.
#[derive(Debug, Serialize)]
pub struct DebtView {
    #[serde(flatten)]
    pub debt: Debt,
    pub status: DebtStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub debts: Vec<DebtView>,
    pub salary: Salary,
    pub savings: Savings,
    pub months: Vec<Month>,
    pub quick_actions: Vec<QuickAction>,
    pub preferences: Preferences,
    pub profile: Profile,
    pub summary: Summary,
}

/// GET /api/data
/// Returns everything the dashboard needs in one round trip. The summary
/// is recomputed here on every read; it is never persisted.
pub async fn get_data(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let data = state.repo.fetch_all().await?;
    let summary = calculate_summary(&data.debts, &data.salary, &data.savings).rounded();

    let debts = data
        .debts
        .into_iter()
        .map(|debt| DebtView {
            status: status(&debt),
            debt,
        })
        .collect();

    Ok(Json(DataResponse {
        debts,
        salary: data.salary,
        savings: data.savings,
        months: data.months,
        quick_actions: data.quick_actions,
        preferences: data.preferences,
        profile: data.profile,
        summary,
    }))
}

/// POST /api/debts
/// Creates or updates a debt. The payload goes through write-path
/// normalization before it is stored; a fresh id is minted when none is
/// supplied.
pub async fn upsert_debt(
    State(state): State<AppState>,
    Json(draft): Json<DebtDraft>,
) -> Result<impl IntoResponse> {
    let mut debt = normalize_debt(&draft)?;
    if debt.id.is_empty() {
        debt.id = Uuid::new_v4().to_string();
    }
    let stored = state.repo.upsert_debt(debt).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/debts/:id
pub async fn delete_debt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.repo.delete_debt(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub count: u32,
}

/// POST /api/debts/:id/payments
/// Marks `count` additional installments of one debt as paid. The range
/// check happens before any state changes; an out-of-range count leaves
/// the record untouched.
pub async fn mark_installments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> Result<impl IntoResponse> {
    let debt = state
        .repo
        .find_debt(&id)
        .await?
        .ok_or_else(|| ApiError::DebtNotFound(id.clone()))?;

    let updated = apply_payment(&debt, request.count)?;
    let stored = state.repo.upsert_debt(updated).await?;
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// POST /api/debts/import
/// Normalizes pre-extracted spreadsheet rows into debts and upserts the
/// valid ones. Row errors come back alongside the import count; the
/// request only fails when no row at all validated.
pub async fn import_debts(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<impl IntoResponse> {
    let existing = state.repo.fetch_all().await?.debts;
    let outcome = parse_import_rows(&request.rows, &existing);

    if outcome.is_failure() {
        return Err(ApiError::Validation(outcome.failure_message()));
    }

    let imported = outcome.debts.len();
    for debt in outcome.debts {
        state.repo.upsert_debt(debt).await?;
    }

    tracing::info!(imported, skipped = outcome.errors.len(), "spreadsheet import finished");
    Ok(Json(ImportResponse {
        imported,
        errors: outcome.errors,
    }))
}

/// POST /api/salary
pub async fn update_salary(
    State(state): State<AppState>,
    Json(salary): Json<Salary>,
) -> Result<impl IntoResponse> {
    let stored = state.repo.update_salary(salary).await?;
    Ok(Json(stored))
}

/// POST /api/savings
/// Stamps `lastSavedAt` with the current time when the client does not
/// supply one.
pub async fn update_savings(
    State(state): State<AppState>,
    Json(mut savings): Json<Savings>,
) -> Result<impl IntoResponse> {
    if savings.last_saved_at.is_none() {
        savings.last_saved_at = Some(Utc::now());
    }
    let stored = state.repo.update_savings(savings).await?;
    Ok(Json(stored))
}

/// POST /api/months
pub async fn upsert_month(
    State(state): State<AppState>,
    Json(month): Json<Month>,
) -> Result<impl IntoResponse> {
    if month.id.trim().is_empty() {
        return Err(ApiError::Validation("month id is required".to_string()));
    }
    let stored = state.repo.upsert_month(month).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/quick-actions
/// Replaces the stored quick-action list with the client's.
pub async fn sync_quick_actions(
    State(state): State<AppState>,
    Json(actions): Json<Vec<QuickAction>>,
) -> Result<impl IntoResponse> {
    let stored = state.repo.replace_quick_actions(actions).await?;
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(default)]
    pub route_order: Vec<String>,
}

/// POST /api/quick-actions/order
pub async fn reorder_quick_actions(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<impl IntoResponse> {
    let stored = state.repo.reorder_quick_actions(request.route_order).await?;
    Ok(Json(stored))
}

/// DELETE /api/quick-actions/:route
/// The route segment arrives URL-encoded ("%2Fdividas" for "/dividas").
pub async fn remove_quick_action(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<impl IntoResponse> {
    state.repo.remove_quick_action(&route).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<Preferences>,
) -> Result<impl IntoResponse> {
    let stored = state.repo.update_preferences(preferences).await?;
    Ok(Json(stored))
}

/// POST /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<impl IntoResponse> {
    let stored = state.repo.update_profile(profile).await?;
    Ok(Json(stored))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "finance-tracker-api"
    }))
}

/// POST /api/cache/invalidate
/// Drops the repository's in-memory copy so the next read hits the file.
pub async fn invalidate_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.repo.invalidate_cache().await;

    Json(serde_json::json!({
        "status": "success",
        "message": "Cache invalidated. Fresh data will be loaded on next request."
    }))
}
