use super::AppState;
use super::error::{ApiError, Operation};
use crate::domain::merchant::{CardDetails, CardTransaction};
use crate::domain::provisioning::{
    MerchantDirectory, ProvisioningRequest, ProvisioningResponse, ProvisioningStatusSnapshot,
};
use crate::domain::token::{TokenDeletion, TokenInfo, TokenListResponse, TokenUpdateResponse};
use crate::error::ProvisioningError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

fn rejected(operation: &'static str, rejection: JsonRejection) -> ApiError {
    ApiError {
        operation,
        error: ProvisioningError::InvalidRequest(rejection.body_text()),
    }
}

fn rejected_query(operation: &'static str, rejection: QueryRejection) -> ApiError {
    ApiError {
        operation,
        error: ProvisioningError::InvalidRequest(rejection.body_text()),
    }
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/cards/details
pub async fn card_details(State(state): State<AppState>) -> Json<CardDetails> {
    Json(state.catalog.card_profile().clone())
}

/// Paging values are signed so that negative input clamps to zero instead of
/// failing to decode.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

fn clamp(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<CardTransaction>,
    pub total_count: usize,
    pub response_timestamp: DateTime<Utc>,
}

/// GET /api/cards/transactions?limit&offset
pub async fn list_transactions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let Query(params) = params.map_err(|r| rejected_query("list_transactions", r))?;
    let page = state
        .catalog
        .transaction_page(clamp(params.offset), clamp(params.limit));
    Ok(Json(TransactionListResponse {
        transactions: page.transactions.to_vec(),
        total_count: page.total_count,
        response_timestamp: Utc::now(),
    }))
}

/// GET /api/cards/transactions/{id}
pub async fn transaction_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardTransaction>, ApiError> {
    let transaction = state
        .catalog
        .find_transaction(&id)
        .during("get_transaction")?;
    Ok(Json(transaction.clone()))
}

/// POST /api/push-provisioning
pub async fn provision(
    State(state): State<AppState>,
    body: Result<Json<ProvisioningRequest>, JsonRejection>,
) -> Result<Json<ProvisioningResponse>, ApiError> {
    let Json(request) = body.map_err(|r| rejected("push_provisioning", r))?;
    let response = state
        .orchestrator
        .provision(request)
        .await
        .during("push_provisioning")?;
    Ok(Json(response))
}

/// GET /api/push-provisioning/status/{request_id}
pub async fn provisioning_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ProvisioningStatusSnapshot>, ApiError> {
    let snapshot = state
        .orchestrator
        .get_status(&request_id)
        .await
        .during("push_provisioning_status")?;
    Ok(Json(snapshot))
}

/// GET /api/push-provisioning/merchants
pub async fn merchants(State(state): State<AppState>) -> Json<MerchantDirectory> {
    Json(state.orchestrator.merchants())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListParams {
    #[serde(default = "default_card_identifier", alias = "card_identifier")]
    pub card_identifier: String,
}

fn default_card_identifier() -> String {
    "default_card".to_string()
}

/// GET /api/tokens?cardIdentifier
pub async fn list_tokens(
    State(state): State<AppState>,
    params: Result<Query<TokenListParams>, QueryRejection>,
) -> Result<Json<TokenListResponse>, ApiError> {
    let Query(params) = params.map_err(|r| rejected_query("list_tokens", r))?;
    let tokens = state
        .registry
        .list(&params.card_identifier)
        .await
        .during("list_tokens")?;
    Ok(Json(tokens))
}

/// GET /api/tokens/{id}
pub async fn get_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TokenInfo>, ApiError> {
    let token = state.registry.get(&id).await.during("get_token")?;
    Ok(Json(token))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdateRequest {
    #[serde(alias = "token_status")]
    pub token_status: String,
}

/// PUT /api/tokens/{id}
pub async fn update_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TokenUpdateRequest>, JsonRejection>,
) -> Result<Json<TokenUpdateResponse>, ApiError> {
    let Json(request) = body.map_err(|r| rejected("update_token", r))?;
    let update = state
        .registry
        .update_status(&id, &request.token_status)
        .await
        .during("update_token")?;
    Ok(Json(update))
}

#[derive(Debug, Serialize)]
pub struct DeletionBody {
    pub message: &'static str,
    #[serde(flatten)]
    pub deletion: TokenDeletion,
}

/// DELETE /api/tokens/{id}
pub async fn delete_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletionBody>, ApiError> {
    let deletion = state.registry.delete(&id).await.during("delete_token")?;
    Ok(Json(DeletionBody {
        message: "Token deleted successfully",
        deletion,
    }))
}
