// handlers/protected/transactions.rs - /api/transactions

use axum::{extract::State, Extension};
use tracing::info;

use crate::database::models::{NewTransaction, Transaction, TransactionSummary};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// GET /api/transactions - Caller's transactions, newest first
pub async fn transactions_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Transaction>> {
    let transactions = state.repo::<Transaction>().list_for(user.id).await?;
    Ok(ApiResponse::list(transactions))
}

/// POST /api/transactions - Record a transaction
///
/// Expected Input:
/// ```json
/// {
///   "amount": 120.5,               // Required: > 0
///   "type": "affiliate_payout",    // Required: deposit, withdrawal, dividend, affiliate_payout, stock_purchase, stock_sale
///   "payment_method": "paypal",    // Optional: paypal, apple_pay, cash_app, chime, bank_transfer, crypto
///   "status": "pending",           // Optional: pending, completed, failed
///   "description": "March payout"
/// }
/// ```
pub async fn transaction_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewTransaction>,
) -> ApiResult<Transaction> {
    let transaction = body.into_transaction(user.id)?;
    let transaction = state.repo::<Transaction>().create(&transaction).await?;
    info!(
        "Transaction created: {} {} ({})",
        transaction.kind, transaction.amount, transaction.id
    );

    Ok(ApiResponse::created(transaction).with_message("Transaction created"))
}

/// GET /api/transactions/summary - Earnings versus expenses
pub async fn transactions_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<TransactionSummary> {
    let transactions = state.repo::<Transaction>().list_for(user.id).await?;
    Ok(ApiResponse::success(TransactionSummary::from_transactions(&transactions)))
}
