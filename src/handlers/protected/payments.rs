// handlers/protected/payments.rs - /api/payments
//
// Mock PayPal flow: records are created pending, then verified or cancelled by
// the client. Nothing here talks to PayPal.

use axum::{
    extract::{Path, State},
    Extension,
};
use tracing::info;

use super::utils::load_owned;
use crate::database::models::{NewPayment, Payment, PaymentUpdate, VerifyPayment};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, OptionalJsonBody};
use crate::state::AppState;

pub async fn payments_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Payment>> {
    let payments = state.repo::<Payment>().list_for(user.id).await?;
    info!("Retrieved {} payments for {}", payments.len(), user.id);
    Ok(ApiResponse::list(payments))
}

/// POST /api/payments - Open a pending payment
///
/// Expected Input:
/// ```json
/// { "amount": 19.99, "description": "Pro plan", "orderId": "optional-paypal-order" }
/// ```
pub async fn payment_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<NewPayment>,
) -> ApiResult<Payment> {
    let payment = body.into_payment(user.id, state.config.payments.paypal_email.clone())?;
    let payment = state.repo::<Payment>().create(&payment).await?;
    info!("Payment created: {}", payment.id);

    Ok(ApiResponse::created(payment).with_message("Payment created"))
}

pub async fn payment_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Payment> {
    let payment = load_owned(&state.repo::<Payment>(), &id, &user, "Payment").await?;
    Ok(ApiResponse::success(payment))
}

/// PUT /api/payments/:id - Set the status
pub async fn payment_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<PaymentUpdate>,
) -> ApiResult<Payment> {
    let repo = state.repo::<Payment>();
    let mut payment = load_owned(&repo, &id, &user, "Payment").await?;
    body.apply(&mut payment)?;
    let payment = repo.save(&payment).await?;
    info!("Payment updated: {} (status: {})", payment.id, payment.status);

    Ok(ApiResponse::success(payment).with_message("Payment updated"))
}

/// POST /api/payments/:id/verify - Mark completed with the processor's transaction id
///
/// The body may be omitted; a body that is sent must be valid.
///
/// ```json
/// { "transactionId": "8MC585209K746392H" }
/// ```
pub async fn payment_verify(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    OptionalJsonBody(body): OptionalJsonBody<VerifyPayment>,
) -> ApiResult<Payment> {
    let repo = state.repo::<Payment>();
    let mut payment = load_owned(&repo, &id, &user, "Payment").await?;
    let transaction_id = body.and_then(|b| b.transaction_id);
    payment.verify(transaction_id);
    let payment = repo.save(&payment).await?;
    info!("Payment verified: {}", payment.id);

    Ok(ApiResponse::success(payment).with_message("Payment verified"))
}

/// DELETE /api/payments/:id - Cancel; the row is kept with status `cancelled`
pub async fn payment_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Payment> {
    let repo = state.repo::<Payment>();
    let mut payment = load_owned(&repo, &id, &user, "Payment").await?;
    payment.cancel();
    let payment = repo.save(&payment).await?;
    info!("Payment cancelled: {}", payment.id);

    Ok(ApiResponse::success(payment).with_message("Payment cancelled"))
}
