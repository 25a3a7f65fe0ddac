use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::types::PaymentStatus;
use crate::validation::FieldErrors;

/// Mock PayPal payment. Wire names are camelCase to match the frontend client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub amount: f64,
    pub description: String,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub status: PaymentStatus,
    #[serde(rename = "paypalEmail")]
    pub paypal_email: Option<String>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Payment {
    const TABLE: TableSpec = TableSpec {
        name: "payments",
        owner_column: "userId",
        columns: &[
            "userId",
            "amount",
            "description",
            "orderId",
            "status",
            "paypalEmail",
            "transactionId",
            "verified_at",
            "created_at",
            "updated_at",
        ],
    };

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Payment {
    pub fn verify(&mut self, transaction_id: Option<String>) {
        let now = Utc::now();
        self.status = PaymentStatus::Completed;
        self.transaction_id = transaction_id;
        self.verified_at = Some(now);
        self.updated_at = now;
    }

    pub fn cancel(&mut self) {
        self.status = PaymentStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewPayment {
    pub amount: Option<f64>,
    pub description: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

impl NewPayment {
    /// Payments start `pending` and record the receiving PayPal account
    pub fn into_payment(self, owner: Uuid, paypal_email: Option<String>) -> Result<Payment, ApiError> {
        let mut errors = FieldErrors::new();

        let amount = match self.amount {
            Some(v) => errors.positive("amount", "Amount", v),
            None => {
                errors.add("amount", "Amount is required and must be a positive number");
                None
            }
        };
        let description = errors.required_text("description", "Description", self.description);

        errors.finish()?;

        let (Some(amount), Some(description)) = (amount, description) else {
            return Err(ApiError::bad_request("Amount and description required"));
        };

        let now = Utc::now();
        Ok(Payment {
            id: Uuid::new_v4(),
            user_id: owner,
            amount,
            description,
            order_id: self.order_id,
            status: PaymentStatus::Pending,
            paypal_email,
            transaction_id: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// PUT /api/payments/:id body. Any known status is accepted from any other.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentUpdate {
    pub status: Option<String>,
}

impl PaymentUpdate {
    pub fn apply(self, payment: &mut Payment) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| errors.choice::<PaymentStatus>("status", "Status", s));
        errors.finish()?;

        if let Some(v) = status {
            payment.status = v;
        }
        payment.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyPayment {
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Payment {
        NewPayment {
            amount: Some(19.99),
            description: Some("Pro plan".into()),
            order_id: None,
        }
        .into_payment(Uuid::new_v4(), Some("billing@example.com".into()))
        .unwrap()
    }

    #[test]
    fn create_starts_pending_with_camel_case_fields() {
        let p = payment();
        assert_eq!(p.status, PaymentStatus::Pending);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["paypalEmail"], "billing@example.com");
        assert!(json.get("userId").is_some());
        assert!(json["transactionId"].is_null());
    }

    #[test]
    fn create_requires_description() {
        let err = NewPayment {
            amount: Some(5.0),
            description: Some("".into()),
            order_id: None,
        }
        .into_payment(Uuid::new_v4(), None)
        .unwrap_err();
        assert_eq!(err.message(), "Description is required and must be a non-empty string");
    }

    #[test]
    fn verify_and_cancel_set_status() {
        let mut p = payment();
        p.verify(Some("TX-123".into()));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.transaction_id.as_deref(), Some("TX-123"));
        assert!(p.verified_at.is_some());

        p.cancel();
        assert_eq!(p.status, PaymentStatus::Cancelled);
    }

    #[test]
    fn update_accepts_any_known_status() {
        let mut p = payment();
        p.cancel();
        PaymentUpdate { status: Some("pending".into()) }.apply(&mut p).unwrap();
        assert_eq!(p.status, PaymentStatus::Pending);

        let err = PaymentUpdate { status: Some("refunded".into()) }.apply(&mut p).unwrap_err();
        assert_eq!(err.message(), "Status must be one of: pending, completed, failed, cancelled");
    }
}
