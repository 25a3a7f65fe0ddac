use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::types::{PaymentMethod, TransactionStatus, TransactionType};
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub description: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Transaction {
    const TABLE: TableSpec = TableSpec {
        name: "transactions",
        owner_column: "user_id",
        columns: &[
            "user_id",
            "amount",
            "type",
            "description",
            "payment_method",
            "status",
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

/// POST /api/transactions body
#[derive(Debug, Default, Deserialize)]
pub struct NewTransaction {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self, owner: Uuid) -> Result<Transaction, ApiError> {
        let mut errors = FieldErrors::new();

        let amount = match self.amount {
            Some(v) => errors.positive("amount", "Amount", v),
            None => {
                errors.add("amount", "Amount is required and must be a positive number");
                None
            }
        };
        let kind = match self.kind.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => errors.choice::<TransactionType>("type", "Type", t),
            _ => {
                errors.add("type", "Type is required and must be a string");
                None
            }
        };
        let payment_method = self
            .payment_method
            .as_deref()
            .filter(|m| !m.is_empty())
            .and_then(|m| errors.choice::<PaymentMethod>("payment_method", "Payment method", m));
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| errors.choice::<TransactionStatus>("status", "Status", s));

        errors.finish()?;

        let (Some(amount), Some(kind)) = (amount, kind) else {
            return Err(ApiError::bad_request("Amount and type are required"));
        };

        let now = Utc::now();
        Ok(Transaction {
            id: Uuid::new_v4(),
            user_id: owner,
            amount,
            kind,
            description: self.description,
            payment_method,
            status: status.unwrap_or(TransactionStatus::Pending),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Earnings and expenses over a user's transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub total_earnings: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub by_type: BTreeMap<String, f64>,
    pub count: usize,
}

impl TransactionSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut total_earnings = 0.0;
        let mut total_expenses = 0.0;
        let mut by_type: BTreeMap<String, f64> = BTreeMap::new();

        for t in transactions {
            if t.kind.is_earning() {
                total_earnings += t.amount;
            } else {
                total_expenses += t.amount;
            }
            *by_type.entry(t.kind.to_string()).or_insert(0.0) += t.amount;
        }

        Self {
            total_earnings,
            total_expenses,
            net: total_earnings - total_expenses,
            by_type,
            count: transactions.len(),
        }
    }
}
