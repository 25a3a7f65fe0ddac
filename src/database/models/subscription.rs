use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::types::SubscriptionFrequency;
use crate::validation::FieldErrors;

/// Request to be told about price or dividend changes for a symbol.
/// Stored and listed only; nothing dispatches these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSubscription {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub symbol: String,
    pub frequency: SubscriptionFrequency,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
    pub calendar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for StockSubscription {
    const TABLE: TableSpec = TableSpec {
        name: "stock_subscriptions",
        owner_column: "userId",
        columns: &["userId", "symbol", "frequency", "callbackUrl", "calendar", "created_at"],
    };

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewSubscription {
    pub symbol: Option<String>,
    pub frequency: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
    pub calendar: Option<String>,
}

impl NewSubscription {
    pub fn into_subscription(self, owner: Uuid) -> Result<StockSubscription, ApiError> {
        let mut errors = FieldErrors::new();

        let symbol = errors.required_text("symbol", "Symbol", self.symbol);
        let frequency = self
            .frequency
            .as_deref()
            .filter(|f| !f.is_empty())
            .and_then(|f| errors.choice::<SubscriptionFrequency>("frequency", "Frequency", f));
        let callback_url = self.callback_url.filter(|u| !u.trim().is_empty());
        if let Some(url) = callback_url.as_deref() {
            if Url::parse(url).is_err() {
                errors.add("callbackUrl", "Callback URL must be an absolute URL");
            }
        }

        errors.finish()?;

        let Some(symbol) = symbol else {
            return Err(ApiError::bad_request("symbol is required"));
        };

        Ok(StockSubscription {
            id: Uuid::new_v4(),
            user_id: owner,
            symbol: symbol.to_uppercase(),
            frequency: frequency.unwrap_or(SubscriptionFrequency::Daily),
            callback_url,
            calendar: self.calendar.filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        })
    }
}
