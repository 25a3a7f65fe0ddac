use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::validation::FieldErrors;

/// A stock position held by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticker: String,
    pub shares: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub purchase_date: NaiveDate,
    pub broker: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Stock {
    const TABLE: TableSpec = TableSpec {
        name: "stocks",
        owner_column: "user_id",
        columns: &[
            "user_id",
            "ticker",
            "shares",
            "purchase_price",
            "current_price",
            "purchase_date",
            "broker",
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

#[derive(Debug, Default, Deserialize)]
pub struct NewStock {
    pub ticker: Option<String>,
    pub shares: Option<f64>,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub broker: Option<String>,
}

impl NewStock {
    pub fn into_stock(self, owner: Uuid) -> Result<Stock, ApiError> {
        let mut errors = FieldErrors::new();

        let ticker = errors.required_text("ticker", "Ticker", self.ticker);
        let shares = match self.shares {
            Some(v) => errors.positive("shares", "Shares", v),
            None => {
                errors.add("shares", "Shares is required and must be a positive number");
                None
            }
        };
        let purchase_price = match self.purchase_price {
            Some(v) => errors.non_negative("purchase_price", "Purchase price", v),
            None => {
                errors.add("purchase_price", "Purchase price is required and must be a non-negative number");
                None
            }
        };
        let current_price = self
            .current_price
            .and_then(|v| errors.non_negative("current_price", "Current price", v));
        let broker = errors.non_blank("broker", "Broker", self.broker);

        errors.finish()?;

        let (Some(ticker), Some(shares), Some(purchase_price)) = (ticker, shares, purchase_price) else {
            return Err(ApiError::bad_request("Ticker, shares and purchase price are required"));
        };

        let now = Utc::now();
        Ok(Stock {
            id: Uuid::new_v4(),
            user_id: owner,
            ticker: ticker.to_uppercase(),
            shares,
            purchase_price,
            current_price: current_price.unwrap_or(purchase_price),
            purchase_date: self.purchase_date.unwrap_or_else(|| now.date_naive()),
            broker: broker.unwrap_or_else(|| "unknown".to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StockUpdate {
    pub ticker: Option<String>,
    pub shares: Option<f64>,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub broker: Option<String>,
}

impl StockUpdate {
    pub fn apply(self, stock: &mut Stock) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        let ticker = errors.non_blank("ticker", "Ticker", self.ticker);
        let shares = self.shares.and_then(|v| errors.positive("shares", "Shares", v));
        let purchase_price = self
            .purchase_price
            .and_then(|v| errors.non_negative("purchase_price", "Purchase price", v));
        let current_price = self
            .current_price
            .and_then(|v| errors.non_negative("current_price", "Current price", v));
        let broker = errors.non_blank("broker", "Broker", self.broker);

        errors.finish()?;

        if let Some(v) = ticker {
            stock.ticker = v.to_uppercase();
        }
        if let Some(v) = shares {
            stock.shares = v;
        }
        if let Some(v) = purchase_price {
            stock.purchase_price = v;
        }
        if let Some(v) = current_price {
            stock.current_price = v;
        }
        if let Some(v) = self.purchase_date {
            stock.purchase_date = v;
        }
        if let Some(v) = broker {
            stock.broker = v;
        }
        stock.updated_at = Utc::now();
        Ok(())
    }
}
