//! Shared enumerations used across records and validators

use serde::{Deserialize, Serialize};

/// A closed set of string values accepted from clients
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Comma-separated list of accepted values, used in validation messages
    fn allowed() -> String {
        Self::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Social platform a campaign is published on
    Platform {
        Instagram => "instagram",
        Facebook => "facebook",
        TikTok => "tiktok",
        Twitter => "twitter",
        YouTube => "youtube",
        LinkedIn => "linkedin",
        Pinterest => "pinterest",
    }
);

choice_enum!(
    TransactionType {
        Deposit => "deposit",
        Withdrawal => "withdrawal",
        Dividend => "dividend",
        AffiliatePayout => "affiliate_payout",
        StockPurchase => "stock_purchase",
        StockSale => "stock_sale",
    }
);

choice_enum!(
    PaymentMethod {
        PayPal => "paypal",
        ApplePay => "apple_pay",
        CashApp => "cash_app",
        Chime => "chime",
        BankTransfer => "bank_transfer",
        Crypto => "crypto",
    }
);

choice_enum!(
    TransactionStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
);

choice_enum!(
    PaymentStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
);

choice_enum!(
    SubscriptionFrequency {
        Realtime => "realtime",
        Hourly => "hourly",
        Daily => "daily",
        Weekly => "weekly",
    }
);

choice_enum!(
    Theme {
        Dark => "dark",
        Light => "light",
        System => "system",
    }
);

impl TransactionType {
    /// Income-side types; everything else counts as an expense in summaries
    pub fn is_earning(&self) -> bool {
        matches!(
            self,
            TransactionType::Deposit | TransactionType::Dividend | TransactionType::AffiliatePayout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_wire_names() {
        assert_eq!(Platform::parse("tiktok"), Some(Platform::TikTok));
        assert_eq!(Platform::parse("TikTok"), None);
        assert_eq!(TransactionType::parse("affiliate_payout"), Some(TransactionType::AffiliatePayout));
    }

    #[test]
    fn allowed_lists_every_value_in_order() {
        assert_eq!(
            Platform::allowed(),
            "instagram, facebook, tiktok, twitter, youtube, linkedin, pinterest"
        );
        assert_eq!(TransactionStatus::allowed(), "pending, completed, failed");
    }

    #[test]
    fn serde_uses_wire_names() {
        let v = serde_json::to_value(PaymentMethod::ApplePay).unwrap();
        assert_eq!(v, serde_json::json!("apple_pay"));
        let back: PaymentMethod = serde_json::from_value(v).unwrap();
        assert_eq!(back, PaymentMethod::ApplePay);
    }
}
