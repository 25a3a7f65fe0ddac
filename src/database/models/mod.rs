pub mod campaign;
pub mod learning;
pub mod payment;
pub mod preferences;
pub mod stock;
pub mod subscription;
pub mod transaction;

pub use campaign::{Campaign, CampaignUpdate, NewCampaign};
pub use learning::{LearningModule, LearningUpdate, NewLearningModule};
pub use payment::{NewPayment, Payment, PaymentUpdate, VerifyPayment};
pub use preferences::{PreferencesUpdate, UserPreferences};
pub use stock::{NewStock, Stock, StockUpdate};
pub use subscription::{NewSubscription, StockSubscription};
pub use transaction::{NewTransaction, Transaction, TransactionSummary};
