use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub database: DatabaseConfig,
    pub market: MarketConfig,
    pub payments: PaymentConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Hosted identity service (GoTrue). When unset the in-process provider is used.
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    /// Signing secret for the in-process provider
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub min_password_length: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When unset rows live in process memory.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketProvider {
    AlphaVantage,
    Finnhub,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Raw provider name from the environment; resolved per request so an
    /// unknown name surfaces as a client error rather than a startup failure.
    pub provider: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub paypal_email: Option<String>,
    pub paypal_client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl MarketConfig {
    pub fn provider(&self) -> Option<MarketProvider> {
        match self.provider.to_ascii_lowercase().as_str() {
            "alphavantage" | "alpha_vantage" => Some(MarketProvider::AlphaVantage),
            "finnhub" => Some(MarketProvider::Finnhub),
            _ => None,
        }
    }

    /// Both the key and the base URL are required before any upstream call
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.base_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

impl IdentityConfig {
    pub fn uses_supabase(&self) -> bool {
        self.supabase_url.as_deref().is_some_and(|u| !u.is_empty())
            && self.supabase_anon_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Identity overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.identity.supabase_url = non_empty(v);
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.identity.supabase_anon_key = non_empty(v);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.identity.jwt_secret = v;
        }
        if let Ok(v) = env::var("AUTH_ACCESS_TOKEN_TTL_SECS") {
            self.identity.access_token_ttl_secs = v.parse().unwrap_or(self.identity.access_token_ttl_secs);
        }
        if let Ok(v) = env::var("AUTH_REFRESH_TOKEN_TTL_SECS") {
            self.identity.refresh_token_ttl_secs = v.parse().unwrap_or(self.identity.refresh_token_ttl_secs);
        }
        if let Ok(v) = env::var("AUTH_MIN_PASSWORD_LENGTH") {
            self.identity.min_password_length = v.parse().unwrap_or(self.identity.min_password_length);
        }
        if let Ok(v) = env::var("AUTH_REQUEST_TIMEOUT_SECS") {
            self.identity.request_timeout_secs = v.parse().unwrap_or(self.identity.request_timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = non_empty(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Market data overrides
        if let Ok(v) = env::var("STOCK_API_PROVIDER") {
            self.market.provider = v;
        }
        if let Ok(v) = env::var("STOCK_API_BASE_URL") {
            self.market.base_url = non_empty(v);
        }
        if let Ok(v) = env::var("STOCK_API_KEY") {
            self.market.api_key = non_empty(v);
        }
        if let Ok(v) = env::var("STOCK_API_TIMEOUT_SECS") {
            self.market.request_timeout_secs = v.parse().unwrap_or(self.market.request_timeout_secs);
        }

        // Payment overrides
        if let Ok(v) = env::var("PAYPAL_EMAIL") {
            self.payments.paypal_email = non_empty(v);
        }
        if let Ok(v) = env::var("PAYPAL_CLIENT_ID") {
            self.payments.paypal_client_id = non_empty(v);
        }

        // API overrides
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            identity: IdentityConfig {
                supabase_url: None,
                supabase_anon_key: None,
                jwt_secret: "affiliate-dev-secret".to_string(),
                access_token_ttl_secs: 60 * 60,
                refresh_token_ttl_secs: 60 * 60 * 24 * 30,
                min_password_length: 8,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            market: MarketConfig {
                provider: "alphavantage".to_string(),
                base_url: None,
                api_key: None,
                request_timeout_secs: 15,
            },
            payments: PaymentConfig {
                paypal_email: None,
                paypal_client_id: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            identity: IdentityConfig {
                supabase_url: None,
                supabase_anon_key: None,
                jwt_secret: String::new(),
                access_token_ttl_secs: 60 * 60,
                refresh_token_ttl_secs: 60 * 60 * 24 * 7,
                min_password_length: 8,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            market: MarketConfig {
                provider: "alphavantage".to_string(),
                base_url: None,
                api_key: None,
                request_timeout_secs: 10,
            },
            payments: PaymentConfig {
                paypal_email: None,
                paypal_client_id: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            identity: IdentityConfig {
                supabase_url: None,
                supabase_anon_key: None,
                jwt_secret: String::new(),
                access_token_ttl_secs: 60 * 60,
                refresh_token_ttl_secs: 60 * 60 * 24 * 7,
                min_password_length: 8,
                request_timeout_secs: 5,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            market: MarketConfig {
                provider: "alphavantage".to_string(),
                base_url: None,
                api_key: None,
                request_timeout_secs: 10,
            },
            payments: PaymentConfig {
                paypal_email: None,
                paypal_client_id: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://affiliate-ai-backend.onrender.com".to_string()],
            },
        }
    }
}

fn non_empty(v: String) -> Option<String> {
    let trimmed = v.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.identity.jwt_secret.is_empty());
        assert!(config.database.url.is_none());
        assert!(!config.identity.uses_supabase());
        assert_eq!(config.security.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.identity.jwt_secret.is_empty());
        assert!(!config.database.run_migrations);
        assert_eq!(config.api.max_request_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn market_requires_key_and_base_url() {
        let mut market = AppConfig::development().market;
        assert!(!market.is_configured());
        market.api_key = Some("demo".into());
        assert!(!market.is_configured());
        market.base_url = Some("https://www.alphavantage.co/query".into());
        assert!(market.is_configured());
    }

    #[test]
    fn market_provider_names_resolve() {
        let mut market = AppConfig::development().market;
        assert_eq!(market.provider(), Some(MarketProvider::AlphaVantage));
        market.provider = "Finnhub".into();
        assert_eq!(market.provider(), Some(MarketProvider::Finnhub));
        market.provider = "polygon".into();
        assert_eq!(market.provider(), None);
    }
}
