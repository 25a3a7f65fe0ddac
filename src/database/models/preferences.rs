use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::types::Theme;
use crate::validation::FieldErrors;

/// One row per user; the row id is the user id so upserts key on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: Theme,
    pub default_view: String,
    pub notifications_enabled: bool,
    pub currency: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for UserPreferences {
    const TABLE: TableSpec = TableSpec {
        name: "user_preferences",
        owner_column: "user_id",
        columns: &[
            "user_id",
            "theme",
            "default_view",
            "notifications_enabled",
            "currency",
            "language",
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

impl UserPreferences {
    pub fn defaults(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: user_id,
            user_id,
            theme: Theme::Dark,
            default_view: "dashboard".to_string(),
            notifications_enabled: true,
            currency: "USD".to_string(),
            language: "en".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// PUT /api/preferences body
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub default_view: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub currency: Option<String>,
    pub language: Option<String>,
}

impl PreferencesUpdate {
    pub fn apply(self, prefs: &mut UserPreferences) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        let theme = self
            .theme
            .as_deref()
            .and_then(|t| errors.choice::<Theme>("theme", "Theme", t));
        let default_view = errors.non_blank("default_view", "Default view", self.default_view);
        let currency = self.currency.and_then(|c| {
            let c = c.trim().to_ascii_uppercase();
            if c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()) {
                Some(c)
            } else {
                errors.add("currency", "Currency must be a three-letter code");
                None
            }
        });
        let language = errors.non_blank("language", "Language", self.language);

        errors.finish()?;

        if let Some(v) = theme {
            prefs.theme = v;
        }
        if let Some(v) = default_view {
            prefs.default_view = v;
        }
        if let Some(v) = self.notifications_enabled {
            prefs.notifications_enabled = v;
        }
        if let Some(v) = currency {
            prefs.currency = v;
        }
        if let Some(v) = language {
            prefs.language = v;
        }
        prefs.updated_at = Utc::now();
        Ok(())
    }
}
