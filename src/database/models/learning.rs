use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::validation::FieldErrors;

/// A course or skill the user is working through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningModule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub platform: String,
    pub description: String,
    pub progress: i32,
    pub target_completion: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for LearningModule {
    const TABLE: TableSpec = TableSpec {
        name: "learning_modules",
        owner_column: "user_id",
        columns: &[
            "user_id",
            "title",
            "platform",
            "description",
            "progress",
            "target_completion",
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

fn check_progress(errors: &mut FieldErrors, value: i32) -> Option<i32> {
    if (0..=100).contains(&value) {
        Some(value)
    } else {
        errors.add("progress", "Progress must be between 0 and 100");
        None
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewLearningModule {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub description: Option<String>,
    pub progress: Option<i32>,
    pub target_completion: Option<NaiveDate>,
    pub status: Option<String>,
}

impl NewLearningModule {
    pub fn into_module(self, owner: Uuid) -> Result<LearningModule, ApiError> {
        let mut errors = FieldErrors::new();

        let title = errors.required_text("title", "Title", self.title);
        let platform = errors.non_blank("platform", "Platform", self.platform);
        let progress = self.progress.and_then(|v| check_progress(&mut errors, v));
        let status = errors.non_blank("status", "Status", self.status);

        errors.finish()?;

        let Some(title) = title else {
            return Err(ApiError::bad_request("Title is required"));
        };

        let now = Utc::now();
        Ok(LearningModule {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            platform: platform.unwrap_or_else(|| "custom".to_string()),
            description: self.description.unwrap_or_default(),
            progress: progress.unwrap_or(0),
            target_completion: self.target_completion,
            status: status.unwrap_or_else(|| "in_progress".to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LearningUpdate {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub description: Option<String>,
    pub progress: Option<i32>,
    pub target_completion: Option<NaiveDate>,
    pub status: Option<String>,
}

impl LearningUpdate {
    pub fn apply(self, module: &mut LearningModule) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        let title = errors.non_blank("title", "Title", self.title);
        let platform = errors.non_blank("platform", "Platform", self.platform);
        let progress = self.progress.and_then(|v| check_progress(&mut errors, v));
        let status = errors.non_blank("status", "Status", self.status);

        errors.finish()?;

        if let Some(v) = title {
            module.title = v;
        }
        if let Some(v) = platform {
            module.platform = v;
        }
        if let Some(v) = self.description {
            module.description = v;
        }
        if let Some(v) = progress {
            module.progress = v;
        }
        if let Some(v) = self.target_completion {
            module.target_completion = Some(v);
        }
        if let Some(v) = status {
            module.status = v;
        }
        module.updated_at = Utc::now();
        Ok(())
    }
}
