use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Record, TableSpec};
use crate::error::ApiError;
use crate::types::Platform;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub platform: Platform,
    pub affiliate_link: Option<String>,
    pub content: Option<String>,
    pub clicks: i64,
    pub conversions: i64,
    pub earnings: f64,
    pub image_url: Option<String>,
    pub scheduled_date: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Campaign {
    const TABLE: TableSpec = TableSpec {
        name: "campaigns",
        owner_column: "user_id",
        columns: &[
            "user_id",
            "name",
            "platform",
            "affiliate_link",
            "content",
            "clicks",
            "conversions",
            "earnings",
            "image_url",
            "scheduled_date",
            "status",
            "tags",
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

/// POST /api/campaigns body
#[derive(Debug, Default, Deserialize)]
pub struct NewCampaign {
    pub name: Option<String>,
    pub platform: Option<String>,
    pub affiliate_link: Option<String>,
    pub content: Option<String>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub earnings: Option<f64>,
    pub image_url: Option<String>,
    pub scheduled_date: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewCampaign {
    pub fn into_campaign(self, owner: Uuid) -> Result<Campaign, ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.required_text("name", "Name", self.name);
        let platform = match self.platform.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => errors.choice::<Platform>("platform", "Platform", p),
            _ => {
                errors.add("platform", "Platform is required and must be a non-empty string");
                None
            }
        };
        let clicks = self.clicks.and_then(|v| errors.non_negative_int("clicks", "Clicks", v));
        let conversions = self
            .conversions
            .and_then(|v| errors.non_negative_int("conversions", "Conversions", v));
        let status = errors.non_blank("status", "Status", self.status);

        errors.finish()?;

        let (Some(name), Some(platform)) = (name, platform) else {
            return Err(ApiError::bad_request("Name and platform are required"));
        };

        let now = Utc::now();
        Ok(Campaign {
            id: Uuid::new_v4(),
            user_id: owner,
            name,
            platform,
            affiliate_link: self.affiliate_link,
            content: self.content,
            clicks: clicks.unwrap_or(0),
            conversions: conversions.unwrap_or(0),
            earnings: self.earnings.unwrap_or(0.0),
            image_url: self.image_url,
            scheduled_date: self.scheduled_date,
            status: status.unwrap_or_else(|| "draft".to_string()),
            tags: self.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// PUT /api/campaigns/:id body; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub platform: Option<String>,
    pub affiliate_link: Option<String>,
    pub content: Option<String>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub earnings: Option<f64>,
    pub image_url: Option<String>,
    pub scheduled_date: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CampaignUpdate {
    pub fn apply(self, campaign: &mut Campaign) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.non_blank("name", "Name", self.name);
        let platform = self
            .platform
            .as_deref()
            .and_then(|p| errors.choice::<Platform>("platform", "Platform", p));
        let clicks = self.clicks.and_then(|v| errors.non_negative_int("clicks", "Clicks", v));
        let conversions = self
            .conversions
            .and_then(|v| errors.non_negative_int("conversions", "Conversions", v));
        let status = errors.non_blank("status", "Status", self.status);

        errors.finish()?;

        if let Some(v) = name {
            campaign.name = v;
        }
        if let Some(v) = platform {
            campaign.platform = v;
        }
        if let Some(v) = self.affiliate_link {
            campaign.affiliate_link = Some(v);
        }
        if let Some(v) = self.content {
            campaign.content = Some(v);
        }
        if let Some(v) = clicks {
            campaign.clicks = v;
        }
        if let Some(v) = conversions {
            campaign.conversions = v;
        }
        if let Some(v) = self.earnings {
            campaign.earnings = v;
        }
        if let Some(v) = self.image_url {
            campaign.image_url = Some(v);
        }
        if let Some(v) = self.scheduled_date {
            campaign.scheduled_date = Some(v);
        }
        if let Some(v) = status {
            campaign.status = v;
        }
        if let Some(v) = self.tags {
            campaign.tags = v;
        }
        campaign.updated_at = Utc::now();
        Ok(())
    }
}
