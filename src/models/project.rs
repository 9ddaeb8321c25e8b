use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, ProjectStatus, Stamp};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,
    pub name: String,
    pub description: Option<String>,
    pub project_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_amount: Option<Decimal>,
    pub budget_spent: Option<Decimal>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub location_address: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_zip: Option<String>,
    pub location_country: Option<String>,
    pub cover_image_url: Option<String>,
    pub project_manager_id: Option<Id>,
    #[serde(default)]
    pub team_member_ids: Vec<Id>,
    pub completion_percentage: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            project_number: None,
            start_date: None,
            end_date: None,
            budget_amount: None,
            budget_spent: None,
            status: ProjectStatus::default(),
            location_address: None,
            location_city: None,
            location_state: None,
            location_zip: None,
            location_country: None,
            cover_image_url: None,
            project_manager_id: None,
            team_member_ids: Vec::new(),
            completion_percentage: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Stamp for Project {
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.updated_at = Some(now);
    }
}
