use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, ResourceStatus, ResourceType, Stamp};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Option<Id>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub quantity_available: i32,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            resource_type,
            status: ResourceStatus::default(),
            quantity_available: 0,
            unit: None,
            unit_cost: None,
            location: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Stamp for Resource {
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.updated_at = Some(now);
    }
}
