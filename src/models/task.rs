use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, Stamp, TaskPriority, TaskStatus};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<Id>,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Id,
    pub assigned_to_id: Option<Id>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>, project_id: Id) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            project_id,
            assigned_to_id: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            start_date: None,
            due_date: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Stamp for Task {
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.updated_at = Some(now);
    }
}
