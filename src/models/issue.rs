use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, IssuePriority, IssueStatus, IssueType, Stamp};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Option<Id>,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Id,
    pub reported_by_id: Option<Id>,
    pub assigned_to_id: Option<Id>,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default, rename = "type")]
    pub issue_type: IssueType,
    pub location_details: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub reported_date: Option<NaiveDate>,
    pub resolution_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn new(title: impl Into<String>, project_id: Id) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            project_id,
            reported_by_id: None,
            assigned_to_id: None,
            priority: IssuePriority::default(),
            status: IssueStatus::default(),
            issue_type: IssueType::default(),
            location_details: None,
            due_date: None,
            reported_date: None,
            resolution_date: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Stamp for Issue {
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
        self.reported_date = Some(now.date_naive());
    }

    // reported_date is fixed at creation like created_at. An update that
    // names no reporter keeps the stored one.
    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.reported_date = stored.reported_date;
        if self.reported_by_id.is_none() {
            self.reported_by_id = stored.reported_by_id;
        }
        self.updated_at = Some(now);
    }
}
