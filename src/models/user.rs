use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ERole, Id, Stamp};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<Id>,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<ERole>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            job_title: None,
            phone: None,
            roles: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn has_role(&self, role: ERole) -> bool {
        self.roles.contains(&role)
    }
}

impl Stamp for User {
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.updated_at = Some(now);
    }
}
