//! In-process store used by the test suite and for running without Postgres.
//!
//! Mirrors the constraints the migrations put on the relational schema:
//! unique project numbers, usernames and emails, cascading project deletes,
//! and nulled references when a user is removed.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    IssueRepository, ProjectRepository, ResourceRepository, RoleRepository, StoreError,
    TaskRepository, UserRepository,
};
use crate::models::{
    ERole, Id, Issue, IssueStatus, Project, ProjectStatus, Resource, ResourceStatus, ResourceType,
    Role, Task, TaskStatus, User,
};

#[derive(Default)]
struct Sequences {
    projects: Id,
    tasks: Id,
    issues: Id,
    resources: Id,
    users: Id,
}

#[derive(Default)]
struct Tables {
    projects: BTreeMap<Id, Project>,
    tasks: BTreeMap<Id, Task>,
    issues: BTreeMap<Id, Issue>,
    resources: BTreeMap<Id, Resource>,
    users: BTreeMap<Id, User>,
    seq: Sequences,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    roles: Vec<Role>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let roles = ERole::ALL
            .iter()
            .zip(1..)
            .map(|(name, id)| Role { id, name: *name })
            .collect();
        Self {
            tables: Mutex::new(Tables::default()),
            roles,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn select<T: Clone>(rows: &BTreeMap<Id, T>, predicate: impl Fn(&T) -> bool) -> Vec<T> {
    rows.values().filter(|row| predicate(row)).cloned().collect()
}

/// Draws the next id from `seq` for new rows; rejects updates addressed to
/// a missing row.
fn upsert_id<T>(
    rows: &BTreeMap<Id, T>,
    seq: &mut Id,
    id: Option<Id>,
    table: &'static str,
) -> Result<Id, StoreError> {
    match id {
        Some(id) if rows.contains_key(&id) => Ok(id),
        Some(id) => Err(StoreError::Missing { table, id }),
        None => {
            *seq += 1;
            Ok(*seq)
        }
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Project>, StoreError> {
        Ok(select(&self.tables()?.projects, |_| true))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Project>, StoreError> {
        Ok(self.tables()?.projects.get(&id).cloned())
    }

    async fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        if let Some(number) = &project.project_number {
            let taken = tables
                .projects
                .values()
                .any(|p| p.id != project.id && p.project_number.as_ref() == Some(number));
            if taken {
                return Err(StoreError::Duplicate(format!(
                    "project_number '{number}' already exists"
                )));
            }
        }
        let id = upsert_id(
            &tables.projects,
            &mut tables.seq.projects,
            project.id,
            "projects",
        )?;

        let mut saved = project.clone();
        saved.id = Some(id);
        saved.team_member_ids.sort_unstable();
        saved.team_member_ids.dedup();
        tables.projects.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.projects.remove(&id);
        tables.tasks.retain(|_, task| task.project_id != id);
        tables.issues.retain(|_, issue| issue.project_id != id);
        Ok(())
    }

    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, StoreError> {
        Ok(select(&self.tables()?.projects, |p| p.status == status))
    }

    async fn find_by_project_manager(&self, user_id: Id) -> Result<Vec<Project>, StoreError> {
        Ok(select(&self.tables()?.projects, |p| {
            p.project_manager_id == Some(user_id)
        }))
    }

    async fn find_by_team_member(&self, user_id: Id) -> Result<Vec<Project>, StoreError> {
        Ok(select(&self.tables()?.projects, |p| {
            p.team_member_ids.contains(&user_id)
        }))
    }

    async fn find_by_project_number(&self, number: &str) -> Result<Option<Project>, StoreError> {
        Ok(self
            .tables()?
            .projects
            .values()
            .find(|p| p.project_number.as_deref() == Some(number))
            .cloned())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |_| true))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Task>, StoreError> {
        Ok(self.tables()?.tasks.get(&id).cloned())
    }

    async fn save(&self, task: &Task) -> Result<Task, StoreError> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        let id = upsert_id(&tables.tasks, &mut tables.seq.tasks, task.id, "tasks")?;
        let mut saved = task.clone();
        saved.id = Some(id);
        tables.tasks.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        self.tables()?.tasks.remove(&id);
        Ok(())
    }

    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| t.project_id == project_id))
    }

    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| {
            t.assigned_to_id == Some(user_id)
        }))
    }

    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| t.status == status))
    }

    async fn find_by_due_date_before(&self, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| {
            t.due_date.is_some_and(|due| due < date)
        }))
    }

    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| {
            t.project_id == project_id && t.status == status
        }))
    }

    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(select(&self.tables()?.tasks, |t| {
            t.assigned_to_id == Some(user_id) && t.status == status
        }))
    }
}

#[async_trait]
impl IssueRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |_| true))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Issue>, StoreError> {
        Ok(self.tables()?.issues.get(&id).cloned())
    }

    async fn save(&self, issue: &Issue) -> Result<Issue, StoreError> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        let id = upsert_id(&tables.issues, &mut tables.seq.issues, issue.id, "issues")?;
        let mut saved = issue.clone();
        saved.id = Some(id);
        tables.issues.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        self.tables()?.issues.remove(&id);
        Ok(())
    }

    async fn find_by_project(&self, project_id: Id) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| i.project_id == project_id))
    }

    async fn find_by_reported_by(&self, user_id: Id) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| {
            i.reported_by_id == Some(user_id)
        }))
    }

    async fn find_by_assigned_to(&self, user_id: Id) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| {
            i.assigned_to_id == Some(user_id)
        }))
    }

    async fn find_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| i.status == status))
    }

    async fn find_by_project_and_status(
        &self,
        project_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| {
            i.project_id == project_id && i.status == status
        }))
    }

    async fn find_by_assigned_to_and_status(
        &self,
        user_id: Id,
        status: IssueStatus,
    ) -> Result<Vec<Issue>, StoreError> {
        Ok(select(&self.tables()?.issues, |i| {
            i.assigned_to_id == Some(user_id) && i.status == status
        }))
    }
}

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(select(&self.tables()?.resources, |_| true))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Resource>, StoreError> {
        Ok(self.tables()?.resources.get(&id).cloned())
    }

    async fn save(&self, resource: &Resource) -> Result<Resource, StoreError> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        let id = upsert_id(&tables.resources, &mut tables.seq.resources, resource.id, "resources")?;
        let mut saved = resource.clone();
        saved.id = Some(id);
        tables.resources.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        self.tables()?.resources.remove(&id);
        Ok(())
    }

    async fn find_by_type(&self, resource_type: ResourceType) -> Result<Vec<Resource>, StoreError> {
        Ok(select(&self.tables()?.resources, |r| {
            r.resource_type == resource_type
        }))
    }

    async fn find_by_status(&self, status: ResourceStatus) -> Result<Vec<Resource>, StoreError> {
        Ok(select(&self.tables()?.resources, |r| r.status == status))
    }

    async fn find_by_type_and_status(
        &self,
        resource_type: ResourceType,
        status: ResourceStatus,
    ) -> Result<Vec<Resource>, StoreError> {
        Ok(select(&self.tables()?.resources, |r| {
            r.resource_type == resource_type && r.status == status
        }))
    }

    async fn find_by_quantity_available_greater_than(
        &self,
        quantity: i32,
    ) -> Result<Vec<Resource>, StoreError> {
        Ok(select(&self.tables()?.resources, |r| {
            r.quantity_available > quantity
        }))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(select(&self.tables()?.users, |_| true))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        for other in tables.users.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(StoreError::Duplicate(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            if other.email == user.email {
                return Err(StoreError::Duplicate(format!(
                    "email '{}' already exists",
                    user.email
                )));
            }
        }
        let id = upsert_id(&tables.users, &mut tables.seq.users, user.id, "users")?;

        let mut saved = user.clone();
        saved.id = Some(id);
        saved.roles.sort_by_key(|role| ERole::ALL.iter().position(|r| r == role));
        saved.roles.dedup();
        tables.users.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Id) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.users.remove(&id).is_none() {
            return Ok(());
        }
        for project in tables.projects.values_mut() {
            if project.project_manager_id == Some(id) {
                project.project_manager_id = None;
            }
            project.team_member_ids.retain(|member| *member != id);
        }
        for task in tables.tasks.values_mut() {
            if task.assigned_to_id == Some(id) {
                task.assigned_to_id = None;
            }
        }
        for issue in tables.issues.values_mut() {
            if issue.assigned_to_id == Some(id) {
                issue.assigned_to_id = None;
            }
            if issue.reported_by_id == Some(id) {
                issue.reported_by_id = None;
            }
        }
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_role(&self, role: ERole) -> Result<Vec<User>, StoreError> {
        Ok(select(&self.tables()?.users, |u| u.has_role(role)))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .users
            .values()
            .any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.tables()?.users.values().any(|u| u.email == email))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables()?.users.len() as i64)
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.roles.clone())
    }

    async fn find_by_name(&self, name: ERole) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.iter().find(|role| role.name == name).cloned())
    }
}
