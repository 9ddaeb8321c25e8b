//! Static authorization matrix: which roles may perform which operation on
//! which entity. Services evaluate it before touching the store.

use crate::models::ERole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Project,
    Task,
    Issue,
    Resource,
    User,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Project => "project",
            Subject::Task => "task",
            Subject::Issue => "issue",
            Subject::Resource => "resource",
            Subject::User => "user",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Project => "Project",
            Subject::Task => "Task",
            Subject::Issue => "Issue",
            Subject::Resource => "Resource",
            Subject::User => "User",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

const EVERYONE: &[ERole] = &[ERole::User, ERole::ProjectManager, ERole::Admin];
const MANAGERS: &[ERole] = &[ERole::ProjectManager, ERole::Admin];
const ADMINS: &[ERole] = &[ERole::Admin];

pub fn allowed_roles(subject: Subject, operation: Operation) -> &'static [ERole] {
    match (subject, operation) {
        (_, Operation::Read) => EVERYONE,
        (Subject::User, _) => ADMINS,
        (_, Operation::Create | Operation::Update) => MANAGERS,
        // Project managers may remove tasks but not the other entities.
        (Subject::Task, Operation::Delete) => MANAGERS,
        (_, Operation::Delete) => ADMINS,
    }
}

pub fn evaluate(roles: &[ERole], subject: Subject, operation: Operation) -> Access {
    let allowed = allowed_roles(subject, operation);
    if roles.iter().any(|role| allowed.contains(role)) {
        Access::Allowed
    } else {
        Access::Denied
    }
}
