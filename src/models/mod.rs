pub mod enums;
pub mod issue;
pub mod project;
pub mod resource;
pub mod role;
pub mod task;
pub mod user;

use chrono::{DateTime, Utc};

pub use enums::{
    ERole, InvalidEnumValue, IssuePriority, IssueStatus, IssueType, ProjectStatus,
    ResourceStatus, ResourceType, TaskPriority, TaskStatus,
};
pub use issue::Issue;
pub use project::Project;
pub use resource::Resource;
pub use role::Role;
pub use task::Task;
pub use user::User;

/// Store-assigned identifier shared by every entity.
pub type Id = i64;

/// Creation and update bookkeeping applied by the service layer before a save.
pub trait Stamp {
    /// First save: every creation-time field is set to `now`.
    fn stamp_created(&mut self, now: DateTime<Utc>);

    /// Later saves: creation-time fields are copied from the stored row and
    /// only `updated_at` moves.
    fn stamp_updated(&mut self, stored: &Self, now: DateTime<Utc>);
}
