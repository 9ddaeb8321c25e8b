use crate::auth::extractor::AuthUser;
use crate::auth::matrix::Subject;
use crate::models::Id;

/// Emit an audit event for a completed mutation. Called explicitly by
/// services once the store has accepted the change.
pub fn log_event(actor: &AuthUser, action: &str, subject: Subject, resource_id: Option<Id>) {
    tracing::info!(
        target: "audit",
        actor_id = actor.user_id,
        actor = %actor.username,
        action,
        resource_type = subject.as_str(),
        resource_id,
        "audit event"
    );
}
