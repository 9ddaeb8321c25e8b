pub mod auth;
pub mod issues;
pub mod projects;
pub mod resources;
pub mod tasks;
pub mod users;

use axum::extract::Path;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::error::AppError;
use crate::state::SharedState;

/// JSON body whose rejection renders as a 400 `{"error": ...}`.
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;
/// Path parameters whose rejection (bad id, unknown enum value) renders as 400.
pub type PathParams<T> = WithRejection<Path<T>, AppError>;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        // Projects
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/projects/status/{status}", get(projects::by_status))
        .route("/api/projects/manager/{user_id}", get(projects::by_manager))
        .route("/api/projects/member/{user_id}", get(projects::by_member))
        .route("/api/projects/number/{number}", get(projects::by_number))
        // Tasks
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/project/{project_id}", get(tasks::by_project))
        .route(
            "/api/tasks/project/{project_id}/status/{status}",
            get(tasks::by_project_and_status),
        )
        .route("/api/tasks/assigned/{user_id}", get(tasks::by_assignee))
        .route(
            "/api/tasks/assigned/{user_id}/status/{status}",
            get(tasks::by_assignee_and_status),
        )
        .route("/api/tasks/status/{status}", get(tasks::by_status))
        .route("/api/tasks/due-before/{date}", get(tasks::due_before))
        // Issues
        .route("/api/issues", get(issues::list).post(issues::create))
        .route(
            "/api/issues/{id}",
            get(issues::get).put(issues::update).delete(issues::delete),
        )
        .route("/api/issues/project/{project_id}", get(issues::by_project))
        .route(
            "/api/issues/project/{project_id}/status/{status}",
            get(issues::by_project_and_status),
        )
        .route("/api/issues/reported/{user_id}", get(issues::by_reporter))
        .route("/api/issues/assigned/{user_id}", get(issues::by_assignee))
        .route(
            "/api/issues/assigned/{user_id}/status/{status}",
            get(issues::by_assignee_and_status),
        )
        .route("/api/issues/status/{status}", get(issues::by_status))
        // Resources
        .route(
            "/api/resources",
            get(resources::list).post(resources::create),
        )
        .route(
            "/api/resources/{id}",
            get(resources::get)
                .put(resources::update)
                .delete(resources::delete),
        )
        .route("/api/resources/type/{resource_type}", get(resources::by_type))
        .route("/api/resources/status/{status}", get(resources::by_status))
        .route(
            "/api/resources/type/{resource_type}/status/{status}",
            get(resources::by_type_and_status),
        )
        .route(
            "/api/resources/available/{min_quantity}",
            get(resources::available),
        )
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/users/{id}/roles", put(users::assign_roles))
        .route("/api/users/role/{role}", get(users::by_role))
        .route("/api/roles", get(users::roles))
}
