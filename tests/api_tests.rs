mod common;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Signup & Signin ─────────────────────────────────────────────

#[tokio::test]
async fn first_signup_is_admin_later_ones_are_users() {
    let app = common::spawn_app().await;

    let (first, status) = app.signup("admin", "admin@site.io", common::PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["roles"], json!(["ROLE_ADMIN"]));
    assert!(first.get("passwordHash").is_none());

    let (second, status) = app.signup("crew", "crew@site.io", common::PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["roles"], json!(["ROLE_USER"]));
}

#[tokio::test]
async fn signup_rejects_duplicates_and_short_passwords() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.signup("admin", "other@site.io", common::PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Username"));

    let (_, status) = app.signup("other", "admin@site.io", common::PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app.signup("other", "other@site.io", "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_returns_bearer_token_with_roles() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.signin("admin", common::PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["email"], "admin@site.io");
    assert_eq!(body["roles"], json!(["ROLE_ADMIN"]));
}

#[tokio::test]
async fn signin_rejects_bad_credentials() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (_, status) = app.signin("admin", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.signin("nobody", common::PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/api/projects")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (body, status) = app.get_auth("/api/projects", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn role_changes_apply_to_tokens_already_issued() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;

    let (_, status) = app
        .post_auth("/api/projects", &pm.token, &json!({ "name": "Tower A" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, status) = app
        .put_auth(
            &format!("/api/users/{}/roles", pm.id),
            &admin.token,
            &json!({ "roles": ["user"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app
        .post_auth("/api/projects", &pm.token, &json!({ "name": "Tower B" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app
        .delete_auth(&format!("/api/users/{}", pm.id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, status) = app.get_auth("/api/projects", &pm.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (all, _) = app.get_auth("/api/projects", &admin.token).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    let description = "x".repeat(common::MAX_BODY_SIZE + 1024);
    let (body, status) = app
        .post_auth(
            "/api/projects",
            &admin.token,
            &json!({ "name": "Tower A", "description": description }),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{body}");

    let (all, _) = app.get_auth("/api/projects", &admin.token).await;
    assert_eq!(all, json!([]));
}

// ── Projects ────────────────────────────────────────────────────

#[tokio::test]
async fn project_create_update_and_duplicate_number() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;

    let (created, status) = app
        .post_auth(
            "/api/projects",
            &pm.token,
            &json!({ "name": "Tower A", "projectNumber": "P-100" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["status"], "PLANNING");
    let today = Utc::now().date_naive().to_string();
    assert!(created["createdAt"].as_str().unwrap().starts_with(&today));

    let (updated, status) = app
        .put_auth(
            "/api/projects/1",
            &pm.token,
            &json!({
                "name": "Tower A",
                "projectNumber": "P-100",
                "status": "IN_PROGRESS",
                "completionPercentage": 15
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["status"], "IN_PROGRESS");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, status) = app
        .post_auth(
            "/api/projects",
            &pm.token,
            &json!({ "name": "Tower B", "projectNumber": "P-100" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (all, _) = app.get_auth("/api/projects", &pm.token).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn project_path_id_overrides_body_id() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    app.create_project(&admin.token, &json!({ "name": "Depot" })).await;
    app.create_project(&admin.token, &json!({ "name": "Bridge" })).await;

    let (updated, status) = app
        .put_auth(
            "/api/projects/2",
            &admin.token,
            &json!({ "id": 1, "name": "Bridge North" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 2);

    let (first, _) = app.get_auth("/api/projects/1", &admin.token).await;
    assert_eq!(first["name"], "Depot");
}

#[tokio::test]
async fn project_validation_failures_are_bad_requests() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    let cases = [
        json!({ "name": "" }),
        json!({ "name": "Yard", "completionPercentage": 140 }),
        json!({ "name": "Yard", "budgetAmount": -5 }),
        json!({ "name": "Yard", "status": "DEMOLISHED" }),
        json!({ "name": "Yard", "projectManagerId": 99 }),
        json!({ "name": "Yard", "startDate": "2025-06-01", "endDate": "2025-01-01" }),
    ];
    for body in cases {
        let (resp, status) = app.post_auth("/api/projects", &admin.token, &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {body}: {resp}");
    }

    let (all, _) = app.get_auth("/api/projects", &admin.token).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn project_lookups_by_status_manager_member_and_number() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;
    let crew = app.account_with_role(&admin, "crew", "USER").await;

    app.create_project(
        &pm.token,
        &json!({
            "name": "Tower A",
            "projectNumber": "P-100",
            "status": "IN_PROGRESS",
            "projectManagerId": pm.id,
            "teamMemberIds": [crew.id, crew.id]
        }),
    )
    .await;
    app.create_project(&pm.token, &json!({ "name": "Depot" })).await;

    let (found, _) = app.get_auth("/api/projects/status/IN_PROGRESS", &crew.token).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (found, _) = app
        .get_auth(&format!("/api/projects/manager/{}", pm.id), &crew.token)
        .await;
    assert_eq!(found[0]["name"], "Tower A");

    let (found, _) = app
        .get_auth(&format!("/api/projects/member/{}", crew.id), &crew.token)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["teamMemberIds"], json!([crew.id]));

    let (found, _) = app.get_auth("/api/projects/manager/999", &crew.token).await;
    assert_eq!(found, json!([]));

    let (found, status) = app.get_auth("/api/projects/number/P-100", &crew.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Tower A");

    let (_, status) = app.get_auth("/api/projects/number/P-404", &crew.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_project_removes_its_tasks_and_issues() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let project = app.create_project(&admin.token, &json!({ "name": "Annex" })).await;
    let pid = project["id"].as_i64().unwrap();
    let task = app
        .create_task(&admin.token, &json!({ "title": "Pour slab", "projectId": pid }))
        .await;
    let (issue, status) = app
        .post_auth(
            "/api/issues",
            &admin.token,
            &json!({ "title": "Crack", "projectId": pid }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, status) = app
        .delete_auth(&format!("/api/projects/{pid}"), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, status) = app
        .get_auth(&format!("/api/projects/{pid}"), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, status) = app
        .get_auth(&format!("/api/tasks/{}", task["id"]), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, status) = app
        .get_auth(&format!("/api/issues/{}", issue["id"]), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    for path in ["/api/projects/42", "/api/tasks/42", "/api/issues/42", "/api/resources/42", "/api/users/42"] {
        let (_, status) = app.get_auth(path, &admin.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {path}");
        let (_, status) = app.delete_auth(path, &admin.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {path}");
    }

    let (_, status) = app
        .put_auth("/api/projects/42", &admin.token, &json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app.get_auth("/api/projects/abc", &admin.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Authorization matrix ────────────────────────────────────────

#[tokio::test]
async fn user_role_cannot_create_and_nothing_is_persisted() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let crew = app.account_with_role(&admin, "crew", "USER").await;

    let (body, status) = app
        .post_auth("/api/projects", &crew.token, &json!({ "name": "Shed" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (_, status) = app
        .post_auth(
            "/api/resources",
            &crew.token,
            &json!({ "name": "Rebar", "type": "MATERIAL", "quantityAvailable": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (all, status) = app.get_auth("/api/projects", &crew.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn project_manager_deletes_tasks_but_not_projects() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;

    let project = app.create_project(&pm.token, &json!({ "name": "Tower A" })).await;
    let pid = project["id"].as_i64().unwrap();
    let task = app
        .create_task(&pm.token, &json!({ "title": "Survey", "projectId": pid }))
        .await;

    let (_, status) = app
        .delete_auth(&format!("/api/tasks/{}", task["id"]), &pm.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, status) = app
        .delete_auth(&format!("/api/projects/{pid}"), &pm.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app
        .get_auth(&format!("/api/projects/{pid}"), &pm.token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn project_manager_cannot_delete_issues_or_resources() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;
    let project = app.create_project(&pm.token, &json!({ "name": "Tower A" })).await;

    let (issue, _) = app
        .post_auth(
            "/api/issues",
            &pm.token,
            &json!({ "title": "Leak", "projectId": project["id"] }),
        )
        .await;
    let (resource, _) = app
        .post_auth(
            "/api/resources",
            &pm.token,
            &json!({ "name": "Crane", "type": "EQUIPMENT", "quantityAvailable": 1 }),
        )
        .await;

    let (_, status) = app
        .delete_auth(&format!("/api/issues/{}", issue["id"]), &pm.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, status) = app
        .delete_auth(&format!("/api/resources/{}", resource["id"]), &pm.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app
        .delete_auth(&format!("/api/resources/{}", resource["id"]), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ── Tasks ───────────────────────────────────────────────────────

#[tokio::test]
async fn tasks_for_missing_project_are_empty() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    let (body, status) = app.get_auth("/api/tasks/project/999", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (body, status) = app
        .get_auth("/api/tasks/project/999/status/COMPLETED", &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (body, _) = app.get_auth("/api/tasks/assigned/999", &admin.token).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn tasks_by_project_and_status_is_subset_of_by_project() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let tower = app.create_project(&admin.token, &json!({ "name": "Tower" })).await;
    let depot = app.create_project(&admin.token, &json!({ "name": "Depot" })).await;

    for (title, project, status) in [
        ("Excavate", &tower, "COMPLETED"),
        ("Frame", &tower, "IN_PROGRESS"),
        ("Roof", &tower, "COMPLETED"),
        ("Fence", &depot, "COMPLETED"),
    ] {
        app.create_task(
            &admin.token,
            &json!({ "title": title, "projectId": project["id"], "status": status }),
        )
        .await;
    }

    let (all, _) = app
        .get_auth(&format!("/api/tasks/project/{}", tower["id"]), &admin.token)
        .await;
    let (done, _) = app
        .get_auth(
            &format!("/api/tasks/project/{}/status/COMPLETED", tower["id"]),
            &admin.token,
        )
        .await;

    let all = all.as_array().unwrap();
    let done = done.as_array().unwrap();
    assert_eq!(all.len(), 3);
    let expected: Vec<_> = all.iter().filter(|t| t["status"] == "COMPLETED").collect();
    assert_eq!(done.iter().collect::<Vec<_>>(), expected);

    let (by_status, _) = app.get_auth("/api/tasks/status/COMPLETED", &admin.token).await;
    assert_eq!(by_status.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn task_defaults_and_invalid_references() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let project = app.create_project(&admin.token, &json!({ "name": "Tower" })).await;

    let task = app
        .create_task(&admin.token, &json!({ "title": "Survey", "projectId": project["id"] }))
        .await;
    assert_eq!(task["status"], "NOT_STARTED");
    assert_eq!(task["priority"], "MEDIUM");
    assert_eq!(task["assignedToId"], json!(null));

    let (_, status) = app
        .post_auth("/api/tasks", &admin.token, &json!({ "title": "Orphan", "projectId": 77 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .post_auth(
            "/api/tasks",
            &admin.token,
            &json!({ "title": "Ghost work", "projectId": project["id"], "assignedToId": 77 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app.get_auth("/api/tasks/status/SIDEWAYS", &admin.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tasks_due_before_date_and_by_assignee() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let crew = app.account_with_role(&admin, "crew", "USER").await;
    let project = app.create_project(&admin.token, &json!({ "name": "Tower" })).await;

    app.create_task(
        &admin.token,
        &json!({
            "title": "Footings",
            "projectId": project["id"],
            "dueDate": "2025-01-10",
            "assignedToId": crew.id,
            "status": "IN_PROGRESS"
        }),
    )
    .await;
    app.create_task(
        &admin.token,
        &json!({ "title": "Walls", "projectId": project["id"], "dueDate": "2025-03-01" }),
    )
    .await;
    app.create_task(&admin.token, &json!({ "title": "Punch list", "projectId": project["id"] }))
        .await;

    let (due, status) = app.get_auth("/api/tasks/due-before/2025-02-01", &crew.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(due.as_array().unwrap().len(), 1);
    assert_eq!(due[0]["title"], "Footings");

    let (_, status) = app.get_auth("/api/tasks/due-before/soon", &crew.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (mine, _) = app
        .get_auth(&format!("/api/tasks/assigned/{}", crew.id), &crew.token)
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (mine, _) = app
        .get_auth(
            &format!("/api/tasks/assigned/{}/status/COMPLETED", crew.id),
            &crew.token,
        )
        .await;
    assert_eq!(mine, json!([]));
}

#[tokio::test]
async fn deleting_user_clears_task_assignment() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let crew = app.account_with_role(&admin, "crew", "USER").await;
    let project = app.create_project(&admin.token, &json!({ "name": "Tower" })).await;
    let task = app
        .create_task(
            &admin.token,
            &json!({ "title": "Wiring", "projectId": project["id"], "assignedToId": crew.id }),
        )
        .await;

    let (_, status) = app
        .delete_auth(&format!("/api/users/{}", crew.id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (task, status) = app
        .get_auth(&format!("/api/tasks/{}", task["id"]), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["assignedToId"], json!(null));
}

// ── Issues ──────────────────────────────────────────────────────

#[tokio::test]
async fn issue_reporter_and_reported_date_survive_updates() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;
    let project = app.create_project(&pm.token, &json!({ "name": "Tower" })).await;

    let (issue, status) = app
        .post_auth(
            "/api/issues",
            &pm.token,
            &json!({
                "title": "Scaffold loose",
                "projectId": project["id"],
                "type": "SAFETY",
                "priority": "CRITICAL"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(issue["reportedById"], pm.id);
    assert_eq!(issue["status"], "OPEN");
    assert_eq!(issue["type"], "SAFETY");
    let today = Utc::now().date_naive().to_string();
    assert_eq!(issue["reportedDate"], today);

    let (updated, status) = app
        .put_auth(
            &format!("/api/issues/{}", issue["id"]),
            &pm.token,
            &json!({
                "title": "Scaffold loose",
                "projectId": project["id"],
                "reportedById": pm.id,
                "type": "SAFETY",
                "status": "RESOLVED",
                "resolutionDate": today
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "RESOLVED");
    assert_eq!(updated["reportedDate"], issue["reportedDate"]);
    assert_eq!(updated["createdAt"], issue["createdAt"]);
}

#[tokio::test]
async fn issue_lookups() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let crew = app.account_with_role(&admin, "crew", "USER").await;
    let project = app.create_project(&admin.token, &json!({ "name": "Tower" })).await;
    let pid = project["id"].as_i64().unwrap();

    for (title, status) in [("Leak", "OPEN"), ("Crack", "CLOSED")] {
        let (_, code) = app
            .post_auth(
                "/api/issues",
                &admin.token,
                &json!({
                    "title": title,
                    "projectId": pid,
                    "status": status,
                    "assignedToId": crew.id
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (found, _) = app
        .get_auth(&format!("/api/issues/project/{pid}"), &crew.token)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (found, _) = app
        .get_auth(&format!("/api/issues/project/{pid}/status/OPEN"), &crew.token)
        .await;
    assert_eq!(found[0]["title"], "Leak");

    let (found, _) = app
        .get_auth(&format!("/api/issues/reported/{}", admin.id), &crew.token)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (found, _) = app
        .get_auth(&format!("/api/issues/assigned/{}/status/CLOSED", crew.id), &crew.token)
        .await;
    assert_eq!(found[0]["title"], "Crack");

    let (found, _) = app.get_auth("/api/issues/status/CLOSED", &crew.token).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (found, _) = app.get_auth("/api/issues/project/555", &crew.token).await;
    assert_eq!(found, json!([]));
}

#[tokio::test]
async fn issue_update_without_reporter_keeps_the_original() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;
    let project = app.create_project(&pm.token, &json!({ "name": "Tower" })).await;

    let (issue, status) = app
        .post_auth(
            "/api/issues",
            &pm.token,
            &json!({ "title": "Drainage", "projectId": project["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(issue["reportedById"], pm.id);

    let (updated, status) = app
        .put_auth(
            &format!("/api/issues/{}", issue["id"]),
            &admin.token,
            &json!({ "title": "Drainage", "projectId": project["id"], "status": "RESOLVED" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "RESOLVED");
    assert_eq!(updated["reportedById"], pm.id);

    let (found, _) = app
        .get_auth(&format!("/api/issues/reported/{}", pm.id), &admin.token)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

// ── Resources ───────────────────────────────────────────────────

#[tokio::test]
async fn resource_queries() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    for (name, kind, status, qty) in [
        ("Cement", "MATERIAL", "AVAILABLE", 200),
        ("Excavator", "EQUIPMENT", "IN_USE", 2),
        ("Rebar", "MATERIAL", "DEPLETED", 0),
    ] {
        let (_, code) = app
            .post_auth(
                "/api/resources",
                &admin.token,
                &json!({
                    "name": name,
                    "type": kind,
                    "status": status,
                    "quantityAvailable": qty,
                    "unitCost": 12.5
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (found, _) = app.get_auth("/api/resources/type/MATERIAL", &admin.token).await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (found, _) = app.get_auth("/api/resources/status/IN_USE", &admin.token).await;
    assert_eq!(found[0]["name"], "Excavator");

    let (found, _) = app
        .get_auth("/api/resources/type/MATERIAL/status/AVAILABLE", &admin.token)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Cement");

    let (found, _) = app.get_auth("/api/resources/available/2", &admin.token).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (found, _) = app.get_auth("/api/resources/available/0", &admin.token).await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, status) = app.get_auth("/api/resources/type/SPACESHIP", &admin.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .post_auth(
            "/api/resources",
            &admin.token,
            &json!({ "name": "Sand", "type": "MATERIAL", "quantityAvailable": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Users & Roles ───────────────────────────────────────────────

#[tokio::test]
async fn admin_manages_users_and_roles() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    let (created, status) = app
        .post_auth(
            "/api/users",
            &admin.token,
            &json!({
                "username": "foreman",
                "email": "foreman@site.io",
                "password": common::PASSWORD,
                "jobTitle": "Site Foreman",
                "roles": ["PROJECT_MANAGER"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["roles"], json!(["ROLE_PROJECT_MANAGER"]));
    assert_eq!(created["jobTitle"], "Site Foreman");
    let id = created["id"].as_i64().unwrap();

    let (managers, _) = app.get_auth("/api/users/role/PROJECT_MANAGER", &admin.token).await;
    assert_eq!(managers.as_array().unwrap().len(), 1);
    let (managers, _) = app.get_auth("/api/users/role/project_manager", &admin.token).await;
    assert_eq!(managers.as_array().unwrap().len(), 1);

    let (_, status) = app
        .put_auth(
            &format!("/api/users/{id}/roles"),
            &admin.token,
            &json!({ "roles": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (updated, status) = app
        .put_auth(
            &format!("/api/users/{id}"),
            &admin.token,
            &json!({ "username": "foreman", "email": "lead@site.io", "phone": "555-0101" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "lead@site.io");
    assert_eq!(updated["roles"], json!(["ROLE_PROJECT_MANAGER"]));

    // password kept when the update omits it
    let (_, status) = app.signin("foreman", common::PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    let (roles, _) = app.get_auth("/api/roles", &admin.token).await;
    assert_eq!(roles.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn non_admins_cannot_manage_users() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let pm = app.account_with_role(&admin, "planner", "PROJECT_MANAGER").await;

    let (_, status) = app
        .put_auth(
            &format!("/api/users/{}/roles", pm.id),
            &pm.token,
            &json!({ "roles": ["ADMIN"] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app
        .delete_auth(&format!("/api/users/{}", admin.id), &pm.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (users, status) = app.get_auth("/api/users", &pm.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("passwordHash").is_none());
}
