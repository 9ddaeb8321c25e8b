#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use edifice::config::Config;
use edifice::db::Store;

pub const PASSWORD: &str = "password123";
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// A running test server backed by a fresh in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

/// A signed-in account: its id and a bearer token carrying its roles.
pub struct Account {
    pub id: i64,
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await
            .expect("signup request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn signin(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/signin"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("signin request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Sign up the first account (granted ROLE_ADMIN) and sign it in.
    pub async fn bootstrap(&self) -> Account {
        let (body, status) = self.signup("admin", "admin@site.io", PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED, "bootstrap signup failed: {body}");
        self.login("admin").await
    }

    pub async fn login(&self, username: &str) -> Account {
        let (body, status) = self.signin(username, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "signin failed: {body}");
        Account {
            id: body["id"].as_i64().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Sign up a new account, have the admin grant `role`, then sign in so
    /// the token carries the new role set.
    pub async fn account_with_role(&self, admin: &Account, username: &str, role: &str) -> Account {
        let email = format!("{username}@site.io");
        let (body, status) = self.signup(username, &email, PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        let id = body["id"].as_i64().unwrap();

        if role != "USER" {
            let (body, status) = self
                .put_auth(
                    &format!("/api/users/{id}/roles"),
                    &admin.token,
                    &json!({ "roles": [role] }),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "role assignment failed: {body}");
        }
        self.login(username).await
    }

    /// Create a project as `token`, asserting success.
    pub async fn create_project(&self, token: &str, body: &Value) -> Value {
        let (project, status) = self.post_auth("/api/projects", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {project}");
        project
    }

    pub async fn create_task(&self, token: &str, body: &Value) -> Value {
        let (task, status) = self.post_auth("/api/tasks", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {task}");
        task
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        db_max_connections: 1,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        jwt_ttl_minutes: 60,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: MAX_BODY_SIZE,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app on a random port with an empty in-memory store.
pub async fn spawn_app() -> TestApp {
    let app = edifice::build_app(Store::in_memory(), test_config());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
