#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::auth::AuthService;
use chirpy::configuration::AuthSettings;
use chirpy::startup::run;
use chirpy::store::InMemoryAuthStore;
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryAuthStore>,
    pub client: reqwest::Client,
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        secret: TEST_SECRET.to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryAuthStore::new());
    let auth = AuthService::new(store.clone(), &auth_settings()).expect("Failed to build service");

    let server = run(listener, auth).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_authorization(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self.client.post(&format!("{}{}", &self.address, path));
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let response = self
            .post_json("/api/users", &json!({ "email": email, "password": password }))
            .await;
        assert_eq!(201, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json("/api/login", &json!({ "email": email, "password": password }))
            .await
    }
}
