#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use dish_api::{app, AppConfig, AppState, DishStore, JwtService, MemoryDishStore, User};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDishStore>,
    pub jwt: Arc<JwtService>,
    pub admin: User,
    pub alice: User,
    pub bob: User,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

fn user(username: &str, admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.into(),
        firstname: username.to_uppercase(),
        lastname: "Tester".into(),
        admin,
    }
}

pub fn dish_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A unique combination of Indian Uthappam and Italian pizza",
        "image": "images/uthappizza.png",
        "category": "mains",
        "label": "Hot",
        "price": 4.99
    })
}

impl TestApp {
    pub fn new() -> Self {
        let admin = user("admin", true);
        let alice = user("alice", false);
        let bob = user("bob", false);
        let store = Arc::new(MemoryDishStore::with_users([admin.clone(), alice.clone(), bob.clone()]));
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("test config");
        let dyn_store: Arc<dyn DishStore> = store.clone();
        let state = AppState::new(dyn_store, JwtService::new(SECRET, 5));
        let jwt = state.jwt.clone();
        TestApp {
            router: app(state, &config),
            store,
            jwt,
            admin,
            alice,
            bob,
        }
    }

    pub fn token(&self, user: &User) -> String {
        self.jwt.generate_token(user.id).expect("token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
        extra_headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.finish(request).await
    }

    /// Send `body` verbatim, with `content_type` when given.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        user: Option<&User>,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let request = builder.body(Body::from(body.to_string())).expect("request");
        self.finish(request).await
    }

    async fn finish(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body").to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None, &[]).await
    }

    pub async fn post(&self, uri: &str, user: Option<&User>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, user, Some(body), &[]).await
    }

    pub async fn put(&self, uri: &str, user: Option<&User>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, user, Some(body), &[]).await
    }

    pub async fn delete(&self, uri: &str, user: Option<&User>) -> TestResponse {
        self.request(Method::DELETE, uri, user, None, &[]).await
    }

    /// Create a dish as admin and return its id.
    pub async fn create_dish(&self, name: &str) -> String {
        let res = self.post("/dishes", Some(&self.admin), dish_body(name)).await;
        assert_eq!(res.status, StatusCode::OK, "create dish: {}", res.text());
        res.json()["_id"].as_str().expect("dish id").to_string()
    }

    /// Add a comment as `user` and return the new comment's id.
    pub async fn add_comment(&self, dish_id: &str, user: &User, rating: u8, text: &str) -> String {
        let res = self
            .post(
                &format!("/dishes/{}/comments", dish_id),
                Some(user),
                json!({ "rating": rating, "comment": text }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "add comment: {}", res.text());
        let comments = res.json()["comments"].as_array().expect("comments").clone();
        comments.last().expect("new comment")["_id"].as_str().expect("comment id").to_string()
    }
}
