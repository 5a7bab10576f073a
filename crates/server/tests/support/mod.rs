#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use server::{routes, ServerState};
use service::mock::{MockStore, RecordingMailer};

pub const PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MockStore>,
    pub mailer: Arc<RecordingMailer>,
    pub static_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

pub fn app() -> TestApp {
    let static_dir = std::env::temp_dir().join(format!("bee_static_{}", uuid::Uuid::new_v4()));
    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "router-test-secret".into();
    cfg.server.base_url = "http://bee.test".into();
    cfg.media.static_dir = static_dir.to_string_lossy().into_owned();

    let store = Arc::new(MockStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let state = ServerState::new(store.clone(), mailer.clone(), &cfg);
    let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
    TestApp { router, store, mailer, static_dir }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("router is infallible")
    }

    pub async fn json(&self, req: Request<Body>) -> (u16, Value) {
        let resp = self.send(req).await;
        let status = resp.status().as_u16();
        (status, body_json(resp).await)
    }

    pub async fn register(&self, username: &str) -> (u16, Value) {
        let body = serde_json::json!({ "username": username, "email": format!("{username}@example.com"), "password": PASSWORD });
        self.json(json_request("POST", "/registration", None, body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (u16, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap();
        self.json(req).await
    }

    /// Register and log in; returns the bearer token.
    pub async fn signed_up(&self, username: &str) -> String {
        let (status, _) = self.register(username).await;
        assert_eq!(status, 200, "registration of {username}");
        let (status, body) = self.login(username, PASSWORD).await;
        assert_eq!(status, 200, "login of {username}: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::empty()).unwrap()
}

pub fn multipart_request(uri: &str, token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "BEESTOREBOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

pub fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(w, h, image::Rgb([240, 180, 20])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
