mod support;

use axum::http::{header, StatusCode};
use serde_json::json;

use support::{app, body_json, empty_request, json_request, PASSWORD};

#[tokio::test]
async fn root_health_and_metrics() {
    let app = app();
    let (status, body) = app.json(empty_request("GET", "/", None)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "Hello World" }));

    let (status, body) = app.json(empty_request("GET", "/health", None)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    let resp = app.send(empty_request("GET", "/metrics", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn registration_greets_and_mails_a_verification_link() {
    let app = app();
    let (status, body) = app.register("alice").await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["user"],
        "Hello alice, welcome to the Bee store. Please click on the link sent to your registered email address to verify your account and continuing shopping."
    );

    let sent = app.mailer.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "The Bee Store Account verification email");
    assert!(sent[0].html.contains("http://bee.test/verification?token="));
}

#[tokio::test]
async fn duplicate_and_invalid_registrations_are_rejected() {
    let app = app();
    assert_eq!(app.register("alice").await.0, 200);
    assert_eq!(app.register("alice").await.0, 409);

    let same_email = json!({ "username": "alice2", "email": "alice@example.com", "password": PASSWORD });
    assert_eq!(app.json(json_request("POST", "/registration", None, same_email)).await.0, 409);

    let short = json!({ "username": "bob", "email": "bob@example.com", "password": "short" });
    assert_eq!(app.json(json_request("POST", "/registration", None, short)).await.0, 400);

    let bad_email = json!({ "username": "carol", "email": "carol.example.com", "password": PASSWORD });
    assert_eq!(app.json(json_request("POST", "/registration", None, bad_email)).await.0, 400);
}

#[tokio::test]
async fn verification_link_flips_the_account_once() {
    let app = app();
    app.register("alice").await;
    let sent = app.mailer.wait_for(1).await;
    let html = &sent[0].html;
    let start = html.find("token=").unwrap() + "token=".len();
    let end = start + html[start..].find('"').unwrap();
    let token = &html[start..end];
    let uri = format!("/verification?token={token}");

    let as_bearer = app.send(empty_request("POST", "/user/me", Some(token))).await;
    assert_eq!(as_bearer.status(), StatusCode::UNAUTHORIZED);

    let resp = app.send(empty_request("GET", &uri, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));

    let (status, body) = app.json(empty_request("GET", &uri, None)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "Email verification error" }));

    let bearer = app.login("alice", PASSWORD).await.1["access_token"].as_str().unwrap().to_string();
    let (_, me) = app.json(empty_request("POST", "/user/me", Some(&bearer))).await;
    assert_eq!(me["data"]["verified"], true);
    let (status, _) = app.json(empty_request("GET", &format!("/verification?token={bearer}"), None)).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn bad_verification_token_is_401() {
    let app = app();
    let resp = app.send(empty_request("GET", "/verification?token=nope", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn login_issues_bearer_token_and_me_returns_profile() {
    let app = app();
    let token = app.signed_up("alice").await;

    let (status, body) = app.login("alice", PASSWORD).await;
    assert_eq!(status, 200);
    assert_eq!(body["token_type"], "bearer");

    let (status, me) = app.json(empty_request("POST", "/user/me", Some(&token))).await;
    assert_eq!(status, 200, "{me}");
    assert_eq!(me["status"], "ok");
    let data = &me["data"];
    assert_eq!(data["username"], "alice");
    assert_eq!(data["email"], "alice@example.com");
    assert_eq!(data["business_name"], "Business by alice");
    assert_eq!(data["bio"], "Unspecified");
    assert_eq!(data["logo"], "http://bee.test/static/images/default.jpg");
    assert_eq!(data["verified"], false);
    assert!(data["join_date"].is_string());
    assert!(data.get("password").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_share_one_answer() {
    let app = app();
    app.signed_up("alice").await;

    let (wrong_status, wrong) = app.login("alice", "not-the-password").await;
    let (unknown_status, unknown) = app.login("mallory", PASSWORD).await;
    assert_eq!(wrong_status, 401);
    assert_eq!(unknown_status, 401);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn protected_routes_demand_a_valid_bearer() {
    let app = app();
    let token = app.signed_up("alice").await;

    let missing = app.send(empty_request("POST", "/user/me", None)).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let (status, body) = app.json(empty_request("POST", "/user/me", Some("garbage"))).await;
    assert_eq!(status, 401);
    assert_eq!(body["detail"], "Invalid token");

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    assert_eq!(app.json(empty_request("POST", "/user/me", Some(&tampered))).await.0, 401);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/user/me")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["detail"].is_string());
}
