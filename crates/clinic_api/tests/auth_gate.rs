mod support;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use clinic_api::{Claims, Role};
use support::TestApp;

#[tokio::test]
async fn health_is_public_and_enveloped() {
    let app = TestApp::new();

    let reply = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json["statusCode"], 200);
    assert_eq!(reply.json["result"]["status"], "pong");
    assert!(reply.json["time"].as_str().unwrap().ends_with('Z'));
    assert!(reply.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn missing_secret_is_configuration_error() {
    let app = TestApp::without_secret();
    let token = app.admin_token();

    let reply = app
        .send(Method::GET, "/api/practitioners", Some(&token), None)
        .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json["message"], "Server configuration error.");
    assert!(reply.json["result"].is_null());
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = TestApp::new();

    let reply = app.send(Method::GET, "/api/practitioners", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.json["message"],
        "Access denied. No token provided or invalid format."
    );
    assert_eq!(reply.json["result"]["errorType"], "missing");
}

#[tokio::test]
async fn expired_token_message_differs_from_invalid() {
    let app = TestApp::new();
    let expired = app
        .gate
        .sign(&Claims {
            sub: 1,
            role: Role::Admin,
            iat: 1_000,
            exp: 2_000,
        })
        .unwrap();

    let reply = app
        .send(Method::GET, "/api/slots", Some(&expired), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json["message"], "Access denied. Token has expired.");
    assert_eq!(reply.json["result"]["errorType"], "expired");

    let reply = app
        .send(Method::GET, "/api/slots", Some("abc.def.ghi"), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json["message"], "Access denied. Invalid token.");
}

#[tokio::test]
async fn unsupported_method_is_405_with_allow_header() {
    let app = TestApp::new();
    let token = app.admin_token();

    let reply = app
        .send(Method::PATCH, "/api/practitioners", Some(&token), None)
        .await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        reply.headers.get(header::ALLOW).unwrap(),
        "GET, POST, PUT, DELETE"
    );
    assert_eq!(reply.json["message"], "Method PATCH Not Allowed");

    let reply = app
        .send(Method::GET, "/api/bookings/status", Some(&token), None)
        .await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(reply.headers.get(header::ALLOW).unwrap(), "PUT");
}

#[tokio::test]
async fn unsupported_method_still_requires_token() {
    let app = TestApp::new();

    let reply = app
        .send(Method::PATCH, "/api/practitioners", None, None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_is_enveloped_404() {
    let app = TestApp::new();

    let reply = app.send(Method::GET, "/api/nope", None, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.json["statusCode"], 404);
    assert_eq!(reply.json["message"], "No route for /api/nope.");
    assert!(reply.json["result"].is_null());
    assert!(reply.json["time"].is_string());
}

#[tokio::test]
async fn options_is_answered_as_cors_preflight() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/practitioners")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();

    let reply = app.dispatch(request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
