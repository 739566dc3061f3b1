mod support;

use axum::http::{header, Method, StatusCode};
use support::TestApp;

#[tokio::test]
async fn admin_lists_and_reads_accounts() {
    let app = TestApp::new();
    let ana = app.seed_account("ana", "patient").await;
    app.seed_account("root", "admin").await;
    let admin = app.admin_token();

    let listed = app.send(Method::GET, "/api/accounts", Some(&admin), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json["message"], "Accounts retrieved successfully.");
    assert_eq!(listed.json["result"].as_array().unwrap().len(), 2);

    let one = app
        .send(
            Method::GET,
            &format!("/api/accounts?id={ana}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.json["result"]["accountId"], ana);
    assert_eq!(one.json["result"]["username"], "ana");
    assert_eq!(one.json["result"]["role"], "patient");
}

#[tokio::test]
async fn patient_reads_only_own_account() {
    let app = TestApp::new();
    let ana = app.seed_account("ana", "patient").await;
    let bob = app.seed_account("bob", "patient").await;
    let token = app.patient_token(ana);

    let own = app
        .send(Method::GET, &format!("/api/accounts?id={ana}"), Some(&token), None)
        .await;
    assert_eq!(own.status, StatusCode::OK);

    let other = app
        .send(Method::GET, &format!("/api/accounts?id={bob}"), Some(&token), None)
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.json["message"], "Forbidden.");

    let listed = app.send(Method::GET, "/api/accounts", Some(&token), None).await;
    assert_eq!(listed.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_account_is_404() {
    let app = TestApp::new();
    let admin = app.admin_token();

    let reply = app
        .send(Method::GET, "/api/accounts?id=42", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.json["message"], "account 42 not found.");
}

#[tokio::test]
async fn accounts_are_read_only() {
    let app = TestApp::new();
    let admin = app.admin_token();

    let reply = app
        .send(Method::POST, "/api/accounts", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(reply.headers.get(header::ALLOW).unwrap(), "GET");
    assert_eq!(reply.json["message"], "Method POST Not Allowed");
}
