//! Shared harness for the HTTP-level integration tests: router
//! construction, bearer-token helpers mirroring the identity provider,
//! and fixtures built through the public API.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use quire::auth::{encode_claims, Claims, EDITORS_GROUP, REVIEWERS_GROUP};
use quire::config::Config;
use quire::mail::LogMailer;
use quire::routes;
use quire::state::AppState;

pub const TEST_SECRET: &str = "quire-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        app_secret: TEST_SECRET.to_string(),
        invitation_ttl_hours: 72,
        mail_relay_url: None,
        mail_from_domain: "quire.press".to_string(),
        content_service_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Build the same router production uses, on top of the per-test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = Arc::new(AppState {
        pool: Arc::new(pool),
        config: Arc::new(test_config()),
        mailer: Arc::new(LogMailer),
    });
    routes::app(state)
}

pub fn token(user_id: Uuid, groups: &[&str], is_staff: bool) -> String {
    let claims = Claims {
        sub: user_id,
        groups: groups.iter().map(|g| g.to_string()).collect(),
        is_staff,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode_claims(&claims, TEST_SECRET).unwrap()
}

pub fn staff_token() -> String {
    token(Uuid::new_v4(), &[], true)
}

pub fn editor_token(user_id: Uuid) -> String {
    token(user_id, &[EDITORS_GROUP], false)
}

pub fn reviewer_token(user_id: Uuid) -> String {
    token(user_id, &[REVIEWERS_GROUP], false)
}

pub async fn post_json(
    app: Router,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str, bearer: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("Authorization", format!("Bearer {bearer}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn parse_id(value: &serde_json::Value) -> Uuid {
    Uuid::parse_str(value.as_str().unwrap()).unwrap()
}

pub struct TestEditor {
    pub user_id: Uuid,
    pub editor_id: Uuid,
    pub token: String,
}

pub struct TestReviewer {
    pub user_id: Uuid,
    pub reviewer_id: Uuid,
    pub token: String,
}

pub async fn create_editor(pool: &PgPool, email: &str) -> TestEditor {
    let user_id = Uuid::new_v4();
    let bearer = editor_token(user_id);
    let response = post_json(
        build_test_app(pool.clone()),
        "/editors",
        &bearer,
        serde_json::json!({ "email": email, "affiliation": "university of lagos" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestEditor {
        user_id,
        editor_id: parse_id(&json["id"]),
        token: bearer,
    }
}

pub async fn create_reviewer(pool: &PgPool, email: &str) -> TestReviewer {
    let user_id = Uuid::new_v4();
    let bearer = reviewer_token(user_id);
    let response = post_json(
        build_test_app(pool.clone()),
        "/reviewers",
        &bearer,
        serde_json::json!({ "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestReviewer {
        user_id,
        reviewer_id: parse_id(&json["id"]),
        token: bearer,
    }
}

pub async fn create_journal(pool: &PgPool, name: &str) -> Uuid {
    let response = post_json(
        build_test_app(pool.clone()),
        "/journals",
        &staff_token(),
        serde_json::json!({ "name": name, "issn": "2049-3630" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    parse_id(&json["id"])
}

pub async fn transfer_chief(pool: &PgPool, journal_id: Uuid, editor_id: Uuid) -> Response {
    post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/chief"),
        &staff_token(),
        serde_json::json!({ "editor_id": editor_id }),
    )
    .await
}

/// A journal with a chief and a line editor already seated on the board.
pub struct JournalFixture {
    pub journal_id: Uuid,
    pub chief: TestEditor,
    pub line_editor: TestEditor,
}

pub async fn setup_journal(pool: &PgPool, name: &str) -> JournalFixture {
    let journal_id = create_journal(pool, name).await;
    let chief = create_editor(pool, &format!("chief@{name}.example")).await;
    let line_editor = create_editor(pool, &format!("line@{name}.example")).await;

    let response = transfer_chief(pool, journal_id, chief.editor_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/roles"),
        &chief.token,
        serde_json::json!({ "editor_id": line_editor.editor_id, "role": "line" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    JournalFixture {
        journal_id,
        chief,
        line_editor,
    }
}

/// A full submission fixture on top of [`setup_journal`].
pub struct SubmissionFixture {
    pub journal: JournalFixture,
    pub submission_id: Uuid,
}

pub async fn setup_submission(pool: &PgPool, name: &str) -> SubmissionFixture {
    let journal = setup_journal(pool, name).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/submissions",
        &token(Uuid::new_v4(), &[], false),
        serde_json::json!({
            "author_submission_id": Uuid::new_v4(),
            "journal_id": journal.journal_id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    SubmissionFixture {
        journal,
        submission_id: parse_id(&json["id"]),
    }
}

/// The submission's team as (role -> (member id, editor id, permissions)).
pub async fn fetch_team(
    pool: &PgPool,
    bearer: &str,
    submission_id: Uuid,
) -> serde_json::Map<String, serde_json::Value> {
    let response = get(
        build_test_app(pool.clone()),
        &format!("/submissions/{submission_id}"),
        bearer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let mut by_role = serde_json::Map::new();
    for member in json["team"].as_array().unwrap() {
        by_role.insert(member["role"].as_str().unwrap().to_string(), member.clone());
    }
    by_role
}

/// Move handling permissions to the team slot for `role`, acting as
/// `bearer`.
pub async fn handoff_to_role(
    pool: &PgPool,
    bearer: &str,
    submission_id: Uuid,
    role: &str,
) -> Response {
    let team = fetch_team(pool, bearer, submission_id).await;
    let member_id = team[role]["id"].as_str().unwrap().to_string();
    post_json(
        build_test_app(pool.clone()),
        &format!("/submissions/{submission_id}/handoff"),
        bearer,
        serde_json::json!({ "team_member_id": member_id }),
    )
    .await
}
