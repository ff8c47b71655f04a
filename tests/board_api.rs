//! Journal creation, board provisioning, chief transfer, and role
//! assignment.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_editor, create_journal, get, post_json, staff_token,
    transfer_chief,
};
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test]
async fn journal_creation_provisions_permissions_and_role_slots(pool: PgPool) {
    let journal_id = create_journal(&pool, "Acta Exemplaria").await;

    // Six catalog permissions, created with the journal.
    let permission_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM journal_permissions WHERE journal_id = $1")
            .bind(journal_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(permission_count, 6);

    // Three non-chief slots, unbound, each holding only view_submissions.
    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/board"),
        &staff_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let board = body_json(response).await;
    let slots = board.as_array().unwrap();
    assert_eq!(slots.len(), 3);

    let mut roles: Vec<&str> = slots.iter().map(|s| s["role"].as_str().unwrap()).collect();
    roles.sort_unstable();
    assert_eq!(roles, ["copy", "line", "section"]);

    for slot in slots {
        assert!(slot["editor_id"].is_null());
        assert_eq!(
            slot["permissions"].as_array().unwrap().as_slice(),
            [serde_json::json!("view_submissions")]
        );
    }
}

#[sqlx::test]
async fn journal_creation_requires_staff(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/journals",
        &common::token(Uuid::new_v4(), &[], false),
        serde_json::json!({ "name": "Acta Exemplaria" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn chief_transfer_happens_exactly_once(pool: PgPool) {
    let journal_id = create_journal(&pool, "Acta Exemplaria").await;
    let editor_a = create_editor(&pool, "a@example.org").await;
    let editor_b = create_editor(&pool, "b@example.org").await;

    let response = transfer_chief(&pool, journal_id, editor_a.editor_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let member = body_json(response).await;
    assert_eq!(member["role"], "chief");

    // Second transfer is rejected and the chief binding is unchanged.
    let response = transfer_chief(&pool, journal_id, editor_b.editor_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "an editor-in-chief already exists");

    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/board/chief"),
        &editor_a.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let chief = body_json(response).await;
    assert_eq!(chief["id"].as_str().unwrap(), editor_a.editor_id.to_string());
}

#[sqlx::test]
async fn chief_slot_receives_every_journal_permission(pool: PgPool) {
    let journal_id = create_journal(&pool, "Acta Exemplaria").await;
    let editor = create_editor(&pool, "a@example.org").await;
    transfer_chief(&pool, journal_id, editor.editor_id).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/board"),
        &editor.token,
    )
    .await;
    let board = body_json(response).await;
    let chief = board
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["role"] == "chief")
        .unwrap();
    assert_eq!(chief["permissions"].as_array().unwrap().len(), 6);
}

#[sqlx::test]
async fn role_assignment_moves_the_editor_between_slots(pool: PgPool) {
    let fixture = common::setup_journal(&pool, "acta").await;
    let journal_id = fixture.journal_id;

    // The line editor from the fixture moves to the section slot.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/roles"),
        &fixture.chief.token,
        serde_json::json!({ "editor_id": fixture.line_editor.editor_id, "role": "section" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/board"),
        &fixture.chief.token,
    )
    .await;
    let board = body_json(response).await;
    let editor_id = fixture.line_editor.editor_id.to_string();
    for slot in board.as_array().unwrap() {
        match slot["role"].as_str().unwrap() {
            "section" => assert_eq!(slot["editor_id"].as_str().unwrap(), editor_id),
            _ => assert_ne!(slot["editor_id"].as_str(), Some(editor_id.as_str())),
        }
    }
}

#[sqlx::test]
async fn chief_role_cannot_be_assigned(pool: PgPool) {
    let fixture = common::setup_journal(&pool, "acta").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{}/roles", fixture.journal_id),
        &fixture.chief.token,
        serde_json::json!({ "editor_id": fixture.line_editor.editor_id, "role": "chief" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "action forbidden: cannot make editor a chief");
}

#[sqlx::test]
async fn the_chief_cannot_be_moved_off_their_slot(pool: PgPool) {
    let fixture = common::setup_journal(&pool, "acta").await;

    // Reassigning the chief's own editor would leave the chief slot
    // permanently vacant; the board must refuse and stay unchanged.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{}/roles", fixture.journal_id),
        &fixture.chief.token,
        serde_json::json!({ "editor_id": fixture.chief.editor_id, "role": "copy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "action forbidden: cannot reassign the editor-in-chief");

    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{}/board/chief", fixture.journal_id),
        &fixture.chief.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let chief = body_json(response).await;
    assert_eq!(chief["id"].as_str().unwrap(), fixture.chief.editor_id.to_string());
}

#[sqlx::test]
async fn role_assignment_is_chief_only(pool: PgPool) {
    let fixture = common::setup_journal(&pool, "acta").await;
    let outsider = create_editor(&pool, "outsider@example.org").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{}/roles", fixture.journal_id),
        &outsider.token,
        serde_json::json!({ "editor_id": outsider.editor_id, "role": "copy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn duplicate_editor_profile_is_a_conflict(pool: PgPool) {
    let editor = create_editor(&pool, "a@example.org").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/editors",
        &editor.token,
        serde_json::json!({ "email": "a@example.org" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test]
async fn report_questions_are_chief_managed_and_ordered(pool: PgPool) {
    let fixture = common::setup_journal(&pool, "acta").await;
    let journal_id = fixture.journal_id;

    for question in ["Is the methodology sound?", "Is the writing clear?"] {
        let response = post_json(
            build_test_app(pool.clone()),
            &format!("/journals/{journal_id}/questions"),
            &fixture.chief.token,
            serde_json::json!({ "question": question }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Non-chief editors cannot add questions.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/questions"),
        &fixture.line_editor.token,
        serde_json::json!({ "question": "Sneaky?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/journals/{journal_id}/questions"),
        &fixture.chief.token,
    )
    .await;
    let questions = body_json(response).await;
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["question"], "Is the methodology sound?");
    assert_eq!(questions[0]["position"], 1);
    assert_eq!(questions[1]["position"], 2);
}
