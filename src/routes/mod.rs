pub mod journals;
pub mod reviews;
pub mod submissions;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router, shared by `main` and the integration
/// tests.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/journals", post(journals::create_journal))
        .route("/journals/:journal_id/chief", post(journals::transfer_chief))
        .route("/journals/:journal_id/roles", post(journals::assign_role))
        .route("/journals/:journal_id/board", get(journals::get_board))
        .route(
            "/journals/:journal_id/board/:role",
            get(journals::get_board_member),
        )
        .route(
            "/journals/:journal_id/questions",
            post(journals::create_report_question).get(journals::list_report_questions),
        )
        .route("/editors", post(journals::register_editor))
        .route("/reviewers", post(journals::register_reviewer))
        .route("/submissions", post(submissions::create_submission))
        .route("/submissions/:submission_id", get(submissions::get_submission))
        .route(
            "/submissions/:submission_id/editors",
            post(submissions::assign_editors),
        )
        .route(
            "/submissions/:submission_id/handoff",
            post(submissions::transfer_handling),
        )
        .route(
            "/submissions/:submission_id/decision",
            post(submissions::decide),
        )
        .route(
            "/submissions/:submission_id/editor-reports",
            post(submissions::create_editor_report),
        )
        .route(
            "/submissions/:submission_id/invitations",
            post(reviews::invite_reviewers),
        )
        .route("/invitations/accept", post(reviews::accept_invitation))
        .route(
            "/submissions/:submission_id/reviewer-reports",
            post(reviews::submit_report).get(reviews::get_my_report),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
