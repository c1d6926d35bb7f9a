//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};

use crate::generation::generator::{generate_cover_letter, GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// POST /generate
///
/// Generates a cover letter from a resume, a job posting, and a tone label.
/// Never returns an error status: upstream and parse failures both collapse
/// into a best-effort `{ letter, company }` body.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    Json(generate_cover_letter(state.llm.as_ref(), &request).await)
}
