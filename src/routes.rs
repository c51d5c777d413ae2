use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::{
    db,
    error::ApiError,
    models::{ContactList, CreateContactRequest, CreateContactResponse, CreatedContact, CONTACT_ADDED},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(skip_all)]
async fn list_contacts(State(state): State<AppState>) -> Result<Json<ContactList>, ApiError> {
    let contacts = db::list_contacts(&state.pool).await?;
    tracing::debug!(count = contacts.len(), "listed contacts");
    Ok(Json(ContactList { contacts }))
}

#[tracing::instrument(skip_all)]
async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CreateContactResponse>, ApiError> {
    let contact = read_create_request(&headers, &body)?.validate()?;
    let id = db::insert_contact(&state.pool, &contact).await?;
    tracing::info!(id, "contact added");

    Ok(Json(CreateContactResponse {
        message: CONTACT_ADDED,
        contact: CreatedContact::new(id, contact),
    }))
}

/// Empty bodies and bodies without a JSON content type read as `{}`.
fn read_create_request(headers: &HeaderMap, body: &[u8]) -> Result<CreateContactRequest, ApiError> {
    if body.is_empty() || !is_json(headers) {
        return Ok(CreateContactRequest::default());
    }

    Json::<CreateContactRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
