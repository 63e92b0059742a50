use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use models::Beer;
use service::Upserted;
use tracing::info;

use super::AppState;
use crate::errors::ApiError;

/// The `{name}` path segment, percent-decoded by axum. Blank names are refused.
fn beer_name(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    let Path(name) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("beer name missing from path".into()));
    }
    Ok(name)
}

/// `/beers/` with nothing after the slash.
pub async fn missing_name() -> ApiError {
    ApiError::BadRequest("beer name missing from path".into())
}

/// GET /beers
pub async fn list_beers(State(state): State<AppState>) -> Json<Vec<Beer>> {
    Json(state.store.list().await)
}

/// GET /beers/:name
pub async fn get_beer(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Beer>, ApiError> {
    let name = beer_name(path)?;
    let beer = state.store.get(&name).await?;
    Ok(Json(beer))
}

/// PUT /beers/:name — create (201) or replace (204). The body must be a beer
/// whose `name` equals the path segment.
pub async fn put_beer(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let name = beer_name(path)?;
    let beer: Beer = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid beer body: {e}")))?;
    if beer.name != name {
        return Err(ApiError::BadRequest(format!(
            "body names `{}` but path names `{name}`",
            beer.name
        )));
    }

    match state.store.upsert(beer).await? {
        Upserted::Created => {
            info!(%name, "beer created");
            let mut resp = StatusCode::CREATED.into_response();
            if let Ok(location) = HeaderValue::from_str(uri.path()) {
                resp.headers_mut().insert(header::LOCATION, location);
            }
            Ok(resp)
        }
        Upserted::Updated => {
            info!(%name, "beer updated");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// DELETE /beers/:name
pub async fn delete_beer(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let name = beer_name(path)?;
    state.store.remove(&name).await?;
    info!(%name, "beer deleted");
    Ok(StatusCode::NO_CONTENT)
}
