use axum::{extract::State, http::StatusCode};
use serde_json::json;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::{GettableLicense, PostableLicense};

use super::OrgPath;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    conn.query_row("SELECT 1", [], |_| Ok(()))?;
    state.licensing.validate()?;
    Ok(Json(json!({ "status": "ok" })))
}

/// POST /orgs/{org_id}/licenses
/// Activate a license key for the organization.
pub async fn activate_license(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
    Json(body): Json<PostableLicense>,
) -> Result<StatusCode> {
    body.validate()?;
    state.licensing.activate(path.org_id, &body.key).await?;
    Ok(StatusCode::CREATED)
}

/// GET /orgs/{org_id}/licenses/active
/// The license in force, or the synthetic default when none is stored.
pub async fn get_active_license(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
) -> Result<Json<GettableLicense>> {
    let license = state.licensing.get_active(path.org_id)?;
    Ok(Json(license.gettable()))
}

/// POST /orgs/{org_id}/licenses/refresh
pub async fn refresh_license(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
) -> Result<StatusCode> {
    state.licensing.refresh(path.org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
