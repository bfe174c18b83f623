use axum::extract::State;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::Feature;

use super::OrgPath;

/// GET /orgs/{org_id}/features
pub async fn get_feature_flags(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
) -> Result<Json<Vec<Feature>>> {
    Ok(Json(state.licensing.get_feature_flags(path.org_id)))
}
