use axum::extract::State;

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::{GettableSubscription, PostableSubscription};

use super::OrgPath;

/// POST /orgs/{org_id}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
    Json(body): Json<PostableSubscription>,
) -> Result<Json<GettableSubscription>> {
    let subscription = state.licensing.checkout(path.org_id, &body).await?;
    Ok(Json(subscription))
}

/// POST /orgs/{org_id}/portal
pub async fn portal(
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
    Json(body): Json<PostableSubscription>,
) -> Result<Json<GettableSubscription>> {
    let subscription = state.licensing.portal(path.org_id, &body).await?;
    Ok(Json(subscription))
}
