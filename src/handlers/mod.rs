mod features;
mod licenses;
mod subscriptions;

pub use features::*;
pub use licenses::*;
pub use subscriptions::*;

use axum::{
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::db::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct OrgPath {
    pub org_id: Uuid,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/orgs/{org_id}/licenses", post(activate_license))
        .route("/orgs/{org_id}/licenses/active", get(get_active_license))
        .route("/orgs/{org_id}/licenses/refresh", post(refresh_license))
        .route("/orgs/{org_id}/checkout", post(checkout))
        .route("/orgs/{org_id}/portal", post(portal))
        .route("/orgs/{org_id}/features", get(get_feature_flags))
}
