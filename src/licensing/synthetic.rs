use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::catalog::FeatureCatalog;
use crate::models::{zero_time, License, LicenseData};

pub const SYNTHETIC_STATUS: &str = "VALID";
pub const SYNTHETIC_STATE: &str = "ACTIVE";
pub const SYNTHETIC_PLAN: &str = "cloud";

/// Stand-in license for an organization that never activated one.
///
/// Grants the full catalog, never expires, and carries an empty key so
/// callers can tell there is no upstream entitlement behind it.
pub fn synthesize(organization_id: Uuid, catalog: &FeatureCatalog) -> License {
    let now = Utc::now();
    let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    let data = json!({
        "key": "",
        "status": SYNTHETIC_STATUS,
        "state": SYNTHETIC_STATE,
        "platform": "CLOUD",
        "created_at": stamp,
        "updated_at": stamp,
        "plan": {
            "name": SYNTHETIC_PLAN,
            "is_active": true,
            "description": "",
            "created_at": stamp,
            "updated_at": stamp,
        },
        "plan_id": "",
        "free_until": "",
        "valid_from": 0.0,
        "valid_until": -1.0,
        "event_queue": {
            "event": "",
            "status": "",
            "scheduled_at": "",
            "created_at": stamp,
            "updated_at": stamp,
        },
        "features": catalog.to_json(),
    });
    let data = match data {
        Value::Object(map) => map,
        _ => LicenseData::new(),
    };

    let timestamp = now.timestamp();
    License {
        id: Uuid::nil(),
        key: String::new(),
        data,
        plan_name: SYNTHETIC_PLAN.to_string(),
        features: catalog.to_vec(),
        status: SYNTHETIC_STATUS.to_string(),
        state: SYNTHETIC_STATE.to_string(),
        free_until: zero_time(),
        valid_from: 0,
        valid_until: -1,
        created_at: timestamp,
        updated_at: timestamp,
        last_validated_at: timestamp,
        organization_id,
    }
}
