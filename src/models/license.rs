use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::Feature;

/// Residual payload map kept alongside the promoted license fields.
pub type LicenseData = Map<String, Value>;

/// Serialized view of a license returned to API callers: the residual data
/// plus the license key.
pub type GettableLicense = Map<String, Value>;

/// The instant used when `free_until` is absent or unparseable.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Normalized entitlement record for one organization.
///
/// `data` never holds `id` or `key` once built from an upstream payload;
/// both live only in the typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct License {
    /// Assigned by the entitlement authority, nil for a synthetic license
    pub id: Uuid,
    /// Credential for further upstream calls, empty for a synthetic license
    pub key: String,
    pub data: LicenseData,
    pub plan_name: String,
    pub features: Vec<Feature>,
    pub status: String,
    pub state: String,
    pub free_until: DateTime<Utc>,
    /// Epoch seconds, 0 = absent
    pub valid_from: i64,
    /// Epoch seconds, -1 = never expires
    pub valid_until: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_validated_at: i64,
    pub organization_id: Uuid,
}

impl License {
    /// True when this license carries a real upstream credential.
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn is_open_ended(&self) -> bool {
        self.valid_until == -1
    }

    pub fn gettable(&self) -> GettableLicense {
        let mut gettable = self.data.clone();
        gettable.insert("key".to_string(), Value::String(self.key.clone()));
        gettable
    }

    pub fn stats(&self) -> Map<String, Value> {
        let stats = json!({
            "license.id": self.id.to_string(),
            "license.plan.name": self.plan_name,
            "license.state.name": self.state,
            "license.free_until.time": self.free_until.to_rfc3339(),
        });
        match stats {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Persistence projection of a [`License`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorableLicense {
    pub id: Uuid,
    pub key: String,
    pub data: LicenseData,
    pub last_validated_at: i64,
    pub org_id: Uuid,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&License> for StorableLicense {
    fn from(license: &License) -> Self {
        Self {
            id: license.id,
            key: license.key.clone(),
            data: license.data.clone(),
            last_validated_at: license.last_validated_at,
            org_id: license.organization_id,
            created_at: license.created_at,
            updated_at: license.updated_at,
        }
    }
}

/// Activation request body.
#[derive(Debug, Deserialize)]
pub struct PostableLicense {
    pub key: String,
}

impl PostableLicense {
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(AppError::InvalidInput("license key cannot be empty".into()));
        }
        Ok(())
    }
}
