//! Decoding of license payloads from the entitlement authority or from storage.
//!
//! Required fields fail with a [`PayloadError`] naming the key. Optional
//! fields fall back to their defaults and never produce an error.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::FeatureCatalog;
use crate::error::AppError;
use crate::models::{zero_time, License, LicenseData, StorableLicense};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("license payload is not a JSON object: {0}")]
    Malformed(String),

    #[error("{0} key is missing")]
    MissingField(&'static str),

    #[error("{field} key is not a valid {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("id key is not a valid uuid: {0}")]
    InvalidId(String),
}

impl PayloadError {
    /// The payload key this error is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PayloadError::Malformed(_) => None,
            PayloadError::MissingField(field) => Some(field),
            PayloadError::InvalidType { field, .. } => Some(field),
            PayloadError::InvalidId(_) => Some("id"),
        }
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

fn required_str(data: &Map<String, Value>, field: &'static str) -> Result<String, PayloadError> {
    match data.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(PayloadError::InvalidType {
            field,
            expected: "string",
        }),
        None => Err(PayloadError::MissingField(field)),
    }
}

fn required_object<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Map<String, Value>, PayloadError> {
    match data.get(field) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(PayloadError::InvalidType {
            field,
            expected: "object",
        }),
        None => Err(PayloadError::MissingField(field)),
    }
}

fn optional_str(data: &Map<String, Value>, field: &str) -> String {
    data.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// Numbers arrive as JSON floats; fractional seconds are truncated.
fn optional_epoch(data: &Map<String, Value>, field: &str) -> i64 {
    data.get(field)
        .and_then(Value::as_f64)
        .map(|v| v as i64)
        .unwrap_or(0)
}

fn optional_time(data: &Map<String, Value>, field: &str) -> DateTime<Utc> {
    data.get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(zero_time)
}

/// The promoted fields shared by upstream and stored payloads.
#[derive(Debug)]
struct LicenseFields {
    status: String,
    plan_name: String,
    state: String,
    free_until: DateTime<Utc>,
    valid_from: i64,
    valid_until: i64,
}

impl LicenseFields {
    fn decode(data: &Map<String, Value>) -> Result<Self, PayloadError> {
        let status = required_str(data, "status")?;
        let plan = required_object(data, "plan")?;
        let plan_name = match required_str(plan, "name") {
            Err(PayloadError::MissingField(_)) => return Err(PayloadError::MissingField("plan.name")),
            Err(PayloadError::InvalidType { expected, .. }) => {
                return Err(PayloadError::InvalidType {
                    field: "plan.name",
                    expected,
                })
            }
            other => other?,
        };

        Ok(Self {
            status,
            plan_name,
            state: optional_str(data, "state"),
            free_until: optional_time(data, "free_until"),
            valid_from: optional_epoch(data, "valid_from"),
            valid_until: optional_epoch(data, "valid_until"),
        })
    }
}

fn decode_object(raw: &[u8]) -> Result<LicenseData, PayloadError> {
    serde_json::from_slice::<LicenseData>(raw).map_err(|e| PayloadError::Malformed(e.to_string()))
}

/// Parse a raw upstream payload into a license owned by `organization_id`.
///
/// `id` and `key` are promoted and removed from the residual data; the full
/// catalog is attached and mirrored into the data under `features`.
pub fn parse(
    raw: &[u8],
    organization_id: Uuid,
    catalog: &FeatureCatalog,
) -> Result<License, PayloadError> {
    let mut data = decode_object(raw)?;

    let id_str = required_str(&data, "id")?;
    let id = Uuid::parse_str(&id_str).map_err(|_| PayloadError::InvalidId(id_str))?;
    data.remove("id");

    let key = required_str(&data, "key")?;
    data.remove("key");

    let fields = LicenseFields::decode(&data)?;
    data.insert("features".to_string(), catalog.to_json());

    let now = Utc::now().timestamp();
    Ok(License {
        id,
        key,
        data,
        plan_name: fields.plan_name,
        features: catalog.to_vec(),
        status: fields.status,
        state: fields.state,
        free_until: fields.free_until,
        valid_from: fields.valid_from,
        valid_until: fields.valid_until,
        created_at: now,
        updated_at: now,
        last_validated_at: now,
        organization_id,
    })
}

/// Rebuild a license from a persisted row. Identity and timestamps come from
/// the row itself; `id`/`key` are not expected in the data map.
pub fn parse_stored(
    storable: StorableLicense,
    catalog: &FeatureCatalog,
) -> Result<License, PayloadError> {
    let StorableLicense {
        id,
        key,
        mut data,
        last_validated_at,
        org_id,
        created_at,
        updated_at,
    } = storable;

    let fields = LicenseFields::decode(&data)?;
    data.insert("features".to_string(), catalog.to_json());

    Ok(License {
        id,
        key,
        data,
        plan_name: fields.plan_name,
        features: catalog.to_vec(),
        status: fields.status,
        state: fields.state,
        free_until: fields.free_until,
        valid_from: fields.valid_from,
        valid_until: fields.valid_until,
        created_at,
        updated_at,
        last_validated_at,
        organization_id: org_id,
    })
}

impl License {
    /// Replace this license's upstream-derived fields with a fresh payload.
    /// Organization and creation time are kept.
    pub fn update(&mut self, raw: &[u8], catalog: &FeatureCatalog) -> Result<(), PayloadError> {
        let updated = parse(raw, self.organization_id, catalog)?;

        self.id = updated.id;
        self.key = updated.key;
        self.data = updated.data;
        self.features = updated.features;
        self.plan_name = updated.plan_name;
        self.status = updated.status;
        self.state = updated.state;
        self.free_until = updated.free_until;
        self.valid_from = updated.valid_from;
        self.valid_until = updated.valid_until;
        self.updated_at = updated.updated_at;
        self.last_validated_at = updated.last_validated_at;
        Ok(())
    }
}
