use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::License;

/// Outcome of picking the license in force for an organization.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Found(License),
    Absent,
}

impl Selection {
    pub fn found(self) -> Option<License> {
        match self {
            Selection::Found(license) => Some(license),
            Selection::Absent => None,
        }
    }

    /// Turn an absent selection into a `NotFound` naming the organization.
    pub fn into_result(self, organization_id: Uuid) -> Result<License> {
        match self {
            Selection::Found(license) => Ok(license),
            Selection::Absent => Err(AppError::NotFound(format!(
                "no active license found for the organization {}",
                organization_id
            ))),
        }
    }
}

/// A license is eligible once it has a start time and has not expired at `now`.
pub fn is_eligible(license: &License, now: i64) -> bool {
    license.valid_from != 0 && (license.valid_until == -1 || license.valid_until > now)
}

/// Pick the eligible license with the latest `valid_from`.
///
/// Input order is irrelevant except for ties on `valid_from`, where the first
/// one seen is kept.
pub fn select_active<I>(licenses: I, now: i64) -> Selection
where
    I: IntoIterator<Item = License>,
{
    let mut best: Option<License> = None;

    for license in licenses {
        if !is_eligible(&license, now) {
            continue;
        }
        match &best {
            Some(current) if license.valid_from <= current.valid_from => {}
            _ => best = Some(license),
        }
    }

    best.map_or(Selection::Absent, Selection::Found)
}
