//! License resolution for organizations.
//!
//! [`Licensing`] ties the payload parser, the store, the active-license
//! selector and the synthetic fallback together so every caller gets exactly
//! one entitlement view per organization.

mod payload;
mod select;
mod store;
mod synthetic;

pub use payload::*;
pub use select::*;
pub use store::*;
pub use synthetic::*;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{FeatureCatalog, DOT_METRICS_ENABLED};
use crate::error::{AppError, Result};
use crate::flagger::{Flagger, USE_SPAN_METRICS};
use crate::models::{
    Feature, GettableSubscription, License, PostableSubscription, StorableLicense,
};
use crate::upstream::Upstream;

/// Pull the redirect URL out of a checkout/portal response. Anything that is
/// not an object with a string `url` yields an empty URL.
pub fn redirect_url(response: &[u8]) -> String {
    serde_json::from_slice::<Value>(response)
        .ok()
        .and_then(|v| v.get("url").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct Licensing {
    store: Arc<dyn LicenseStore>,
    upstream: Arc<dyn Upstream>,
    flagger: Arc<dyn Flagger>,
    catalog: FeatureCatalog,
    dot_metrics_enabled: bool,
}

impl Licensing {
    pub fn new(
        store: Arc<dyn LicenseStore>,
        upstream: Arc<dyn Upstream>,
        flagger: Arc<dyn Flagger>,
        catalog: FeatureCatalog,
    ) -> Self {
        Self {
            store,
            upstream,
            flagger,
            catalog,
            dot_metrics_enabled: cfg!(feature = "dot-metrics"),
        }
    }

    /// Force the `dot_metrics_enabled` feature on in feature listings.
    pub fn with_dot_metrics(mut self, enabled: bool) -> Self {
        self.dot_metrics_enabled = enabled;
        self
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Fetch the payload for `key` upstream and record it as a new license.
    ///
    /// Nothing is stored unless both the upstream call and the parse succeed;
    /// store failures (including a duplicate key) are returned unchanged.
    pub async fn activate(&self, organization_id: Uuid, key: &str) -> Result<()> {
        let data = self
            .upstream
            .get_license(key)
            .await
            .map_err(|e| AppError::internal("unable to fetch license data with upstream server", e))?;

        let license = parse(&data, organization_id, &self.catalog)
            .map_err(|e| AppError::internal("failed to create license entity", e))?;

        self.store.create(&StorableLicense::from(&license))?;

        tracing::info!(
            "Activated license {} ({}) for organization {}",
            license.id,
            license.plan_name,
            organization_id
        );
        Ok(())
    }

    /// The license in force at `now` among stored rows, without fallback.
    pub fn select(&self, organization_id: Uuid, now: i64) -> Result<Selection> {
        let licenses = self
            .store
            .get_all(organization_id)?
            .into_iter()
            .map(|storable| parse_stored(storable, &self.catalog).map_err(AppError::from))
            .collect::<Result<Vec<License>>>()?;

        Ok(select_active(licenses, now))
    }

    /// The active license, or a synthetic one when none is in force.
    pub fn get_active(&self, organization_id: Uuid) -> Result<License> {
        match self.select(organization_id, Utc::now().timestamp())? {
            Selection::Found(license) => Ok(license),
            Selection::Absent => {
                tracing::debug!(
                    "No active license for organization {}, using synthetic license",
                    organization_id
                );
                Ok(synthesize(organization_id, &self.catalog))
            }
        }
    }

    /// Start a billing checkout session with the active license's key. A
    /// synthetic license forwards its empty key as is.
    pub async fn checkout(
        &self,
        organization_id: Uuid,
        subscription: &PostableSubscription,
    ) -> Result<GettableSubscription> {
        let active = self.get_active(organization_id)?;

        let body = serde_json::to_vec(subscription).map_err(|e| {
            AppError::InvalidInput(format!("failed to marshal checkout payload: {}", e))
        })?;

        let response = self
            .upstream
            .get_checkout_url(&active.key, &body)
            .await
            .map_err(|e| AppError::internal("failed to generate checkout session", e))?;

        Ok(GettableSubscription {
            redirect_url: redirect_url(&response),
        })
    }

    /// Open a billing portal session with the active license's key.
    pub async fn portal(
        &self,
        organization_id: Uuid,
        subscription: &PostableSubscription,
    ) -> Result<GettableSubscription> {
        let active = self.get_active(organization_id)?;

        let body = serde_json::to_vec(subscription).map_err(|e| {
            AppError::InvalidInput(format!("failed to marshal portal payload: {}", e))
        })?;

        let response = self
            .upstream
            .get_portal_url(&active.key, &body)
            .await
            .map_err(|e| AppError::internal("failed to generate portal session", e))?;

        Ok(GettableSubscription {
            redirect_url: redirect_url(&response),
        })
    }

    /// Catalog features plus the runtime `use_span_metrics` flag.
    pub fn get_feature_flags(&self, organization_id: Uuid) -> Vec<Feature> {
        let mut features = self.catalog.to_vec();

        let use_span_metrics = self
            .flagger
            .boolean_or_empty(USE_SPAN_METRICS, organization_id);
        features.push(Feature::unlimited(USE_SPAN_METRICS, use_span_metrics));

        if self.dot_metrics_enabled {
            for feature in features.iter_mut().filter(|f| f.name == DOT_METRICS_ENABLED) {
                feature.active = true;
            }
        }

        features
    }

    /// No periodic re-validation in this edition.
    pub async fn refresh(&self, _organization_id: Uuid) -> Result<()> {
        Ok(())
    }

    /// No license validation in this edition.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}
