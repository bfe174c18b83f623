//! The fixed set of product capabilities.
//!
//! A `FeatureCatalog` is built once at start-up and handed to every component
//! that needs it. The backing slice is shared and read-only; anything that
//! wants to append or flip a feature works on [`FeatureCatalog::to_vec`].

use std::sync::Arc;

use serde_json::Value;

use crate::models::Feature;

pub const SSO: &str = "sso";
pub const ONBOARDING: &str = "onboarding";
pub const CHAT_SUPPORT: &str = "chat_support";
pub const GATEWAY: &str = "gateway";
pub const PREMIUM_SUPPORT: &str = "premium_support";
pub const ANOMALY_DETECTION: &str = "anomaly_detection";
pub const DOT_METRICS_ENABLED: &str = "dot_metrics_enabled";

/// Catalog order, which is also the order features are reported in.
pub const FEATURE_NAMES: &[&str] = &[
    SSO,
    ONBOARDING,
    CHAT_SUPPORT,
    GATEWAY,
    PREMIUM_SUPPORT,
    ANOMALY_DETECTION,
    DOT_METRICS_ENABLED,
];

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCatalog {
    features: Arc<[Feature]>,
}

impl FeatureCatalog {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features: features.into(),
        }
    }

    /// Every known feature, unconditionally active.
    pub fn cloud() -> Self {
        Self::new(
            FEATURE_NAMES
                .iter()
                .map(|name| Feature::unlimited(name, true))
                .collect(),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Owned copy that callers may reorder or extend.
    pub fn to_vec(&self) -> Vec<Feature> {
        self.features.to_vec()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// JSON array written into a license's residual data under `features`.
    pub fn to_json(&self) -> Value {
        Value::Array(self.features.iter().map(Feature::to_json).collect())
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::cloud()
    }
}
