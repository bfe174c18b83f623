use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A product capability and its entitlement metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub active: bool,
    pub usage: i64,
    /// -1 = unlimited
    pub usage_limit: i64,
    /// UI route, empty when the feature has no page of its own
    #[serde(default)]
    pub route: String,
}

impl Feature {
    /// An always-on feature with no usage limit.
    pub fn unlimited(name: &str, active: bool) -> Self {
        Self {
            name: name.to_string(),
            active,
            usage: 0,
            usage_limit: -1,
            route: String::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "active": self.active,
            "usage": self.usage,
            "usage_limit": self.usage_limit,
            "route": self.route,
        })
    }
}
