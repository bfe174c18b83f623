//! Runtime boolean flags that are not tied to licensing.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

pub const USE_SPAN_METRICS: &str = "use_span_metrics";

/// Evaluates boolean flags for an organization.
pub trait Flagger: Send + Sync {
    /// The flag's value for `organization_id`, `false` for unknown flags.
    fn boolean_or_empty(&self, flag: &str, organization_id: Uuid) -> bool;
}

#[derive(Debug, Clone, Default)]
struct FlagRule {
    default: bool,
    enabled_orgs: HashSet<Uuid>,
}

/// Flags fixed at start-up: a default per flag plus organizations it is
/// switched on for.
#[derive(Debug, Clone, Default)]
pub struct StaticFlagger {
    flags: HashMap<String, FlagRule>,
}

impl StaticFlagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(
        mut self,
        flag: &str,
        default: bool,
        enabled_orgs: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        self.flags.insert(
            flag.to_string(),
            FlagRule {
                default,
                enabled_orgs: enabled_orgs.into_iter().collect(),
            },
        );
        self
    }
}

impl Flagger for StaticFlagger {
    fn boolean_or_empty(&self, flag: &str, organization_id: Uuid) -> bool {
        self.flags
            .get(flag)
            .map(|rule| rule.default || rule.enabled_orgs.contains(&organization_id))
            .unwrap_or(false)
    }
}
