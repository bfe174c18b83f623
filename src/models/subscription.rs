use serde::{Deserialize, Serialize};

/// Checkout/portal request forwarded to the entitlement authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostableSubscription {
    /// Where the billing page sends the user back to
    #[serde(rename = "url")]
    pub success_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GettableSubscription {
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
}
