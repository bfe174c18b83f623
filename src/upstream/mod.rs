//! Client side of the entitlement authority.

mod dev;
mod http;

pub use dev::*;
pub use http::*;

use async_trait::async_trait;

use crate::error::Result;

/// Calls made to the entitlement authority. Every method returns the raw
/// response body on a 2xx status.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get_license(&self, key: &str) -> Result<Vec<u8>>;

    async fn get_checkout_url(&self, key: &str, body: &[u8]) -> Result<Vec<u8>>;

    async fn get_portal_url(&self, key: &str, body: &[u8]) -> Result<Vec<u8>>;
}
