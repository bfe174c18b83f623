use async_trait::async_trait;

use crate::error::Result;

use super::Upstream;

const DEV_LICENSE: &str = r#"{
    "id": "0196f794-ff30-7bee-a5f4-ef5ad315715e",
    "key": "local-enterprise-key",
    "category": "ENTERPRISE",
    "status": "ACTIVE",
    "plan": {
        "name": "ENTERPRISE"
    },
    "valid_from": 1700000000,
    "valid_until": 4863266400,
    "state": "active"
}"#;

/// Fixed responses for local development, no network involved.
#[derive(Debug, Clone, Default)]
pub struct StaticUpstream;

#[async_trait]
impl Upstream for StaticUpstream {
    async fn get_license(&self, _key: &str) -> Result<Vec<u8>> {
        Ok(DEV_LICENSE.as_bytes().to_vec())
    }

    async fn get_checkout_url(&self, _key: &str, _body: &[u8]) -> Result<Vec<u8>> {
        Ok(br#"{"url": "http://localhost:8080/checkout-dummy"}"#.to_vec())
    }

    async fn get_portal_url(&self, _key: &str, _body: &[u8]) -> Result<Vec<u8>> {
        Ok(br#"{"url": "http://localhost:8080/portal-dummy"}"#.to_vec())
    }
}
