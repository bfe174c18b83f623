use std::env;
use std::time::Duration;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub dev_mode: bool,
    /// Entitlement authority base URL
    pub upstream_url: String,
    pub upstream_retry_count: u32,
    pub upstream_timeout: Duration,
    /// Force the dot_metrics_enabled feature on
    pub dot_metrics_enabled: bool,
    /// Default value of the use_span_metrics flag
    pub use_span_metrics: bool,
    /// Organizations the use_span_metrics flag is switched on for
    pub use_span_metrics_orgs: Vec<Uuid>,
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a comma-separated list of organization ids, skipping invalid entries.
pub fn parse_org_list(value: &str) -> Vec<Uuid> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring invalid organization id in flag config: {}", s);
                None
            }
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("LICENSING_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 3000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "licensing.db".to_string()),
            dev_mode,
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| "https://api.licensing.invalid".to_string()),
            upstream_retry_count: env_parse("UPSTREAM_RETRY_COUNT", 3),
            upstream_timeout: Duration::from_secs(env_parse("UPSTREAM_TIMEOUT_SECS", 10)),
            dot_metrics_enabled: env_bool("DOT_METRICS_ENABLED", cfg!(feature = "dot-metrics")),
            use_span_metrics: env_bool("USE_SPAN_METRICS", false),
            use_span_metrics_orgs: env::var("USE_SPAN_METRICS_ORGS")
                .map(|v| parse_org_list(&v))
                .unwrap_or_default(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_list_skips_blanks_and_garbage() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_org_list(&format!(" {}, ,not-a-uuid,{} ", a, b));

        assert_eq!(parsed, vec![a, b]);
    }
}
