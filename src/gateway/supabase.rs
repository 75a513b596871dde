//! Supabase (PostgREST) payment gateway.
//!
//! [`SupabaseClient`] is a synchronous `ureq` client for the `payments` table.
//! [`SupabaseGateway`] adapts it to the async [`PaymentGateway`] trait by
//! running each call on tokio's blocking pool via `spawn_blocking`.

use super::{PaymentGateway, PaymentReceipt, PaymentRequest, PaymentStatus};
use crate::config::Config;
use crate::domain::UssdCode;
use crate::error::{ConfigError, ConfigResult, GatewayError, GatewayResult};
use crate::metrics::{GatewayTimer, Metrics};
use crate::storage::generate_id;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// PostgREST path of the payments table.
pub const PAYMENTS_PATH: &str = "/rest/v1/payments";

/// Row shape returned by PostgREST for the payments table.
#[derive(Debug, Deserialize)]
struct PaymentRow {
    reference: String,
    status: PaymentStatus,
    ussd_code: String,
    #[serde(default)]
    created_at: Option<String>,
}

/// Row shape for status lookups (`select=reference,status`).
#[derive(Debug, Deserialize)]
struct StatusRow {
    status: PaymentStatus,
}

/// Blocking HTTP client for the Supabase REST API.
#[derive(Clone)]
pub struct SupabaseClient {
    /// Project URL, e.g. `https://xyz.supabase.co`
    base_url: String,

    /// API key sent as `apikey` and bearer token
    api_key: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl SupabaseClient {
    /// Create a new client.
    pub fn new(base_url: String, api_key: String, timeout_secs: u64, metrics: Metrics) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics,
        }
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self::new(base_url, api_key, 10, Metrics::new())
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
    }

    /// Insert a payment row and return the stored representation.
    pub fn insert_payment(&self, request: &PaymentRequest) -> GatewayResult<PaymentReceipt> {
        let url = self.build_url(PAYMENTS_PATH);
        let body = serde_json::json!({
            "reference": generate_id("pay"),
            "phone": request.phone.as_str(),
            "amount": request.amount.value(),
            "basket_id": request.basket_id,
            "ussd_code": request.ussd_code.as_str(),
            "status": PaymentStatus::Pending,
        });

        tracing::debug!("POST {}", url);
        let timer = GatewayTimer::new(self.metrics.clone());
        let result = self
            .authorized(self.agent.post(&url))
            .set("Prefer", "return=representation")
            .send_json(&body)
            .map_err(Self::map_error);

        let response = match result {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                tracing::error!("POST {} - Error: {:?}", url, e);
                timer.complete_with_error();
                return Err(e);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;
        let rows: Vec<PaymentRow> = serde_json::from_str(&body)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Other("Insert returned no rows".to_string()))?;

        let ussd_code = UssdCode::new(row.ussd_code)
            .map_err(|e| GatewayError::Other(format!("Stored code is corrupt: {}", e)))?;

        Ok(PaymentReceipt {
            reference: row.reference,
            status: row.status,
            tel_uri: ussd_code.to_tel_uri(),
            ussd_code,
            created_at: row
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        })
    }

    /// Fetch the status of a payment by reference.
    pub fn payment_status(&self, reference: &str) -> GatewayResult<PaymentStatus> {
        let url = format!(
            "{}?reference=eq.{}&select=reference,status",
            self.build_url(PAYMENTS_PATH),
            urlencoding::encode(reference)
        );

        tracing::debug!("GET {}", url);
        let timer = GatewayTimer::new(self.metrics.clone());
        let result = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(Self::map_error);

        let response = match result {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                timer.complete_with_error();
                return Err(e);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;
        let rows: Vec<StatusRow> = serde_json::from_str(&body)?;

        rows.into_iter()
            .next()
            .map(|row| row.status)
            .ok_or_else(|| GatewayError::NotFound(reference.to_string()))
    }

    /// Map ureq errors to GatewayError.
    fn map_error(error: ureq::Error) -> GatewayError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 | 403 => GatewayError::Unauthorized,
                    404 => GatewayError::NotFound(message),
                    429 => GatewayError::RateLimitExceeded,
                    _ => GatewayError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    GatewayError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    GatewayError::Timeout
                } else {
                    GatewayError::HttpError(transport.to_string())
                }
            }
        }
    }
}

/// Async [`PaymentGateway`] backed by [`SupabaseClient`].
#[derive(Clone)]
pub struct SupabaseGateway {
    client: Arc<SupabaseClient>,
}

impl SupabaseGateway {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Build from configuration, requiring URL and key.
    pub fn from_config(config: &Config, metrics: Metrics) -> ConfigResult<Self> {
        let url = config
            .supabase_url
            .clone()
            .ok_or_else(|| ConfigError::MissingVar("SUPABASE_URL".to_string()))?;
        let key = config
            .supabase_key
            .clone()
            .ok_or_else(|| ConfigError::MissingVar("SUPABASE_ANON_KEY".to_string()))?;

        Ok(Self::new(SupabaseClient::new(
            url,
            key,
            config.request_timeout,
            metrics,
        )))
    }
}

#[async_trait]
impl PaymentGateway for SupabaseGateway {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn initiate(&self, request: &PaymentRequest) -> GatewayResult<PaymentReceipt> {
        let client = self.client.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || client.insert_payment(&request))
            .await
            .map_err(|e| GatewayError::Other(format!("Task join error: {}", e)))?
    }

    async fn status(&self, reference: &str) -> GatewayResult<PaymentStatus> {
        let client = self.client.clone();
        let reference = reference.to_string();

        tokio::task::spawn_blocking(move || client.payment_status(&reference))
            .await
            .map_err(|e| GatewayError::Other(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_cleanly() {
        let client =
            SupabaseClient::with_base_url("https://x.supabase.co/".to_string(), "k".to_string());
        assert_eq!(
            client.build_url(PAYMENTS_PATH),
            "https://x.supabase.co/rest/v1/payments"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config {
            supabase_url: Some("https://x.supabase.co".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            SupabaseGateway::from_config(&config, Metrics::new()),
            Err(ConfigError::MissingVar(_))
        ));
    }
}
