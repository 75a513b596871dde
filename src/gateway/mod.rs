//! Payment gateway capability.
//!
//! The payment service talks to whichever backend is wired in through the
//! [`PaymentGateway`] trait; the validation core never sees it.

mod mock;
mod supabase;

pub use mock::MockGateway;
pub use supabase::{SupabaseClient, SupabaseGateway, PAYMENTS_PATH};

use crate::config::Config;
use crate::domain::{Amount, PhoneNumber, UssdCode};
use crate::error::{ConfigResult, GatewayResult};
use crate::metrics::Metrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Lifecycle state of a submitted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// A payment ready to be handed to a gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub phone: PhoneNumber,
    pub amount: Amount,
    pub ussd_code: UssdCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basket_id: Option<String>,
}

/// Gateway acknowledgement of a payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub reference: String,
    pub status: PaymentStatus,
    pub ussd_code: UssdCode,
    /// Dialer URI for the code
    pub tel_uri: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Backend that records payments and reports their status.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Record a new payment and return its receipt.
    async fn initiate(&self, request: &PaymentRequest) -> GatewayResult<PaymentReceipt>;

    /// Look up the status of a payment by reference.
    async fn status(&self, reference: &str) -> GatewayResult<PaymentStatus>;
}

/// Which gateway implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Mock,
    Supabase,
}

impl FromStr for GatewayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "supabase" => Ok(Self::Supabase),
            other => Err(format!(
                "Unknown payment gateway '{}', expected 'mock' or 'supabase'",
                other
            )),
        }
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Supabase => f.write_str("supabase"),
        }
    }
}

/// Construct the gateway selected by `config`.
pub fn build_gateway(config: &Config, metrics: Metrics) -> ConfigResult<Arc<dyn PaymentGateway>> {
    match config.gateway {
        GatewayKind::Mock => Ok(Arc::new(MockGateway::new())),
        GatewayKind::Supabase => Ok(Arc::new(SupabaseGateway::from_config(config, metrics)?)),
    }
}
