//! MCP tool handlers for the IKANISA MoMo server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::config::Config;
use crate::domain::PhoneNumber;
use crate::error::{ConfigResult, PaymentError};
use crate::gateway::build_gateway;
use crate::metrics::Metrics;
use crate::services::{
    PaymentService, PaymentServiceImpl, ValidationService, ValidationServiceImpl,
};
use crate::storage::{InMemoryStore, KeyValueStore, OfflineQueue, SessionStore};
use crate::ussd::{build, encode_for_tel, scan};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing MoMo payment-code tools.
#[derive(Clone)]
pub struct IkanisaMcpServer {
    validation_service: Arc<dyn ValidationService>,
    payment_service: Arc<dyn PaymentService>,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for IkanisaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "ikanisa-momo".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MoMo payment-code tools for IKANISA savings baskets - phone normalization, USSD building and validation, QR extraction and payment initiation.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneParams {
    phone: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BuildUssdParams {
    phone: String,
    amount: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UssdParams {
    code: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct QrParams {
    qr_text: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct InitiatePaymentParams {
    phone: String,
    amount: u64,
    #[serde(default)]
    basket_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PaymentReferenceParams {
    reference: String,
}

fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn to_invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn payment_error(e: PaymentError) -> McpError {
    match e {
        PaymentError::InvalidPhone(_)
        | PaymentError::InvalidAmount(_)
        | PaymentError::InvalidCode(_) => to_invalid_params(e),
        other => to_mcp_error(other),
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl IkanisaMcpServer {
    /// Create a new server from its services.
    pub fn new(
        validation_service: Arc<dyn ValidationService>,
        payment_service: Arc<dyn PaymentService>,
        metrics: Metrics,
    ) -> Self {
        Self {
            validation_service,
            payment_service,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Wire services, gateway and an in-memory store from configuration.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let metrics = Metrics::new();
        let store = Arc::new(InMemoryStore::new()) as Arc<dyn KeyValueStore>;

        let validation_service = Arc::new(ValidationServiceImpl::new(
            config.suggestion_engine.build(),
            metrics.clone(),
        )) as Arc<dyn ValidationService>;

        let payment_service = Arc::new(PaymentServiceImpl::new(
            build_gateway(config, metrics.clone())?,
            SessionStore::new(store.clone()),
            Arc::new(OfflineQueue::new(store)),
            metrics.clone(),
            config.max_payment_amount,
        )) as Arc<dyn PaymentService>;

        Ok(Self::new(validation_service, payment_service, metrics))
    }

    /// Normalize a phone number to local 0XXXXXXXXX form.
    #[tool(
        description = "Normalize a Rwanda phone number to local 0XXXXXXXXX form and report whether it is a valid mobile number and which carrier it belongs to"
    )]
    async fn normalize_phone(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let phone = PhoneNumber::normalize(&params.0.phone);

        json_result(&serde_json::json!({
            "normalized": phone.as_str(),
            "is_valid_rwanda_mobile": phone.is_valid_rwanda_mobile(),
            "carrier": phone.carrier(),
        }))
    }

    /// Build the MoMo transfer code for a phone and amount.
    #[tool(description = "Build the MoMo transfer USSD code *182*1*1*{phone}*{amount}# for a phone number and a positive amount")]
    async fn build_ussd(
        &self,
        params: Parameters<BuildUssdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let phone = PhoneNumber::normalize(&params.phone);
        let code = build(&phone, params.amount).map_err(to_invalid_params)?;

        json_result(&serde_json::json!({
            "phone": phone,
            "ussd_code": code,
            "tel_uri": code.to_tel_uri(),
        }))
    }

    /// Validate a typed USSD code.
    #[tool(
        description = "Validate a USSD code typed by the user. Returns validity, provider, confidence, errors and correction suggestions."
    )]
    async fn validate_ussd(
        &self,
        params: Parameters<UssdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.validation_service.process_manual(&params.0.code);
        json_result(&result)
    }

    /// Extract the first USSD code from scanned QR text.
    #[tool(description = "Extract the first USSD code embedded in decoded QR text, without validating it further")]
    async fn extract_ussd(&self, params: Parameters<QrParams>) -> Result<CallToolResult, McpError> {
        let scanned = scan(&params.0.qr_text);
        self.metrics.record_extraction(scanned.extracted_ussd.is_some());
        json_result(&scanned)
    }

    /// Run the full extract-then-validate pipeline on QR text.
    #[tool(
        description = "Extract and validate the USSD code in decoded QR text. Returns a validation result with suggestions when no valid code is found."
    )]
    async fn process_qr(&self, params: Parameters<QrParams>) -> Result<CallToolResult, McpError> {
        let result = self.validation_service.process_qr(&params.0.qr_text);
        json_result(&result)
    }

    /// Encode a USSD code as a tel: URI.
    #[tool(description = "Percent-encode a USSD code as a tel: URI for a phone dialer")]
    async fn encode_tel(&self, params: Parameters<UssdParams>) -> Result<CallToolResult, McpError> {
        json_result(&serde_json::json!({
            "tel_uri": encode_for_tel(&params.0.code),
        }))
    }

    /// Initiate a MoMo payment.
    #[tool(
        description = "Initiate a MoMo payment into a savings basket. The payment is queued offline when the payment backend is unreachable."
    )]
    async fn initiate_payment(
        &self,
        params: Parameters<InitiatePaymentParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!("MCP Handler: initiate_payment called");
        tracing::debug!(
            "Parameters: amount={}, basket_id={:?}",
            params.amount,
            params.basket_id
        );

        let outcome = self
            .payment_service
            .initiate(&params.phone, params.amount, params.basket_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to initiate payment: {:?}", e);
                payment_error(e)
            })?;

        json_result(&outcome)
    }

    /// Look up the status of a payment.
    #[tool(description = "Look up the status of a previously initiated payment by reference")]
    async fn payment_status(
        &self,
        params: Parameters<PaymentReferenceParams>,
    ) -> Result<CallToolResult, McpError> {
        let reference = params.0.reference;
        let status = self
            .payment_service
            .status(&reference)
            .await
            .map_err(payment_error)?;

        json_result(&serde_json::json!({
            "reference": reference,
            "status": status,
        }))
    }

    /// List payments parked in the offline queue.
    #[tool(description = "List payments waiting in the offline queue")]
    async fn list_offline_payments(&self) -> Result<CallToolResult, McpError> {
        let pending = self
            .payment_service
            .pending_offline()
            .map_err(payment_error)?;

        json_result(&serde_json::json!({
            "count": pending.len(),
            "payments": pending,
        }))
    }

    /// Report validation and payment counters.
    #[tool(description = "Report validation, extraction and payment counters")]
    async fn get_metrics(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.metrics.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> IkanisaMcpServer {
        IkanisaMcpServer::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "ikanisa-momo");
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_build_ussd_rejects_zero_amount() {
        let server = server();
        let result = server
            .build_ussd(Parameters(BuildUssdParams {
                phone: "0788123456".to_string(),
                amount: 0,
            }))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_validation_tools_update_metrics() {
        let server = server();
        server
            .validate_ussd(Parameters(UssdParams {
                code: "*182*8*1#".to_string(),
            }))
            .await
            .unwrap();
        server
            .process_qr(Parameters(QrParams {
                qr_text: "no code here".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(server.metrics.validations_total(), 2);
        assert_eq!(server.metrics.validations_valid_total(), 1);
        assert_eq!(server.metrics.extraction_misses_total(), 1);
    }

    #[tokio::test]
    async fn test_extract_ussd_counts_hits_and_misses() {
        let server = server();
        for qr_text in ["pay *182*8*1#", "no code here"] {
            server
                .extract_ussd(Parameters(QrParams {
                    qr_text: qr_text.to_string(),
                }))
                .await
                .unwrap();
        }

        assert_eq!(server.metrics.extraction_hits_total(), 1);
        assert_eq!(server.metrics.extraction_misses_total(), 1);
        assert_eq!(server.metrics.validations_total(), 0);
    }

    #[tokio::test]
    async fn test_initiate_payment_invalid_phone() {
        let server = server();
        let err = server
            .initiate_payment(Parameters(InitiatePaymentParams {
                phone: "12345".to_string(),
                amount: 1000,
                basket_id: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_initiate_payment_then_status() {
        let server = server();
        server
            .initiate_payment(Parameters(InitiatePaymentParams {
                phone: "0788123456".to_string(),
                amount: 1000,
                basket_id: Some("basket-1".to_string()),
            }))
            .await
            .unwrap();

        server
            .payment_status(Parameters(PaymentReferenceParams {
                reference: "MOCK-000001".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(server.metrics.payments_submitted_total(), 1);
    }
}
