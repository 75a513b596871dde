//! IKANISA MoMo - mobile-money payment-code core for community savings baskets.
//!
//! This library normalizes phone numbers, builds and validates MoMo USSD codes,
//! recovers codes from scanned QR payloads and hands payments to a pluggable
//! backend. An MCP server binary exposes the same operations as tools.
//!
//! # Architecture
//!
//! - **domain**: Value objects for phone numbers, USSD codes and amounts
//! - **ussd**: Builder, validator, QR extractor and `tel:` encoding
//! - **suggestions**: Pluggable correction hints for invalid codes
//! - **services**: Composite validation pipeline and payment initiation
//! - **gateway**: Payment backend capability (mock, Supabase)
//! - **storage**: Key-value capability, session state and offline queue
//! - **metrics**: Counters for validations, extractions and payments
//! - **config**: Configuration from environment variables
//! - **error**: Custom error types
//! - **server**: MCP protocol server

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod server;
pub mod services;
pub mod storage;
pub mod suggestions;
pub mod ussd;

pub use config::Config;
pub use domain::{is_valid_rwanda_mobile, Amount, PhoneNumber, Provider, UssdCode, UssdType};
pub use error::{ConfigError, GatewayError, PaymentError, StorageError};
pub use gateway::{MockGateway, PaymentGateway, SupabaseGateway};
pub use metrics::{Metrics, MetricsSummary};
pub use server::IkanisaMcpServer;
pub use services::{PaymentOutcome, PaymentService, ValidationService};
pub use suggestions::{SuggestionEngine, SuggestionEngineKind};
pub use ussd::{build, encode_for_tel, extract, scan, validate, ScanResult, ValidationResult};
