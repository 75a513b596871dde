//! Test doubles shared by the integration tests.

pub mod mock_payment_gateway;

pub use mock_payment_gateway::{GatewayBehavior, MockPaymentGateway};
