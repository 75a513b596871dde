//! Application service layer.
//!
//! Services orchestrate the validation core, the suggestion engine, the
//! payment gateway and storage. They provide a clean boundary between the
//! MCP handlers and everything underneath.

mod payment_service;
mod validation_service;

pub use payment_service::{PaymentOutcome, PaymentService, PaymentServiceImpl};
pub use validation_service::{ValidationService, ValidationServiceImpl, NO_CODE_IN_SCAN_ERROR};
