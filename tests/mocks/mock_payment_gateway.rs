use async_trait::async_trait;
use ikanisa_momo::error::{GatewayError, GatewayResult};
use ikanisa_momo::gateway::{PaymentGateway, PaymentReceipt, PaymentRequest, PaymentStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How the scripted gateway answers `initiate`.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayBehavior {
    Accept,
    Unreachable,
    TimeOut,
    Reject,
}

/// Gateway mock with scripted failures and call tracking.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockPaymentGateway {
    behavior: Arc<Mutex<GatewayBehavior>>,
    requests: Arc<Mutex<Vec<PaymentRequest>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockPaymentGateway {
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn set_behavior(&self, behavior: GatewayBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initiate(&self, request: &PaymentRequest) -> GatewayResult<PaymentReceipt> {
        self.track_call("initiate");
        self.requests.lock().unwrap().push(request.clone());

        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            GatewayBehavior::Accept => Ok(PaymentReceipt {
                reference: format!("TEST-{}", self.get_call_count("initiate")),
                status: PaymentStatus::Pending,
                ussd_code: request.ussd_code.clone(),
                tel_uri: request.ussd_code.to_tel_uri(),
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
            }),
            GatewayBehavior::Unreachable => {
                Err(GatewayError::HttpError("Connection failed".to_string()))
            }
            GatewayBehavior::TimeOut => Err(GatewayError::Timeout),
            GatewayBehavior::Reject => Err(GatewayError::ApiError {
                status: 422,
                message: "duplicate payment".to_string(),
            }),
        }
    }

    async fn status(&self, reference: &str) -> GatewayResult<PaymentStatus> {
        self.track_call("status");
        if reference.starts_with("TEST-") {
            Ok(PaymentStatus::Completed)
        } else {
            Err(GatewayError::NotFound(reference.to_string()))
        }
    }
}
