//! In-memory gateway for development and tests.

use super::{PaymentGateway, PaymentReceipt, PaymentRequest, PaymentStatus};
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Gateway that keeps receipts in memory.
///
/// Every payment starts as `Pending`; tests move it on with
/// [`MockGateway::set_status`].
#[derive(Clone, Default)]
pub struct MockGateway {
    receipts: Arc<Mutex<HashMap<String, PaymentReceipt>>>,
    next_reference: Arc<AtomicU64>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the status of a recorded payment.
    pub fn set_status(&self, reference: &str, status: PaymentStatus) -> GatewayResult<()> {
        let mut receipts = self.lock()?;
        let receipt = receipts
            .get_mut(reference)
            .ok_or_else(|| GatewayError::NotFound(reference.to_string()))?;
        receipt.status = status;
        Ok(())
    }

    /// Number of recorded payments.
    pub fn payment_count(&self) -> usize {
        self.receipts.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn lock(
        &self,
    ) -> GatewayResult<std::sync::MutexGuard<'_, HashMap<String, PaymentReceipt>>> {
        self.receipts
            .lock()
            .map_err(|_| GatewayError::Other("mock gateway lock poisoned".to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn initiate(&self, request: &PaymentRequest) -> GatewayResult<PaymentReceipt> {
        let n = self.next_reference.fetch_add(1, Ordering::Relaxed) + 1;
        let receipt = PaymentReceipt {
            reference: format!("MOCK-{:06}", n),
            status: PaymentStatus::Pending,
            ussd_code: request.ussd_code.clone(),
            tel_uri: request.ussd_code.to_tel_uri(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        tracing::info!(
            reference = %receipt.reference,
            phone = %request.phone,
            amount = request.amount.value(),
            "Mock payment recorded"
        );

        self.lock()?
            .insert(receipt.reference.clone(), receipt.clone());
        Ok(receipt)
    }

    async fn status(&self, reference: &str) -> GatewayResult<PaymentStatus> {
        self.lock()?
            .get(reference)
            .map(|r| r.status)
            .ok_or_else(|| GatewayError::NotFound(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, PhoneNumber};
    use crate::ussd::build;

    fn request() -> PaymentRequest {
        let phone = PhoneNumber::normalize("0788123456");
        PaymentRequest {
            ussd_code: build(&phone, 1000).unwrap(),
            phone,
            amount: Amount::new(1000).unwrap(),
            basket_id: Some("basket-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_initiate_records_pending_payment() {
        let gateway = MockGateway::new();
        let receipt = gateway.initiate(&request()).await.unwrap();

        assert_eq!(receipt.reference, "MOCK-000001");
        assert_eq!(receipt.status, PaymentStatus::Pending);
        assert_eq!(
            receipt.tel_uri,
            "tel:%2A182%2A1%2A1%2A0788123456%2A1000%23"
        );
        assert_eq!(gateway.payment_count(), 1);
    }

    #[tokio::test]
    async fn test_status_lookup() {
        let gateway = MockGateway::new();
        let receipt = gateway.initiate(&request()).await.unwrap();

        gateway
            .set_status(&receipt.reference, PaymentStatus::Completed)
            .unwrap();
        assert_eq!(
            gateway.status(&receipt.reference).await.unwrap(),
            PaymentStatus::Completed
        );
        assert!(matches!(
            gateway.status("MOCK-999999").await,
            Err(GatewayError::NotFound(_))
        ));
    }
}
