//! Payment initiation.
//!
//! Turns raw form input (phone, amount, basket) into a validated MoMo code and
//! hands it to the configured gateway. When the gateway cannot be reached the
//! payment is parked in the offline queue instead of failing.

use crate::domain::{Amount, PhoneNumber};
use crate::error::{PaymentError, PaymentResult};
use crate::gateway::{PaymentGateway, PaymentReceipt, PaymentRequest, PaymentStatus};
use crate::metrics::Metrics;
use crate::storage::{OfflineQueue, QueuedPayment, SessionStore};
use crate::ussd::{build, UssdValidator};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// What happened to a payment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PaymentOutcome {
    /// Accepted by the gateway
    Submitted(PaymentReceipt),
    /// Gateway unreachable; stored for later submission
    Queued(QueuedPayment),
}

/// Payment service trait for business operations.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Validate input, build the MoMo code and submit it.
    async fn initiate(
        &self,
        phone: &str,
        amount: u64,
        basket_id: Option<String>,
    ) -> PaymentResult<PaymentOutcome>;

    /// Look up a submitted payment.
    async fn status(&self, reference: &str) -> PaymentResult<PaymentStatus>;

    /// Payments waiting in the offline queue.
    fn pending_offline(&self) -> PaymentResult<Vec<QueuedPayment>>;
}

/// Default implementation of PaymentService.
pub struct PaymentServiceImpl {
    gateway: Arc<dyn PaymentGateway>,
    session: SessionStore,
    queue: Arc<OfflineQueue>,
    metrics: Metrics,
    max_amount: u64,
}

impl PaymentServiceImpl {
    /// Create a new payment service.
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        session: SessionStore,
        queue: Arc<OfflineQueue>,
        metrics: Metrics,
        max_amount: u64,
    ) -> Self {
        Self {
            gateway,
            session,
            queue,
            metrics,
            max_amount,
        }
    }

    fn prepare(
        &self,
        phone: &str,
        amount: u64,
        basket_id: Option<String>,
    ) -> PaymentResult<PaymentRequest> {
        let phone = PhoneNumber::normalize(phone);
        if !phone.is_valid_rwanda_mobile() {
            return Err(PaymentError::InvalidPhone(phone.into_inner()));
        }

        if amount > self.max_amount {
            return Err(PaymentError::InvalidAmount(amount));
        }
        let amount = Amount::new(amount)?;

        let ussd_code = build(&phone, amount.value())?;
        let check = UssdValidator::new().validate(ussd_code.as_str());
        if !check.is_valid {
            return Err(PaymentError::InvalidCode(ussd_code.into_inner()));
        }

        Ok(PaymentRequest {
            phone,
            amount,
            ussd_code,
            basket_id,
        })
    }
}

#[async_trait]
impl PaymentService for PaymentServiceImpl {
    async fn initiate(
        &self,
        phone: &str,
        amount: u64,
        basket_id: Option<String>,
    ) -> PaymentResult<PaymentOutcome> {
        let request = self.prepare(phone, amount, basket_id)?;
        self.session.remember_phone(&request.phone)?;

        match self.gateway.initiate(&request).await {
            Ok(receipt) => {
                self.metrics.record_payment_submitted();
                tracing::info!(
                    reference = %receipt.reference,
                    gateway = self.gateway.name(),
                    "Payment submitted"
                );
                Ok(PaymentOutcome::Submitted(receipt))
            }
            Err(e) if e.is_transport() => {
                tracing::warn!(
                    "Gateway {} unreachable, queueing payment: {}",
                    self.gateway.name(),
                    e
                );
                let queued = QueuedPayment::new(
                    request.phone,
                    request.amount,
                    request.basket_id,
                    request.ussd_code,
                );
                self.queue.enqueue(queued.clone())?;
                self.metrics.record_payment_queued();
                Ok(PaymentOutcome::Queued(queued))
            }
            Err(e) => {
                tracing::error!("Payment rejected by {}: {}", self.gateway.name(), e);
                Err(e.into())
            }
        }
    }

    async fn status(&self, reference: &str) -> PaymentResult<PaymentStatus> {
        Ok(self.gateway.status(reference).await?)
    }

    fn pending_offline(&self) -> PaymentResult<Vec<QueuedPayment>> {
        Ok(self.queue.pending()?)
    }
}
