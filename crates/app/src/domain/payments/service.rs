//! Payments service.

use std::{net::IpAddr, sync::Arc};

use async_trait::async_trait;
use gennessence::signature;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        orders::records::OrderUuid,
        payments::{
            config::PaymentGatewayConfig,
            errors::PaymentsServiceError,
            notification::{PaymentNotification, Resolution, field, resolve},
            redirect::{PaymentRedirect, PaymentRequest, build_redirect},
            repository::PgPaymentsRepository,
        },
    },
};

/// Result of an accepted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationReceipt {
    pub order: OrderUuid,
    pub resolution: Resolution,
}

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    repository: PgPaymentsRepository,
    config: Arc<PaymentGatewayConfig>,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db, config: PaymentGatewayConfig) -> Self {
        Self {
            db,
            repository: PgPaymentsRepository::new(),
            config: Arc::new(config),
        }
    }

    fn authenticate(
        &self,
        source: IpAddr,
        params: &[(String, String)],
    ) -> Result<(), PaymentsServiceError> {
        let received = field(params, signature::SIGNATURE_FIELD)
            .ok_or(PaymentsServiceError::InvalidSignature)?;

        let signed = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()));

        if !signature::verify(signed, self.config.passphrase(), received) {
            return Err(PaymentsServiceError::InvalidSignature);
        }

        if !self.config.is_trusted_source(source) {
            return Err(PaymentsServiceError::UntrustedSource(source));
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRedirect, PaymentsServiceError> {
        build_redirect(&self.config, request)
    }

    async fn handle_notification(
        &self,
        source: IpAddr,
        params: Vec<(String, String)>,
    ) -> Result<NotificationReceipt, PaymentsServiceError> {
        self.authenticate(source, &params)?;

        let notification = PaymentNotification::from_params(&params)?;

        let mut tx = self.db.begin().await?;

        let current = self
            .repository
            .lock_order_payment(&mut tx, notification.order)
            .await?;

        if let Some(received) = notification.amount_gross
            && received != current.total
        {
            return Err(PaymentsServiceError::AmountMismatch {
                expected: current.total,
                received,
            });
        }

        let mut resolution = resolve(current.status, current.payment_status, notification.status);

        if let Resolution::Apply {
            status,
            payment_status,
        } = resolution
        {
            let applied = self
                .repository
                .apply_payment_change(
                    &mut tx,
                    notification.order,
                    current,
                    status,
                    payment_status,
                    notification.gateway_reference.as_deref(),
                )
                .await?;

            if !applied {
                resolution = Resolution::Duplicate;
            }
        }

        tx.commit().await?;

        match resolution {
            Resolution::Apply {
                status,
                payment_status,
            } => info!(
                order_uuid = %notification.order,
                %status,
                %payment_status,
                "applied payment notification"
            ),
            Resolution::Duplicate => info!(
                order_uuid = %notification.order,
                "duplicate payment notification"
            ),
            Resolution::Ignore => warn!(
                order_uuid = %notification.order,
                notification = ?notification.status,
                current = %current.payment_status,
                "ignored payment notification"
            ),
        }

        Ok(NotificationReceipt {
            order: notification.order,
            resolution,
        })
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Signed payment page URL for a checkout.
    fn create_payment(&self, request: &PaymentRequest)
    -> Result<PaymentRedirect, PaymentsServiceError>;

    /// Verify a gateway notification and apply it to its order.
    ///
    /// The signature is checked first, then the sender address, then the
    /// order. Applying the same notification twice changes nothing the second
    /// time.
    async fn handle_notification(
        &self,
        source: IpAddr,
        params: Vec<(String, String)>,
    ) -> Result<NotificationReceipt, PaymentsServiceError>;
}
