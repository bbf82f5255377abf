use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Fulfilment, FulfilmentOutcome, PaymentStatus},
    helpers::order_reference::OrderRef,
    traits::{FulfilmentDatabase, FulfilmentError},
};

/// `ReconciliationApi` is the orchestrator for verified payment notifications. Given a reference
/// token and the payment status the gateway reported, it decodes the token, routes terminal
/// non-payment statuses to a no-op outcome, and hands `PAID` notifications to the backend's
/// atomic fulfilment path.
///
/// Callers must only invoke this with notifications whose signatures have already been verified.
/// The at-most-once guarantee lives in the backend's idempotency ledger, so replayed or racing
/// notifications for the same reference are safe here.
pub struct ReconciliationApi<B> {
    db: B,
}

impl<B> Debug for ReconciliationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B> ReconciliationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReconciliationApi<B>
where B: FulfilmentDatabase
{
    /// Reconciles a verified payment notification against the store.
    pub async fn reconcile(&self, reference: &str, status: PaymentStatus) -> Result<FulfilmentOutcome, FulfilmentError> {
        let order = OrderRef::from_token(reference)?;
        trace!("🔄️ Reconciling [{reference}] ({order}) with status {status}");
        match status {
            PaymentStatus::Paid => {
                let outcome = self.db.fulfil_order(&order, reference).await?;
                if let FulfilmentOutcome::Fulfilled { credentials, .. } = &outcome {
                    info!("🔄️💰️ [{reference}] fulfilled. {} credential(s) ready for delivery", credentials.len());
                }
                Ok(outcome)
            },
            PaymentStatus::Failed | PaymentStatus::Expired => {
                info!("🔄️❌️ [{reference}] reported as {status}. The order is cancelled.");
                Ok(FulfilmentOutcome::Cancelled { order, status })
            },
            PaymentStatus::Pending => {
                debug!("🔄️ [{reference}] is still pending. Nothing to do.");
                Ok(FulfilmentOutcome::Pending { reference: reference.to_string() })
            },
        }
    }

    /// Records that the credentials for a fulfilled reference reached the buyer. A failed
    /// delivery leaves the ledger entry undelivered; the retry path is redelivery only, never a
    /// second fulfilment.
    pub async fn mark_delivered(&self, reference: &str) -> Result<(), FulfilmentError> {
        self.db.mark_delivered(reference).await
    }

    pub async fn fulfilment(&self, reference: &str) -> Result<Option<Fulfilment>, FulfilmentError> {
        self.db.fetch_fulfilment(reference).await
    }
}
