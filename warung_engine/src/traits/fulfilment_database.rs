use crate::{
    db_types::{Fulfilment, FulfilmentOutcome},
    helpers::order_reference::OrderRef,
    traits::FulfilmentError,
};

/// The `FulfilmentDatabase` trait defines the paid-order flow. This is the heart of the engine:
/// a verified `PAID` notification must result in **at most one** stock deduction per reference
/// token, no matter how many times the gateway replays the notification or how many callbacks
/// race each other.
#[allow(async_fn_in_trait)]
pub trait FulfilmentDatabase: Clone {
    /// Fulfils a paid order in a single atomic unit of work:
    /// * records the reference in the idempotency ledger; if it is already present, returns
    ///   [`FulfilmentOutcome::AlreadyFulfilled`] without touching anything else,
    /// * conditionally deducts the stock (`stock >= quantity` is re-checked at mutation time,
    ///   not trusted from any earlier reserve check) and increments the sold counter,
    /// * withdraws exactly `quantity` credentials from the front of the product's queue.
    ///
    /// If the stock check fails the whole unit of work is rolled back, including the ledger
    /// entry, and [`FulfilmentOutcome::InsufficientStock`] is returned.
    async fn fulfil_order(&self, order: &OrderRef, reference: &str) -> Result<FulfilmentOutcome, FulfilmentError>;

    /// Marks a ledger entry as delivered. Called after the credentials have been handed to the
    /// buyer. Delivery failures leave the flag unset so the credentials can be re-sent, but the
    /// stock is never deducted again.
    async fn mark_delivered(&self, reference: &str) -> Result<(), FulfilmentError>;

    /// Looks up the ledger entry for a reference, if any.
    async fn fetch_fulfilment(&self, reference: &str) -> Result<Option<Fulfilment>, FulfilmentError>;
}
