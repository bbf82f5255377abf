//! Behaviour contracts for storefront engine backends.
//!
//! * [`InventoryManagement`] covers the product catalogue: lookups, stock additions and the
//!   administrative mutators.
//! * [`FulfilmentDatabase`] covers the paid-order flow: the atomic check-deduct-withdraw
//!   sequence and the idempotency ledger that makes it at-most-once per reference.
//! * [`AdminManagement`] covers the set of identities allowed to run privileged commands.
//!
//! The concrete SQLite backend implements all three; the public API structs
//! ([`crate::InventoryApi`], [`crate::ReconciliationApi`], [`crate::AdminApi`]) are generic over
//! them so that tests can substitute their own backends.
mod admin_management;
mod errors;
mod fulfilment_database;
mod inventory_management;

pub use admin_management::AdminManagement;
pub use errors::{AdminApiError, FulfilmentError, InventoryError};
pub use fulfilment_database::FulfilmentDatabase;
pub use inventory_management::InventoryManagement;
