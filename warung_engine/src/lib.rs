//! Warung Storefront Engine
//!
//! The storefront engine holds the core logic for a small shop selling digital goods (account
//! credentials) through a chat front end and an external payment gateway. This library is
//! provider-agnostic: the HTTP server, the chat transport and the gateway client all live
//! elsewhere and talk to the engine through its public API.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is currently the only supported
//!    backend. You should never need to access the database directly. Instead, use the public
//!    APIs, which are generic over the backend traits in [`mod@traits`].
//! 2. The engine public API: [`InventoryApi`] for the product catalogue and stock,
//!    [`AdminApi`] for the privileged-user set, and [`ReconciliationApi`] for turning verified
//!    payment notifications into exactly-once fulfilments.
//!
//! The [`helpers::order_reference`] module implements the stateless order-reference codec that
//! links a payment intent back to the order it was created for.
pub mod db_types;
pub mod helpers;
pub mod traits;

mod api;
mod sqlite;

pub use api::{AdminApi, InventoryApi, ReconciliationApi};
pub use sqlite::{db_url, SqliteDatabase};
