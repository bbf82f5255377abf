use warung_common::Rupiah;

use crate::{
    db_types::{NewProduct, Product, SalesSummary},
    traits::InventoryError,
};

/// The `InventoryManagement` trait defines the behaviour a backend must expose to support the
/// product catalogue.
///
/// Stock is a FIFO queue of opaque credential strings per product. The `stock` counter on a
/// product and the number of queued credentials must stay equal at all times; every implementation
/// must maintain the pair inside a single atomic unit of work.
#[allow(async_fn_in_trait)]
pub trait InventoryManagement: Clone {
    /// Fetches a single product by its code.
    async fn fetch_product(&self, code: &str) -> Result<Option<Product>, InventoryError>;

    /// Fetches the full catalogue, ordered by product code.
    async fn fetch_products(&self) -> Result<Vec<Product>, InventoryError>;

    /// Read-only stock check performed before a payment intent is created. Returns the product so
    /// the caller has the current price and name at hand.
    ///
    /// This places no hold on the stock. The stock can be sold to another buyer between this
    /// check and payment confirmation; fulfilment re-validates and refuses rather than oversells.
    async fn reserve_check(&self, code: &str, quantity: u32) -> Result<Product, InventoryError>;

    /// Creates a new product with zero stock. Fails with [`InventoryError::DuplicateProduct`] if
    /// the code is already taken.
    async fn add_product(&self, product: NewProduct) -> Result<Product, InventoryError>;

    /// Appends one credential to the product's stock queue and increments its stock counter,
    /// atomically. Returns the new stock level.
    async fn add_stock(&self, code: &str, credential: &str) -> Result<i64, InventoryError>;

    /// Updates the product price. The price must be positive.
    async fn set_price(&self, code: &str, price: Rupiah) -> Result<(), InventoryError>;

    /// Updates the product display name.
    async fn set_name(&self, code: &str, name: &str) -> Result<(), InventoryError>;

    /// Updates the product description.
    async fn set_description(&self, code: &str, description: &str) -> Result<(), InventoryError>;

    /// Per-product units sold and revenue, ordered by product code.
    async fn sales_summary(&self) -> Result<Vec<SalesSummary>, InventoryError>;
}
