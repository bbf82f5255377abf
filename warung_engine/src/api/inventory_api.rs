use std::fmt::Debug;

use log::*;
use warung_common::Rupiah;

use crate::{
    db_types::{NewProduct, Product, SalesSummary},
    traits::{InventoryError, InventoryManagement},
};

/// `InventoryApi` is the public face of the product catalogue: lookups for the menu, the
/// pre-payment stock check, and the administrative mutators behind the privileged chat commands.
pub struct InventoryApi<B> {
    db: B,
}

impl<B> Debug for InventoryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InventoryApi")
    }
}

impl<B> InventoryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> InventoryApi<B>
where B: InventoryManagement
{
    pub async fn product(&self, code: &str) -> Result<Option<Product>, InventoryError> {
        self.db.fetch_product(code).await
    }

    pub async fn products(&self) -> Result<Vec<Product>, InventoryError> {
        self.db.fetch_products().await
    }

    /// Read-only check that `quantity` units of `code` are currently in stock. No hold is placed;
    /// fulfilment re-validates when the payment lands.
    pub async fn reserve_check(&self, code: &str, quantity: u32) -> Result<Product, InventoryError> {
        self.db.reserve_check(code, quantity).await
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, InventoryError> {
        let product = self.db.add_product(product).await?;
        info!("📦️ New product [{}] added to the catalogue at {}", product.code, product.price);
        Ok(product)
    }

    /// Appends one credential to the product's stock. Returns the new stock level.
    pub async fn add_stock(&self, code: &str, credential: &str) -> Result<i64, InventoryError> {
        let stock = self.db.add_stock(code, credential).await?;
        info!("📦️ Stock added for [{code}]. {stock} unit(s) now available");
        Ok(stock)
    }

    pub async fn set_price(&self, code: &str, price: Rupiah) -> Result<(), InventoryError> {
        self.db.set_price(code, price).await?;
        info!("📦️ Price for [{code}] changed to {price}");
        Ok(())
    }

    pub async fn set_name(&self, code: &str, name: &str) -> Result<(), InventoryError> {
        self.db.set_name(code, name).await
    }

    pub async fn set_description(&self, code: &str, description: &str) -> Result<(), InventoryError> {
        self.db.set_description(code, description).await
    }

    pub async fn sales_summary(&self) -> Result<Vec<SalesSummary>, InventoryError> {
        self.db.sales_summary().await
    }
}
