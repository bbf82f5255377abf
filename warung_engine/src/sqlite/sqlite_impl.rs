//! `SqliteDatabase` is a concrete implementation of a storefront engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module. All check-then-mutate sequences run inside a single transaction;
//! the stock deduction itself is a conditional UPDATE so that racing fulfilments serialize at
//! the database rather than in process memory.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;
use warung_common::Rupiah;

use super::db::{admins, fulfilments, new_pool, products};
use crate::{
    db_types::{Fulfilment, FulfilmentOutcome, NewProduct, Product, SalesSummary},
    helpers::order_reference::OrderRef,
    traits::{AdminApiError, AdminManagement, FulfilmentDatabase, FulfilmentError, InventoryError, InventoryManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database handle, creating the database file and schema if necessary.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl InventoryManagement for SqliteDatabase {
    async fn fetch_product(&self, code: &str) -> Result<Option<Product>, InventoryError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(code, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, InventoryError> {
        let mut conn = self.pool.acquire().await?;
        let catalogue = products::fetch_products(&mut conn).await?;
        Ok(catalogue)
    }

    async fn reserve_check(&self, code: &str, quantity: u32) -> Result<Product, InventoryError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(code, &mut conn)
            .await?
            .ok_or_else(|| InventoryError::ProductNotFound(code.to_string()))?;
        if product.stock < i64::from(quantity) {
            return Err(InventoryError::InsufficientStock {
                code: code.to_string(),
                requested: quantity,
                available: product.stock,
            });
        }
        Ok(product)
    }

    async fn add_product(&self, product: NewProduct) -> Result<Product, InventoryError> {
        if !product.price.is_positive() {
            return Err(InventoryError::InvalidPrice);
        }
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn add_stock(&self, code: &str, credential: &str) -> Result<i64, InventoryError> {
        let mut tx = self.pool.begin().await?;
        let stock = products::append_stock_item(code, credential, &mut tx).await?;
        let items = products::count_stock_items(code, &mut tx).await?;
        if stock != items {
            // The counter and the credential queue must move in lockstep.
            tx.rollback().await?;
            return Err(InventoryError::DatabaseError(format!(
                "stock counter ({stock}) and credential count ({items}) diverged for [{code}]"
            )));
        }
        tx.commit().await?;
        debug!("🗃️ Stock added to [{code}]. Now at {stock}");
        Ok(stock)
    }

    async fn set_price(&self, code: &str, price: Rupiah) -> Result<(), InventoryError> {
        let mut conn = self.pool.acquire().await?;
        products::update_price(code, price, &mut conn).await
    }

    async fn set_name(&self, code: &str, name: &str) -> Result<(), InventoryError> {
        let mut conn = self.pool.acquire().await?;
        products::update_name(code, name, &mut conn).await
    }

    async fn set_description(&self, code: &str, description: &str) -> Result<(), InventoryError> {
        let mut conn = self.pool.acquire().await?;
        products::update_description(code, description, &mut conn).await
    }

    async fn sales_summary(&self) -> Result<Vec<SalesSummary>, InventoryError> {
        let mut conn = self.pool.acquire().await?;
        let summary = products::sales_summary(&mut conn).await?;
        Ok(summary)
    }
}

impl FulfilmentDatabase for SqliteDatabase {
    /// Fulfils a paid order in a single transaction:
    /// * The ledger insert comes first. It is the transaction's first write, so concurrent
    ///   fulfilments for the same reference serialize here; the loser sees the committed row and
    ///   short-circuits without touching stock.
    /// * The stock deduction is a conditional UPDATE (`stock >= qty`), re-checked at mutation
    ///   time. Failure rolls the ledger entry back too, so a later restock can still fulfil the
    ///   reference.
    /// * Exactly `quantity` credentials come off the front of the queue, oldest first.
    async fn fulfil_order(&self, order: &OrderRef, reference: &str) -> Result<FulfilmentOutcome, FulfilmentError> {
        let mut tx = self.pool.begin().await?;
        let entered = fulfilments::idempotent_insert(reference, order, &mut tx).await?;
        if !entered {
            tx.rollback().await?;
            info!("🗃️ Reference [{reference}] has already been fulfilled. Nothing to do.");
            return Ok(FulfilmentOutcome::AlreadyFulfilled { reference: reference.to_string() });
        }
        let product = products::fetch_product(&order.product_code, &mut tx)
            .await?
            .ok_or_else(|| FulfilmentError::ProductNotFound(order.product_code.clone()))?;
        let deducted = products::deduct_stock(&order.product_code, order.quantity, &mut tx).await?;
        if !deducted {
            tx.rollback().await?;
            warn!(
                "🗃️ Paid order for [{}] x{} cannot be fulfilled: only {} in stock. The buyer must be refunded \
                 manually.",
                order.product_code, order.quantity, product.stock
            );
            return Ok(FulfilmentOutcome::InsufficientStock { order: order.clone(), available: product.stock });
        }
        let credentials = products::withdraw_stock_items(&order.product_code, order.quantity, &mut tx).await?;
        if credentials.len() != order.quantity as usize {
            tx.rollback().await?;
            error!(
                "🗃️ Stock counter for [{}] passed the deduction check but only {} credentials were queued. The \
                 store is inconsistent.",
                order.product_code,
                credentials.len()
            );
            return Err(FulfilmentError::StockLedgerDiverged(order.product_code.clone()));
        }
        tx.commit().await?;
        debug!("🗃️ Reference [{reference}] fulfilled. {} credentials withdrawn from [{}]", credentials.len(), order.product_code);
        Ok(FulfilmentOutcome::Fulfilled { order: order.clone(), product_name: product.name, credentials })
    }

    async fn mark_delivered(&self, reference: &str) -> Result<(), FulfilmentError> {
        let mut conn = self.pool.acquire().await?;
        let updated = fulfilments::mark_delivered(reference, &mut conn).await?;
        if !updated {
            return Err(FulfilmentError::FulfilmentNotFound(reference.to_string()));
        }
        Ok(())
    }

    async fn fetch_fulfilment(&self, reference: &str) -> Result<Option<Fulfilment>, FulfilmentError> {
        let mut conn = self.pool.acquire().await?;
        let fulfilment = fulfilments::fetch_fulfilment(reference, &mut conn).await?;
        Ok(fulfilment)
    }
}

impl AdminManagement for SqliteDatabase {
    async fn is_admin(&self, buyer_id: &str) -> Result<bool, AdminApiError> {
        let mut conn = self.pool.acquire().await?;
        let admin = admins::is_admin(buyer_id, &mut conn).await?;
        Ok(admin)
    }

    async fn add_admin(&self, buyer_id: &str) -> Result<(), AdminApiError> {
        let mut conn = self.pool.acquire().await?;
        admins::insert_admin(buyer_id, &mut conn).await?;
        Ok(())
    }

    async fn fetch_admins(&self) -> Result<Vec<String>, AdminApiError> {
        let mut conn = self.pool.acquire().await?;
        let admins = admins::fetch_admins(&mut conn).await?;
        Ok(admins)
    }
}
