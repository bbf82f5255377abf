use log::debug;
use sqlx::SqliteConnection;
use warung_common::Rupiah;

use crate::{
    db_types::{NewProduct, Product, SalesSummary},
    traits::InventoryError,
};

pub async fn fetch_product(code: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE code = $1")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(product)
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY code").fetch_all(&mut *conn).await?;
    Ok(products)
}

/// Inserts a new product with zero stock. A duplicate code maps onto
/// [`InventoryError::DuplicateProduct`].
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, InventoryError> {
    let inserted = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (code, name, price, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *;
        "#,
    )
    .bind(&product.code)
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.description)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(de) if de.is_unique_violation() => InventoryError::DuplicateProduct(product.code.clone()),
        e => e.into(),
    })?;
    debug!("🗃️ Product [{}] created", inserted.code);
    Ok(inserted)
}

/// Appends a credential to the product's stock queue and bumps the stock counter. Both writes
/// must run inside the caller's transaction.
pub async fn append_stock_item(
    code: &str,
    credential: &str,
    conn: &mut SqliteConnection,
) -> Result<i64, InventoryError> {
    let updated = sqlx::query("UPDATE products SET stock = stock + 1, updated_at = CURRENT_TIMESTAMP WHERE code = $1")
        .bind(code)
        .execute(&mut *conn)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(InventoryError::ProductNotFound(code.to_string()));
    }
    sqlx::query("INSERT INTO stock_items (product_code, credential) VALUES ($1, $2)")
        .bind(code)
        .bind(credential)
        .execute(&mut *conn)
        .await?;
    let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE code = $1")
        .bind(code)
        .fetch_one(&mut *conn)
        .await?;
    Ok(stock)
}

/// Conditionally deducts stock and increments the sold counter. The `stock >= quantity` guard is
/// part of the UPDATE itself, so two racing fulfilments can never both pass the check. Returns
/// `false` when the guard fails.
pub async fn deduct_stock(code: &str, quantity: u32, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - $1, sold = sold + $1, updated_at = CURRENT_TIMESTAMP
        WHERE code = $2 AND stock >= $1;
        "#,
    )
    .bind(i64::from(quantity))
    .bind(code)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Withdraws the `quantity` oldest credentials for the product, in the order they were added.
/// The rows are selected first and then deleted by id so that the FIFO order of the returned
/// credentials is deterministic.
pub async fn withdraw_stock_items(
    code: &str,
    quantity: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, credential FROM stock_items WHERE product_code = $1 ORDER BY id LIMIT $2",
    )
    .bind(code)
    .bind(i64::from(quantity))
    .fetch_all(&mut *conn)
    .await?;
    let mut credentials = Vec::with_capacity(rows.len());
    for (id, credential) in rows {
        sqlx::query("DELETE FROM stock_items WHERE id = $1").bind(id).execute(&mut *conn).await?;
        credentials.push(credential);
    }
    Ok(credentials)
}

pub async fn count_stock_items(code: &str, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_items WHERE product_code = $1")
        .bind(code)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn update_price(code: &str, price: Rupiah, conn: &mut SqliteConnection) -> Result<(), InventoryError> {
    if !price.is_positive() {
        return Err(InventoryError::InvalidPrice);
    }
    let result = sqlx::query("UPDATE products SET price = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2")
        .bind(price)
        .bind(code)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(InventoryError::ProductNotFound(code.to_string()));
    }
    Ok(())
}

pub async fn update_name(code: &str, name: &str, conn: &mut SqliteConnection) -> Result<(), InventoryError> {
    let result = sqlx::query("UPDATE products SET name = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2")
        .bind(name)
        .bind(code)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(InventoryError::ProductNotFound(code.to_string()));
    }
    Ok(())
}

pub async fn update_description(
    code: &str,
    description: &str,
    conn: &mut SqliteConnection,
) -> Result<(), InventoryError> {
    let result = sqlx::query("UPDATE products SET description = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2")
        .bind(description)
        .bind(code)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(InventoryError::ProductNotFound(code.to_string()));
    }
    Ok(())
}

pub async fn sales_summary(conn: &mut SqliteConnection) -> Result<Vec<SalesSummary>, sqlx::Error> {
    let summary = sqlx::query_as::<_, SalesSummary>(
        "SELECT code, name, sold, sold * price AS revenue FROM products ORDER BY code",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(summary)
}
