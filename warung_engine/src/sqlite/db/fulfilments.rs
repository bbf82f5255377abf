use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::Fulfilment, helpers::order_reference::OrderRef};

/// Inserts the reference into the idempotency ledger, returning `false` if the reference has
/// already been fulfilled. The insert is the first write of the fulfilment transaction, so a
/// replayed or racing notification either sees the committed row (and short-circuits) or queues
/// behind the write lock until the winner commits.
pub async fn idempotent_insert(
    reference: &str,
    order: &OrderRef,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO fulfilments (reference, buyer_id, product_code, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (reference) DO NOTHING;
        "#,
    )
    .bind(reference)
    .bind(&order.buyer_id)
    .bind(&order.product_code)
    .bind(i64::from(order.quantity))
    .execute(&mut *conn)
    .await?;
    let inserted = result.rows_affected() == 1;
    if inserted {
        debug!("🗃️ Reference [{reference}] entered into the fulfilment ledger");
    }
    Ok(inserted)
}

pub async fn fetch_fulfilment(reference: &str, conn: &mut SqliteConnection) -> Result<Option<Fulfilment>, sqlx::Error> {
    let fulfilment = sqlx::query_as::<_, Fulfilment>("SELECT * FROM fulfilments WHERE reference = $1")
        .bind(reference)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(fulfilment)
}

/// Flips the delivered flag. Returns `false` if the reference is not in the ledger.
pub async fn mark_delivered(reference: &str, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE fulfilments SET delivered = 1 WHERE reference = $1")
        .bind(reference)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() == 1)
}
