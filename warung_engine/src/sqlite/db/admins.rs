use sqlx::SqliteConnection;

pub async fn is_admin(buyer_id: &str, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM admins WHERE buyer_id = $1)")
        .bind(buyer_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

pub async fn insert_admin(buyer_id: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO admins (buyer_id) VALUES ($1) ON CONFLICT (buyer_id) DO NOTHING")
        .bind(buyer_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn fetch_admins(conn: &mut SqliteConnection) -> Result<Vec<String>, sqlx::Error> {
    let admins =
        sqlx::query_scalar::<_, String>("SELECT buyer_id FROM admins ORDER BY created_at").fetch_all(&mut *conn).await?;
    Ok(admins)
}
