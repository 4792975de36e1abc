use sqlx::PgPool;

/// Create every table and index the snapshot export needs. Idempotent.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../sql/schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

/// Empty every snapshot table so the next save replaces the previous one.
pub async fn clear(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(
        "TRUNCATE trades, intel_reports, market_supply, relations, wars, attacks, jobs, entities",
    )
    .execute(pool)
    .await?;
    Ok(())
}
