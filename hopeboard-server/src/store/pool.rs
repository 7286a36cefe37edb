//! Postgres connection pool for `PgStore`

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to `database_url`. Fails fast when the database is unreachable.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    tracing::debug!(target = %redact(database_url), "connected to postgres");
    Ok(pool)
}

/// Drop the userinfo part of a connection URL before logging it
fn redact(database_url: &str) -> String {
    match database_url.split_once("://") {
        Some((scheme, rest)) => match rest.rsplit_once('@') {
            Some((_, host)) => format!("{}://***@{}", scheme, host),
            None => database_url.to_string(),
        },
        None => "<unparsed url>".to_string(),
    }
}
