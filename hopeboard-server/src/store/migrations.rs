//! Schema setup for the Postgres store

use sqlx::PgPool;

use super::StoreResult;

/// Create tables if missing. Idempotent.
pub async fn run(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running hopeboard migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            recovery_note TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Databases created before recovery notes existed
    sqlx::query("ALTER TABLE users ADD COLUMN IF NOT EXISTS recovery_note TEXT")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            visibility TEXT NOT NULL DEFAULT 'private',
            background_color TEXT NOT NULL,
            elements JSONB NOT NULL DEFAULT '[]',
            share_token TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS letters (
            id UUID PRIMARY KEY,
            recipient TEXT NOT NULL DEFAULT '',
            category TEXT,
            color TEXT NOT NULL,
            message TEXT NOT NULL,
            likes TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            content TEXT NOT NULL,
            tags TEXT[] NOT NULL DEFAULT '{}',
            icon TEXT NOT NULL,
            added_by UUID REFERENCES users(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the list queries
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_boards_owner ON boards(owner_id, updated_at DESC)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_boards_public ON boards(updated_at DESC) WHERE visibility = 'public'",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_letters_created ON letters(created_at DESC)")
        .execute(pool)
        .await?;

    tracing::info!("hopeboard migrations complete");
    Ok(())
}
