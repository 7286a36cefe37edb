//! Postgres store
//!
//! Board elements live in a JSONB column in their wire shape, so a saved
//! board reloads exactly as it was sent.

use async_trait::async_trait;
use chrono::Utc;
use hopeboard_core::models::{Element, LetterCategory, LetterFilter, ResourceTag};
use hopeboard_core::{Board, Letter, Resource, User};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{migrations, pool, seed_records, Counts, Store, StoreError, StoreResult};
use crate::auth::Session;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, run migrations and seed an empty database.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = pool::create_pool(database_url).await?;
        migrations::run(&pool).await?;
        let store = Self::new(pool);
        store.seed_if_empty().await?;
        Ok(store)
    }

    async fn seed_if_empty(&self) -> StoreResult<()> {
        let counts = self.counts().await?;
        if counts.letters > 0 || counts.resources > 0 {
            return Ok(());
        }
        let (letter, resource) = seed_records(Utc::now());
        self.insert_letter(letter).await?;
        self.insert_resource(resource).await?;
        tracing::info!("seeded empty database");
        Ok(())
    }
}

fn corrupt(resource: &'static str, reason: impl ToString) -> StoreError {
    StoreError::Corrupt {
        resource,
        reason: reason.to_string(),
    }
}

/// Map unique violations to `Conflict`, everything else stays a database error.
fn conflict_or(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{} already exists", what))
        }
        _ => StoreError::Sqlx(e),
    }
}

const BOARD_COLUMNS: &str = "id, title, owner_id, visibility, background_color, elements, \
                             share_token, created_at, updated_at";

fn board_from_row(row: &PgRow) -> StoreResult<Board> {
    let visibility: String = row.try_get("visibility")?;
    let Json(elements): Json<Vec<Element>> = row.try_get("elements")?;
    Ok(Board {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        owner: row.try_get("owner_id")?,
        visibility: visibility.parse().map_err(|e| corrupt("board", e))?,
        background_color: row.try_get("background_color")?,
        elements,
        share_token: row.try_get("share_token")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        recovery_note: row.try_get("recovery_note")?,
        created_at: row.try_get("created_at")?,
    })
}

fn letter_from_row(row: &PgRow) -> StoreResult<Letter> {
    let category: Option<String> = row.try_get("category")?;
    Ok(Letter {
        id: row.try_get("id")?,
        recipient: row.try_get("recipient")?,
        category: LetterCategory::parse_optional(category.as_deref())
            .map_err(|e| corrupt("letter", e))?,
        color: row.try_get("color")?,
        message: row.try_get("message")?,
        likes: row.try_get("likes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn resource_from_row(row: &PgRow) -> StoreResult<Resource> {
    let tags: Vec<String> = row.try_get("tags")?;
    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content: row.try_get("content")?,
        tags: tags
            .iter()
            .map(|t| t.parse::<ResourceTag>())
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt("resource", e))?,
        icon: row.try_get("icon")?,
        added_by: row.try_get("added_by")?,
        created_at: row.try_get("created_at")?,
    })
}

/// `%needle%` for ILIKE, with LIKE metacharacters escaped
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query(
            "SELECT id, username, password_hash, recovery_note, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(user_from_row)
        .transpose()
    }

    async fn find_user_by_name(&self, username: &str) -> StoreResult<Option<User>> {
        sqlx::query(
            "SELECT id, username, password_hash, recovery_note, created_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(user_from_row)
        .transpose()
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, recovery_note, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.recovery_note)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "username"))?;
        Ok(())
    }

    async fn insert_session(&self, session: Session) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        let row = sqlx::query(
            "SELECT token_hash, user_id, created_at, expires_at FROM sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(Session {
                token_hash: r.try_get("token_hash")?,
                user_id: r.try_get("user_id")?,
                created_at: r.try_get("created_at")?,
                expires_at: r.try_get("expires_at")?,
            })
        })
        .transpose()
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_board(&self, board: Board) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO boards (id, title, owner_id, visibility, background_color, elements,
                                share_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(board.id)
        .bind(&board.title)
        .bind(board.owner)
        .bind(board.visibility.as_str())
        .bind(&board.background_color)
        .bind(Json(&board.elements))
        .bind(&board.share_token)
        .bind(board.created_at)
        .bind(board.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "board"))?;
        Ok(())
    }

    async fn get_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        sqlx::query(&format!("SELECT {} FROM boards WHERE id = $1", BOARD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(board_from_row)
            .transpose()
    }

    async fn board_by_share_token(&self, token: &str) -> StoreResult<Option<Board>> {
        sqlx::query(&format!(
            "SELECT {} FROM boards WHERE share_token = $1",
            BOARD_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(board_from_row)
        .transpose()
    }

    async fn public_boards(&self) -> StoreResult<Vec<Board>> {
        sqlx::query(&format!(
            "SELECT {} FROM boards WHERE visibility = 'public' ORDER BY updated_at DESC",
            BOARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(board_from_row)
        .collect()
    }

    async fn boards_for_owner(&self, owner: Uuid) -> StoreResult<Vec<Board>> {
        sqlx::query(&format!(
            "SELECT {} FROM boards WHERE owner_id = $1 ORDER BY updated_at DESC",
            BOARD_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(board_from_row)
        .collect()
    }

    async fn replace_board(&self, board: &Board) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE boards
            SET title = $2, visibility = $3, background_color = $4, elements = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(board.id)
        .bind(&board.title)
        .bind(board.visibility.as_str())
        .bind(&board.background_color)
        .bind(Json(&board.elements))
        .bind(board.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                resource: "board",
                id: board.id.to_string(),
            });
        }
        Ok(())
    }

    async fn insert_letter(&self, letter: Letter) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO letters (id, recipient, category, color, message, likes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(letter.id)
        .bind(&letter.recipient)
        .bind(letter.category.map(|c| c.as_str()))
        .bind(&letter.color)
        .bind(&letter.message)
        .bind(&letter.likes)
        .bind(letter.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_letters(&self, filter: &LetterFilter) -> StoreResult<Vec<Letter>> {
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        sqlx::query(
            r#"
            SELECT id, recipient, category, color, message, likes, created_at
            FROM letters
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR recipient ILIKE $2 OR message ILIKE $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(search)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(letter_from_row)
        .collect()
    }

    async fn like_letter(&self, id: Uuid) -> StoreResult<Option<usize>> {
        let row = sqlx::query(
            "UPDATE letters SET likes = array_append(likes, $2) WHERE id = $1 RETURNING cardinality(likes) AS likes",
        )
        .bind(id)
        .bind(Uuid::new_v4().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let likes: i32 = r.try_get("likes")?;
            Ok(likes.max(0) as usize)
        })
        .transpose()
    }

    async fn insert_resource(&self, resource: Resource) -> StoreResult<()> {
        let tags: Vec<String> = resource.tags.iter().map(|t| t.as_str().to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO resources (id, title, description, content, tags, icon, added_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(resource.id)
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.content)
        .bind(&tags)
        .bind(&resource.icon)
        .bind(resource.added_by)
        .bind(resource.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_resources(&self, tag: Option<ResourceTag>) -> StoreResult<Vec<Resource>> {
        sqlx::query(
            r#"
            SELECT id, title, description, content, tags, icon, added_by, created_at
            FROM resources
            WHERE ($1::text IS NULL OR $1 = ANY(tags))
            ORDER BY created_at DESC
            "#,
        )
        .bind(tag.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(resource_from_row)
        .collect()
    }

    async fn counts(&self) -> StoreResult<Counts> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM letters) AS letters,
                (SELECT COUNT(*) FROM resources) AS resources,
                (SELECT COUNT(*) FROM boards) AS boards,
                (SELECT COUNT(*) FROM users) AS users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let count = |name: &str| -> StoreResult<u64> {
            let n: i64 = row.try_get(name)?;
            Ok(n.max(0) as u64)
        };
        Ok(Counts {
            letters: count("letters")?,
            resources: count("resources")?,
            boards: count("boards")?,
            users: count("users")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopeboard_core::models::{BoardTitle, Username};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("new day"), "%new day%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        PgStore::connect(&url).await.expect("connect failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn board_round_trip() {
        let store = store().await;
        let name = format!("pg-{}", &Uuid::new_v4().to_string()[..8]);
        let user = User::new(Username::new(&name).unwrap(), "hash".into(), Utc::now());
        store.insert_user(user.clone()).await.unwrap();

        let mut board = Board::new(BoardTitle::new("Trip Notes").unwrap(), user.id, Utc::now());
        store.insert_board(board.clone()).await.unwrap();

        board.title = "Renamed".into();
        store.replace_board(&board).await.unwrap();

        let loaded = store.get_board(board.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.share_token, board.share_token);
        assert!(matches!(
            store.insert_user(user).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeded_on_connect() {
        let store = store().await;
        let counts = store.counts().await.unwrap();
        assert!(counts.letters >= 1);
        assert!(counts.resources >= 1);
    }
}
