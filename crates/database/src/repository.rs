use crate::DbError;
use async_trait::async_trait;
use core_types::{Killer, KillerFields};
use sqlx::postgres::PgPool;

/// The storage contract for the killer catalog.
///
/// The route layer holds an `Arc<dyn KillerStore>`, so the backend can be the
/// PostgreSQL `DbRepository` or the `InMemoryRepository` without touching the
/// handlers. Missing ids are reported as `DbError::NotFound`.
#[async_trait]
pub trait KillerStore: Send + Sync {
    /// Every killer, in storage order.
    async fn list_all(&self) -> Result<Vec<Killer>, DbError>;

    async fn get_by_id(&self, id: i32) -> Result<Killer, DbError>;

    /// Inserts a new killer and returns the id assigned by storage.
    async fn create(&self, fields: &KillerFields) -> Result<i32, DbError>;

    /// Replaces every column of an existing killer. Nothing is written when
    /// the id does not exist.
    async fn update(&self, id: i32, fields: &KillerFields) -> Result<(), DbError>;

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError>;
}

const SELECT_KILLERS: &str = r#"
    SELECT id, name, alias, power, speed, terror_radius, height, difficulty, release_date, dlc
    FROM killers
"#;

/// The `DbRepository` is the PostgreSQL implementation of `KillerStore`.
/// It encapsulates all SQL queries against the `killers` table.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Closes every pooled connection. Used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KillerStore for DbRepository {
    async fn list_all(&self) -> Result<Vec<Killer>, DbError> {
        let killers = sqlx::query_as::<_, Killer>(SELECT_KILLERS)
            .fetch_all(&self.pool)
            .await?;
        Ok(killers)
    }

    async fn get_by_id(&self, id: i32) -> Result<Killer, DbError> {
        let query = format!("{SELECT_KILLERS} WHERE id = $1");
        let killer = sqlx::query_as::<_, Killer>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if let sqlx::Error::RowNotFound = e { DbError::NotFound } else { e.into() })?;
        Ok(killer)
    }

    async fn create(&self, fields: &KillerFields) -> Result<i32, DbError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO killers (name, alias, power, speed, terror_radius, height, difficulty, release_date, dlc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.alias)
        .bind(&fields.power)
        .bind(fields.speed)
        .bind(fields.terror_radius)
        .bind(&fields.height)
        .bind(&fields.difficulty)
        .bind(fields.release_date)
        .bind(fields.dlc)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(killer_id = id, name = %fields.name, "Killer inserted.");
        Ok(id)
    }

    async fn update(&self, id: i32, fields: &KillerFields) -> Result<(), DbError> {
        // The affected-row count is the existence check.
        let result = sqlx::query(
            r#"
            UPDATE killers
            SET name = $1,
                alias = $2,
                power = $3,
                speed = $4,
                terror_radius = $5,
                height = $6,
                difficulty = $7,
                release_date = $8,
                dlc = $9
            WHERE id = $10
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.alias)
        .bind(&fields.power)
        .bind(fields.speed)
        .bind(fields.terror_radius)
        .bind(&fields.height)
        .bind(&fields.difficulty)
        .bind(fields.release_date)
        .bind(fields.dlc)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(killer_id = id, "Killer updated.");
        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM killers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(killer_id = id, "Killer deleted.");
        Ok(())
    }
}
