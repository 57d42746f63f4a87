//! SQLite database operations
//!
//! All database access goes through this module.
//! Queries are always parameterized; user input is never interpolated
//! into SQL text.

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::{EntityId, Favorite};
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        // Create connection string
        let connection_string = format!("sqlite:{}?mode=rwc", path.display());

        // Create connection pool
        let pool = SqlitePool::connect(&connection_string).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Insert a favorite repository for a user
    ///
    /// Append-only: no uniqueness constraint, duplicate inserts for the
    /// same repository succeed.
    ///
    /// # Returns
    /// The inserted record
    pub async fn insert_favorite(
        &self,
        user_ref: &str,
        repo_name: &str,
    ) -> Result<Favorite, AppError> {
        let favorite = Favorite {
            id: EntityId::new().0,
            user_ref: user_ref.to_string(),
            repo_name: repo_name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO favorites (id, user_ref, repo_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&favorite.id)
        .bind(&favorite.user_ref)
        .bind(&favorite.repo_name)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await?;

        use crate::metrics::DB_QUERIES_TOTAL;
        DB_QUERIES_TOTAL
            .with_label_values(&["insert", "favorites"])
            .inc();

        Ok(favorite)
    }

    /// Get all favorites for a user, newest first
    pub async fn get_favorites_for_user(&self, user_ref: &str) -> Result<Vec<Favorite>, AppError> {
        let favorites = sqlx::query_as::<_, Favorite>(
            "SELECT id, user_ref, repo_name, created_at FROM favorites \
             WHERE user_ref = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_ref)
        .fetch_all(&self.pool)
        .await?;

        use crate::metrics::DB_QUERIES_TOTAL;
        DB_QUERIES_TOTAL
            .with_label_values(&["select", "favorites"])
            .inc();

        Ok(favorites)
    }
}
