//! PostgreSQL-backed store. Each dish is one JSONB document plus a version column;
//! users live in a plain table owned by the account service.

use super::DishStore;
use crate::error::{AppError, ConfigError};
use crate::model::{Dish, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgDishStore {
    pool: PgPool,
    schema: String,
}

impl PgDishStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgDishStore {
            pool,
            schema: schema.into(),
        }
    }

    fn dishes_table(&self) -> String {
        format!("{}.dishes", quote_ident(&self.schema))
    }

    fn users_table(&self) -> String {
        format!("{}.users", quote_ident(&self.schema))
    }

    /// Create the schema, `dishes` and `users` if they do not exist yet.
    pub async fn ensure_tables(&self) -> Result<(), AppError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)))
            .execute(&self.pool)
            .await?;

        let dishes = self.dishes_table();
        let dishes_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                doc JSONB NOT NULL,
                version BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            dishes
        );
        sqlx::query(&dishes_ddl).execute(&self.pool).await?;
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS dishes_name_key ON {} ((doc->>'name'))",
            dishes
        ))
        .execute(&self.pool)
        .await?;

        let users_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                firstname TEXT NOT NULL DEFAULT '',
                lastname TEXT NOT NULL DEFAULT '',
                admin BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
            self.users_table()
        );
        sqlx::query(&users_ddl).execute(&self.pool).await?;
        Ok(())
    }
}

type DishRow = (Json<Dish>, i64);
type UserRow = (Uuid, String, String, String, bool);

fn dish_from_row((Json(mut dish), version): DishRow) -> Dish {
    dish.version = version;
    dish
}

fn user_from_row((id, username, firstname, lastname, admin): UserRow) -> User {
    User {
        id,
        username,
        firstname,
        lastname,
        admin,
    }
}

fn map_write_error(e: sqlx::Error, name: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("a dish named '{}' already exists", name))
        }
        _ => AppError::Db(e),
    }
}

#[async_trait]
impl DishStore for PgDishStore {
    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError> {
        let sql = format!("SELECT doc, version FROM {} ORDER BY created_at, id", self.dishes_table());
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<DishRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(dish_from_row).collect())
    }

    async fn find_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        let sql = format!("SELECT doc, version FROM {} WHERE id = $1", self.dishes_table());
        tracing::debug!(sql = %sql, %id, "query");
        let row: Option<DishRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(dish_from_row))
    }

    async fn insert_dish(&self, dish: &Dish) -> Result<Dish, AppError> {
        let sql = format!(
            "INSERT INTO {} (id, doc, version, created_at, updated_at) VALUES ($1, $2, $3, $4, $5) RETURNING doc, version",
            self.dishes_table()
        );
        tracing::debug!(sql = %sql, id = %dish.id, "query");
        let row: DishRow = sqlx::query_as(&sql)
            .bind(dish.id)
            .bind(Json(dish))
            .bind(dish.version)
            .bind(dish.created_at)
            .bind(dish.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &dish.name))?;
        Ok(dish_from_row(row))
    }

    async fn replace_dish(&self, dish: &Dish, expected_version: i64) -> Result<Option<Dish>, AppError> {
        let mut next = dish.clone();
        next.version = expected_version + 1;
        let sql = format!(
            "UPDATE {} SET doc = $2, version = $3, updated_at = $4 WHERE id = $1 AND version = $5 RETURNING doc, version",
            self.dishes_table()
        );
        tracing::debug!(sql = %sql, id = %dish.id, expected_version, "query");
        let row: Option<DishRow> = sqlx::query_as(&sql)
            .bind(next.id)
            .bind(Json(&next))
            .bind(next.version)
            .bind(Utc::now())
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &next.name))?;
        Ok(row.map(dish_from_row))
    }

    async fn delete_dish(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING doc, version", self.dishes_table());
        tracing::debug!(sql = %sql, %id, "query");
        let row: Option<DishRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(dish_from_row))
    }

    async fn delete_all_dishes(&self) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {}", self.dishes_table());
        tracing::debug!(sql = %sql, "query");
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT id, username, firstname, lastname, admin FROM {} WHERE id = $1",
            self.users_table()
        );
        let row: Option<UserRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(user_from_row))
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, username, firstname, lastname, admin FROM {} WHERE id = ANY($1)",
            self.users_table()
        );
        tracing::debug!(sql = %sql, count = ids.len(), "query");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).bind(ids.to_vec()).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(user_from_row).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|_| invalid_database_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn invalid_database_url(url: &str) -> AppError {
    AppError::Config(ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
    })
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| invalid_database_url(url))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/confusion?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "confusion");
    }

    #[test]
    fn url_without_path_is_a_config_error() {
        let err = parse_db_name_from_url("nonsense").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. })
        ));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("confusion"), "\"confusion\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
