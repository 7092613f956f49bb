//! SQLite company store

use super::traits::{CompanyStore, StoreError};
use crate::companies::{name_key, Company, CompanyFilter, NewCompany};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        country_of_origin TEXT NOT NULL DEFAULT '',
        economic_sector TEXT NOT NULL DEFAULT '',
        last_fetched_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_companies_name_key ON companies (name_key)",
];

const COLUMNS: &str =
    "id, name, description, country_of_origin, economic_sector, last_fetched_at";

/// Company store backed by a SQLite database.
///
/// Names are matched on a `name_key` column folded in Rust, since SQLite's
/// `lower()` only folds ASCII.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url`, creating the database and schema if missing
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        info!("Connected to company database at {}", url);
        Ok(store)
    }

    /// Private in-memory database, one connection kept for its lifetime
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn from_row(row: &SqliteRow) -> Result<Company, sqlx::Error> {
        Ok(Company {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            country_of_origin: row.try_get("country_of_origin")?,
            economic_sector: row.try_get("economic_sector")?,
            last_fetched_at: row.try_get("last_fetched_at")?,
        })
    }
}

#[async_trait]
impl CompanyStore for SqliteStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM companies WHERE name_key = ? ORDER BY id LIMIT 1",
            COLUMNS
        ))
        .bind(name_key(name))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(Self::from_row).transpose()?)
    }

    async fn get(&self, id: i64) -> Result<Option<Company>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM companies WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::from_row).transpose()?)
    }

    async fn insert(&self, company: NewCompany) -> Result<Company, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO companies
            (name, name_key, description, country_of_origin, economic_sector, last_fetched_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&company.name)
        .bind(name_key(&company.name))
        .bind(&company.description)
        .bind(&company.country_of_origin)
        .bind(&company.economic_sector)
        .bind(company.last_fetched_at)
        .execute(&self.pool)
        .await?;

        Ok(company.into_company(result.last_insert_rowid()))
    }

    async fn update(&self, company: &Company) -> Result<Company, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = ?, name_key = ?, description = ?, country_of_origin = ?,
                economic_sector = ?, last_fetched_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&company.name)
        .bind(name_key(&company.name))
        .bind(&company.description)
        .bind(&company.country_of_origin)
        .bind(&company.economic_sector)
        .bind(company.last_fetched_at)
        .bind(company.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(company.id));
        }
        Ok(company.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM companies", COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        let companies = rows
            .iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.apply(companies))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_company(name: &str, country: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            description: format!("{} description", name),
            country_of_origin: country.to_string(),
            economic_sector: "Energy".to_string(),
            last_fetched_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SqliteStore::in_memory().await.unwrap();
        let created = store
            .insert(new_company("GreenEnergy Corp", "Germany"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .insert(new_company("GreenEnergy Corp", "Germany"))
            .await
            .unwrap();

        let found = store.find_by_name("GREENENERGY CORP").await.unwrap();
        assert_eq!(found.unwrap().id, 1);
        assert!(store.find_by_name("GreenEnergy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_folds_non_ascii() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut company = store
            .insert(new_company("Électricité Énergie", "France"))
            .await
            .unwrap();

        let found = store.find_by_name("ÉLECTRICITÉ ÉNERGIE").await.unwrap();
        assert_eq!(found.unwrap().id, company.id);

        company.name = "Öko Strom".to_string();
        store.update(&company).await.unwrap();
        assert!(store.find_by_name("électricité énergie").await.unwrap().is_none());
        assert_eq!(
            store.find_by_name("ÖKO STROM").await.unwrap().unwrap().id,
            company.id
        );
    }

    #[tokio::test]
    async fn test_update_round_trips_timestamp() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut company = store
            .insert(new_company("GreenEnergy Corp", "Germany"))
            .await
            .unwrap();
        company.last_fetched_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        company.economic_sector = "Utilities".to_string();
        store.update(&company).await.unwrap();

        let fetched = store.get(company.id).await.unwrap().unwrap();
        assert_eq!(fetched, company);

        company.id = 99;
        assert!(matches!(
            store.update(&company).await,
            Err(StoreError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_list_count_delete() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(new_company("Zeta", "Japan")).await.unwrap();
        store.insert(new_company("Alpha", "Canada")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let names: Vec<_> = store
            .list(&CompanyFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        assert!(store.delete(1).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
