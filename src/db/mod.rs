use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` is its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        if !in_memory {
            opt.max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    pub async fn get_cache_payload(&self, key: &str) -> Result<Option<String>> {
        self.cache_repo().get(key).await
    }

    pub async fn put_cache_payload(&self, key: &str, payload: String) -> Result<()> {
        self.cache_repo().put(key, payload).await
    }

    pub async fn remove_cache_payload(&self, key: &str) -> Result<bool> {
        self.cache_repo().remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_payload_roundtrip() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();

        assert_eq!(store.get_cache_payload("k").await.unwrap(), None);

        store.put_cache_payload("k", "one".to_string()).await.unwrap();
        store.put_cache_payload("k", "two".to_string()).await.unwrap();
        assert_eq!(
            store.get_cache_payload("k").await.unwrap().as_deref(),
            Some("two")
        );

        assert!(store.remove_cache_payload("k").await.unwrap());
        assert!(!store.remove_cache_payload("k").await.unwrap());
        assert_eq!(store.get_cache_payload("k").await.unwrap(), None);
    }
}
