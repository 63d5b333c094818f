use crate::entities::{cache_entries, prelude::*};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Raw access to the key-value cache table. Payloads are opaque strings;
/// envelope encoding and expiry live in `services::cache`.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = CacheEntries::find_by_id(key.to_string())
            .one(&self.conn)
            .await?;
        Ok(row.map(|m| m.payload))
    }

    pub async fn put(&self, key: &str, payload: String) -> Result<()> {
        let active_model = cache_entries::ActiveModel {
            key: Set(key.to_string()),
            payload: Set(payload),
        };

        CacheEntries::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(cache_entries::Column::Key)
                    .update_column(cache_entries::Column::Payload)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = CacheEntries::delete_by_id(key.to_string())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
