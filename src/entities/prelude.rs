pub use super::cache_entries::Entity as CacheEntries;
