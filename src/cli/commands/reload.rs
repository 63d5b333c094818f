use crate::config::Config;
use crate::domain::Catalog;
use crate::state::SharedState;

/// Drops the cached catalog and fetches it again.
pub async fn cmd_reload(config: &Config, catalog: Catalog) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let count = match catalog.sheet_kind() {
        None => state.anime.reload().await?.len(),
        Some(kind) => state.sheets.reload(kind).await?.len(),
    };

    println!("✓ Reloaded {catalog}: {count} entries");
    Ok(())
}
