//! Catalog listing commands

use crate::config::Config;
use crate::domain::{Catalog, FilterState};
use crate::models::{SheetItem, SheetKind, UserRate};
use crate::services::catalog;
use crate::services::stats::{anime_stats, movie_stats};
use crate::state::SharedState;

pub async fn cmd_list_anime(config: &Config, filters: &FilterState) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let rates = state.anime.list().await?;

    print_anime(&rates, filters);
    Ok(())
}

pub async fn cmd_list_sheet(
    config: &Config,
    kind: SheetKind,
    filters: &FilterState,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let items = state.sheets.load(kind).await?;

    print_sheet(kind, &items, filters);
    Ok(())
}

fn describe_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();
    if !filters.q.trim().is_empty() {
        parts.push(format!("query \"{}\"", filters.q.trim()));
    }
    if !filters.kind.is_empty() {
        parts.push(format!("type {}", filters.kind));
    }
    parts.push(format!("sort {}", filters.sort_mode()));
    parts.join(", ")
}

pub(crate) fn print_anime(rates: &[UserRate], filters: &FilterState) {
    let view = catalog::apply(rates, Catalog::Anime, filters);

    println!(
        "Anime ({} of {}; {})",
        view.len(),
        rates.len(),
        describe_filters(filters)
    );
    println!("{:-<70}", "");

    if view.is_empty() {
        println!("Nothing matches.");
    }

    for rate in &view {
        let Some(anime) = rate.anime.as_ref() else {
            continue;
        };
        let score = rate
            .user_score()
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let episodes = anime
            .episodes
            .filter(|e| *e > 0)
            .map_or_else(|| "?".to_string(), |e| e.to_string());

        println!(
            "[{score:>2}] {}",
            anime.display_title().unwrap_or("—")
        );
        println!(
            "     ID: {} | {} | {} | {} eps",
            anime.id,
            anime.kind.as_deref().unwrap_or("?").to_uppercase(),
            anime.aired_year().unwrap_or("?"),
            episodes
        );
    }

    let stats = anime_stats(&view);
    println!();
    println!(
        "TV: {} | Movie: {} | OVA: {} | ONA: {} | Special: {}",
        stats.tv, stats.movie, stats.ova, stats.ona, stats.special
    );
    println!(
        "Episodes: {} (~{} h, {} days)",
        stats.episodes, stats.hours, stats.days
    );
}

pub(crate) fn print_sheet(kind: SheetKind, items: &[SheetItem], filters: &FilterState) {
    let view = catalog::apply(items, Catalog::from(kind), filters);
    let heading = match kind {
        SheetKind::Manga => "Manga",
        SheetKind::Movies => "Movies",
    };

    println!(
        "{heading} ({} of {}; {})",
        view.len(),
        items.len(),
        describe_filters(filters)
    );
    println!("{:-<70}", "");

    if view.is_empty() {
        println!("Nothing matches.");
    }

    for item in &view {
        let score = item
            .my_score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("[{score:>2}] {}", item.display_title());

        let mut meta = vec![format!("Row: {}", item.row_index)];
        for field in [&item.kind, &item.year, &item.length] {
            if !field.is_empty() {
                meta.push(field.clone());
            }
        }
        println!("     {}", meta.join(" | "));
    }

    if kind == SheetKind::Movies {
        let stats = movie_stats(&view);
        println!();
        println!(
            "Films: {} | Series: {} | Dramas: {} | Cartoons: {}",
            stats.films, stats.series, stats.dramas, stats.cartoons
        );
    }
}
