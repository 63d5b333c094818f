//! Interactive filtering: each stdin line replaces the search query.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::list::{print_anime, print_sheet};
use crate::config::Config;
use crate::domain::{Catalog, FilterState};
use crate::services::debounce::{QUERY_DEBOUNCE, debounce};
use crate::state::SharedState;

enum Loaded {
    Anime(Vec<crate::models::UserRate>),
    Sheet(crate::models::SheetKind, Vec<crate::models::SheetItem>),
}

impl Loaded {
    fn print(&self, filters: &FilterState) {
        match self {
            Self::Anime(rates) => print_anime(rates, filters),
            Self::Sheet(kind, items) => print_sheet(*kind, items, filters),
        }
    }
}

pub async fn cmd_browse(
    config: &Config,
    catalog: Catalog,
    initial: FilterState,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let loaded = match catalog.sheet_kind() {
        None => Loaded::Anime(state.anime.list().await?),
        Some(kind) => Loaded::Sheet(kind, state.sheets.load(kind).await?),
    };

    loaded.print(&initial);
    println!();
    println!("Type to filter, ':type <value>' or ':sort <mode>' to refine, Ctrl+D to quit.");

    let (tx, mut rx) = route_input(QUERY_DEBOUNCE);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut filters = initial;
    while let Some(line) = rx.recv().await {
        apply_input(&mut filters, &line);
        println!();
        loaded.print(&filters);
    }

    reader.abort();
    Ok(())
}

fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(':')
}

/// Commands pass straight through; query lines are debounced so a burst of
/// typing yields one redraw. Closing the sender flushes a pending query.
fn route_input(delay: Duration) -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
    let (in_tx, mut in_rx) = mpsc::unbounded_channel::<String>();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (query_tx, mut query_rx) = debounce::<String>(delay);

    let commands = out_tx.clone();
    tokio::spawn(async move {
        while let Some(line) = in_rx.recv().await {
            let sent = if is_command(&line) {
                commands.send(line).is_ok()
            } else {
                query_tx.send(line).is_ok()
            };
            if !sent {
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(query) = query_rx.recv().await {
            if out_tx.send(query).is_err() {
                break;
            }
        }
    });

    (in_tx, out_rx)
}

fn apply_input(filters: &mut FilterState, line: &str) {
    let line = line.trim();
    if let Some(kind) = line.strip_prefix(":type") {
        filters.kind = kind.trim().to_string();
    } else if let Some(sort) = line.strip_prefix(":sort") {
        filters.sort = sort.trim().to_string();
    } else if line == ":reset" {
        *filters = FilterState::default();
    } else {
        filters.q = line.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_input() {
        let mut filters = FilterState::default();

        apply_input(&mut filters, "naruto");
        assert_eq!(filters.q, "naruto");

        apply_input(&mut filters, ":type tv");
        assert_eq!(filters.kind, "tv");
        assert_eq!(filters.q, "naruto");

        apply_input(&mut filters, ":sort name_az");
        assert_eq!(filters.sort, "name_az");

        apply_input(&mut filters, ":reset");
        assert!(filters.is_default());
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = rx.recv().await {
            out.push(line);
        }
        out
    }

    #[tokio::test]
    async fn test_commands_are_not_swallowed_by_queries() {
        let (tx, rx) = route_input(Duration::from_secs(5));
        tx.send(":sort name_az".to_string()).unwrap();
        tx.send("naruto".to_string()).unwrap();
        drop(tx);

        let mut filters = FilterState::default();
        for line in drain(rx).await {
            apply_input(&mut filters, &line);
        }
        assert_eq!(filters.sort, "name_az");
        assert_eq!(filters.q, "naruto");
    }

    #[tokio::test]
    async fn test_query_burst_is_coalesced_around_commands() {
        let (tx, rx) = route_input(Duration::from_secs(5));
        for line in ["n", "na", " :type tv", "nar"] {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);

        assert_eq!(drain(rx).await, vec![" :type tv".to_string(), "nar".to_string()]);
    }
}
