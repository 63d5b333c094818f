use crate::config::Config;
use crate::models::SheetKind;
use crate::services::{AnimeDetail, SheetDetail};
use crate::state::SharedState;

const TEXT_WIDTH: usize = 78;

fn render_html(html: &str) -> String {
    html2text::from_read(html.as_bytes(), TEXT_WIDTH).unwrap_or_else(|_| html.to_string())
}

fn parse_identity(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub async fn cmd_anime_info(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_identity(id_str).filter(|id| *id > 0) else {
        println!("Invalid parameter: {id_str}");
        return Ok(());
    };

    let state = SharedState::new(config.clone()).await?;
    let detail = state.anime.detail(id).await?;
    display_anime(&detail, state.anime.base_url());
    Ok(())
}

fn display_anime(detail: &AnimeDetail, base_url: &str) {
    let item = &detail.item;

    println!("Anime Info");
    println!("{:-<60}", "");
    println!("Title:    {}", item.display_title());
    if let Some(name) = &item.titles.name {
        println!("Romaji:   {name}");
    }
    if !item.titles.english.is_empty() {
        println!("English:  {}", item.titles.english.join(", "));
    }
    if !item.titles.japanese.is_empty() {
        println!("Japanese: {}", item.titles.japanese.join(", "));
    }
    println!("ID:       {}", item.id);
    println!(
        "Type:     {}",
        item.kind.as_deref().unwrap_or("—").to_uppercase()
    );
    println!(
        "Episodes: {}",
        item.episodes
            .map_or_else(|| "?".to_string(), |e| e.to_string())
    );
    println!("Year:     {}", item.aired_year.as_deref().unwrap_or("—"));
    println!(
        "Score:    {} (mine: {})",
        item.community_score
            .map_or_else(|| "—".to_string(), |s| s.to_string()),
        item.user_score
            .map_or_else(|| "—".to_string(), |s| s.to_string())
    );

    if !item.genres.is_empty() {
        let genres: Vec<&str> = item.genres.iter().map(|g| g.label()).collect();
        println!("Genres:   {}", genres.join(", "));
    }
    if !item.studios.is_empty() {
        let studios: Vec<&str> = item.studios.iter().map(|s| s.name.as_str()).collect();
        println!("Studios:  {}", studios.join(", "));
    }
    println!("Poster:   {}", item.poster_url);
    println!(
        "Link:     {}/animes/{}",
        base_url.trim_end_matches('/'),
        item.id
    );

    if let Some(notes) = detail.annotation.as_ref().filter(|a| !a.is_empty()) {
        println!();
        println!("Notes");
        println!("{:-<60}", "");
        if let Some(date) = &notes.watch_date {
            println!("Watched:  {date}");
        }
        if let Some(rewatch) = &notes.rewatch {
            println!("Rewatch:  {rewatch}");
        }
        if let Some(voice) = &notes.voice_over {
            println!("Voice:    {voice}");
        }
        if notes.commented {
            println!("Watched with commentary");
        }
        if notes.ongoing {
            println!("Still airing when watched");
        }
    }

    if !item.trailers.is_empty() {
        println!();
        println!("Trailers");
        println!("{:-<60}", "");
        for trailer in &item.trailers {
            println!("  {} - {}", trailer.name, trailer.url);
        }
    }

    if let Some(html) = &item.description_html {
        println!();
        println!("{}", render_html(html));
    }
}

pub async fn cmd_sheet_info(config: &Config, kind: SheetKind, row_str: &str) -> anyhow::Result<()> {
    let Some(row) = parse_identity(row_str) else {
        println!("Invalid parameter: {row_str}");
        return Ok(());
    };

    let state = SharedState::new(config.clone()).await?;
    let detail = state.sheets.detail(kind, row).await?;
    display_sheet(kind, &detail);
    Ok(())
}

fn display_sheet(kind: SheetKind, detail: &SheetDetail) {
    let item = &detail.item;

    println!("{} Info", if kind == SheetKind::Manga { "Manga" } else { "Movie" });
    println!("{:-<60}", "");
    println!("Title:    {}", item.display_title());

    let fields = [
        ("Original", &item.name_orig),
        ("Type", &item.kind),
        ("Year", &item.year),
        ("Length", &item.length),
        ("Country", &item.country),
        ("Release", &item.release_status),
        ("Rating", &item.age_rating),
        ("Status", &item.status),
        ("Date", &item.watch_date),
        ("Voice", &item.voiceover),
        ("Genres", &item.genres_text),
        ("Note", &item.note),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            println!("{:<10}{value}", format!("{label}:"));
        }
    }

    println!(
        "Score:    {} (mine: {})",
        item.score.map_or_else(|| "—".to_string(), |s| s.to_string()),
        item.my_score
            .map_or_else(|| "—".to_string(), |s| s.to_string())
    );
    if let Some(id) = item.anime_adaptation_id {
        println!("Anime:    mediashelf anime-info {id}");
    }

    if let Some(html) = &detail.description_html {
        println!();
        println!("{}", render_html(html));
    }
}
