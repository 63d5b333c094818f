//! CLI module - Command-line interface for mediashelf
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Catalog, FilterState};

/// mediashelf - Personal anime, manga and movie shelf
/// Tracker list and published sheets, cached and filterable
#[derive(Parser)]
#[command(name = "mediashelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filters shared by the listing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Search query, matched against every title
    pub query: Vec<String>,

    /// Category filter (tv, movie, манга, фильмы...)
    #[arg(long = "type", short = 't')]
    pub kind: Option<String>,

    /// Sort mode: rate_desc, rate_asc, date, date_old, name_az, name_za
    #[arg(long, short = 's')]
    pub sort: Option<String>,
}

impl FilterArgs {
    #[must_use]
    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            q: self.query.join(" "),
            kind: self.kind.clone().unwrap_or_default(),
            sort: self.sort.clone().unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the JSON API server
    #[command(alias = "web")]
    Serve,

    /// List the owner's anime
    #[command(alias = "a")]
    Anime {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one anime with notes and trailers
    #[command(alias = "ai")]
    AnimeInfo {
        /// Tracker anime ID
        id: String,
    },

    /// List the manga sheet
    #[command(alias = "m")]
    Manga {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one manga sheet row
    #[command(alias = "mi")]
    MangaInfo {
        /// Sheet row index
        row: String,
    },

    /// List the movies sheet
    #[command(alias = "mv")]
    Movies {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one movies sheet row
    #[command(alias = "mvi")]
    MovieInfo {
        /// Sheet row index
        row: String,
    },

    /// Drop the cached catalog and fetch it again
    Reload {
        #[arg(value_enum)]
        catalog: Catalog,
    },

    /// Filter a catalog interactively from stdin
    #[command(alias = "b")]
    Browse {
        #[arg(value_enum)]
        catalog: Catalog,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
