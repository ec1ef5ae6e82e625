pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::ContentKind;

#[derive(Parser)]
#[command(name = "chapel")]
#[command(about = "Parish website content from the command line", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/chapel/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the verse of the day
    Verse {
        /// Pick for this date instead of today (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// How to format the verse for sharing
        #[arg(short, long, value_enum, default_value_t = ShareFormat::Plain)]
        share: ShareFormat,
    },
    /// Summary of everything the home page shows
    Home,
    /// List upcoming events
    Events,
    /// Show a single event
    Event {
        /// Event slug (the CTA link)
        slug: String,

        /// Print an "add to calendar" link
        #[arg(long)]
        calendar: bool,

        /// Open the calendar link in the browser
        #[arg(long)]
        open: bool,
    },
    /// List hero banners
    Banners,
    /// List gallery images
    Gallery,
    /// List embedded Facebook posts
    Posts,
    /// Cycle through carousel slides
    Slideshow {
        /// Which carousel to show
        #[arg(value_enum)]
        kind: SlideKind,

        /// Delay between slides (e.g. "5s"); defaults to the carousel's autoplay delay
        #[arg(short, long)]
        interval: Option<String>,

        /// Times to go around the carousel
        #[arg(short, long, default_value_t = 1)]
        rounds: usize,
    },
    /// Keep a daily pick current, refreshing at local midnight
    Watch {
        /// Collection to pick from
        #[arg(short, long, value_enum, default_value_t = ContentKind::Verse)]
        kind: ContentKind,

        /// Refresh period after the first midnight (e.g. "24h"); overrides the config
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareFormat {
    Plain,
    Instagram,
    Facebook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlideKind {
    Banners,
    Posts,
    Gallery,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid date: {}. Use YYYY-MM-DD", s))
}
