//! # Chapel
//!
//! Content layer of a parish website: CMS queries, the verse of the day,
//! and the presentation helpers that do not need a browser.
//!
//! ## Architecture
//!
//! ```text
//! Config → SanityClient → Selector → RefreshScheduler → DisplayState
//! ```
//!
//! - [`fetcher`]: CMS client behind the [`ContentFetcher`](fetcher::ContentFetcher) trait
//! - [`selector`]: deterministic date-seeded pick of one record per day
//! - [`scheduler`]: refreshes the pick at local midnight and every day after
//!
//! ## Quick Start
//!
//! ```bash
//! # Today's verse
//! SANITY_PROJECT_ID=abc123 chapel verse
//!
//! # Calendar link for an event
//! chapel event prayer-retreat-2025 --calendar
//!
//! # Keep the verse current across midnight
//! chapel watch
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the configuration to
/// the content client.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/chapel/config.toml`, with
/// `SANITY_*` environment overrides.
pub mod config;

/// Core domain models.
///
/// - [`ContentRecord`](domain::ContentRecord): any record from the CMS
/// - [`Verse`](domain::Verse), [`Event`](domain::Event), [`Banner`](domain::Banner),
///   [`GalleryImage`](domain::GalleryImage), [`FacebookPost`](domain::FacebookPost)
/// - [`CyclicCursor`](domain::CyclicCursor): carousel and lightbox position
pub mod domain;

/// Content store access.
///
/// - [`ContentFetcher`](fetcher::ContentFetcher): async trait for collection fetches
/// - [`SanityClient`](fetcher::SanityClient): reqwest-based implementation
/// - [`ImageUrlBuilder`](fetcher::ImageUrlBuilder): CDN URLs for image fields
pub mod fetcher;

/// Midnight-aligned refresh with an owned, stoppable handle.
pub mod scheduler;

/// Date-seeded daily selection.
pub mod selector;
