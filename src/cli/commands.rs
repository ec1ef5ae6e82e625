use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::app::{AppContext, ChapelError, Result};
use crate::config::{format_interval, parse_interval, Config};
use crate::domain::cursor::{FACEBOOK_AUTOPLAY, HERO_AUTOPLAY};
use crate::domain::{ContentKind, ContentRecord, CyclicCursor, Verse};
use crate::fetcher::ContentFetcher;
use crate::scheduler::{DisplayState, RefreshScheduler, Unavailable};
use crate::selector::{pick_daily, verse_of_the_day};

use super::{ShareFormat, SlideKind};

pub async fn show_verse(ctx: &AppContext, date: Option<NaiveDate>, share: ShareFormat) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let votd = verse_of_the_day(ctx.client.as_ref(), date).await?;

    println!("Verse of the day for {}", votd.date.format("%A, %B %-d, %Y"));
    println!();
    println!("{}", format_verse(ctx, &votd.verse, share)?);
    Ok(())
}

fn format_verse(ctx: &AppContext, verse: &Verse, share: ShareFormat) -> Result<String> {
    Ok(match share {
        ShareFormat::Plain => verse.share_text(),
        ShareFormat::Instagram => verse.instagram_text(),
        ShareFormat::Facebook => {
            let page = format!("{}/home", ctx.config.site.base_url.trim_end_matches('/'));
            verse.facebook_share_url(&page)?
        }
    })
}

/// Fetch every collection at once, the way the home page renders them.
pub async fn show_home(ctx: &AppContext) -> Result<()> {
    let fetches = ContentKind::ALL.map(|kind| ctx.client.fetch_collection(kind));
    let results = futures::future::join_all(fetches).await;

    for (kind, result) in ContentKind::ALL.into_iter().zip(results) {
        match result {
            Ok(records) if records.is_empty() => println!("{:<9} none", kind),
            Ok(records) => println!("{:<9} {}", kind, records.len()),
            Err(e) => eprintln!("{:<9} unavailable: {}", kind, e),
        }
    }

    println!();
    match pick_daily(ctx.client.as_ref(), ContentKind::Verse, Local::now().date_naive()).await {
        Ok(pick) => println!("Verse of the day: {}", pick.record.summary()),
        Err(e) => eprintln!("Verse of the day unavailable: {}", e),
    }
    Ok(())
}

pub async fn list_events(ctx: &AppContext) -> Result<()> {
    let events = ctx.client.fetch_events().await?;

    if events.is_empty() {
        println!("No upcoming events");
        return Ok(());
    }

    for event in events {
        let date = event.display_date().unwrap_or_else(|_| event.date.clone());
        println!("{}\n  {}\n  {}", event.title, date, event.share_url(&ctx.config.site.base_url));
    }
    Ok(())
}

pub async fn show_event(ctx: &AppContext, slug: &str, calendar: bool, open: bool) -> Result<()> {
    let event = ctx
        .client
        .fetch_event_by_slug(slug)
        .await?
        .ok_or_else(|| ChapelError::NotFound(format!("event {}", slug)))?;

    println!("{}", event.title);
    println!("{}", event.display_date()?);
    if let Some(description) = &event.description {
        println!("\n{}", description);
    }
    if let Some(image) = &event.image {
        println!("\nImage: {}", image);
    }
    println!("Share: {}", event.share_url(&ctx.config.site.base_url));

    if calendar || open {
        let url = event.calendar_url(&ctx.calendar_defaults())?;
        println!("Add to calendar: {}", url);
        if open {
            open::that(&url)?;
        }
    }
    Ok(())
}

pub async fn list_collection(ctx: &AppContext, kind: ContentKind) -> Result<()> {
    let records = ctx.client.fetch_collection(kind).await?;

    if records.is_empty() {
        println!("No {} content", kind);
        return Ok(());
    }

    for record in &records {
        println!("{}", describe(record));
    }
    Ok(())
}

fn describe(record: &ContentRecord) -> String {
    match record {
        ContentRecord::Banner(b) => format!(
            "{}\n  {}\n  [{}] -> {}",
            b.main_heading, b.supporting_text, b.cta_text, b.cta_link
        ),
        ContentRecord::Gallery(g) => format!(
            "{} ({})\n  {}",
            g.name,
            g.uploaded_at,
            g.image.as_deref().unwrap_or("(no image)")
        ),
        other => other.summary(),
    }
}

pub async fn slideshow(
    ctx: &AppContext,
    kind: SlideKind,
    interval: Option<&str>,
    rounds: usize,
) -> Result<()> {
    let (content_kind, default_delay) = match kind {
        SlideKind::Banners => (ContentKind::Banner, HERO_AUTOPLAY),
        SlideKind::Posts => (ContentKind::FacebookPost, FACEBOOK_AUTOPLAY),
        SlideKind::Gallery => (ContentKind::Gallery, HERO_AUTOPLAY),
    };
    let delay = match interval {
        Some(s) => Duration::from_secs(parse_interval(s).map_err(ChapelError::InvalidArgument)?),
        None => default_delay,
    };

    let slides = ctx.client.fetch_collection(content_kind).await?;
    let Some(mut cursor) = CyclicCursor::new(slides.len()) else {
        println!("No {} content", content_kind);
        return Ok(());
    };

    let total = rounds.saturating_mul(cursor.len());
    for step in 0..total {
        let record = &slides[cursor.index()];
        if cursor.shows_indicators() {
            println!("[{}/{}] {}", cursor.index() + 1, cursor.len(), describe(record));
        } else {
            println!("{}", describe(record));
        }
        cursor.next();

        if step + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(())
}

/// Run the refresh scheduler in the foreground until interrupted.
pub async fn watch(ctx: &AppContext, kind: ContentKind, period: Option<&str>) -> Result<()> {
    let period = match period {
        Some(p) => Duration::from_secs(parse_interval(p).map_err(ChapelError::InvalidArgument)?),
        None => ctx
            .config
            .scheduler
            .period()
            .map_err(|e| ChapelError::Config(e.to_string()))?,
    };

    println!(
        "Watching {} (refresh at midnight, then every {}). Press Ctrl-C to stop.",
        kind,
        format_interval(period.as_secs())
    );

    let handle = RefreshScheduler::new(ctx.fetcher(), kind)
        .with_period(period)
        .start();
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_state(&updates.borrow_and_update());
            }
            _ = shutdown_signal() => {
                println!("Stopping...");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_state(state: &DisplayState) {
    let stamp = state
        .last_refreshed
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    match (&state.current, &state.unavailable) {
        (Some(pick), None) => println!("[{}] {}: {}", stamp, pick.date, pick.record.summary()),
        (current, Some(reason)) => {
            let reason = match reason {
                Unavailable::NoContent => "no content".to_string(),
                Unavailable::FetchFailed(e) => e.clone(),
            };
            match current {
                Some(pick) => println!(
                    "[{}] unavailable ({}), still showing {}: {}",
                    stamp,
                    reason,
                    pick.date,
                    pick.record.summary()
                ),
                None => println!("[{}] unavailable ({})", stamp, reason),
            }
        }
        (None, None) => {}
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path().map_err(|e| ChapelError::Config(e.to_string()))?,
    };
    println!("{}", path.display());
    Ok(())
}

pub fn show_config(ctx: &AppContext) {
    let cms = &ctx.config.cms;
    println!("[cms]");
    println!("project_id = {:?}", cms.project_id);
    println!("dataset = {:?}", cms.dataset);
    println!("api_version = {:?}", cms.api_version);
    println!("use_cdn = {}", cms.use_cdn);
    println!("timeout_secs = {}", cms.timeout_secs);
    println!("configured = {}", cms.is_configured());
    println!();
    println!("[site]");
    println!("name = {:?}", ctx.config.site.name);
    println!("location = {:?}", ctx.config.site.location);
    println!("base_url = {:?}", ctx.config.site.base_url);
    println!();
    println!("[scheduler]");
    println!("period = {:?}", ctx.config.scheduler.period);
}
