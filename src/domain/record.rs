use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Banner, Event, FacebookPost, GalleryImage, Verse};

/// The content collections stored in the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Verse,
    Event,
    Banner,
    Gallery,
    #[value(name = "facebook")]
    #[serde(rename = "facebook")]
    FacebookPost,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Verse,
        ContentKind::Event,
        ContentKind::Banner,
        ContentKind::Gallery,
        ContentKind::FacebookPost,
    ];

    /// The `_type` the CMS stores documents of this kind under.
    pub fn cms_type(self) -> &'static str {
        match self {
            ContentKind::Verse => "verse",
            ContentKind::Event => "event",
            ContentKind::Banner => "banner",
            ContentKind::Gallery => "gallery",
            ContentKind::FacebookPost => "facebook",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cms_type())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verse" | "verses" => Ok(ContentKind::Verse),
            "event" | "events" => Ok(ContentKind::Event),
            "banner" | "banners" => Ok(ContentKind::Banner),
            "gallery" => Ok(ContentKind::Gallery),
            "facebook" | "posts" => Ok(ContentKind::FacebookPost),
            other => Err(format!("Unknown content kind: {}", other)),
        }
    }
}

/// One document retrieved from the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentRecord {
    Verse(Verse),
    Event(Event),
    Banner(Banner),
    Gallery(GalleryImage),
    #[serde(rename = "facebook")]
    FacebookPost(FacebookPost),
}

impl ContentRecord {
    pub fn id(&self) -> &str {
        match self {
            ContentRecord::Verse(v) => &v.id,
            ContentRecord::Event(e) => &e.id,
            ContentRecord::Banner(b) => &b.id,
            ContentRecord::Gallery(g) => &g.id,
            ContentRecord::FacebookPost(p) => &p.id,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRecord::Verse(_) => ContentKind::Verse,
            ContentRecord::Event(_) => ContentKind::Event,
            ContentRecord::Banner(_) => ContentKind::Banner,
            ContentRecord::Gallery(_) => ContentKind::Gallery,
            ContentRecord::FacebookPost(_) => ContentKind::FacebookPost,
        }
    }

    pub fn as_verse(&self) -> Option<&Verse> {
        match self {
            ContentRecord::Verse(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_verse(self) -> Option<Verse> {
        match self {
            ContentRecord::Verse(v) => Some(v),
            _ => None,
        }
    }

    /// Short single-line label for listings and logs.
    pub fn summary(&self) -> String {
        match self {
            ContentRecord::Verse(v) => v.share_text(),
            ContentRecord::Event(e) => format!("{} ({})", e.title, e.date),
            ContentRecord::Banner(b) => b.main_heading.clone(),
            ContentRecord::Gallery(g) => g.name.clone(),
            ContentRecord::FacebookPost(p) => p
                .embed_src()
                .unwrap_or_else(|| format!("facebook post {}", p.id)),
        }
    }
}

/// A record chosen for a particular calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPick {
    pub record: ContentRecord,
    pub date: NaiveDate,
    pub index: usize,
}
