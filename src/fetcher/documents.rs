//! Raw documents as the content store returns them, and their conversion
//! into domain records.
//!
//! Projections return `null` for unset fields, so every authored field is
//! optional here. Documents missing a field the site cannot render without
//! are dropped with a warning instead of failing the whole collection.

use serde::Deserialize;

use crate::domain::{Banner, Event, FacebookPost, GalleryImage, Verse};
use crate::fetcher::image::{ImageOptions, ImageSource, ImageUrlBuilder};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVerse {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: Option<String>,
    pub book: Option<String>,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
    pub published_at: Option<String>,
}

impl RawVerse {
    pub fn into_verse(self) -> Option<Verse> {
        match (self.text, self.book, self.chapter, self.verse) {
            (Some(text), Some(book), Some(chapter), Some(verse)) if chapter > 0 && verse > 0 => {
                Some(Verse {
                    id: self.id,
                    text,
                    book,
                    chapter,
                    verse,
                })
            }
            _ => {
                tracing::warn!("Skipping incomplete verse document {}", self.id);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub image: Option<ImageSource>,
    pub cta_link: Option<String>,
    pub published_at: Option<String>,
}

impl RawEvent {
    pub fn into_event(self, images: &ImageUrlBuilder, options: ImageOptions) -> Option<Event> {
        let (Some(title), Some(date)) = (self.title, self.date) else {
            tracing::warn!("Skipping event document {} without title or date", self.id);
            return None;
        };
        Some(Event {
            image: images.url(self.image.as_ref(), options),
            id: self.id,
            title,
            description: self.description,
            date,
            cta_link: self.cta_link.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBanner {
    #[serde(rename = "_id")]
    pub id: String,
    pub main_heading: Option<String>,
    pub supporting_text: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub background_image: Option<ImageSource>,
}

impl RawBanner {
    pub fn into_banner(self, images: &ImageUrlBuilder, options: ImageOptions) -> Option<Banner> {
        let Some(main_heading) = self.main_heading else {
            tracing::warn!("Skipping banner document {} without heading", self.id);
            return None;
        };
        Some(Banner {
            background_image: images.url(self.background_image.as_ref(), options),
            id: self.id,
            main_heading,
            supporting_text: self.supporting_text.unwrap_or_default(),
            cta_text: self.cta_text.unwrap_or_default(),
            cta_link: self.cta_link.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGalleryImage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub image: Option<ImageSource>,
    pub uploaded_at: Option<String>,
}

impl RawGalleryImage {
    pub fn into_gallery_image(self, images: &ImageUrlBuilder, options: ImageOptions) -> GalleryImage {
        GalleryImage {
            image: images.url(self.image.as_ref(), options),
            id: self.id,
            name: self.name.unwrap_or_default(),
            uploaded_at: self.uploaded_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFacebookPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub iframe_code: Option<String>,
    pub published_at: Option<String>,
}

impl RawFacebookPost {
    pub fn into_post(self) -> Option<FacebookPost> {
        let Some(iframe_code) = self.iframe_code.filter(|c| !c.trim().is_empty()) else {
            tracing::warn!("Skipping facebook document {} without embed code", self.id);
            return None;
        };
        Some(FacebookPost {
            id: self.id,
            iframe_code,
            published_at: self.published_at.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::image::presets;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new("abc123", "production")
    }

    #[test]
    fn test_verse_document_with_nulls_is_skipped() {
        let raw: RawVerse = serde_json::from_str(
            r#"{"_id":"v1","text":null,"book":"John","chapter":3,"verse":16,"publishedAt":null}"#,
        )
        .unwrap();
        assert!(raw.into_verse().is_none());
    }

    #[test]
    fn test_verse_with_zero_chapter_is_skipped() {
        let raw: RawVerse = serde_json::from_str(
            r#"{"_id":"v1","text":"t","book":"John","chapter":0,"verse":16}"#,
        )
        .unwrap();
        assert!(raw.into_verse().is_none());
    }

    #[test]
    fn test_event_document_resolves_image() {
        let raw: RawEvent = serde_json::from_str(
            r#"{
                "_id": "e1",
                "title": "Harvest Service",
                "description": null,
                "date": "2025-10-05T10:00:00Z",
                "image": {"_type": "image", "asset": {"_ref": "image-xyz-1200x800-jpg", "_type": "reference"}},
                "ctaLink": "harvest-2025",
                "publishedAt": "2025-09-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        let event = raw.into_event(&images(), presets::EVENT_CARD).unwrap();
        assert_eq!(event.title, "Harvest Service");
        assert_eq!(event.cta_link, "harvest-2025");
        assert_eq!(
            event.image.as_deref(),
            Some("https://cdn.sanity.io/images/abc123/production/xyz-1200x800.jpg?w=600&h=400&q=100&fm=webp")
        );
    }

    #[test]
    fn test_banner_without_image() {
        let raw: RawBanner = serde_json::from_str(
            r#"{"_id":"b1","mainHeading":"Welcome Home","supportingText":"Sundays 11am","ctaText":"Visit","ctaLink":"/contact","backgroundImage":null}"#,
        )
        .unwrap();
        let banner = raw.into_banner(&images(), presets::BANNER).unwrap();
        assert_eq!(banner.main_heading, "Welcome Home");
        assert_eq!(banner.background_image, None);
    }

    #[test]
    fn test_empty_embed_code_is_skipped() {
        let raw: RawFacebookPost =
            serde_json::from_str(r#"{"_id":"f1","iframeCode":"  ","publishedAt":"2025-01-01"}"#)
                .unwrap();
        assert!(raw.into_post().is_none());
    }
}
