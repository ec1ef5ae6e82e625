use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::app::Result;
use crate::config::CmsConfig;
use crate::domain::{Banner, ContentKind, ContentRecord, Event, FacebookPost, GalleryImage, Verse};
use crate::fetcher::documents::{RawBanner, RawEvent, RawFacebookPost, RawGalleryImage, RawVerse};
use crate::fetcher::image::{presets, ImageUrlBuilder};
use crate::fetcher::queries;
use crate::fetcher::{ContentFetcher, FetchError};

/// Client for the Sanity HTTP query API.
pub struct SanityClient {
    client: Client,
    config: CmsConfig,
    images: ImageUrlBuilder,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

impl SanityClient {
    pub fn new(config: CmsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("chapel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Http)?;

        let images = ImageUrlBuilder::new(config.project_id.clone(), config.dataset.clone());

        Ok(Self {
            client,
            config,
            images,
        })
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// Query endpoint URL for `groq` with `$name` parameters bound to
    /// JSON-encoded string values.
    pub fn query_url(&self, groq: &str, params: &[(&str, &str)]) -> Result<Url> {
        if !self.config.is_configured() {
            return Err(FetchError::NotConfigured.into());
        }

        let host = if self.config.use_cdn { "apicdn" } else { "api" };
        let mut url = Url::parse(&format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.config.project_id.trim(),
            host,
            self.config.api_version.trim_start_matches('v'),
            self.config.dataset.trim()
        ))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                let encoded = serde_json::to_string(value).map_err(FetchError::Malformed)?;
                pairs.append_pair(&format!("${}", name), &encoded);
            }
        }

        Ok(url)
    }

    /// Run a GROQ query and deserialize its `result`.
    pub async fn query<T: DeserializeOwned>(&self, groq: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.query_url(groq, params)?;
        tracing::debug!("Querying content store: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Http)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(FetchError::Http)?;

        Ok(parse_response(status, &body)?)
    }

    async fn fetch_raw<T: DeserializeOwned>(&self, kind: ContentKind) -> Result<Vec<T>> {
        self.query(queries::collection_query(kind), &[]).await
    }

    pub async fn fetch_verses(&self) -> Result<Vec<Verse>> {
        let raw: Vec<RawVerse> = self.fetch_raw(ContentKind::Verse).await?;
        Ok(raw.into_iter().filter_map(RawVerse::into_verse).collect())
    }

    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        let raw: Vec<RawEvent> = self.fetch_raw(ContentKind::Event).await?;
        Ok(raw
            .into_iter()
            .filter_map(|e| e.into_event(&self.images, presets::EVENT_LIST))
            .collect())
    }

    pub async fn fetch_banners(&self) -> Result<Vec<Banner>> {
        let raw: Vec<RawBanner> = self.fetch_raw(ContentKind::Banner).await?;
        Ok(raw
            .into_iter()
            .filter_map(|b| b.into_banner(&self.images, presets::BANNER))
            .collect())
    }

    pub async fn fetch_gallery(&self) -> Result<Vec<GalleryImage>> {
        let raw: Vec<RawGalleryImage> = self.fetch_raw(ContentKind::Gallery).await?;
        Ok(raw
            .into_iter()
            .map(|g| g.into_gallery_image(&self.images, presets::GALLERY))
            .collect())
    }

    pub async fn fetch_facebook_posts(&self) -> Result<Vec<FacebookPost>> {
        let raw: Vec<RawFacebookPost> = self.fetch_raw(ContentKind::FacebookPost).await?;
        Ok(raw.into_iter().filter_map(RawFacebookPost::into_post).collect())
    }

    /// Event for a detail page, with its image at full quality.
    pub async fn fetch_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let raw: Option<RawEvent> = self
            .query(queries::EVENT_BY_CTA_LINK_QUERY, &[("slug", slug)])
            .await?;
        Ok(self.detail_event(raw))
    }

    /// Event for a card, with its image cropped to card size.
    pub async fn fetch_event_by_cta_link(&self, cta_link: &str) -> Result<Option<Event>> {
        let raw: Option<RawEvent> = self
            .query(queries::EVENT_BY_CTA_LINK_QUERY, &[("slug", cta_link)])
            .await?;
        Ok(self.card_event(raw))
    }

    pub async fn fetch_banner_by_id(&self, id: &str) -> Result<Option<Banner>> {
        let raw: Option<RawBanner> = self
            .query(queries::BANNER_BY_ID_QUERY, &[("id", id)])
            .await?;
        Ok(self.single_banner(raw))
    }

    fn detail_event(&self, raw: Option<RawEvent>) -> Option<Event> {
        raw.and_then(|e| e.into_event(&self.images, presets::EVENT_DETAIL))
    }

    fn card_event(&self, raw: Option<RawEvent>) -> Option<Event> {
        raw.and_then(|e| e.into_event(&self.images, presets::EVENT_CARD))
    }

    fn single_banner(&self, raw: Option<RawBanner>) -> Option<Banner> {
        raw.and_then(|b| b.into_banner(&self.images, presets::BANNER))
    }
}

#[async_trait]
impl ContentFetcher for SanityClient {
    async fn fetch_collection(&self, kind: ContentKind) -> Result<Vec<ContentRecord>> {
        let records: Vec<ContentRecord> = match kind {
            ContentKind::Verse => self
                .fetch_verses()
                .await?
                .into_iter()
                .map(ContentRecord::Verse)
                .collect(),
            ContentKind::Event => self
                .fetch_events()
                .await?
                .into_iter()
                .map(ContentRecord::Event)
                .collect(),
            ContentKind::Banner => self
                .fetch_banners()
                .await?
                .into_iter()
                .map(ContentRecord::Banner)
                .collect(),
            ContentKind::Gallery => self
                .fetch_gallery()
                .await?
                .into_iter()
                .map(ContentRecord::Gallery)
                .collect(),
            ContentKind::FacebookPost => self
                .fetch_facebook_posts()
                .await?
                .into_iter()
                .map(ContentRecord::FacebookPost)
                .collect(),
        };
        Ok(records)
    }
}

/// Decode a query API response body. Non-success statuses carry an error
/// description in one of a few shapes depending on where the request failed.
pub(crate) fn parse_response<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
) -> std::result::Result<T, FetchError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/description")
                    .or_else(|| v.get("message"))
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
        return Err(FetchError::Status { status, message });
    }

    let envelope: QueryResponse<T> = serde_json::from_slice(body)?;
    Ok(envelope.result)
}
