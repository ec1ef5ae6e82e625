//! CDN URLs for images stored in the content store.
//!
//! Image fields hold a reference to an uploaded asset rather than a URL.
//! Asset ids encode the file's dimensions and extension, for example
//! `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`, which is served from
//! `https://cdn.sanity.io/images/<project>/<dataset>/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg`.

use serde::Deserialize;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// An image field as stored in a document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSource {
    pub asset: Option<AssetRef>,
    pub alt: Option<String>,
}

/// Either a bare reference (`_ref`) or an expanded asset (`_id`, `url`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
}

impl ImageOptions {
    /// Full resolution, highest quality.
    pub const MAX_QUALITY: ImageOptions = ImageOptions {
        width: None,
        height: None,
        quality: 100,
    };

    pub const fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            quality: 100,
        }
    }
}

pub mod presets {
    use super::ImageOptions;

    pub const BANNER: ImageOptions = ImageOptions::sized(1920, 800);
    pub const EVENT_CARD: ImageOptions = ImageOptions::sized(600, 400);
    pub const EVENT_LIST: ImageOptions = ImageOptions::MAX_QUALITY;
    pub const EVENT_DETAIL: ImageOptions = ImageOptions::MAX_QUALITY;
    pub const GALLERY: ImageOptions = ImageOptions::MAX_QUALITY;

    pub const MOBILE: ImageOptions = ImageOptions::sized(768, 500);
    pub const TABLET: ImageOptions = ImageOptions::sized(1024, 600);
    pub const DESKTOP: ImageOptions = ImageOptions::sized(1920, 800);
    pub const XL: ImageOptions = ImageOptions::sized(2560, 1000);
}

/// One URL per breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsiveImages {
    pub mobile: Option<String>,
    pub tablet: Option<String>,
    pub desktop: Option<String>,
    pub xl: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.project_id.is_empty() && !self.dataset.is_empty()
    }

    /// WebP URL for `source` with `options` applied, or `None` when there is
    /// no usable asset or the project is not configured.
    pub fn url(&self, source: Option<&ImageSource>, options: ImageOptions) -> Option<String> {
        if !self.is_configured() {
            tracing::warn!("Content store is not configured, skipping image URL");
            return None;
        }

        let asset = source?.asset.as_ref()?;
        let base = asset
            .reference
            .as_deref()
            .or(asset.id.as_deref())
            .and_then(|id| self.cdn_path(id))
            .or_else(|| asset.url.clone())?;

        let mut params = Vec::with_capacity(4);
        if let Some(w) = options.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = options.height {
            params.push(format!("h={}", h));
        }
        params.push(format!("q={}", options.quality));
        params.push("fm=webp".to_string());

        let separator = if base.contains('?') { '&' } else { '?' };
        Some(format!("{}{}{}", base, separator, params.join("&")))
    }

    pub fn responsive(&self, source: Option<&ImageSource>) -> ResponsiveImages {
        ResponsiveImages {
            mobile: self.url(source, presets::MOBILE),
            tablet: self.url(source, presets::TABLET),
            desktop: self.url(source, presets::DESKTOP),
            xl: self.url(source, presets::XL),
        }
    }

    fn cdn_path(&self, asset_id: &str) -> Option<String> {
        let rest = asset_id.strip_prefix("image-")?;
        let (name, ext) = rest.rsplit_once('-')?;
        let (_, dims) = name.rsplit_once('-')?;
        let (w, h) = dims.split_once('x')?;
        if w.parse::<u32>().is_err() || h.parse::<u32>().is_err() {
            return None;
        }
        Some(format!(
            "{}/{}/{}/{}.{}",
            CDN_BASE, self.project_id, self.dataset, name, ext
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new("abc123", "production")
    }

    fn reference(id: &str) -> ImageSource {
        ImageSource {
            asset: Some(AssetRef {
                reference: Some(id.into()),
                ..Default::default()
            }),
            alt: None,
        }
    }

    #[test]
    fn test_reference_becomes_cdn_url() {
        let source = reference("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
        assert_eq!(
            builder().url(Some(&source), presets::BANNER).as_deref(),
            Some("https://cdn.sanity.io/images/abc123/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=1920&h=800&q=100&fm=webp")
        );
    }

    #[test]
    fn test_max_quality_has_no_dimensions() {
        let source = reference("image-abc-640x480-png");
        assert_eq!(
            builder().url(Some(&source), ImageOptions::MAX_QUALITY).as_deref(),
            Some("https://cdn.sanity.io/images/abc123/production/abc-640x480.png?q=100&fm=webp")
        );
    }

    #[test]
    fn test_expanded_asset_url_is_used_when_id_is_opaque() {
        let source = ImageSource {
            asset: Some(AssetRef {
                reference: None,
                id: Some("not-an-image-id".into()),
                url: Some("https://cdn.example.org/photo.jpg".into()),
            }),
            alt: None,
        };
        assert_eq!(
            builder().url(Some(&source), presets::EVENT_CARD).as_deref(),
            Some("https://cdn.example.org/photo.jpg?w=600&h=400&q=100&fm=webp")
        );
    }

    #[test]
    fn test_missing_source_or_project_yields_none() {
        let source = reference("image-abc-640x480-png");
        assert_eq!(builder().url(None, presets::GALLERY), None);
        assert_eq!(builder().url(Some(&ImageSource::default()), presets::GALLERY), None);
        assert_eq!(
            ImageUrlBuilder::new("", "production").url(Some(&source), presets::GALLERY),
            None
        );
    }

    #[test]
    fn test_responsive_breakpoints() {
        let source = reference("image-abc-4000x2000-jpg");
        let set = builder().responsive(Some(&source));
        assert!(set.mobile.unwrap().contains("w=768&h=500"));
        assert!(set.tablet.unwrap().contains("w=1024&h=600"));
        assert!(set.desktop.unwrap().contains("w=1920&h=800"));
        assert!(set.xl.unwrap().contains("w=2560&h=1000"));
    }
}
