//! GROQ queries for each content collection.
//!
//! Projections name exactly the fields the raw documents in
//! [`documents`](super::documents) deserialize.

use crate::domain::ContentKind;

pub const BANNER_QUERY: &str = r#"*[_type == "banner"] {
  _id,
  mainHeading,
  supportingText,
  ctaText,
  ctaLink,
  backgroundImage,
  publishedAt
} | order(publishedAt asc)"#;

pub const FACEBOOK_QUERY: &str = r#"*[_type == "facebook"] | order(publishedAt desc) {
  _id,
  iframeCode,
  publishedAt
}"#;

pub const EVENT_QUERY: &str = r#"*[_type == "event"] | order(publishedAt desc) {
  _id,
  title,
  description,
  date,
  image,
  ctaLink,
  publishedAt
}"#;

pub const VERSE_QUERY: &str = r#"*[_type == "verse"] | order(publishedAt desc) {
  _id,
  text,
  book,
  chapter,
  verse,
  publishedAt
}"#;

pub const GALLERY_QUERY: &str = r#"*[_type == "gallery"] | order(uploadedAt asc) {
  _id,
  name,
  image,
  uploadedAt
}"#;

/// Single event whose CTA link equals `$slug`.
pub const EVENT_BY_CTA_LINK_QUERY: &str = r#"*[_type == "event" && ctaLink == $slug][0] {
  _id,
  title,
  description,
  date,
  image,
  ctaLink,
  publishedAt
}"#;

/// Single banner by document id `$id`.
pub const BANNER_BY_ID_QUERY: &str = r#"*[_type == "banner" && _id == $id][0] {
  _id,
  mainHeading,
  supportingText,
  ctaText,
  ctaLink,
  backgroundImage,
  publishedAt
}"#;

pub fn collection_query(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Verse => VERSE_QUERY,
        ContentKind::Event => EVENT_QUERY,
        ContentKind::Banner => BANNER_QUERY,
        ContentKind::Gallery => GALLERY_QUERY,
        ContentKind::FacebookPost => FACEBOOK_QUERY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_queries_filter_by_cms_type() {
        for kind in ContentKind::ALL {
            let filter = format!("_type == \"{}\"", kind.cms_type());
            assert!(collection_query(kind).contains(&filter), "{kind}");
        }
    }
}
