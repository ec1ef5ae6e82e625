use serde::{Deserialize, Serialize};

/// An embedded Facebook post. The CMS stores the raw iframe markup that
/// Facebook's "Embed" dialog produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookPost {
    pub id: String,
    pub iframe_code: String,
    pub published_at: String,
}

impl FacebookPost {
    /// The decoded `src` of the embedded iframe, if the markup has one.
    pub fn embed_src(&self) -> Option<String> {
        extract_attr(&self.iframe_code, "src")
    }
}

fn extract_attr(markup: &str, attr: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!(" {}={}", attr, quote);
        if let Some(pos) = markup.find(&pattern) {
            let rest = &markup[pos + pattern.len()..];
            let end = rest.find(quote)?;
            return Some(html_escape::decode_html_entities(&rest[..end]).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(iframe_code: &str) -> FacebookPost {
        FacebookPost {
            id: "fb-1".into(),
            iframe_code: iframe_code.into(),
            published_at: "2025-07-01T12:00:00Z".into(),
        }
    }

    #[test]
    fn test_embed_src_decodes_entities() {
        let p = post(r#"<iframe src="https://www.facebook.com/plugins/post.php?href=abc&amp;show_text=true&amp;width=500" width="500" height="600"></iframe>"#);
        assert_eq!(
            p.embed_src().as_deref(),
            Some("https://www.facebook.com/plugins/post.php?href=abc&show_text=true&width=500")
        );
    }

    #[test]
    fn test_embed_src_single_quotes() {
        let p = post("<iframe width='500' src='https://www.facebook.com/plugins/video.php'></iframe>");
        assert_eq!(
            p.embed_src().as_deref(),
            Some("https://www.facebook.com/plugins/video.php")
        );
    }

    #[test]
    fn test_embed_src_missing() {
        assert_eq!(post("<p>not an embed</p>").embed_src(), None);
    }
}
