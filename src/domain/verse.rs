use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const INSTAGRAM_HASHTAGS: &str = "#VerseOfTheDay #Bible #Faith #RCCG #Christianity #Inspiration #DailyVerse #Scripture #God #Jesus #BibleVerse";

const FACEBOOK_SHARER: &str = "https://www.facebook.com/sharer/sharer.php";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub id: String,
    pub text: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl Verse {
    /// `"John 3:16"`
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verse)
    }

    /// Quoted verse text followed by its reference, used for copy and share.
    pub fn share_text(&self) -> String {
        format!("\"{}\" - {}", self.text, self.reference())
    }

    pub fn instagram_text(&self) -> String {
        format!("{}\n\n{}", self.share_text(), INSTAGRAM_HASHTAGS)
    }

    /// Facebook sharer link quoting the verse. Facebook does not accept a
    /// prefilled post body, only a `quote` alongside the shared page.
    pub fn facebook_share_url(&self, page_url: &str) -> Result<String, url::ParseError> {
        let mut url = url::Url::parse(FACEBOOK_SHARER)?;
        url.query_pairs_mut()
            .append_pair("u", page_url)
            .append_pair("quote", &self.share_text());
        Ok(url.into())
    }
}

/// A verse together with the calendar day it was picked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseOfTheDay {
    pub verse: Verse,
    pub date: NaiveDate,
}
