use serde::{Deserialize, Serialize};

/// A hero carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: String,
    pub main_heading: String,
    pub supporting_text: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_image: Option<String>,
}
