use serde::{Deserialize, Serialize};

use crate::extract::filter::{DEFAULT_EXCLUDED_CATEGORIES, DEFAULT_TITLE_PATTERN};

pub const DEFAULT_BASE_URL: &str = "https://www.daangn.com/kr/buy-sell/";

/// Search parameters for one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search text, internal whitespace is dropped ("대 여" searches "대여")
    pub query: String,
    /// Neighbourhood name, e.g. "노량진동"
    pub location_name: String,
    /// Marketplace id of the neighbourhood
    pub location_id: String,
    /// Number of listing pages to request
    pub max_pages: u32,
    /// Listing search endpoint
    pub base_url: String,
}

impl SearchQuery {
    pub fn compact_query(&self) -> String {
        self.query.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Value of the `in` query parameter
    pub fn location_param(&self) -> String {
        format!("{}-{}", self.location_name, self.location_id)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: "대여".to_string(),
            location_name: "노량진동".to_string(),
            location_id: "6088".to_string(),
            max_pages: 5,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Which listings are worth exporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub title_pattern: String,
    pub excluded_categories: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            title_pattern: DEFAULT_TITLE_PATTERN.to_string(),
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}
