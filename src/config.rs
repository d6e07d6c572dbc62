use crate::extract::filter::{DEFAULT_EXCLUDED_CATEGORIES, DEFAULT_TITLE_PATTERN};
use crate::scrapers::types::DEFAULT_BASE_URL;
use crate::scrapers::{FilterConfig, SearchQuery};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Crawl rental listings from Daangn Market for one neighbourhood
#[derive(Debug, Parser)]
#[command(name = "rental-scout", version)]
pub struct Cli {
    /// Search text
    #[arg(long, default_value = "대여")]
    pub query: String,

    /// Neighbourhood name
    #[arg(long, default_value = "노량진동")]
    pub location_name: String,

    /// Neighbourhood id
    #[arg(long, default_value = "6088")]
    pub location_id: String,

    /// Listing pages to crawl
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Regex a title must match to count as a rental offer
    #[arg(long, default_value = DEFAULT_TITLE_PATTERN)]
    pub title_pattern: String,

    /// Category to drop, repeatable
    #[arg(long = "exclude-category", default_values_t = DEFAULT_EXCLUDED_CATEGORIES.map(String::from).to_vec())]
    pub excluded_categories: Vec<String>,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Listing search endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Where to write the JSON export
    #[arg(long, short, default_value = "rental_listings.json")]
    pub output: PathBuf,
}

impl Cli {
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            query: self.query.clone(),
            location_name: self.location_name.clone(),
            location_id: self.location_id.clone(),
            max_pages: self.max_pages,
            base_url: self.base_url.clone(),
        }
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            title_pattern: self.title_pattern.clone(),
            excluded_categories: self.excluded_categories.clone(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
