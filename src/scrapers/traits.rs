use crate::models::ListingRecord;
use crate::scrapers::page::Page;
use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// Common trait for all listing scrapers
/// Other marketplaces can be added next to Daangn behind this trait
#[async_trait]
pub trait ListingScraper: Send + Sync {
    /// Crawl the source and return every accepted listing
    async fn scrape(&self) -> Result<Vec<ListingRecord>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// Loads a page. Retries, throttling and transport live behind this seam.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page>;
}
