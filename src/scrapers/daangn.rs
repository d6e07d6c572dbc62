use crate::extract::amount;
use crate::extract::heuristics::{self, compact};
use crate::extract::reconcile::{self, clean_text, reconcile};
use crate::extract::{Candidate, CandidateSource, ListingFilter, StructuredData};
use crate::models::{CrawlSummary, ListingRecord};
use crate::scrapers::page::{selector, Page};
use crate::scrapers::pagination::CrawlState;
use crate::scrapers::traits::{ListingScraper, PageFetcher};
use crate::scrapers::types::SearchQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Detail page path: /kr/buy-sell/<slug>-<id>
static DETAIL_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:/kr)?/buy-sell/[^/?#\s"'<>\\]*-[a-z0-9]{6,}"#)
        .expect("detail link pattern must compile")
});

/// Compiled CSS selectors for listing and detail pages
struct Selectors {
    listing_links: Selector,
    any_link: Selector,
    og_title: Selector,
    og_url: Selector,
    canonical: Selector,
    meta_price: Selector,
    article_section: Selector,
    article_tag: Selector,
    json_ld: Selector,
    heading: Selector,
    price_text: Selector,
    breadcrumbs: Selector,
    description: Selector,
}

impl Selectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            listing_links: selector(
                r#"a[href*="/kr/buy-sell/"], [data-testid*="card"] a, a[aria-label*="게시글"]"#,
            )?,
            any_link: selector("a[href]")?,
            og_title: selector(r#"meta[property="og:title"]"#)?,
            og_url: selector(r#"meta[property="og:url"]"#)?,
            canonical: selector(r#"link[rel="canonical"]"#)?,
            meta_price: selector(r#"meta[property="product:price:amount"]"#)?,
            article_section: selector(r#"meta[property="article:section"]"#)?,
            article_tag: selector(r#"meta[property="article:tag"]"#)?,
            json_ld: selector(r#"script[type="application/ld+json"]"#)?,
            heading: selector(r#"h1, [data-testid*="title"], #article-title"#)?,
            price_text: selector(r#"[class*="price"], #article-price, #article-price-nanum"#)?,
            breadcrumbs: selector(
                r#"nav[aria-label="breadcrumb"] a, [class*="breadcrumb"] a, [class*="category"], a[href*="category"]"#,
            )?,
            description: selector(r#"#article-detail, [class*="content"], article"#)?,
        })
    }
}

/// Daangn Market rental-listing crawler
pub struct DaangnScraper<F> {
    fetcher: F,
    query: SearchQuery,
    filter: ListingFilter,
    selectors: Selectors,
}

impl<F: PageFetcher> DaangnScraper<F> {
    pub fn new(fetcher: F, query: SearchQuery, filter: ListingFilter) -> Result<Self> {
        Ok(Self {
            fetcher,
            query,
            filter,
            selectors: Selectors::compile()?,
        })
    }

    /// First listing page for the configured search
    pub fn build_start_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.query.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.query.base_url))?;

        url.query_pairs_mut()
            .clear()
            .append_pair("in", &self.query.location_param())
            .append_pair("search", &self.query.compact_query())
            .append_pair("page", "1");

        Ok(url)
    }

    /// Same listing URL with its `page` parameter set, other parameters untouched
    pub fn next_page_url(current: &Url, page: u32) -> Url {
        let page = page.to_string();
        let mut replaced = false;
        let mut pairs: Vec<(String, String)> = current
            .query_pairs()
            .into_owned()
            .map(|(key, value)| {
                if key == "page" {
                    replaced = true;
                    (key, page.clone())
                } else {
                    (key, value)
                }
            })
            .collect();
        if !replaced {
            pairs.push(("page".to_string(), page));
        }

        let mut next = current.clone();
        next.query_pairs_mut().clear().extend_pairs(pairs);
        next
    }

    /// Detail-page URLs on a listing page, in first-seen order
    pub fn discover_detail_links(&self, page: &Page) -> Vec<Url> {
        let doc = page.document();

        let links = collect_detail_links(&page.url, doc.attrs(&self.selectors.listing_links, "href"));
        if !links.is_empty() {
            return links;
        }

        let links = collect_detail_links(&page.url, doc.attrs(&self.selectors.any_link, "href"));
        if !links.is_empty() {
            return links;
        }

        // Client-rendered pages only carry the links inside script payloads
        debug!("No detail anchors on {}, scanning raw text", page.url);
        collect_detail_links(
            &page.url,
            DETAIL_LINK.find_iter(&page.body).map(|m| m.as_str().to_string()),
        )
    }

    /// Extract a listing from a detail page, `None` when the filter rejects it
    pub fn process_detail_page(&self, page: &Page) -> Option<ListingRecord> {
        let doc = page.document();
        let sel = &self.selectors;

        let structured = StructuredData::from_blocks(doc.deep_texts(&sel.json_ld));
        let breadcrumb = reconcile::category_guess(doc.own_texts(&sel.breadcrumbs));
        let description = clean_text(&doc.deep_texts(&sel.description).join(" "));

        let product_name = reconcile(
            "product_name",
            &[
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.og_title, "content")),
                Candidate::new(CandidateSource::StructuredData, structured.name),
                Candidate::new(CandidateSource::VisibleText, doc.first_own_text(&sel.heading)),
            ],
        );
        let raw_price = reconcile(
            "rental_price",
            &[
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.meta_price, "content")),
                Candidate::new(CandidateSource::StructuredData, structured.price),
                Candidate::new(CandidateSource::VisibleText, doc.first_own_text(&sel.price_text)),
            ],
        );
        let post_link = reconcile(
            "post_link",
            &[
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.canonical, "href")),
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.og_url, "content")),
                Candidate::new(CandidateSource::PageUrl, Some(page.url.to_string())),
            ],
        );
        let category = reconcile(
            "category",
            &[
                Candidate::new(CandidateSource::StructuredData, structured.category),
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.article_section, "content")),
                Candidate::new(CandidateSource::VisibleText, breadcrumb),
                Candidate::new(CandidateSource::Metadata, doc.attr(&sel.article_tag, "content")),
            ],
        );

        if !self.filter.should_keep(&product_name, &category) {
            return None;
        }

        let text = format!("{} {}", product_name, description);

        Some(ListingRecord {
            rental_duration: heuristics::parse_duration(&text),
            deposit: Some(heuristics::parse_deposit(&text)).filter(|d| d != heuristics::DEFAULT_DEPOSIT),
            purchase_age: heuristics::parse_purchase_age(&text),
            damage_policy: heuristics::has_damage_policy(&text),
            rental_price: resolve_price(&raw_price, &description),
            product_name,
            post_link,
            category,
        })
    }

    /// Walk the listing pages in order, visiting every detail link before moving on
    pub async fn crawl(&self) -> Result<(Vec<ListingRecord>, CrawlSummary)> {
        let mut summary = CrawlSummary::start();
        let mut records = Vec::new();
        let mut state = CrawlState::new(self.query.max_pages);
        let mut url = self.build_start_url()?;

        while !state.is_done() {
            info!("[LIST] page {}/{}: {}", state.page(), self.query.max_pages, url);
            summary.listing_pages += 1;

            let current = match self.fetcher.fetch(&url).await {
                Ok(page) => {
                    let links = self.discover_detail_links(&page);
                    info!("[LIST] found detail links: {}", links.len());

                    for link in &links {
                        self.visit_detail(link, &mut records, &mut summary).await;
                    }
                    page.url
                }
                Err(e) => {
                    warn!("Listing page {} failed: {:#}", url, e);
                    url.clone()
                }
            };

            match state.advance() {
                Some(next) => url = Self::next_page_url(&current, next),
                None => break,
            }
        }

        summary.finish();
        Ok((records, summary))
    }

    async fn visit_detail(&self, link: &Url, records: &mut Vec<ListingRecord>, summary: &mut CrawlSummary) {
        let page = match self.fetcher.fetch(link).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Detail page {} failed: {:#}", link, e);
                return;
            }
        };

        summary.detail_pages += 1;
        match self.process_detail_page(&page) {
            Some(record) => {
                debug!("Accepted: {} ({} won)", record.product_name, record.rental_price);
                summary.kept += 1;
                records.push(record);
            }
            None => summary.skipped += 1,
        }
    }
}

#[async_trait]
impl<F: PageFetcher> ListingScraper for DaangnScraper<F> {
    async fn scrape(&self) -> Result<Vec<ListingRecord>> {
        info!(
            "Starting Daangn crawl: '{}' in {} ({} pages)",
            self.query.compact_query(),
            self.query.location_param(),
            self.query.max_pages
        );

        let (records, summary) = self.crawl().await?;

        info!(
            "Crawl finished in {}s: {} listing pages, {} detail pages, {} kept, {} skipped",
            summary.elapsed_secs(),
            summary.listing_pages,
            summary.detail_pages,
            summary.kept,
            summary.skipped
        );

        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "Daangn"
    }
}

/// Keep hrefs that look like detail pages, without query or fragment, resolved and deduplicated
fn collect_detail_links<I>(base: &Url, hrefs: I) -> Vec<Url>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        if !DETAIL_LINK.is_match(&href) {
            continue;
        }
        let clean = href.split(['?', '#']).next().unwrap_or_default();
        let Ok(url) = base.join(clean) else {
            debug!("Unresolvable detail link: {}", href);
            continue;
        };
        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }

    links
}

fn is_missing_price(raw: &str) -> bool {
    matches!(compact(raw).as_str(), "" | "0" | "0원" | "가격없음")
}

/// Listed price as an integer string, falling back to a fee quoted in the description
fn resolve_price(raw_price: &str, description: &str) -> String {
    let listed = if is_missing_price(raw_price) {
        None
    } else {
        heuristics::find_amount(&amount::trim_zero_fraction(raw_price)).filter(|p| p != "0")
    };

    listed
        .or_else(|| heuristics::find_rental_fee(description))
        .unwrap_or_else(|| "0".to_string())
}
