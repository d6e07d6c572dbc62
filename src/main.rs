mod config;
mod extract;
mod models;
mod scrapers;

use anyhow::Context;
use clap::Parser;
use config::Cli;
use extract::ListingFilter;
use scrapers::{DaangnScraper, HttpFetcher, ListingScraper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("🥕 Rental Scout - Daangn rental listing crawler");
    info!("================================================");

    let filter_config = cli.filter_config();
    let filter = ListingFilter::new(&filter_config.title_pattern, filter_config.excluded_categories)?;
    let fetcher = HttpFetcher::new(cli.delay())?;
    let scraper = DaangnScraper::new(fetcher, cli.search_query(), filter)?;

    info!("Source: {}", scraper.source_name());
    let listings = scraper.scrape().await?;

    // Display results
    info!("✅ Collected {} rental listings", listings.len());

    for (i, listing) in listings.iter().enumerate() {
        println!("{}. {} ({}원 / {})", i + 1, listing.product_name, listing.rental_price, listing.rental_duration);
        println!("   Category: {}", listing.category);
        if let Some(deposit) = &listing.deposit {
            println!("   Deposit: {}원", deposit);
        }
        if let Some(age) = &listing.purchase_age {
            println!("   Purchased: {}", age);
        }
        println!("   Damage policy: {}", if listing.damage_policy { "yes" } else { "no" });
        println!("   URL: {}", listing.post_link);
        println!();
    }

    let json = serde_json::to_string_pretty(&listings)?;
    tokio::fs::write(&cli.output, json)
        .await
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!("💾 Saved listings to {}", cli.output.display());

    Ok(())
}
