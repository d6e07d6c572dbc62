use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted rental listing, as exported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub product_name: String,
    /// Integer currency units as decimal digits, "0" when unknown
    pub rental_price: String,
    pub post_link: String,
    pub category: String,
    /// Short token such as "3일" or "6시간"
    pub rental_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_age: Option<String>,
    pub damage_policy: bool,
}

/// Counters for one crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub listing_pages: u32,
    pub detail_pages: u32,
    pub kept: u32,
    pub skipped: u32,
}

impl CrawlSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            listing_pages: 0,
            detail_pages: 0,
            kept: 0,
            skipped: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_secs(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_seconds())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let record = ListingRecord {
            product_name: "텐트 대여".to_string(),
            rental_price: "10000".to_string(),
            post_link: "https://www.daangn.com/kr/buy-sell/tent-abc123".to_string(),
            category: "캠핑/레저".to_string(),
            rental_duration: "1일".to_string(),
            deposit: None,
            purchase_age: None,
            damage_policy: false,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("deposit").is_none());
        assert!(json.get("purchase_age").is_none());
        assert_eq!(json["rental_price"], "10000");
        assert_eq!(json["damage_policy"], false);
    }
}
