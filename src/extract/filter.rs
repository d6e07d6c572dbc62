use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use super::heuristics::compact;

pub const DEFAULT_TITLE_PATTERN: &str = "대여|렌탈";
pub const DEFAULT_EXCLUDED_CATEGORIES: [&str; 3] = ["티켓/교환권", "삽니다", "무료나눔"];

/// Keep/skip decision for a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    TitleMismatch,
    ExcludedCategory,
}

/// Decides whether an extracted listing is a rental offer worth exporting
#[derive(Debug, Clone)]
pub struct ListingFilter {
    title_pattern: Regex,
    excluded_categories: HashSet<String>,
}

impl ListingFilter {
    pub fn new<I, S>(title_pattern: &str, excluded_categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title_pattern = Regex::new(title_pattern)
            .with_context(|| format!("Invalid title pattern: {}", title_pattern))?;

        Ok(Self {
            title_pattern,
            excluded_categories: excluded_categories.into_iter().map(Into::into).collect(),
        })
    }

    pub fn verdict(&self, product_name: &str, category: &str) -> Verdict {
        if !self.title_pattern.is_match(&compact(product_name)) {
            Verdict::TitleMismatch
        } else if self.excluded_categories.contains(category) {
            Verdict::ExcludedCategory
        } else {
            Verdict::Keep
        }
    }

    /// Same as [`verdict`](Self::verdict), logging the skip reason
    pub fn should_keep(&self, product_name: &str, category: &str) -> bool {
        match self.verdict(product_name, category) {
            Verdict::Keep => true,
            Verdict::TitleMismatch => {
                info!("[SKIP] title has no rental keyword: {}", product_name);
                false
            }
            Verdict::ExcludedCategory => {
                info!("[SKIP] excluded category '{}': {}", category, product_name);
                false
            }
        }
    }
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            title_pattern: Regex::new(DEFAULT_TITLE_PATTERN).expect("default title pattern must compile"),
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_title_is_kept() {
        let filter = ListingFilter::default();
        assert!(filter.should_keep("캠핑용품 대여합니다", "캠핑/레저"));
        assert!(filter.should_keep("빔 프로젝터 렌탈", ""));
    }

    #[test]
    fn test_keyword_split_by_whitespace_still_matches() {
        let filter = ListingFilter::default();
        assert_eq!(filter.verdict("텐트 대 여", "캠핑/레저"), Verdict::Keep);
    }

    #[test]
    fn test_title_without_keyword_is_rejected() {
        let filter = ListingFilter::default();
        assert_eq!(filter.verdict("책상 팝니다", "가구/인테리어"), Verdict::TitleMismatch);
        assert!(!filter.should_keep("책상 팝니다", "가구/인테리어"));
    }

    #[test]
    fn test_excluded_category_is_rejected() {
        let filter = ListingFilter::default();
        assert_eq!(filter.verdict("유모차 대여", "무료나눔"), Verdict::ExcludedCategory);
        assert!(!filter.should_keep("공연 티켓 대여", "티켓/교환권"));
        assert!(!filter.should_keep("캠핑의자 대여 구해요", "삽니다"));
    }

    #[test]
    fn test_custom_configuration() {
        let filter = ListingFilter::new("(?i)rent", ["가전"]).unwrap();
        assert!(filter.should_keep("Camera RENT", "디지털기기"));
        assert!(!filter.should_keep("Camera rent", "가전"));
        assert!(!filter.should_keep("캠핑용품 대여", "디지털기기"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(ListingFilter::new("(대여", DEFAULT_EXCLUDED_CATEGORIES).is_err());
    }
}
