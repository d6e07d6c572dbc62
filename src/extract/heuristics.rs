//! Ordered pattern rules over listing text.
//!
//! Every extractor works on the text with all whitespace removed and walks a
//! fixed rule table: the first rule whose pattern matches and whose transform
//! yields a value wins.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::amount;

pub const DEFAULT_DURATION: &str = "1일";
pub const DEFAULT_DEPOSIT: &str = "0";

/// A single `(pattern, transform)` pair in a rule table
struct Rule {
    name: &'static str,
    pattern: Regex,
    produce: fn(&Captures<'_>) -> Option<String>,
    /// Drops a match when the text right after it satisfies this
    reject_after: Option<fn(&str) -> bool>,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, produce: fn(&Captures<'_>) -> Option<String>) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("heuristic rule pattern must compile"),
            produce,
            reject_after: None,
        }
    }

    fn rejecting_after(mut self, reject: fn(&str) -> bool) -> Self {
        self.reject_after = Some(reject);
        self
    }

    fn apply(&self, text: &str) -> Option<String> {
        self.pattern.captures_iter(text).find_map(|caps| {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            if self.reject_after.is_some_and(|reject| reject(&text[end..])) {
                return None;
            }
            (self.produce)(&caps)
        })
    }
}

fn first_match(table: &'static str, rules: &[Rule], text: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        let value = rule.apply(text)?;
        debug!(table, rule = rule.name, value = %value, "heuristic rule matched");
        Some(value)
    })
}

/// "1일", "3시간", "2박" and the like are periods, not prices
fn starts_with_duration_unit(rest: &str) -> bool {
    ["일", "시간", "주", "박", "개월", "달"]
        .iter()
        .any(|unit| rest.starts_with(unit))
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map(|m| m.as_str()).unwrap_or("")
}

fn number(caps: &Captures<'_>, index: usize) -> Option<u64> {
    group(caps, index).parse().ok()
}

/// Strip every whitespace character
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

static DURATION_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // "8/30" is a calendar date, not a period
        Rule::new("date_guard", r"\d+/\d+", |_| Some(DEFAULT_DURATION.to_string())),
        Rule::new("nights_days", r"(\d+)박(\d+)일", |c| Some(format!("{}일", group(c, 2)))),
        Rule::new("days", r"(\d+)(?:[-~]\d+)?일", |c| Some(format!("{}일", group(c, 1)))),
        Rule::new("same_day", r"하루|당일", |_| Some("1일".to_string())),
        Rule::new("weeks", r"(\d+)주(?:일)?", |c| {
            number(c, 1)?.checked_mul(7).map(|days| format!("{days}일"))
        }),
        Rule::new("hours", r"(\d+)시간", |c| {
            let hours = number(c, 1)?;
            if hours < 24 {
                Some(format!("{hours}시간"))
            } else {
                Some(format!("{}일", (hours / 24).max(1)))
            }
        }),
        Rule::new("month", r"한달|1개월|30일", |_| Some("30일".to_string())),
    ]
});

static PURCHASE_AGE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new("few_days_ago", r"며칠전", |_| Some("며칠 전".to_string())),
        Rule::new("units_ago", r"(\d+)(일|주|개월|달|년)전", |c| {
            Some(format!("{}{} 전", group(c, 1), group(c, 2)))
        }),
        Rule::new("used_for", r"(?:구매|사용)(?:한지)?(\d+)(일|주|개월|달|년)", |c| {
            Some(format!("{}{}", group(c, 1), group(c, 2)))
        }),
        Rule::new("last_year", r"작년", |_| Some("작년".to_string())),
        Rule::new("this_year", r"올해|금년", |_| Some("올해".to_string())),
        Rule::new("model_year", r"(20\d{2})년(형|식)?", |c| {
            Some(format!("{}년{}", group(c, 1), group(c, 2)))
        }),
        Rule::new("barely_used", r"얼마안|거의안|새것같", |_| Some("최근".to_string())),
    ]
});

// Tolerates the usual misspellings of 보증금 seen in listings. A bare 보증 is a
// warranty ("정품 보증 1년"), not a deposit.
static DEPOSIT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![Rule::new(
        "deposit",
        r"(?i)(?:보[증중층쯩][금굼곰]|디파짓|deposit)[은는:：=\-]*(\d[\d,.]*)(만|천|원)?",
        |c| amount::normalize(group(c, 1), group(c, 2)),
    )]
});

// Periods quoted between the keyword and the fee ("대여 2박3일 3만원") are skipped.
static RENTAL_FEE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![Rule::new(
        "rental_fee",
        r"(?i)(?:대여비|대여료|대여가격|렌탈비|렌탈료|렌트비|이용료|대여|렌탈)[은는:：=\-]*(?:\d+(?:[-~]\d+)?(?:시간|주일|주|박|개월|달|일)[은는:：=\-]*)*(\d[\d,.]*)(만|천|원)?",
        |c| amount::normalize(group(c, 1), group(c, 2)),
    )
    .rejecting_after(starts_with_duration_unit)]
});

static AMOUNT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![Rule::new("amount", r"(\d[\d,.]*)(만|천|원)?", |c| {
        amount::normalize(group(c, 1), group(c, 2))
    })]
});

static DAMAGE_POLICY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)파손|분실|수리비|a/?s|실비|청구").expect("damage pattern must compile")
});

/// Rental period token, "1일" when nothing matches
pub fn parse_duration(text: &str) -> String {
    first_match("duration", &DURATION_RULES, &compact(text))
        .unwrap_or_else(|| DEFAULT_DURATION.to_string())
}

/// Normalized deposit amount, if the text mentions one
pub fn find_deposit(text: &str) -> Option<String> {
    first_match("deposit", &DEPOSIT_RULES, &compact(text))
}

/// Normalized deposit amount, "0" when absent
pub fn parse_deposit(text: &str) -> String {
    find_deposit(text).unwrap_or_else(|| DEFAULT_DEPOSIT.to_string())
}

pub fn parse_purchase_age(text: &str) -> Option<String> {
    first_match("purchase_age", &PURCHASE_AGE_RULES, &compact(text))
}

/// Whether the owner charges for damage or loss
pub fn has_damage_policy(text: &str) -> bool {
    DAMAGE_POLICY.is_match(&compact(text))
}

/// Amount following a rental-fee keyword, e.g. "대여비 15000원"
pub fn find_rental_fee(text: &str) -> Option<String> {
    first_match("rental_fee", &RENTAL_FEE_RULES, &compact(text))
}

/// First amount in a price label such as "15,000원" or "2만"
pub fn find_amount(text: &str) -> Option<String> {
    first_match("amount", &AMOUNT_RULES, &compact(text))
}
