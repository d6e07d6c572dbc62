use serde_json::Value;
use tracing::{debug, warn};

/// Where a candidate value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Metadata,
    StructuredData,
    VisibleText,
    PageUrl,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub source: CandidateSource,
    pub value: Option<String>,
}

impl Candidate {
    pub fn new(source: CandidateSource, value: Option<String>) -> Self {
        Self { source, value }
    }
}

/// Collapse whitespace runs to a single space and trim
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First candidate that is non-empty after cleaning, in priority order
pub fn reconcile(field: &str, candidates: &[Candidate]) -> String {
    for candidate in candidates {
        if let Some(value) = candidate.value.as_deref() {
            let cleaned = clean_text(value);
            if !cleaned.is_empty() {
                debug!(field, source = ?candidate.source, "reconciled field");
                return cleaned;
            }
        }
    }
    String::new()
}

/// Last non-empty entry of a breadcrumb trail, the most specific one
pub fn category_guess<I, S>(texts: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| clean_text(t.as_ref()))
        .filter(|t| !t.is_empty())
        .last()
}

/// Fields read from embedded Product/Offer JSON-LD blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredData {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

impl StructuredData {
    /// Merge every block, first value per field wins. Malformed blocks are skipped.
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Self::default();

        for block in blocks {
            let parsed: Value = match serde_json::from_str(block.as_ref()) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Skipping malformed JSON-LD block: {}", e);
                    continue;
                }
            };

            let nodes = match parsed {
                Value::Array(items) => items,
                other => vec![other],
            };

            for node in nodes.iter().filter(|n| is_product_node(n)) {
                data.absorb(node);
            }
        }

        data
    }

    fn absorb(&mut self, node: &Value) {
        let offered = node.get("itemOffered");

        if self.name.is_none() {
            self.name = string_field(node, "name")
                .or_else(|| offered.and_then(|o| string_field(o, "name")));
        }

        if self.price.is_none() {
            let offers = match node.get("offers") {
                Some(Value::Array(list)) => list.first(),
                other => other,
            };
            self.price = offers.and_then(|o| {
                scalar_field(o, "price").or_else(|| {
                    o.get("priceSpecification")
                        .and_then(|spec| scalar_field(spec, "price"))
                })
            });
        }

        if self.category.is_none() {
            self.category = string_field(node, "category")
                .or_else(|| offered.and_then(|o| string_field(o, "category")));
        }
    }
}

fn is_product_node(node: &Value) -> bool {
    matches!(
        node.get("@type").and_then(Value::as_str),
        Some("Product") | Some("Offer")
    )
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn scalar_field(node: &Value, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                Some(whole.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| format!("{}", f.trunc() as u64))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(v: &str) -> Candidate {
        Candidate::new(CandidateSource::Metadata, Some(v.to_string()))
    }

    #[test]
    fn test_reconcile_skips_blank_candidates() {
        let candidates = vec![
            Candidate::new(CandidateSource::Metadata, None),
            Candidate::new(CandidateSource::StructuredData, Some("   ".to_string())),
            Candidate::new(CandidateSource::VisibleText, Some("  캠핑   의자 대여 ".to_string())),
        ];
        assert_eq!(reconcile("product_name", &candidates), "캠핑 의자 대여");
    }

    #[test]
    fn test_reconcile_keeps_priority_order() {
        let candidates = vec![meta("메타 제목"), Candidate::new(CandidateSource::VisibleText, Some("본문 제목".into()))];
        assert_eq!(reconcile("product_name", &candidates), "메타 제목");
        assert_eq!(reconcile("product_name", &[]), "");
    }

    #[test]
    fn test_category_guess_takes_last_entry() {
        let trail = vec!["홈", " ", "중고거래", "  스포츠/레저 "];
        assert_eq!(category_guess(trail), Some("스포츠/레저".to_string()));
        assert_eq!(category_guess(Vec::<String>::new()), None);
    }

    #[test]
    fn test_structured_data_product() {
        let block = r#"{
            "@type": "Product",
            "name": "빔프로젝터 대여",
            "category": "디지털기기",
            "offers": {"@type": "Offer", "price": 20000, "priceCurrency": "KRW"}
        }"#;
        let data = StructuredData::from_blocks([block]);
        assert_eq!(data.name.as_deref(), Some("빔프로젝터 대여"));
        assert_eq!(data.price.as_deref(), Some("20000"));
        assert_eq!(data.category.as_deref(), Some("디지털기기"));
    }

    #[test]
    fn test_structured_data_offer_list_and_nested_fields() {
        let block = r#"[
            {"@type": "BreadcrumbList"},
            {"@type": "Offer",
             "itemOffered": {"name": "텐트 렌탈", "category": "캠핑"},
             "offers": [{"priceSpecification": {"price": "15000.0"}}]}
        ]"#;
        let data = StructuredData::from_blocks([block]);
        assert_eq!(data.name.as_deref(), Some("텐트 렌탈"));
        assert_eq!(data.price.as_deref(), Some("15000.0"));
        assert_eq!(data.category.as_deref(), Some("캠핑"));
    }

    #[test]
    fn test_structured_data_skips_malformed_blocks() {
        let blocks = ["{not json", r#"{"@type": "Product", "name": "카메라", "offers": {"price": 3000.0}}"#];
        let data = StructuredData::from_blocks(blocks);
        assert_eq!(data.name.as_deref(), Some("카메라"));
        assert_eq!(data.price.as_deref(), Some("3000"));
        assert_eq!(data.category, None);
    }
}
