use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A loaded page: final URL plus raw body
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self { url, body: body.into() }
    }

    /// Parse the body. `Html` is not `Send`, keep the result out of `.await` points.
    pub fn document(&self) -> Document {
        Document {
            html: Html::parse_document(&self.body),
        }
    }
}

/// Parsed page with the selection helpers the extractors need
pub struct Document {
    html: Html,
}

impl Document {
    /// Attribute values of every matching element
    pub fn attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.html
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::to_string)
            .collect()
    }

    /// First matching attribute value
    pub fn attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.html
            .select(selector)
            .find_map(|el| el.value().attr(attr))
            .map(str::to_string)
    }

    /// Direct text of every matching element
    pub fn own_texts(&self, selector: &Selector) -> Vec<String> {
        self.html.select(selector).map(own_text).collect()
    }

    /// Direct text of the first matching element that has any
    pub fn first_own_text(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .map(own_text)
            .find(|t| !t.trim().is_empty())
    }

    /// All descendant text of every matching element
    pub fn deep_texts(&self, selector: &Selector) -> Vec<String> {
        self.html
            .select(selector)
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .collect()
    }
}

fn own_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|t| &**t)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compile a CSS selector, reporting the offending expression
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid CSS selector '{}': {}", css, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Page {
        Page::new(Url::parse("https://example.com/a").unwrap(), body)
    }

    #[test]
    fn test_attrs_and_texts() {
        let doc = page(
            r#"<html><head><meta property="og:title" content="텐트 대여"></head>
            <body><h1> <span>badge</span> 제목 </h1>
            <nav class="breadcrumb"><a>홈</a><a>캠핑</a></nav></body></html>"#,
        )
        .document();

        let og = selector(r#"meta[property="og:title"]"#).unwrap();
        assert_eq!(doc.attr(&og, "content").as_deref(), Some("텐트 대여"));

        let h1 = selector("h1").unwrap();
        assert_eq!(doc.first_own_text(&h1).map(|t| t.trim().to_string()).as_deref(), Some("제목"));
        assert!(doc.deep_texts(&h1)[0].contains("badge"));

        let crumbs = selector(r#"[class*="breadcrumb"] a"#).unwrap();
        assert_eq!(doc.own_texts(&crumbs), vec!["홈".to_string(), "캠핑".to_string()]);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(selector("[]").is_err());
        assert!(selector("a >> b").is_err());
    }
}
