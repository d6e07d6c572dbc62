pub mod daangn;
pub mod http;
pub mod page;
pub mod pagination;
pub mod traits;
pub mod types;

pub use daangn::DaangnScraper;
pub use http::HttpFetcher;
pub use traits::ListingScraper;
pub use types::{FilterConfig, SearchQuery};
