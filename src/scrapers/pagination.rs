/// Listing-page counter. Starts at page 1 and is done once past `max_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlState {
    page: u32,
    max_pages: u32,
}

impl CrawlState {
    pub fn new(max_pages: u32) -> Self {
        Self { page: 1, max_pages }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_done(&self) -> bool {
        self.page > self.max_pages
    }

    /// Move to the next page, returning it while still within the limit
    pub fn advance(&mut self) -> Option<u32> {
        self.page = self.page.saturating_add(1);
        (!self.is_done()).then_some(self.page)
    }
}
