use crate::api::blogs::{self, ListQuery};
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Blog, BlogList, Pagination};

/// State behind the blog listing screen: free-text search, a single tag
/// filter, a 1-based page cursor, and the last successful fetch. Changing
/// either filter resets the cursor to page 1. Responses are applied
/// last-one-wins; out-of-order arrivals are a known, unmitigated race.
#[derive(Debug, Clone)]
pub struct BrowseState {
    pub search: String,
    pub tag: String,
    page: u32,
    limit: u32,
    pub blogs: Vec<Blog>,
    pub pagination: Pagination,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            tag: String::new(),
            page: 1,
            limit: 10,
            blogs: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    /// Deep-link straight to a page, e.g. from a CLI flag. Interactive
    /// movement still goes through the clamped `next_page`/`prev_page`.
    pub fn with_cursor(page: u32, limit: u32) -> Self {
        let mut state = Self::new();
        state.page = page.max(1);
        state.limit = limit.max(1);
        state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.tag.clear();
        self.page = 1;
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    /// Move to the next page; clamped to the last known page count.
    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn goto_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// The query for the current cursor and filters. Empty filters are
    /// absent, not blank.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            tag: (!self.tag.is_empty()).then(|| self.tag.clone()),
        }
    }

    /// Overwrite the snapshot with a fetch result.
    pub fn apply(&mut self, list: BlogList) {
        self.pagination = list.pagination();
        self.blogs = list.blogs;
    }
}

/// Fetch the current page and apply it.
pub async fn refresh(state: &mut BrowseState, client: &ApiClient) -> ApiResult<()> {
    let list = blogs::list_blogs(client, &state.query()).await?;
    state.apply(list);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(page: u32, limit: u32, total: u64) -> BlogList {
        BlogList {
            blogs: Vec::new(),
            page,
            limit,
            total,
        }
    }

    #[test]
    fn new_state_starts_at_page_one() {
        let state = BrowseState::new();
        assert_eq!(state.page(), 1);
        assert_eq!(state.query().params()[0], ("page", "1".to_string()));
    }

    #[test]
    fn with_cursor_floors_at_one() {
        let state = BrowseState::with_cursor(0, 0);
        assert_eq!(state.page(), 1);
        assert_eq!(state.query().params()[1], ("limit", "1".to_string()));

        let state = BrowseState::with_cursor(4, 20);
        assert_eq!(state.page(), 4);
    }

    #[test]
    fn changing_search_resets_page() {
        let mut state = BrowseState::new();
        state.apply(list(1, 10, 50));
        state.goto_page(4);
        assert_eq!(state.page(), 4);

        state.set_search("css");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query().search.as_deref(), Some("css"));
    }

    #[test]
    fn changing_tag_resets_page() {
        let mut state = BrowseState::new();
        state.apply(list(1, 10, 50));
        state.goto_page(3);

        state.set_tag("React");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query().tag.as_deref(), Some("React"));
    }

    #[test]
    fn cleared_search_is_omitted_from_query() {
        let mut state = BrowseState::new();
        state.set_search("css");
        state.set_search("");
        assert_eq!(state.query().search, None);
    }

    #[test]
    fn pagination_clamps_to_known_bounds() {
        let mut state = BrowseState::new();
        state.apply(list(1, 10, 25)); // 3 pages

        assert!(!state.prev_page());
        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.page(), 3);

        state.goto_page(99);
        assert_eq!(state.page(), 3);
        state.goto_page(0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn apply_overwrites_previous_snapshot() {
        let mut state = BrowseState::new();
        state.apply(list(1, 10, 40));
        assert_eq!(state.total_pages(), 4);

        // A later (or out-of-order) response simply replaces the snapshot.
        state.apply(list(2, 10, 15));
        assert_eq!(state.total_pages(), 2);
        assert_eq!(state.pagination.page, 2);
    }

    #[test]
    fn empty_result_keeps_at_least_one_page() {
        let mut state = BrowseState::new();
        state.apply(list(1, 10, 0));
        assert_eq!(state.total_pages(), 1);
    }
}
