use serde::Serialize;

use crate::repositories::Page;

#[derive(Debug, Serialize)]
pub struct PaginatedDto<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PaginatedDto<T> {
    /// `base_query` holds the other query parameters so page links keep them.
    pub fn from_page(page: Page<T>, base_query: &str) -> Self {
        let link = |number: u32| {
            if base_query.is_empty() {
                format!("?page={number}")
            } else {
                format!("?{base_query}&page={number}")
            }
        };

        Self {
            count: page.total,
            next: page.has_next().then(|| link(page.page + 1)),
            previous: page.has_previous().then(|| link(page.page - 1)),
            results: page.items,
        }
    }
}
