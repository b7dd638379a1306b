use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 100;

/// Paginated list envelope returned by every list endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

pub fn clamp_page(page: Option<usize>) -> usize {
    page.unwrap_or(1).max(1)
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Row offset for a SQL `OFFSET`; `None` when the page lies beyond any
/// addressable row.
pub fn sql_offset(page: usize, limit: usize) -> Option<i64> {
    (page - 1).checked_mul(limit).and_then(|offset| i64::try_from(offset).ok())
}

/// Slices an already filtered and sorted list. Pages past the end are empty.
pub fn paginate<T: Serialize>(items: Vec<T>, page: Option<usize>, limit: Option<usize>) -> Page<T> {
    let page = clamp_page(page);
    let limit = clamp_limit(limit);
    let total = items.len();
    let total_pages = total.div_ceil(limit);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    Page {
        items,
        total,
        page,
        limit,
        total_pages,
    }
}
