//! Pagination and sorting primitives for feed queries.
//!
//! Page and limit input never fails: missing, unparsable or non-positive
//! values fall back to the defaults, and limits are clamped to the configured
//! maximum. Sort keys are checked against a per-entity allow-list.

use serde::Serialize;

use crate::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}

impl PageRequest {
    /// Build from raw query-string values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, max_limit: i64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            limit: positive(limit).unwrap_or(DEFAULT_LIMIT).min(max_limit),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `"1"` or `"asc"` sort ascending; anything else (including nothing) descends.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "1" || v == "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// An allow-listed sort key for one entity kind.
pub trait SortField: Sized + Copy {
    /// The key used when the client asks for none.
    const DEFAULT: Self;

    /// Resolve a client-facing key; `None` when it is not allow-listed.
    fn parse(raw: &str) -> Option<Self>;

    /// The column this key orders by.
    fn column(&self) -> &'static str;
}

/// Sort keys accepted by the video listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortField {
    CreatedAt,
    Title,
    Views,
    Duration,
}

impl SortField for VideoSortField {
    const DEFAULT: Self = VideoSortField::CreatedAt;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" => Some(VideoSortField::CreatedAt),
            "title" => Some(VideoSortField::Title),
            "views" => Some(VideoSortField::Views),
            "duration" => Some(VideoSortField::Duration),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            VideoSortField::CreatedAt => "created_at",
            VideoSortField::Title => "title",
            VideoSortField::Views => "views",
            VideoSortField::Duration => "duration",
        }
    }
}

/// Resolved sort order: newest first unless the client says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Default for SortSpec<F> {
    fn default() -> Self {
        Self {
            field: F::DEFAULT,
            direction: SortDirection::Desc,
        }
    }
}

impl<F: SortField> SortSpec<F> {
    pub fn from_raw(sort_by: Option<&str>, sort_type: Option<&str>) -> Result<Self, AppError> {
        let field = match sort_by.map(str::trim).filter(|v| !v.is_empty()) {
            None => F::DEFAULT,
            Some(raw) => F::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid sortBy field: {}", raw)))?,
        };
        Ok(Self {
            field,
            direction: SortDirection::from_raw(sort_type),
        })
    }

    pub fn column(&self) -> &'static str {
        self.field.column()
    }
}

/// One page of results with paging metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub limit: i64,
    pub page: i64,
    pub total_pages: i64,
    pub paging_counter: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, request: &PageRequest) -> Self {
        let limit = request.limit.max(1);
        let page = request.page.max(1);
        let total_pages = (total_docs.saturating_add(limit - 1) / limit).max(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: (page - 1).saturating_mul(limit).saturating_add(1),
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}
