pub mod comments;
pub mod health;
pub mod likes;
pub mod playlists;
pub mod tweets;
pub mod videos;

use serde::Deserialize;
use utoipa::IntoParams;
use vidshare_core::PageRequest;

/// Raw `page`/`limit` query values. Parsed leniently: bad input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<String>,
    /// Page size, clamped to the configured maximum
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self, max_limit: i64) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref(), max_limit)
    }
}
