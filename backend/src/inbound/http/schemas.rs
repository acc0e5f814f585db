//! Shared HTTP query schemas.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::listing::ListParams;

/// Paging, search, and sort query parameters shared by the list endpoints.
///
/// Everything is optional; out-of-range page windows fail validation in the
/// domain layer, while unknown sort fields and directions fall back to
/// defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number, default 1.
    pub page: Option<u32>,
    /// Page size, default 10, maximum 100.
    pub page_size: Option<u32>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// Sort column name.
    pub sort_by: Option<String>,
    /// Sort direction, `asc` or `desc`.
    pub sort_order: Option<String>,
}

impl From<ListQuery> for ListParams {
    fn from(query: ListQuery) -> Self {
        Self {
            page: query.page,
            page_size: query.page_size,
            search: query.search,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
        }
    }
}
