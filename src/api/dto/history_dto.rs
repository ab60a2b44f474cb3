//! History DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, positive_u32};
use crate::domain::history::DEFAULT_PAGE_SIZE;
use crate::domain::{HistoryEvent, HistoryPage, HistoryQuery, HistoryTypeFilter, Region};

/// Query parameters for `GET /api/v1/regions/{region}/history`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Rows per page (max 100). Defaults to 12.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Case-insensitive title substring.
    #[serde(default)]
    pub search: Option<String>,
    /// `all`, `event` or `update`. Defaults to `all`.
    #[serde(default, rename = "type")]
    pub event_type: HistoryTypeFilter,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

impl HistoryParams {
    /// Normalizes the raw parameters into a [`HistoryQuery`].
    #[must_use]
    pub fn to_query(&self) -> HistoryQuery {
        HistoryQuery::new(
            positive_u32(self.page),
            positive_u32(self.page_size),
            self.search.as_deref(),
            self.event_type,
        )
    }
}

/// Response body for the history endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Region served.
    pub region: Region,
    /// Archived rows, newest first.
    pub data: Vec<HistoryEvent>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

impl HistoryResponse {
    /// Wraps a [`HistoryPage`].
    #[must_use]
    pub fn new(region: Region, page: HistoryPage) -> Self {
        Self {
            region,
            pagination: PaginationMeta {
                page: page.page,
                page_size: page.page_size,
                total: page.total,
                total_pages: page.total_pages,
            },
            data: page.data,
        }
    }
}
