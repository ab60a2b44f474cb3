//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Region;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

/// One entry of the region catalog.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegionDto {
    /// Upstream region code (e.g. `"SG"`).
    pub code: &'static str,
    /// Human-readable name.
    pub name: &'static str,
}

impl From<Region> for RegionDto {
    fn from(region: Region) -> Self {
        Self {
            code: region.code(),
            name: region.display_name(),
        }
    }
}

/// Clamps a signed query value into `1..=u32::MAX`.
///
/// Query strings may carry zero or negative page numbers; they are treated
/// as the first page rather than rejected.
#[must_use]
pub fn positive_u32(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_u32_clamps() {
        assert_eq!(positive_u32(-5), 1);
        assert_eq!(positive_u32(0), 1);
        assert_eq!(positive_u32(42), 42);
        assert_eq!(positive_u32(i64::MAX), u32::MAX);
    }

    #[test]
    fn region_dto_carries_code_and_name() {
        let dto = RegionDto::from(Region::Ind);
        assert_eq!(dto.code, "IND");
        assert_eq!(dto.name, Region::Ind.display_name());
    }
}
