//! Response envelopes and pagination shared by every endpoint.
//!
//! Success payloads are wrapped in [`ApiResponse`]; failures render through
//! [`crate::error::ApiError`]. The two envelopes keep the wire format uniform
//! across the whole API surface.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// Success envelope wrapping every 2xx payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `OK` on the success path.
    pub code: String,
    /// Human-readable summary, `success` unless a handler overrides it.
    pub message: String,
    /// The payload.
    pub data: Option<T>,
    /// Pagination metadata, present on paged endpoints only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            code: "OK".to_string(),
            message: "success".to_string(),
            data: Some(data),
            meta: None,
        }
    }

    /// Wrap a payload together with pagination metadata.
    #[must_use]
    pub fn with_meta(data: T, meta: PaginationMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::ok(data)
        }
    }
}

/// Pagination metadata attached to paged responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
}

/// Page query parameters: `?page=2&page_size=50`.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting from 1.
    #[serde(default = "PageQuery::default_page")]
    pub page: usize,
    /// Items per page (1-100).
    #[serde(default = "PageQuery::default_page_size")]
    pub page_size: usize,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: Self::default_page(),
            page_size: Self::default_page_size(),
        }
    }
}

impl PageQuery {
    const MAX_PAGE_SIZE: usize = 100;

    const fn default_page() -> usize {
        1
    }

    const fn default_page_size() -> usize {
        20
    }

    /// Validate the page window.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `page` is 0 or `page_size` is outside
    /// 1-100.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::validation("page must be >= 1"));
        }
        if self.page_size == 0 || self.page_size > Self::MAX_PAGE_SIZE {
            return Err(ApiError::validation(format!(
                "page_size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    /// Zero-based offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Build the metadata for a result set of `total` items.
    #[must_use]
    pub const fn to_meta(&self, total: usize) -> PaginationMeta {
        PaginationMeta {
            total,
            page: self.page,
            page_size: self.page_size,
            has_next: self.page * self.page_size < total,
        }
    }
}
