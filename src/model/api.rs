use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size when a request omits `per_page`.
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Upper bound applied to any requested page size.
pub const MAX_PER_PAGE: u64 = 100;

/// Error body returned for every failed request.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorDto {
    /// Always `false`.
    pub success: bool,
    pub message: String,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Success envelope wrapping a payload.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Success envelope without a payload.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct MessageDto {
    pub success: bool,
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Count returned by bulk operations and unread counters.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CountDto {
    pub count: u64,
}

/// One page of results. `page` is zero-based.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> PageDto<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

/// Zero-based pagination query parameters.
#[derive(Deserialize, IntoParams, Debug, Clone, Copy)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl PaginationParams {
    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> u64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_total_pages() {
        let page = PageDto::<u8>::new(vec![], 41, 0, 20);

        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn clamps_page_size() {
        let params = PaginationParams {
            page: 0,
            per_page: 5000,
        };

        assert_eq!(params.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn error_body_uses_envelope() {
        let json = serde_json::to_value(ErrorDto::new("nope")).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "nope");
    }
}
