use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use crate::config::ApiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Product columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Price,
    Category,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub field: SortField,
    pub sort: SortDirection,
}

impl Default for FilterOrderInfo {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            sort: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Raw listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 20
    pub limit: Option<String>,
    /// `id`, `name`, `price`, `category`, `createdAt` or `updatedAt`
    pub sort_field: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
}

/// Validated product listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub pagination: Pagination,
    pub order: FilterOrderInfo,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn from_params(params: ListParams, api: &ApiConfig) -> Result<Self, FilterError> {
        let page = match non_blank(params.page) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| FilterError::InvalidPage(format!("'{}' is not a positive integer", raw)))?,
            None => 1,
        };

        let limit = match non_blank(params.limit) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=api.max_page_limit).contains(l))
                .ok_or_else(|| {
                    FilterError::InvalidLimit(format!("'{}' must be between 1 and {}", raw, api.max_page_limit))
                })?,
            None => api.default_page_limit,
        };

        let order = FilterOrder::validate_and_parse(
            non_blank(params.sort_field).as_deref(),
            non_blank(params.sort_order).as_deref(),
        )?;

        Ok(Self {
            pagination: Pagination { page, limit },
            order,
            category: non_blank(params.category),
            search: non_blank(params.search),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let limit = i64::from(pagination.limit);
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
