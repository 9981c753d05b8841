use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),
}

impl FilterError {
    /// Query-string parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidPage(_) => "page",
            FilterError::InvalidLimit(_) => "limit",
            FilterError::InvalidSortField(_) => "sortField",
            FilterError::InvalidSortOrder(_) => "sortOrder",
        }
    }
}
