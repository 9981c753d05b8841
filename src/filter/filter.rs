use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ProductQuery, SqlResult};

const PRODUCT_COLUMNS: &str = "\"id\", \"name\", \"description\", \"price\", \"category\", \"created_at\", \"updated_at\"";

/// Renders a [`ProductQuery`] against the `products` table.
pub struct ProductFilter<'a> {
    query: &'a ProductQuery,
}

impl<'a> ProductFilter<'a> {
    pub fn new(query: &'a ProductQuery) -> Self {
        Self { query }
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(self.query);
        let order_clause = FilterOrder::generate(&self.query.order);
        let limit_clause = format!(
            "LIMIT {} OFFSET {}",
            self.query.pagination.limit,
            self.query.pagination.offset()
        );

        let query = [
            format!("SELECT {}", PRODUCT_COLUMNS),
            "FROM \"products\"".to_string(),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ]
        .join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(self.query);
        SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM \"products\" WHERE {}", where_clause),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{FilterOrderInfo, Pagination, SortDirection, SortField};

    #[test]
    fn renders_full_select() {
        let query = ProductQuery {
            pagination: Pagination { page: 3, limit: 5 },
            order: FilterOrderInfo {
                field: SortField::Name,
                sort: SortDirection::Asc,
            },
            category: Some("Books".to_string()),
            search: None,
        };

        let sql = ProductFilter::new(&query).to_sql();
        assert_eq!(
            sql.query,
            format!(
                "SELECT {} FROM \"products\" WHERE \"category\" = $1 ORDER BY \"name\" ASC, \"id\" ASC LIMIT 5 OFFSET 10",
                PRODUCT_COLUMNS
            )
        );
        assert_eq!(sql.params, vec!["Books".to_string()]);
    }

    #[test]
    fn count_ignores_paging_and_order() {
        let query = ProductQuery {
            pagination: Pagination { page: 9, limit: 50 },
            order: FilterOrderInfo::default(),
            category: None,
            search: None,
        };

        let sql = ProductFilter::new(&query).to_count_sql();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"products\" WHERE 1=1");
        assert!(sql.params.is_empty());
    }
}
