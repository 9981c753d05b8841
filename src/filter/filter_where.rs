use super::types::ProductQuery;

/// Builds the `WHERE` clause for a product listing with positional parameters.
pub struct FilterWhere {
    param_values: Vec<String>,
    conditions: Vec<String>,
}

impl FilterWhere {
    fn new() -> Self {
        Self {
            param_values: vec![],
            conditions: vec![],
        }
    }

    /// Returns the clause body (without `WHERE`) and its bind values.
    pub fn generate(query: &ProductQuery) -> (String, Vec<String>) {
        let mut filter_where = Self::new();

        if let Some(category) = &query.category {
            let p = filter_where.param(category.clone());
            filter_where.conditions.push(format!("\"category\" = {}", p));
        }

        if let Some(search) = &query.search {
            let p = filter_where.param(format!("%{}%", escape_like(search)));
            filter_where
                .conditions
                .push(format!("(\"name\" ILIKE {p} ESCAPE '\\' OR \"description\" ILIKE {p} ESCAPE '\\')"));
        }

        let where_clause = if filter_where.conditions.is_empty() {
            "1=1".to_string()
        } else {
            filter_where.conditions.join(" AND ")
        };
        (where_clause, filter_where.param_values)
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{FilterOrderInfo, Pagination};

    fn query(category: Option<&str>, search: Option<&str>) -> ProductQuery {
        ProductQuery {
            pagination: Pagination { page: 1, limit: 10 },
            order: FilterOrderInfo::default(),
            category: category.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn no_filters_matches_everything() {
        let (sql, params) = FilterWhere::generate(&query(None, None));
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn category_and_search_share_positional_params() {
        let (sql, params) = FilterWhere::generate(&query(Some("Electronics"), Some("phone")));
        assert_eq!(
            sql,
            "\"category\" = $1 AND (\"name\" ILIKE $2 ESCAPE '\\' OR \"description\" ILIKE $2 ESCAPE '\\')"
        );
        assert_eq!(params, vec!["Electronics".to_string(), "%phone%".to_string()]);
    }

    #[test]
    fn wildcards_in_search_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
