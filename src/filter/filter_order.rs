use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection, SortField};

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve `sortField` / `sortOrder` against the column whitelist.
    pub fn validate_and_parse(field: Option<&str>, order: Option<&str>) -> Result<FilterOrderInfo, FilterError> {
        let defaults = FilterOrderInfo::default();

        let field = match field {
            Some(f) => Self::parse_field(f)?,
            None => defaults.field,
        };

        let sort = match order {
            Some(o) if o.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(o) if o.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(o) => return Err(FilterError::InvalidSortOrder(format!("'{}' must be 'asc' or 'desc'", o))),
            None => defaults.sort,
        };

        Ok(FilterOrderInfo { field, sort })
    }

    fn parse_field(field: &str) -> Result<SortField, FilterError> {
        // Both the JSON names and the column names are accepted.
        Ok(match field {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "price" => SortField::Price,
            "category" => SortField::Category,
            "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            other => return Err(FilterError::InvalidSortField(other.to_string())),
        })
    }

    /// `ORDER BY` with `id` as tie-breaker so pages never overlap.
    pub fn generate(info: &FilterOrderInfo) -> String {
        let dir = info.sort.to_sql();
        if info.field == SortField::Id {
            format!("ORDER BY \"id\" {}", dir)
        } else {
            format!("ORDER BY \"{}\" {}, \"id\" {}", info.field.column(), dir, dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_and_snake_case() {
        let a = FilterOrder::validate_and_parse(Some("createdAt"), Some("ASC")).unwrap();
        let b = FilterOrder::validate_and_parse(Some("created_at"), Some("asc")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.field, SortField::CreatedAt);
        assert_eq!(a.sort, SortDirection::Asc);
    }

    #[test]
    fn rejects_unknown_field_and_order() {
        assert_eq!(
            FilterOrder::validate_and_parse(Some("password"), None),
            Err(FilterError::InvalidSortField("password".into()))
        );
        assert!(matches!(
            FilterOrder::validate_and_parse(None, Some("sideways")),
            Err(FilterError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn generates_order_with_tie_breaker() {
        let info = FilterOrderInfo {
            field: SortField::Price,
            sort: SortDirection::Asc,
        };
        assert_eq!(FilterOrder::generate(&info), "ORDER BY \"price\" ASC, \"id\" ASC");

        let by_id = FilterOrderInfo {
            field: SortField::Id,
            sort: SortDirection::Desc,
        };
        assert_eq!(FilterOrder::generate(&by_id), "ORDER BY \"id\" DESC");
    }
}
