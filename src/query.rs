use serde::Deserialize;
use utoipa::IntoParams;

/// SQL query builder for the purchase-order listing
/// Builds a single SQL query with an optional vendor filter and ordering
pub struct SQLQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<i64>,
    order_clause: String,
}

impl SQLQueryBuilder {
    /// Creates a builder selecting the given columns from `purchase_orders`,
    /// ordered by id ascending until `set_sort` is called
    pub fn new(columns: &str) -> Self {
        Self {
            base_query: format!("SELECT {} FROM purchase_orders", columns),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: "id ASC".to_string(),
        }
    }

    /// Restricts the listing to one vendor's orders
    pub fn add_vendor_filter(&mut self, vendor_id: i64) {
        let param_index = self.params.len() + 1;
        self.where_clauses.push(format!("vendor_id = ${}", param_index));
        self.params.push(vendor_id);
    }

    /// Sets the ORDER BY clause
    /// `id` is appended as a tiebreaker so the listing order is stable
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = match field {
            SortField::Id => format!("id {}", order_str),
            other => format!("{} {}, id ASC", other.column(), order_str),
        };
    }

    /// Builds the final SQL query string
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<i64>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        query.push_str(" ORDER BY ");
        query.push_str(&self.order_clause);

        (query, self.params.clone())
    }
}

/// Query parameters of GET /api/purchase_orders/
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseOrderQuery {
    /// Only return orders of this vendor
    pub vendor: Option<i64>,
    /// Field to order by, prefixed with `-` for descending (e.g. `-order_date`)
    pub ordering: Option<String>,
}

/// Orderable purchase-order fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    PoNumber,
    OrderDate,
    DeliveryDate,
    IssueDate,
    Quantity,
    Status,
    QualityRating,
}

impl SortField {
    const ALL: [SortField; 8] = [
        SortField::Id,
        SortField::PoNumber,
        SortField::OrderDate,
        SortField::DeliveryDate,
        SortField::IssueDate,
        SortField::Quantity,
        SortField::Status,
        SortField::QualityRating,
    ];

    /// Column name, also the accepted `ordering` value
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::PoNumber => "po_number",
            SortField::OrderDate => "order_date",
            SortField::DeliveryDate => "delivery_date",
            SortField::IssueDate => "issue_date",
            SortField::Quantity => "quantity",
            SortField::Status => "status",
            SortField::QualityRating => "quality_rating",
        }
    }
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated listing parameters
#[derive(Debug, PartialEq)]
pub struct ValidatedQuery {
    pub vendor: Option<i64>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl ValidatedQuery {
    /// Build the listing query for the given column list
    pub fn to_builder(&self, columns: &str) -> SQLQueryBuilder {
        let mut builder = SQLQueryBuilder::new(columns);
        if let Some(vendor_id) = self.vendor {
            builder.add_vendor_filter(vendor_id);
        }
        builder.set_sort(self.sort_field, self.sort_order);
        builder
    }
}

/// Query validation error
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates listing parameters; defaults to `id` ascending
    pub fn validate(params: PurchaseOrderQuery) -> Result<ValidatedQuery, ValidationError> {
        let (sort_field, sort_order) = match params.ordering.as_deref().map(str::trim) {
            None | Some("") => (SortField::Id, SortOrder::Asc),
            Some(ordering) => Self::parse_ordering(ordering)?,
        };

        Ok(ValidatedQuery {
            vendor: params.vendor,
            sort_field,
            sort_order,
        })
    }

    /// Parses `field` or `-field`
    fn parse_ordering(s: &str) -> Result<(SortField, SortOrder), ValidationError> {
        let (name, order) = match s.strip_prefix('-') {
            Some(name) => (name, SortOrder::Desc),
            None => (s, SortOrder::Asc),
        };

        let field = SortField::ALL
            .into_iter()
            .find(|field| field.column() == name)
            .ok_or_else(|| ValidationError {
                message: format!(
                    "Invalid ordering field '{}'. Must be one of: {}",
                    name,
                    SortField::ALL.map(SortField::column).join(", ")
                ),
            })?;

        Ok((field, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &str = "id, po_number";

    fn query(vendor: Option<i64>, ordering: Option<&str>) -> PurchaseOrderQuery {
        PurchaseOrderQuery {
            vendor,
            ordering: ordering.map(str::to_string),
        }
    }

    #[test]
    fn test_sql_builder_basic_query() {
        let (sql, params) = SQLQueryBuilder::new(COLUMNS).build();

        assert_eq!(sql, "SELECT id, po_number FROM purchase_orders ORDER BY id ASC");
        assert!(params.is_empty());
    }

    #[test]
    fn test_sql_builder_with_vendor_filter() {
        let mut builder = SQLQueryBuilder::new(COLUMNS);
        builder.add_vendor_filter(7);
        let (sql, params) = builder.build();

        assert!(sql.contains("WHERE vendor_id = $1"));
        assert_eq!(params, vec![7]);
    }

    #[test]
    fn test_sql_builder_with_sorting() {
        let mut builder = SQLQueryBuilder::new(COLUMNS);
        builder.set_sort(SortField::OrderDate, SortOrder::Desc);
        let (sql, _) = builder.build();

        assert!(sql.ends_with("ORDER BY order_date DESC, id ASC"));
    }

    #[test]
    fn test_default_ordering_is_id_ascending() {
        let validated = QueryValidator::validate(query(None, None)).unwrap();
        assert_eq!(validated.sort_field, SortField::Id);
        assert_eq!(validated.sort_order, SortOrder::Asc);

        let blank = QueryValidator::validate(query(None, Some("  "))).unwrap();
        assert_eq!(blank.sort_field, SortField::Id);
    }

    #[test]
    fn test_descending_prefix() {
        let validated = QueryValidator::validate(query(Some(3), Some("-quality_rating"))).unwrap();

        assert_eq!(
            validated,
            ValidatedQuery {
                vendor: Some(3),
                sort_field: SortField::QualityRating,
                sort_order: SortOrder::Desc,
            }
        );
    }

    #[test]
    fn test_every_field_is_accepted() {
        for field in SortField::ALL {
            let validated = QueryValidator::validate(query(None, Some(field.column()))).unwrap();
            assert_eq!(validated.sort_field, field);
            assert_eq!(validated.sort_order, SortOrder::Asc);
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        for ordering in ["price", "-", "id;DROP TABLE vendors", "--id", "PO_NUMBER"] {
            let result = QueryValidator::validate(query(None, Some(ordering)));
            assert!(result.is_err(), "ordering {:?} should be rejected", ordering);
        }
    }

    #[test]
    fn test_validated_query_to_builder() {
        let validated = QueryValidator::validate(query(Some(9), Some("-status"))).unwrap();
        let (sql, params) = validated.to_builder(COLUMNS).build();

        assert_eq!(
            sql,
            "SELECT id, po_number FROM purchase_orders WHERE vendor_id = $1 ORDER BY status DESC, id ASC"
        );
        assert_eq!(params, vec![9]);
    }
}
