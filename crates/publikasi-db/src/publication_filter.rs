//! Publication filter query builder.
//!
//! Turns a [`PublicationFilter`] into a parameterized WHERE clause and an
//! optional ORDER BY clause for the `publication p` table alias.

use uuid::Uuid;

use publikasi_core::{PublicationFilter, PublicationSort};

use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// Integer parameter.
    Int(i32),
    /// String parameter.
    String(String),
}

/// Generates SQL WHERE/ORDER BY fragments for publication search.
///
/// # Example
///
/// ```rust,ignore
/// use publikasi_db::publication_filter::PublicationFilterQueryBuilder;
/// use publikasi_core::PublicationFilter;
///
/// let filter = PublicationFilter { year: Some(2020), ..Default::default() };
/// let (sql, params) = PublicationFilterQueryBuilder::new(filter, 0).build();
/// // sql: "p.year = $1"
/// ```
pub struct PublicationFilterQueryBuilder {
    filter: PublicationFilter,
    param_offset: usize,
}

impl PublicationFilterQueryBuilder {
    /// Create a new builder for the given filter.
    ///
    /// `param_offset` is the number of parameters already in the query.
    pub fn new(filter: PublicationFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the WHERE clause fragment and its parameters.
    ///
    /// An empty filter yields ("TRUE", empty vec).
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if let Some(keyword) = self.filter.effective_keyword() {
            param_idx += 1;
            clauses.push(format!(
                "(p.title ILIKE ${idx} ESCAPE '\\' OR COALESCE(p.description, '') ILIKE ${idx} ESCAPE '\\')",
                idx = param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(keyword))));
        }

        if let Some(category_id) = self.filter.category_id {
            param_idx += 1;
            clauses.push(format!("p.category_id = ${}", param_idx));
            params.push(QueryParam::Uuid(category_id));
        }

        if let Some(year) = self.filter.year {
            param_idx += 1;
            clauses.push(format!("p.year = ${}", param_idx));
            params.push(QueryParam::Int(year));
        }

        if clauses.is_empty() {
            ("TRUE".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }

    /// ORDER BY fragment for a sort. `None` keeps insertion order.
    pub fn order_by(sort: Option<PublicationSort>) -> &'static str {
        match sort {
            Some(PublicationSort::Latest) => "ORDER BY p.created_at_utc DESC, p.id DESC",
            Some(PublicationSort::Oldest) => "ORDER BY p.created_at_utc ASC, p.id ASC",
            None => "ORDER BY p.id ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_returns_true() {
        let (sql, params) =
            PublicationFilterQueryBuilder::new(PublicationFilter::default(), 0).build();
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        let filter = PublicationFilter {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        let (sql, params) = PublicationFilterQueryBuilder::new(filter, 0).build();
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_keyword_escapes_wildcards() {
        let filter = PublicationFilter {
            keyword: Some(" 50%_growth ".to_string()),
            ..Default::default()
        };
        let (sql, params) = PublicationFilterQueryBuilder::new(filter, 0).build();
        assert_eq!(
            sql,
            "(p.title ILIKE $1 ESCAPE '\\' OR COALESCE(p.description, '') ILIKE $1 ESCAPE '\\')"
        );
        assert_eq!(params, vec![QueryParam::String("%50\\%\\_growth%".to_string())]);
    }

    #[test]
    fn test_all_filters_are_conjunctive() {
        let category_id = Uuid::new_v4();
        let filter = PublicationFilter {
            keyword: Some("census".to_string()),
            category_id: Some(category_id),
            year: Some(2020),
        };
        let (sql, params) = PublicationFilterQueryBuilder::new(filter, 0).build();

        assert!(sql.contains("p.category_id = $2"));
        assert!(sql.contains(" AND p.year = $3"));
        assert_eq!(params.len(), 3);
        assert_eq!(params[1], QueryParam::Uuid(category_id));
        assert_eq!(params[2], QueryParam::Int(2020));
    }

    #[test]
    fn test_param_offset_is_respected() {
        let filter = PublicationFilter {
            year: Some(2019),
            ..Default::default()
        };
        let (sql, _) = PublicationFilterQueryBuilder::new(filter, 2).build();
        assert_eq!(sql, "p.year = $3");
    }

    #[test]
    fn test_order_by_fragments() {
        assert!(PublicationFilterQueryBuilder::order_by(Some(PublicationSort::Latest))
            .contains("DESC"));
        assert!(PublicationFilterQueryBuilder::order_by(Some(PublicationSort::Oldest))
            .contains("ASC"));
        assert_eq!(
            PublicationFilterQueryBuilder::order_by(None),
            "ORDER BY p.id ASC"
        );
    }
}
