//! Query string construction for list options
//!
//! Option structs describe filters as `Option` fields. Only populated fields
//! are sent: `Some` and, for strings, non-empty and, for integers, non-zero.
//! `Some(false)` is populated for booleans, so "omitted" and "explicitly
//! false" stay distinct on the wire.

use crate::error::Result;
use crate::types::SortDirection;

/// Ordered `(name, value)` query parameters
pub type QueryPairs = Vec<(&'static str, String)>;

/// Options that render to a URL query string
pub trait ToQuery {
    /// Parameters for every populated field, in declaration order
    ///
    /// Fails when a field holds a value the service would reject.
    fn query_pairs(&self) -> Result<QueryPairs>;

    /// `""` when nothing is populated, otherwise `?name=value&...`
    fn to_query_string(&self) -> Result<String> {
        let pairs = self.query_pairs()?;
        if pairs.is_empty() {
            return Ok(String::new());
        }

        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        Ok(format!("?{encoded}"))
    }
}

/// Builder for [`QueryPairs`] applying the populated-field rules
#[derive(Debug, Default)]
pub struct QueryBuilder {
    pairs: QueryPairs,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string field if non-empty
    #[must_use]
    pub fn string(mut self, name: &'static str, value: &Option<String>) -> Self {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    /// Add an integer field if non-zero; negative values such as `-1` are sent
    #[must_use]
    pub fn number<N>(mut self, name: &'static str, value: Option<N>) -> Self
    where
        N: Into<i64>,
    {
        if let Some(value) = value.map(Into::<i64>::into).filter(|v| *v != 0) {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    /// Add a boolean field; `Some(false)` is sent
    #[must_use]
    pub fn flag(mut self, name: &'static str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    /// Add a sort direction parsed from free text
    ///
    /// Anything but `asc`/`desc` is a validation error for `name`.
    pub fn sort_dir(mut self, name: &'static str, value: &Option<String>) -> Result<Self> {
        if let Some(raw) = value.as_deref().filter(|v| !v.is_empty()) {
            let dir: SortDirection = raw.parse()?;
            self.pairs.push((name, dir.as_str().to_string()));
        }
        Ok(self)
    }

    pub fn build(self) -> QueryPairs {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[derive(Default)]
    struct Filters {
        name: Option<String>,
        limit: Option<u32>,
        port: Option<u16>,
        offset: Option<i64>,
        up: Option<bool>,
        sort_dir: Option<String>,
    }

    impl ToQuery for Filters {
        fn query_pairs(&self) -> Result<QueryPairs> {
            Ok(QueryBuilder::new()
                .string("name", &self.name)
                .number("limit", self.limit)
                .number("port", self.port)
                .number("offset", self.offset)
                .flag("up", self.up)
                .sort_dir("sort_dir", &self.sort_dir)?
                .build())
        }
    }

    #[test]
    fn test_nothing_populated_is_empty() {
        assert_eq!(Filters::default().to_query_string().unwrap(), "");
    }

    #[test_case(Filters { name: Some(String::new()), ..Default::default() }, "" ; "empty string omitted")]
    #[test_case(Filters { limit: Some(0), ..Default::default() }, "" ; "zero limit omitted")]
    #[test_case(Filters { port: Some(0), ..Default::default() }, "" ; "zero port omitted")]
    #[test_case(Filters { up: Some(false), ..Default::default() }, "?up=false" ; "explicit false sent")]
    #[test_case(Filters { up: Some(true), ..Default::default() }, "?up=true" ; "explicit true sent")]
    #[test_case(Filters { limit: Some(20), ..Default::default() }, "?limit=20" ; "limit sent")]
    #[test_case(Filters { offset: Some(-1), ..Default::default() }, "?offset=-1" ; "negative sent")]
    #[test_case(Filters { offset: Some(0), ..Default::default() }, "" ; "zero signed omitted")]
    #[test_case(Filters { sort_dir: Some("desc".into()), ..Default::default() }, "?sort_dir=desc" ; "sort dir sent")]
    #[test_case(Filters { name: Some("web lb&1".into()), ..Default::default() }, "?name=web+lb%261" ; "value encoded")]
    fn test_query_string(filters: Filters, expected: &str) {
        assert_eq!(filters.to_query_string().unwrap(), expected);
    }

    #[test]
    fn test_declaration_order_and_single_occurrence() {
        let filters = Filters {
            name: Some("a".into()),
            limit: Some(5),
            port: Some(80),
            up: Some(true),
            sort_dir: Some("asc".into()),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs().unwrap(),
            vec![
                ("name", "a".to_string()),
                ("limit", "5".to_string()),
                ("port", "80".to_string()),
                ("up", "true".to_string()),
                ("sort_dir", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_sort_dir() {
        let filters = Filters {
            sort_dir: Some("sideways".into()),
            ..Default::default()
        };
        let err = filters.to_query_string().unwrap_err();
        assert!(err.is_validation());
    }
}
