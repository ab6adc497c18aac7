use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

pub const MAX_CLAUSES_ENV: &str = "CLAUSE_QUERY_MAX_CLAUSES";
pub const DEFAULT_MAX_CLAUSE_COUNT: usize = 1024;

/// Settings for the top-level query builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryBuilderConfig {
    /// Widest boolean query the search engine accepts.
    pub max_clause_count: usize,
    /// Anchor purely negative boolean queries with a match-all clause.
    pub add_match_all_to_negative_queries: bool,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
            add_match_all_to_negative_queries: true,
        }
    }
}

impl QueryBuilderConfig {
    /// Defaults, with the clause limit overridable through
    /// `CLAUSE_QUERY_MAX_CLAUSES`.
    pub fn from_env() -> Self {
        Self {
            max_clause_count: read_limit(MAX_CLAUSES_ENV, DEFAULT_MAX_CLAUSE_COUNT),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|error| QueryError::Config(format!("invalid builder config: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_clause_count == 0 {
            return Err(QueryError::Config(
                "max_clause_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_limit(name: &str, default: usize) -> usize {
    let Ok(value) = env::var(name) else {
        return default;
    };
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => limit,
        _ => {
            log::warn!("Ignoring invalid limit name={} value={:?}", name, value);
            default
        }
    }
}

/// How a field's literals are indexed and which operators it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Exact values or named constants: equality only.
    Exact,
    /// Analysed free text: `~` and `!~`.
    Text,
    /// Whole numbers: equality and relational.
    Number,
    /// Dates and date-times: equality and relational.
    Date,
    /// Time spans (`1h 30m`, minutes): equality and relational.
    Duration,
}

/// A named constant of an `exact` field, e.g. a priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantConfig {
    pub id: String,
    pub name: String,
}

/// Who may query a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPermission {
    #[default]
    Everyone,
    Authenticated,
    Users(Vec<String>),
}

/// One searchable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFieldConfig {
    /// Names usable in clauses; matched case-insensitively.
    pub clause_names: Vec<String>,
    /// Document field holding the indexed values.
    pub index_field: String,
    pub kind: FieldKind,
    /// Value indexed in place of "no value", when the field has one.
    #[serde(default)]
    pub empty_index_value: Option<String>,
    /// Scale applied to numbers before indexing.
    #[serde(default)]
    pub multiplier: Option<i64>,
    /// Numbers and durations are indexed in sortable encoding.
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub lowercase: bool,
    /// Restrict matches to documents where the field is present.
    #[serde(default)]
    pub visibility_guard: bool,
    #[serde(default)]
    pub constants: Vec<ConstantConfig>,
    /// Constants are listed lowest first and support relational operators.
    #[serde(default)]
    pub ordered: bool,
    #[serde(default)]
    pub permission: FieldPermission,
}

impl SearchFieldConfig {
    pub fn new(clause_name: impl Into<String>, index_field: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            clause_names: vec![clause_name.into()],
            index_field: index_field.into(),
            kind,
            empty_index_value: None,
            multiplier: None,
            sortable: false,
            lowercase: false,
            visibility_guard: false,
            constants: Vec::new(),
            ordered: false,
            permission: FieldPermission::Everyone,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.clause_names.iter().all(|name| name.trim().is_empty()) {
            return Err(QueryError::Config(format!(
                "field {} has no clause name",
                self.index_field
            )));
        }
        if self.index_field.trim().is_empty() {
            return Err(QueryError::Config(format!(
                "field {} has no index field",
                self.clause_names.join(",")
            )));
        }
        if self.multiplier == Some(0) {
            return Err(QueryError::Config(format!(
                "field {} has a zero multiplier",
                self.index_field
            )));
        }
        if self.ordered && (self.kind != FieldKind::Exact || self.constants.is_empty()) {
            return Err(QueryError::Config(format!(
                "field {} is ordered but has no constants",
                self.index_field
            )));
        }
        Ok(())
    }
}

/// The searchable fields of a registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRegistryConfig {
    pub fields: Vec<SearchFieldConfig>,
}

impl FieldRegistryConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|error| QueryError::Config(format!("invalid field config: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.fields.iter().try_for_each(SearchFieldConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_config_defaults_missing_keys() {
        let config = QueryBuilderConfig::from_json_str(r#"{"max_clause_count": 16}"#).unwrap();
        assert_eq!(config.max_clause_count, 16);
        assert!(config.add_match_all_to_negative_queries);
        assert_eq!(
            QueryBuilderConfig::from_json_str("{}").unwrap(),
            QueryBuilderConfig::default()
        );
    }

    #[test]
    fn builder_config_rejects_zero_limit() {
        let error = QueryBuilderConfig::from_json_str(r#"{"max_clause_count": 0}"#).unwrap_err();
        assert!(matches!(error, QueryError::Config(_)));
        let error = QueryBuilderConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(error, QueryError::Config(_)));
    }

    #[test]
    fn read_limit_ignores_invalid_values() {
        let name = "CLAUSE_QUERY_TEST_READ_LIMIT";
        env::set_var(name, "64");
        assert_eq!(read_limit(name, 8), 64);
        env::set_var(name, "0");
        assert_eq!(read_limit(name, 8), 8);
        env::set_var(name, "lots");
        assert_eq!(read_limit(name, 8), 8);
        env::remove_var(name);
        assert_eq!(read_limit(name, 8), 8);
    }

    #[test]
    fn parses_field_registry_config() {
        let config = FieldRegistryConfig::from_json_str(
            r#"{
                "fields": [
                    {"clause_names": ["priority"], "index_field": "priority", "kind": "exact",
                     "constants": [{"id": "1", "name": "Low"}, {"id": "2", "name": "High"}],
                     "ordered": true, "permission": "authenticated"},
                    {"clause_names": ["votes"], "index_field": "votes", "kind": "number",
                     "empty_index_value": "-1", "permission": {"users": ["fred"]}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.fields[0].constants.len(), 2);
        assert_eq!(config.fields[0].permission, FieldPermission::Authenticated);
        assert_eq!(config.fields[1].kind, FieldKind::Number);
        assert_eq!(config.fields[1].empty_index_value.as_deref(), Some("-1"));
        assert_eq!(
            config.fields[1].permission,
            FieldPermission::Users(vec!["fred".to_string()])
        );
    }

    #[test]
    fn rejects_invalid_field_config() {
        let unknown_kind = r#"{"fields": [{"clause_names": ["a"], "index_field": "a", "kind": "blob"}]}"#;
        assert!(matches!(
            FieldRegistryConfig::from_json_str(unknown_kind),
            Err(QueryError::Config(_))
        ));

        let mut field = SearchFieldConfig::new("votes", "votes", FieldKind::Number);
        field.ordered = true;
        assert!(field.validate().is_err());

        let mut field = SearchFieldConfig::new("votes", "votes", FieldKind::Number);
        field.multiplier = Some(0);
        assert!(field.validate().is_err());

        let field = SearchFieldConfig::new(" ", "votes", FieldKind::Number);
        assert!(field.validate().is_err());
    }
}
