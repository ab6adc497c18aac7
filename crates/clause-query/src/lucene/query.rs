use std::fmt;

use super::boolean::{BooleanQuery, Occur};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub field: String,
    pub text: String,
}

impl Term {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.text)
    }
}

/// Range over the field's sortable string encoding. `None` bounds are open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub field: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl RangeQuery {
    /// Everything strictly below `upper` (or up to and including it).
    pub fn below(field: impl Into<String>, upper: impl Into<String>, inclusive: bool) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: Some(upper.into()),
            include_lower: true,
            include_upper: inclusive,
        }
    }

    /// Everything strictly above `lower` (or from it onwards).
    pub fn above(field: impl Into<String>, lower: impl Into<String>, inclusive: bool) -> Self {
        Self {
            field: field.into(),
            lower: Some(lower.into()),
            upper: None,
            include_lower: inclusive,
            include_upper: true,
        }
    }

    /// Unbounded on both sides: any document holding a value for the field.
    pub fn unbounded(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: None,
            include_lower: true,
            include_upper: true,
        }
    }
}

impl fmt::Display for RangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{} TO {}{}",
            self.field,
            if self.include_lower { '[' } else { '{' },
            range_bound(self.lower.as_deref()),
            range_bound(self.upper.as_deref()),
            if self.include_upper { ']' } else { '}' },
        )
    }
}

fn range_bound(bound: Option<&str>) -> &str {
    match bound {
        None => "*",
        Some("*") => "\\*",
        Some(value) => value,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseQuery {
    pub field: String,
    pub terms: Vec<String>,
    /// Allowed positional distance between the terms; 0 is exact.
    pub slop: u32,
}

impl PhraseQuery {
    pub fn new(field: impl Into<String>, terms: Vec<String>) -> Self {
        Self {
            field: field.into(),
            terms,
            slop: 0,
        }
    }
}

impl fmt::Display for PhraseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"{}\"", self.field, self.terms.join(" "))?;
        if self.slop > 0 {
            write!(f, "~{}", self.slop)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyQuery {
    pub term: Term,
    pub min_similarity: f32,
}

impl fmt::Display for FuzzyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{:?}", self.term, self.min_similarity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term(Term),
    Boolean(BooleanQuery),
    Range(RangeQuery),
    Phrase(PhraseQuery),
    /// Term text is the prefix, rendered with a trailing `*`.
    Prefix(Term),
    /// Term text is the raw pattern containing `*` / `?`.
    Wildcard(Term),
    Fuzzy(FuzzyQuery),
    Boosted { query: Box<Query>, boost: f32 },
    MatchAll,
}

impl Query {
    pub fn term(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Term(Term::new(field, text))
    }

    /// The empty boolean query.
    pub fn empty() -> Self {
        Self::Boolean(BooleanQuery::new())
    }

    /// `BQ{MUST_NOT query}`: a single prohibited clause.
    pub fn must_not(query: Query) -> Self {
        Self::Boolean(BooleanQuery::new().with(query, Occur::MustNot))
    }

    pub fn is_empty_boolean(&self) -> bool {
        matches!(self, Self::Boolean(boolean) if boolean.is_empty())
    }

    pub fn as_boolean(&self) -> Option<&BooleanQuery> {
        match self {
            Self::Boolean(boolean) => Some(boolean),
            _ => None,
        }
    }

    /// Largest number of clauses held by any boolean node of the tree.
    pub fn max_clause_width(&self) -> usize {
        match self {
            Self::Boolean(boolean) => boolean
                .clauses()
                .iter()
                .map(|clause| clause.query.max_clause_width())
                .fold(boolean.len(), usize::max),
            Self::Boosted { query, .. } => query.max_clause_width(),
            _ => 0,
        }
    }
}

impl From<BooleanQuery> for Query {
    fn from(boolean: BooleanQuery) -> Self {
        Self::Boolean(boolean)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(term) => write!(f, "{term}"),
            Self::Boolean(boolean) => write!(f, "{boolean}"),
            Self::Range(range) => write!(f, "{range}"),
            Self::Phrase(phrase) => write!(f, "{phrase}"),
            Self::Prefix(term) => write!(f, "{term}*"),
            Self::Wildcard(term) => write!(f, "{term}"),
            Self::Fuzzy(fuzzy) => write!(f, "{fuzzy}"),
            Self::Boosted { query, boost } => match query.as_ref() {
                Self::Boolean(boolean) => write!(f, "({boolean})^{boost:?}"),
                other => write!(f, "{other}^{boost:?}"),
            },
            Self::MatchAll => f.write_str("*:*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_leaf_queries() {
        assert_eq!(Query::term("status", "open").to_string(), "status:open");
        assert_eq!(
            Query::Phrase(PhraseQuery::new(
                "summary",
                vec!["cool".to_string(), "2".to_string()],
            ))
            .to_string(),
            "summary:\"cool 2\""
        );
        assert_eq!(
            Query::Phrase(PhraseQuery {
                slop: 3,
                ..PhraseQuery::new("summary", vec!["a".to_string(), "b".to_string()])
            })
            .to_string(),
            "summary:\"a b\"~3"
        );
        assert_eq!(
            Query::Prefix(Term::new("summary", "abc")).to_string(),
            "summary:abc*"
        );
        assert_eq!(
            Query::Wildcard(Term::new("summary", "a?c*")).to_string(),
            "summary:a?c*"
        );
        assert_eq!(
            Query::Fuzzy(FuzzyQuery {
                term: Term::new("summary", "dude"),
                min_similarity: 0.5,
            })
            .to_string(),
            "summary:dude~0.5"
        );
        assert_eq!(Query::MatchAll.to_string(), "*:*");
    }

    #[test]
    fn renders_range_bounds() {
        assert_eq!(
            Query::Range(RangeQuery::below("votes", "10", false)).to_string(),
            "votes:[* TO 10}"
        );
        assert_eq!(
            Query::Range(RangeQuery::above("votes", "10", true)).to_string(),
            "votes:[10 TO *]"
        );
        assert_eq!(
            Query::Range(RangeQuery::above("votes", "10", false)).to_string(),
            "votes:{10 TO *]"
        );
        assert_eq!(
            Query::Range(RangeQuery::unbounded("votes")).to_string(),
            "votes:[* TO *]"
        );
    }

    #[test]
    fn renders_boosts() {
        let boosted = Query::Boosted {
            query: Box::new(Query::term("summary", "dude")),
            boost: 2.0,
        };
        assert_eq!(boosted.to_string(), "summary:dude^2.0");

        let boolean = BooleanQuery::new()
            .with(Query::term("a", "1"), Occur::Should)
            .with(Query::term("a", "2"), Occur::Should);
        let boosted = Query::Boosted {
            query: Box::new(boolean.into()),
            boost: 0.5,
        };
        assert_eq!(boosted.to_string(), "(a:1 a:2)^0.5");
    }

    #[test]
    fn max_clause_width_reports_widest_node() {
        assert_eq!(Query::term("a", "1").max_clause_width(), 0);
        let inner = BooleanQuery::new()
            .with(Query::term("a", "1"), Occur::Should)
            .with(Query::term("a", "2"), Occur::Should)
            .with(Query::term("a", "3"), Occur::Should);
        let outer = BooleanQuery::new().with(inner.into(), Occur::Must);
        assert_eq!(Query::Boolean(outer).max_clause_width(), 3);
    }

    #[test]
    fn must_not_wraps_single_clause() {
        let query = Query::must_not(Query::term("a", "1"));
        assert_eq!(query.to_string(), "-a:1");
        assert!(Query::empty().is_empty_boolean());
        assert!(!query.is_empty_boolean());
    }
}
