use std::fmt;

use super::query::Query;

/// How a clause participates in its enclosing boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl Occur {
    fn prefix(self) -> &'static str {
        match self {
            Self::Must => "+",
            Self::Should => "",
            Self::MustNot => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanClause {
    pub query: Query,
    pub occur: Occur,
}

/// An ordered list of occurrence-tagged sub-queries.
///
/// The empty boolean query matches nothing and is used as the neutral
/// "no-op" query throughout the compiler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, query: Query, occur: Occur) {
        self.clauses.push(BooleanClause { query, occur });
    }

    /// Builder-style variant of [`BooleanQuery::add`].
    pub fn with(mut self, query: Query, occur: Occur) -> Self {
        self.add(query, occur);
        self
    }

    pub fn insert(&mut self, index: usize, query: Query, occur: Occur) {
        let index = index.min(self.clauses.len());
        self.clauses.insert(index, BooleanClause { query, occur });
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<BooleanClause> {
        self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when the query is non-empty and every clause is prohibited.
    pub fn is_purely_negative(&self) -> bool {
        !self.clauses.is_empty()
            && self
                .clauses
                .iter()
                .all(|clause| clause.occur == Occur::MustNot)
    }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(clause.occur.prefix())?;
            match &clause.query {
                Query::Boolean(nested) => write!(f, "({nested})")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}
