//! Clause-to-search-query compiler.
//!
//! This crate turns a parsed clause tree into a boolean search query:
//! - De Morgan normalization of the clause tree
//! - Field and operator query factories with deferred negation
//! - Field handler registry with per-user permissions
//! - Lucene-style query model and free-text parsing
//! - Clause limit enforcement and batch compilation

pub mod builder;
pub mod clause;
pub mod config;
pub mod context;
pub mod demorgan;
pub mod error;
pub mod factory;
pub mod index_value;
pub mod lucene;
pub mod modifier;
pub mod operand;
pub mod registry;
pub mod result;
pub mod text;
pub mod visitor;

// Re-export main types
pub use builder::{DefaultLuceneQueryBuilder, LuceneQueryBuilder};
pub use clause::{
    ChangedClause, Clause, HistoryPredicate, Operand, Operator, PredicateOperator, QueryLiteral,
    TerminalClause, WasClause,
};
pub use config::{FieldKind, FieldRegistryConfig, QueryBuilderConfig, SearchFieldConfig};
pub use context::{QueryCreationContext, User};
pub use demorgan::normalize_clause;
pub use error::{QueryError, Result};
pub use factory::{ClauseQueryFactory, OperatorSpecificQueryFactory};
pub use lucene::{BooleanQuery, Occur, Query};
pub use modifier::{DefaultQueryModifier, NoOpQueryModifier, QueryModifier};
pub use operand::{DefaultOperandResolver, OperandResolver};
pub use registry::{DefaultQueryRegistry, FieldHandlerRegistry, QueryRegistry};
pub use result::QueryFactoryResult;
