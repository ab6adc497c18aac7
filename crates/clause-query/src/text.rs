//! Free-text expressions for `~` (LIKE) clauses.
//!
//! - Analyzer (tokenizing, lower-casing, stop words)
//! - Parser for the Lucene-style text query syntax

mod analyzer;
mod parser;

pub use analyzer::TextAnalyzer;
pub use parser::TextQueryParser;
