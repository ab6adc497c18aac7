#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Clause too complex: {clause}")]
    ClauseTooComplex { clause: String },

    #[error("Too many boolean clauses: {count} exceeds limit {limit}")]
    TooManyClauses { count: usize, limit: usize },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text query parse error: {0}")]
    TextQuery(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
