//! Clause AST consumed by the compiler.
//!
//! The tree is produced by an external parser and treated as read-only input.

use std::fmt;

/// One node of the boolean query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Terminal(TerminalClause),
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
    Was(WasClause),
    Changed(ChangedClause),
}

impl Clause {
    pub fn terminal(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Self::Terminal(TerminalClause::new(field, operator, operand))
    }

    pub fn not(inner: Clause) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Leaves are the clauses whose factories resolve negation themselves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::Was(_) | Self::Changed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminalClause {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl TerminalClause {
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Self {
            field: field.into(),
            operator,
            operand,
        }
    }
}

/// `field WAS [NOT] [IN] operand [predicates]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WasClause {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
    pub predicates: Vec<HistoryPredicate>,
}

/// `field CHANGED [predicates]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedClause {
    pub field: String,
    pub predicates: Vec<HistoryPredicate>,
}

/// A qualifier narrowing a history clause (`BY`, `AFTER`, `DURING` ...).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPredicate {
    pub operator: PredicateOperator,
    pub operand: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOperator {
    After,
    Before,
    During,
    On,
    By,
    From,
    To,
}

impl PredicateOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::After => "after",
            Self::Before => "before",
            Self::During => "during",
            Self::On => "on",
            Self::By => "by",
            Self::From => "from",
            Self::To => "to",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    NotLike,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Was,
    WasNot,
    WasIn,
    WasNotIn,
    Changed,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Like => "~",
            Self::NotLike => "!~",
            Self::LessThan => "<",
            Self::LessThanEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEquals => ">=",
            Self::Was => "was",
            Self::WasNot => "was not",
            Self::WasIn => "was in",
            Self::WasNotIn => "was not in",
            Self::Changed => "changed",
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::LessThanEquals | Self::GreaterThan | Self::GreaterThanEquals
        )
    }

    /// Operators whose match set is the complement of a positive operator.
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Self::NotEquals | Self::NotIn | Self::IsNot | Self::NotLike | Self::WasNot | Self::WasNotIn
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-supplied value reference, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Long(i64),
    Str(String),
    Empty,
    List(Vec<Operand>),
    Function { name: String, args: Vec<String> },
}

impl Operand {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<String>) -> Self {
        Self::Function {
            name: name.into(),
            args,
        }
    }
}

/// A resolved operand value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryLiteral {
    Long(i64),
    Str(String),
    /// The distinguished "no value" marker.
    Empty,
}

impl QueryLiteral {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The literal's textual form; `None` for the empty marker.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Long(value) => Some(value.to_string()),
            Self::Str(value) => Some(value.clone()),
            Self::Empty => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
            Self::Empty => f.write_str("EMPTY"),
            Self::List(values) => {
                f.write_str("(")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Self::Function { name, args } => write!(f, "{name}({})", args.join(", ")),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(terminal) => {
                write!(f, "{} {} {}", terminal.field, terminal.operator, terminal.operand)
            }
            Self::And(children) => write_joined(f, children, " AND "),
            Self::Or(children) => write_joined(f, children, " OR "),
            Self::Not(inner) => write!(f, "NOT {inner}"),
            Self::Was(was) => {
                write!(f, "{} {} {}", was.field, was.operator, was.operand)?;
                write_predicates(f, &was.predicates)
            }
            Self::Changed(changed) => {
                write!(f, "{} changed", changed.field)?;
                write_predicates(f, &changed.predicates)
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Clause], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

fn write_predicates(f: &mut fmt::Formatter<'_>, predicates: &[HistoryPredicate]) -> fmt::Result {
    for predicate in predicates {
        write!(f, " {} {}", predicate.operator.as_str(), predicate.operand)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_compound_clause() {
        let clause = Clause::And(vec![
            Clause::terminal("priority", Operator::Equals, Operand::string("major")),
            Clause::not(Clause::Or(vec![
                Clause::terminal("votes", Operator::GreaterThan, Operand::Long(3)),
                Clause::terminal("assignee", Operator::Is, Operand::Empty),
            ])),
        ]);
        assert_eq!(
            clause.to_string(),
            "(priority = \"major\" AND NOT (votes > 3 OR assignee is EMPTY))"
        );
    }

    #[test]
    fn renders_history_clauses() {
        let was = Clause::Was(WasClause {
            field: "status".to_string(),
            operator: Operator::WasIn,
            operand: Operand::List(vec![Operand::string("open"), Operand::Long(3)]),
            predicates: vec![HistoryPredicate {
                operator: PredicateOperator::By,
                operand: Operand::function("currentUser", Vec::new()),
            }],
        });
        assert_eq!(
            was.to_string(),
            "status was in (\"open\", 3) by currentUser()"
        );

        let changed = Clause::Changed(ChangedClause {
            field: "assignee".to_string(),
            predicates: Vec::new(),
        });
        assert_eq!(changed.to_string(), "assignee changed");
    }

    #[test]
    fn operator_classification() {
        assert!(Operator::LessThanEquals.is_relational());
        assert!(!Operator::Equals.is_relational());
        assert!(Operator::NotIn.is_negative());
        assert!(!Operator::In.is_negative());
    }

    #[test]
    fn leaf_detection() {
        assert!(Clause::terminal("a", Operator::Equals, Operand::Long(1)).is_leaf());
        assert!(!Clause::And(Vec::new()).is_leaf());
        assert!(!Clause::not(Clause::And(Vec::new())).is_leaf());
    }
}
