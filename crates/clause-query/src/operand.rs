//! Operand resolution: turning user-supplied operands into literals.

use std::sync::Arc;

use fnv::FnvHashMap;

use crate::clause::{Operand, QueryLiteral};
use crate::context::QueryCreationContext;

/// Resolves an operand into the literals a factory consumes.
pub trait OperandResolver: Send + Sync {
    /// Resolved literals for `operand`, in order. May contain
    /// [`QueryLiteral::Empty`]; an empty vector means nothing resolved.
    fn values(
        &self,
        context: &QueryCreationContext,
        operand: &Operand,
        field: &str,
    ) -> Vec<QueryLiteral>;

    fn is_empty_operand(&self, operand: &Operand) -> bool;

    fn is_list_operand(&self, operand: &Operand) -> bool;
}

/// A named function usable as an operand (`currentUser()`).
pub trait OperandFunction: Send + Sync {
    fn values(
        &self,
        context: &QueryCreationContext,
        args: &[String],
        field: &str,
    ) -> Vec<QueryLiteral>;

    /// Whether the function yields a list (selects the multi-value path).
    fn is_list(&self) -> bool {
        false
    }
}

/// Resolves literal, list and empty operands directly, and function
/// operands through registered [`OperandFunction`]s.
#[derive(Clone, Default)]
pub struct DefaultOperandResolver {
    functions: FnvHashMap<String, Arc<dyn OperandFunction>>,
}

impl DefaultOperandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with the built-in functions registered.
    pub fn with_builtin_functions() -> Self {
        let mut resolver = Self::new();
        resolver.register("currentUser", Arc::new(CurrentUserFunction));
        resolver
    }

    /// Registers a function under a case-insensitive name.
    pub fn register(&mut self, name: &str, function: Arc<dyn OperandFunction>) {
        self.functions.insert(name.to_lowercase(), function);
    }

    fn function(&self, name: &str) -> Option<&Arc<dyn OperandFunction>> {
        self.functions.get(&name.to_lowercase())
    }

    fn collect_values(
        &self,
        context: &QueryCreationContext,
        operand: &Operand,
        field: &str,
        out: &mut Vec<QueryLiteral>,
    ) {
        match operand {
            Operand::Long(value) => out.push(QueryLiteral::Long(*value)),
            Operand::Str(value) => out.push(QueryLiteral::Str(value.clone())),
            Operand::Empty => out.push(QueryLiteral::Empty),
            Operand::List(values) => {
                for value in values {
                    self.collect_values(context, value, field, out);
                }
            }
            Operand::Function { name, args } => match self.function(name) {
                Some(function) => out.extend(function.values(context, args, field)),
                None => {
                    log::debug!("Unknown operand function name={} field={}", name, field);
                }
            },
        }
    }
}

impl OperandResolver for DefaultOperandResolver {
    fn values(
        &self,
        context: &QueryCreationContext,
        operand: &Operand,
        field: &str,
    ) -> Vec<QueryLiteral> {
        let mut values = Vec::new();
        self.collect_values(context, operand, field, &mut values);
        values
    }

    fn is_empty_operand(&self, operand: &Operand) -> bool {
        matches!(operand, Operand::Empty)
    }

    fn is_list_operand(&self, operand: &Operand) -> bool {
        match operand {
            Operand::List(_) => true,
            Operand::Function { name, .. } => self
                .function(name)
                .is_some_and(|function| function.is_list()),
            _ => false,
        }
    }
}

/// `currentUser()`: the context user's name, or nothing when anonymous.
pub struct CurrentUserFunction;

impl OperandFunction for CurrentUserFunction {
    fn values(
        &self,
        context: &QueryCreationContext,
        _args: &[String],
        _field: &str,
    ) -> Vec<QueryLiteral> {
        context
            .user()
            .map(|user| vec![QueryLiteral::Str(user.name.clone())])
            .unwrap_or_default()
    }
}
