use fnv::{FnvHashMap, FnvHashSet};

use crate::clause::QueryLiteral;

use super::resolver::IndexInfoResolver;

/// Resolves named constants (statuses, priorities, issue types ...) to the
/// ids stored in the index.
///
/// Strings are looked up by name, case-insensitively, falling back to an id
/// when the text is numeric. Numbers are looked up as ids first, then as
/// names. Several constants may share a name.
#[derive(Debug, Clone, Default)]
pub struct ConstantIndexInfoResolver {
    ids_by_name: FnvHashMap<String, Vec<String>>,
    ids: FnvHashSet<String>,
}

impl ConstantIndexInfoResolver {
    pub fn new<I, N>(constants: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
        N: Into<String>,
    {
        let mut resolver = Self::default();
        for (id, name) in constants {
            let id = id.into();
            resolver
                .ids_by_name
                .entry(name.into().to_lowercase())
                .or_default()
                .push(id.clone());
            resolver.ids.insert(id);
        }
        resolver
    }

    fn by_name(&self, name: &str) -> Vec<String> {
        self.ids_by_name
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn by_id(&self, id: &str) -> Vec<String> {
        if self.ids.contains(id) {
            vec![id.to_string()]
        } else {
            Vec::new()
        }
    }
}

impl IndexInfoResolver for ConstantIndexInfoResolver {
    fn index_values(&self, literal: &QueryLiteral) -> Vec<String> {
        match literal {
            QueryLiteral::Str(name) => {
                let ids = self.by_name(name.trim());
                if ids.is_empty() && name.trim().parse::<i64>().is_ok() {
                    return self.by_id(name.trim());
                }
                ids
            }
            QueryLiteral::Long(id) => {
                let id = id.to_string();
                let ids = self.by_id(&id);
                if ids.is_empty() {
                    return self.by_name(&id);
                }
                ids
            }
            QueryLiteral::Empty => Vec::new(),
        }
    }
}

/// The domain order of a constant family, lowest first.
#[derive(Debug, Clone, Default)]
pub struct ConstantOrdering {
    ids: Vec<String>,
}

impl ConstantOrdering {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Ids ordered below `id` (and `id` itself when inclusive).
    pub fn below(&self, id: &str, inclusive: bool) -> Option<&[String]> {
        let position = self.position(id)?;
        let end = if inclusive { position + 1 } else { position };
        Some(&self.ids[..end])
    }

    /// Ids ordered above `id` (and `id` itself when inclusive).
    pub fn above(&self, id: &str, inclusive: bool) -> Option<&[String]> {
        let position = self.position(id)?;
        let start = if inclusive { position } else { position + 1 };
        Some(&self.ids[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priorities() -> ConstantIndexInfoResolver {
        ConstantIndexInfoResolver::new([
            ("1", "Blocker"),
            ("2", "Major"),
            ("3", "Minor"),
            ("40", "Major"),
        ])
    }

    #[test]
    fn resolves_names_case_insensitively() {
        let resolver = priorities();
        assert_eq!(
            resolver.index_values(&QueryLiteral::string("blocker")),
            vec!["1".to_string()]
        );
        assert_eq!(
            resolver.index_values(&QueryLiteral::string("MAJOR")),
            vec!["2".to_string(), "40".to_string()]
        );
    }

    #[test]
    fn resolves_ids() {
        let resolver = priorities();
        assert_eq!(
            resolver.index_values(&QueryLiteral::Long(3)),
            vec!["3".to_string()]
        );
        assert_eq!(
            resolver.index_values(&QueryLiteral::string("40")),
            vec!["40".to_string()]
        );
    }

    #[test]
    fn unresolved_literals_yield_nothing() {
        let resolver = priorities();
        assert!(resolver.index_values(&QueryLiteral::string("Trivial")).is_empty());
        assert!(resolver.index_values(&QueryLiteral::Long(99)).is_empty());
        assert!(resolver.index_values(&QueryLiteral::Empty).is_empty());
    }

    #[test]
    fn numeric_names_resolve_when_no_id_matches() {
        let resolver = ConstantIndexInfoResolver::new([("10", "2024")]);
        assert_eq!(
            resolver.index_values(&QueryLiteral::Long(2024)),
            vec!["10".to_string()]
        );
    }

    #[test]
    fn ordering_slices() {
        let ordering = ConstantOrdering::new(["5", "4", "3", "2", "1"]);
        assert_eq!(ordering.below("3", false), Some(&["5".to_string(), "4".to_string()][..]));
        assert_eq!(ordering.below("3", true).map(<[String]>::len), Some(3));
        assert_eq!(ordering.above("3", false), Some(&["2".to_string(), "1".to_string()][..]));
        assert_eq!(ordering.above("5", true).map(<[String]>::len), Some(5));
        assert_eq!(ordering.above("1", false).map(<[String]>::len), Some(0));
        assert_eq!(ordering.below("99", true), None);
    }
}
