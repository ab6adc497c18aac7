use crate::clause::QueryLiteral;

/// Maps a literal to zero or more index-native values. An empty vector
/// means the literal does not resolve.
pub trait IndexInfoResolver: Send + Sync {
    fn index_values(&self, literal: &QueryLiteral) -> Vec<String>;
}

/// Maps a literal to at most one index-native value.
pub trait IndexValueConverter: Send + Sync {
    fn convert(&self, literal: &QueryLiteral) -> Option<String>;
}

/// The inclusive span of index values a literal stands for.
///
/// A number stands for itself; a calendar day stands for every minute in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBounds {
    pub lower: String,
    pub upper: String,
}

impl RangeBounds {
    pub fn exact(value: String) -> Self {
        Self {
            lower: value.clone(),
            upper: value,
        }
    }
}

/// Maps a literal to the sortable bounds used by range queries.
pub trait RangeValueConverter: Send + Sync {
    fn range_bounds(&self, literal: &QueryLiteral) -> Option<RangeBounds>;
}

/// Adapts a single-value converter to the multi-value resolver interface.
#[derive(Debug, Clone)]
pub struct ConverterInfoResolver<C> {
    converter: C,
}

impl<C> ConverterInfoResolver<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }
}

impl<C: IndexValueConverter> IndexInfoResolver for ConverterInfoResolver<C> {
    fn index_values(&self, literal: &QueryLiteral) -> Vec<String> {
        self.converter.convert(literal).into_iter().collect()
    }
}
