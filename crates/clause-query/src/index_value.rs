//! Conversion of resolved literals into index-native string values.
//!
//! - Resolver and converter traits used by the query factories
//! - String, number and duration converters
//! - Date converter (absolute dates, epoch millis, relative offsets)
//! - Constant (name/id) resolution and domain ordering

mod constant;
mod date;
mod number;
mod resolver;
mod string;

pub use constant::{ConstantIndexInfoResolver, ConstantOrdering};
pub use date::DateIndexValueConverter;
pub use number::{encode_sortable_long, DurationIndexValueConverter, LongIndexValueConverter};
pub use resolver::{
    ConverterInfoResolver, IndexInfoResolver, IndexValueConverter, RangeBounds,
    RangeValueConverter,
};
pub use string::StringIndexValueConverter;
