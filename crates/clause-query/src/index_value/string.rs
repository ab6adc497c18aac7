use crate::clause::QueryLiteral;

use super::resolver::IndexValueConverter;

/// Indexes the literal's text as-is, optionally lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringIndexValueConverter {
    lowercase: bool,
}

impl StringIndexValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lowercased() -> Self {
        Self { lowercase: true }
    }
}

impl IndexValueConverter for StringIndexValueConverter {
    fn convert(&self, literal: &QueryLiteral) -> Option<String> {
        let text = literal.as_text()?;
        if self.lowercase {
            Some(text.to_lowercase())
        } else {
            Some(text)
        }
    }
}
