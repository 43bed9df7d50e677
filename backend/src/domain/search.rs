//! Case-insensitive substring search used by the list views.

/// A non-empty search term taken from a list view's query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Surrounding whitespace is ignored; a missing or blank parameter means "no filter"
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQL `LIKE` pattern matching the term anywhere in a value.
    /// Must be used with `ESCAPE '\'` so wildcards in the term match literally.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
