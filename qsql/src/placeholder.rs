//! Bind-placeholder formatting.

/// The bind-placeholder style: a symbol prefixed to an incrementing number.
///
/// The default symbol is `$` (Postgres-style `$1`, `$2`, ...). Pass `"?"` for
/// drivers that use `?1`-style numbered parameters, such as `SQLite`. The
/// symbol is explicit configuration on the [`Compiler`](crate::Compiler)
/// rather than process-wide state, so concurrent compilations with different
/// styles never interfere.
///
/// No validation is performed on the symbol; callers are trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    symbol: String,
}

impl Placeholder {
    /// Create a placeholder style with the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// The configured symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format the placeholder for bind position `idx` (1-based).
    #[must_use]
    pub fn param(&self, idx: usize) -> String {
        format!("{}{idx}", self.symbol)
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new("$")
    }
}
