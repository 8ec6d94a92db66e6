//! Scalar normalization for raw query-string values.

use crate::compile::CompileError;

/// A normalized scalar.
///
/// Raw query-string values are classified into one of these kinds before any
/// SQL text is emitted. [`Value::Null`] is the SQL `NULL` keyword and is
/// written verbatim into the SQL text; every other kind travels through the
/// bind sequence so the database driver applies its own quoting.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer scalar, bound as a numeric parameter.
    Int(i64),
    /// Floating-point scalar, bound as a numeric parameter.
    Float(f64),
    /// The SQL `NULL` keyword. Emitted unquoted, never bound.
    Null,
    /// Sanitized string scalar, free of `'` and `;`. Always bound.
    Text(String),
}

impl Value {
    /// Classify and sanitize one raw scalar appearing under `column`.
    ///
    /// Rules, in order:
    /// 1. an empty value fails with [`CompileError::MissingValue`];
    /// 2. a value parsing as a finite number becomes [`Value::Int`] or
    ///    [`Value::Float`];
    /// 3. the exact string `NULL` (upper-case) becomes the null-literal
    ///    marker;
    /// 4. anything else is a string: `'` or `;` fail with
    ///    [`CompileError::InvalidValue`], the rest pass through as
    ///    [`Value::Text`].
    ///
    /// The quote/semicolon check is a second layer of defense. Strings are
    /// always parameterized, never spliced into SQL text, so injection is
    /// prevented by the bind mechanism even before the sanitizer runs.
    ///
    /// Colon-delimited sub-arguments (`tween`, `in`) are split by the
    /// compiler before each part reaches this function.
    pub fn normalize(raw: &str, column: &str) -> Result<Self, CompileError> {
        if raw.is_empty() {
            return Err(CompileError::MissingValue {
                column: column.to_string(),
            });
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(Self::Int(n));
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Ok(Self::Float(f));
            }
        }
        if raw == "NULL" {
            return Ok(Self::Null);
        }
        if raw.contains('\'') || raw.contains(';') {
            return Err(CompileError::InvalidValue {
                column: column.to_string(),
            });
        }
        Ok(Self::Text(raw.to_string()))
    }
}
