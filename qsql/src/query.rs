//! The query object: an ordered mapping of field keys to scalars or
//! operator objects, plus JSON ingestion for decoded query strings.

use miniserde::json::{Number, Value as JsonValue};
use std::fmt;

/// The value side of one query-object entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A bare scalar, compiled as implicit equality.
    Scalar(String),
    /// An ordered list of `(operator token, raw value)` pairs.
    ///
    /// The source grammar produces one pair per column, but several pairs
    /// compose with implicit `AND`, in input order.
    Ops(Vec<(String, String)>),
}

/// An ordered query object — the parsed form of an HTTP query string.
///
/// Entry order is significant: clauses are emitted in exactly this order, so
/// the representation is an explicit pair sequence rather than a map. Keys
/// beginning with `$` are directives (`$sort`), not column names.
///
/// # Example
///
/// ```
/// use qsql::QueryMap;
///
/// // ?name[like]=%Jones&city=Paris&$sort=-age
/// let query = QueryMap::new()
///     .op("name", "like", "%Jones")
///     .scalar("city", "Paris")
///     .sort("-age");
/// assert_eq!(query.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, FieldValue)>,
}

impl QueryMap {
    /// Create an empty query object.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a bare `key=value` entry (implicit equality).
    #[must_use]
    pub fn scalar(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), FieldValue::Scalar(value.into())));
        self
    }

    /// Append a `key[token]=value` entry.
    ///
    /// If the most recent operator object for `key` already exists, the pair
    /// is attached to it — matching how `age[gte]=18&age[lte]=30` decodes
    /// into one nested object with two operator keys.
    #[must_use]
    pub fn op(
        mut self,
        key: impl Into<String>,
        token: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let pair = (token.into(), value.into());
        if let Some((_, FieldValue::Ops(pairs))) =
            self.entries.iter_mut().rev().find(|(k, _)| *k == key)
        {
            pairs.push(pair);
            return self;
        }
        self.entries.push((key, FieldValue::Ops(vec![pair])));
        self
    }

    /// Append the `$sort` directive, e.g. `"-age:name"`.
    #[must_use]
    pub fn sort(self, spec: impl Into<String>) -> Self {
        self.scalar("$sort", spec)
    }

    /// Append one entry with an explicit [`FieldValue`].
    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.entries.push((key.into(), value));
    }

    /// Iterate entries in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, FieldValue)> {
        self.entries.iter()
    }

    /// Number of entries (directives included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the query object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a query object from a JSON string shaped like a decoded query
    /// string, e.g. `{"name": {"like": "%Jones"}, "city": "Paris"}`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryParseError`] if the JSON is invalid, not an object, or
    /// contains a nested structure that cannot appear in a query string.
    pub fn from_json_str(json_str: &str) -> Result<Self, QueryParseError> {
        let json: JsonValue =
            miniserde::json::from_str(json_str).map_err(|_| QueryParseError::InvalidJson)?;
        Self::from_json(&json)
    }

    /// Build a query object from an already-parsed `miniserde` value.
    ///
    /// Scalars are carried as their string form (numbers and booleans are
    /// stringified, JSON `null` becomes the `NULL` literal) and re-classified
    /// by the value normalizer during compilation. A one-level nested object
    /// becomes an operator object; arrays and deeper nesting are rejected
    /// since the query-string grammar cannot produce them.
    ///
    /// Entry order follows the iteration order of the parsed object.
    ///
    /// # Errors
    ///
    /// Returns [`QueryParseError`] if the value is not an object or contains
    /// an unsupported nested structure.
    pub fn from_json(json: &JsonValue) -> Result<Self, QueryParseError> {
        let JsonValue::Object(obj) = json else {
            return Err(QueryParseError::ExpectedObject);
        };

        let mut entries = Vec::new();
        for (key, value) in obj {
            let field = match value {
                JsonValue::Object(ops) => {
                    let mut pairs = Vec::new();
                    for (token, raw) in ops {
                        let raw = scalar_text(raw).ok_or_else(|| {
                            QueryParseError::UnsupportedValue { key: key.clone() }
                        })?;
                        pairs.push((token.clone(), raw));
                    }
                    FieldValue::Ops(pairs)
                }
                other => FieldValue::Scalar(
                    scalar_text(other)
                        .ok_or_else(|| QueryParseError::UnsupportedValue { key: key.clone() })?,
                ),
            };
            entries.push((key.clone(), field));
        }
        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a QueryMap {
    type Item = &'a (String, FieldValue);
    type IntoIter = std::slice::Iter<'a, (String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Render a JSON leaf as the raw scalar the query-string decoder would have
/// produced. Arrays and objects have no query-string counterpart.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(Number::I64(i)) => Some(i.to_string()),
        JsonValue::Number(Number::U64(u)) => Some(u.to_string()),
        JsonValue::Number(Number::F64(f)) => Some(f.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => Some("NULL".to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Error type for JSON query-object ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryParseError {
    /// Invalid JSON syntax or encoding.
    InvalidJson,
    /// Expected a JSON object at the top level.
    ExpectedObject,
    /// A value under `key` was an array or a deeper nested object.
    UnsupportedValue {
        /// The field key the unsupported value appeared under.
        key: String,
    },
}

impl fmt::Display for QueryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson => write!(f, "invalid JSON syntax or encoding"),
            Self::ExpectedObject => write!(f, "expected a JSON object"),
            Self::UnsupportedValue { key } => {
                write!(f, "value for `{key}` is not a query-string scalar")
            }
        }
    }
}

impl std::error::Error for QueryParseError {}
