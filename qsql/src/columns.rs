//! Column allow-list validation.

/// A column descriptor from the application's metadata layer.
///
/// Only the name matters to the compiler; the struct exists so callers can
/// map their own column records into the allow-list without reshaping them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ColumnDef {
    /// The SQL column name this descriptor exposes.
    pub column_name: String,
}

impl ColumnDef {
    /// Create a descriptor for `column_name`.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }
}

/// An optional allow-list of filterable and sortable columns.
///
/// An empty list disables validation entirely (open world). A non-empty list
/// is closed-world: any candidate not present is rejected with
/// [`UnknownColumn`](crate::CompileError::UnknownColumn).
///
/// # Security Note
///
/// Column names cannot be parameterized, so this list is the sole defense
/// against SQL-identifier injection. Always provide one when field keys come
/// from untrusted input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    defs: Vec<ColumnDef>,
}

impl Columns {
    /// Create an empty allow-list (validation disabled).
    #[must_use]
    pub const fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Build an allow-list from bare column names.
    #[must_use]
    pub fn names(names: &[&str]) -> Self {
        names.iter().map(|n| ColumnDef::new(*n)).collect()
    }

    /// Add one descriptor.
    #[must_use]
    pub fn with(mut self, def: ColumnDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Whether the list is empty, i.e. validation is disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Whether `candidate` may be used to build SQL text.
    #[must_use]
    pub fn allows(&self, candidate: &str) -> bool {
        self.defs.is_empty() || self.defs.iter().any(|d| d.column_name == candidate)
    }
}

impl FromIterator<ColumnDef> for Columns {
    fn from_iter<T: IntoIterator<Item = ColumnDef>>(iter: T) -> Self {
        Self {
            defs: iter.into_iter().collect(),
        }
    }
}
