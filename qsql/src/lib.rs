// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference

//! # qsql - query strings to parameterized SQL predicates
//!
//! Translate the parsed form of an HTTP query string into a `WHERE` clause,
//! an optional `ORDER BY` clause, and a positional bind sequence — letting an
//! API expose filtering and sorting (`?name[like]=%25Jones&city=Paris&$sort=-age`)
//! without letting callers inject SQL.
//!
//! The crate sits between a query-string decoder and a database driver: the
//! decoder produces a [`QueryMap`], the [`Compiler`] turns it into a
//! [`CompiledQuery`], and the driver executes `sql` with `values`.
//!
//! ## Quick Start
//!
//! ```
//! use qsql::{Compiler, QueryMap};
//!
//! // ?name[like]=%25Jones&city=Paris
//! let query = QueryMap::new()
//!     .op("name", "like", "%Jones")
//!     .scalar("city", "Paris");
//!
//! let result = Compiler::new().compile(&query).unwrap();
//! assert_eq!(result.sql, "WHERE name LIKE $1 AND city = $2 ");
//! assert_eq!(result.values.len(), 2);
//! ```
//!
//! ## Grammar
//!
//! | Query string | SQL |
//! |--------------|-----|
//! | `column=value` | `column = $1` |
//! | `column[op]=value` | `column <op> $1` |
//! | `column[op]=v1:v2:...` | list/range argument (`in` any count, `tween` exactly 2) |
//! | `column[-op]=value` | negated operator |
//! | `$sort=col1:-col2` | `ORDER BY col1, col2 DESC` |
//!
//! ## Supported Operators
//!
//! | Token | SQL | Negated |
//! |-------|-----|---------|
//! | `eq` (implicit) | `=` | `!=` |
//! | `ne` | `!=` | `=` |
//! | `lt` | `<` | `>=` |
//! | `lte` | `<=` | `>` |
//! | `gt` | `>` | `<=` |
//! | `gte` | `>=` | `<` |
//! | `in` | `IN (...)` | `NOT IN (...)` |
//! | `like` | `LIKE` | `NOT LIKE` |
//! | `tween` | `BETWEEN ... AND ...` | `NOT BETWEEN ... AND ...` |
//! | `is` | `IS NULL` | `IS NOT NULL` |
//!
//! ## Security Model
//!
//! Values are always parameterized — string scalars travel through the bind
//! sequence, never through SQL text — with a quote/semicolon sanitizer as a
//! second layer. Column names cannot be parameterized, so untrusted field
//! keys must be checked against an allow-list:
//!
//! ```
//! use qsql::{Columns, CompileError, Compiler, QueryMap};
//!
//! let compiler = Compiler::new().columns(Columns::names(&["name", "city"]));
//!
//! let err = compiler
//!     .compile(&QueryMap::new().scalar("password", "x"))
//!     .unwrap_err();
//! assert!(matches!(err, CompileError::UnknownColumn { .. }));
//! ```
//!
//! ## JSON Ingestion
//!
//! Query-string decoders commonly hand over nested JSON
//! (`a[b]=c` → `{"a": {"b": "c"}}`); [`QueryMap::from_json_str`] accepts that
//! shape directly:
//!
//! ```
//! use qsql::{Compiler, QueryMap};
//!
//! let query = QueryMap::from_json_str(r#"{"age": {"tween": "18:30"}}"#).unwrap();
//! let result = Compiler::new().compile(&query).unwrap();
//! assert_eq!(result.sql, "WHERE age BETWEEN $1 AND $2 ");
//! ```

mod columns;
mod compile;
mod operator;
mod placeholder;
mod query;
mod value;

pub use columns::{ColumnDef, Columns};
pub use compile::{CompileError, CompiledQuery, Compiler};
pub use operator::Operator;
pub use placeholder::Placeholder;
pub use query::{FieldValue, QueryMap, QueryParseError};
pub use value::Value;

/// Re-export miniserde's json module for query-object ingestion.
///
/// Use this to parse JSON into values for [`QueryMap::from_json`].
///
/// # Example
///
/// ```
/// use qsql::{json, QueryMap};
///
/// let value: json::Value = json::from_str(r#"{"city": "Paris"}"#).unwrap();
/// let query = QueryMap::from_json(&value).unwrap();
/// assert_eq!(query.len(), 1);
/// ```
pub use miniserde::json;

/// Compile `query` with the default configuration: `$` placeholders, no
/// allow-list, permissive operator resolution.
///
/// Convenience wrapper around [`Compiler::new`]`.compile(query)`.
pub fn compile(query: &QueryMap) -> Result<CompiledQuery, CompileError> {
    Compiler::new().compile(query)
}

/// Prelude module for convenient imports.
///
/// ```
/// use qsql::prelude::*;
///
/// let result = compile(&QueryMap::new().scalar("city", "Paris")).unwrap();
/// assert_eq!(result.sql, "WHERE city = $1 ");
/// ```
pub mod prelude {
    pub use crate::{
        ColumnDef, Columns, CompileError, CompiledQuery, Compiler, FieldValue, Operator,
        Placeholder, QueryMap, QueryParseError, Value, compile,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
