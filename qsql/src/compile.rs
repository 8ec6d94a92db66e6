//! The predicate compiler: walks a [`QueryMap`] in input order and emits
//! `WHERE`/`ORDER BY` text plus the positional bind sequence.

use crate::columns::Columns;
use crate::operator::Operator;
use crate::placeholder::Placeholder;
use crate::query::{FieldValue, QueryMap};
use crate::value::Value;
use std::fmt;

/// Compilation failure.
///
/// Every failure aborts the whole compilation immediately; no partial SQL or
/// partial bind sequence is ever returned. All causes stem from malformed or
/// disallowed client input, so callers typically translate these into a
/// 400-class response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// An operator requiring a value received none, or a `tween` range was
    /// incomplete.
    MissingValue {
        /// The column whose value was missing.
        column: String,
    },
    /// A string scalar contained a single quote or semicolon.
    InvalidValue {
        /// The column whose value was rejected.
        column: String,
    },
    /// A filter or sort column is absent from a non-empty allow-list.
    UnknownColumn {
        /// The rejected column name.
        column: String,
    },
    /// The `$sort` directive's value was not a string.
    InvalidSort,
    /// An operator token outside the vocabulary (strict mode only).
    UnknownOperator {
        /// The unrecognized token, negation marker included.
        token: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { column } => {
                write!(f, "column `{column}` requires a value")
            }
            Self::InvalidValue { column } => {
                write!(f, "value for column `{column}` contains a quote or semicolon")
            }
            Self::UnknownColumn { column } => {
                write!(f, "column `{column}` is not in the allow-list")
            }
            Self::InvalidSort => write!(f, "`$sort` expects a string value"),
            Self::UnknownOperator { token } => {
                write!(f, "unknown operator token `{token}`")
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// The compiled predicate: SQL text plus its positional bind sequence.
///
/// `sql` holds the `WHERE` clause and optional `ORDER BY` clause, or the
/// empty string for an empty query object — never a dangling `WHERE`/`AND`.
/// Bind position `i` corresponds to placeholder number `i + 1`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "CompiledQuery must be handed to the database driver"]
pub struct CompiledQuery {
    /// The predicate text.
    pub sql: String,
    /// Values for the driver, matched to placeholders by position.
    pub values: Vec<Value>,
}

/// Compiles query objects into parameterized SQL predicates.
///
/// All configuration is explicit per compiler instance — placeholder style,
/// column allow-list and operator strictness are plain fields — so there is
/// no shared mutable state and concurrent compilations never interfere.
///
/// # Example
///
/// ```
/// use qsql::{Compiler, QueryMap};
///
/// let query = QueryMap::new().op("name", "like", "%Jones").scalar("city", "Paris");
/// let result = Compiler::new().compile(&query).unwrap();
///
/// assert_eq!(result.sql, "WHERE name LIKE $1 AND city = $2 ");
/// assert_eq!(result.values.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    placeholder: Placeholder,
    columns: Columns,
    strict: bool,
}

impl Compiler {
    /// Create a compiler with the default configuration: `$` placeholders,
    /// no allow-list, permissive operator resolution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bind-placeholder symbol (default `$`).
    ///
    /// The symbol is not validated; callers are trusted.
    #[must_use]
    pub fn placeholder(mut self, symbol: impl Into<String>) -> Self {
        self.placeholder = Placeholder::new(symbol);
        self
    }

    /// Restrict filter and sort columns to an allow-list.
    ///
    /// An empty [`Columns`] keeps validation disabled.
    #[must_use]
    pub fn columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Reject unknown operator tokens with
    /// [`CompileError::UnknownOperator`] instead of falling back to `=`.
    ///
    /// The permissive fallback is the documented default, but it silently
    /// masks client typos (`?age[gt3]=18` compiles as equality); strict mode
    /// surfaces them.
    #[must_use]
    pub const fn strict_operators(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Compile `query` into `WHERE`/`ORDER BY` text and a bind sequence.
    ///
    /// Clauses are emitted in the query object's entry order; placeholder
    /// numbering is strictly sequential across the whole compilation,
    /// starting at 1. An empty query object compiles to
    /// `{ sql: "", values: [] }`.
    pub fn compile(&self, query: &QueryMap) -> Result<CompiledQuery, CompileError> {
        let mut sql = String::new();
        let mut order_by = String::new();
        let mut values = Vec::new();
        let mut idx = 1usize;

        for (key, field) in query {
            if key.starts_with('$') {
                // Directives are shaping instructions, never column names.
                // Only $sort is defined; the rest of the namespace is
                // reserved and skipped.
                if key == "$sort" {
                    order_by = self.order_by(field)?;
                }
                continue;
            }

            self.check_column(key)?;
            match field {
                FieldValue::Scalar(raw) => {
                    let prefix = if sql.is_empty() { "WHERE " } else { "AND " };
                    let (text, params, next) =
                        self.condition(prefix, key, Operator::Eq, false, raw, idx)?;
                    sql.push_str(&text);
                    values.extend(params);
                    idx = next;
                }
                FieldValue::Ops(pairs) => {
                    for (token, raw) in pairs {
                        let (op, negated) = self.resolve(token)?;
                        let prefix = if sql.is_empty() { "WHERE " } else { "AND " };
                        let (text, params, next) =
                            self.condition(prefix, key, op, negated, raw, idx)?;
                        sql.push_str(&text);
                        values.extend(params);
                        idx = next;
                    }
                }
            }
        }

        sql.push_str(&order_by);
        Ok(CompiledQuery { sql, values })
    }

    /// Resolve an operator token, honoring strict mode.
    fn resolve(&self, token: &str) -> Result<(Operator, bool), CompileError> {
        match Operator::from_token(token) {
            Some(pair) => Ok(pair),
            None if self.strict => Err(CompileError::UnknownOperator {
                token: token.to_string(),
            }),
            // Documented permissive default: unknown tokens compile as
            // equality. The negation marker still toggles the row.
            None => Ok((Operator::Eq, token.starts_with('-'))),
        }
    }

    fn check_column(&self, name: &str) -> Result<(), CompileError> {
        if self.columns.allows(name) {
            Ok(())
        } else {
            Err(CompileError::UnknownColumn {
                column: name.to_string(),
            })
        }
    }

    /// Build one condition. Returns the SQL fragment (trailing space
    /// included), the values it binds, and the next placeholder index.
    fn condition(
        &self,
        prefix: &str,
        column: &str,
        op: Operator,
        negated: bool,
        raw: &str,
        start_idx: usize,
    ) -> Result<(String, Vec<Value>, usize), CompileError> {
        let mut idx = start_idx;
        match op {
            // IS [NOT] NULL ignores the supplied value entirely and
            // consumes no bind slot.
            Operator::Is => Ok((
                format!("{prefix}{column} {} NULL ", op.sql(negated)),
                vec![],
                idx,
            )),

            Operator::Tween => {
                let bounds: Vec<&str> = raw.split(':').collect();
                let &[lo, hi] = bounds.as_slice() else {
                    return Err(CompileError::MissingValue {
                        column: column.to_string(),
                    });
                };
                if lo.is_empty() || hi.is_empty() {
                    return Err(CompileError::MissingValue {
                        column: column.to_string(),
                    });
                }
                let lo = Value::normalize(lo, column)?;
                let hi = Value::normalize(hi, column)?;
                let mut params = Vec::new();
                let lo_text = self.operand(lo, &mut idx, &mut params);
                let hi_text = self.operand(hi, &mut idx, &mut params);
                Ok((
                    format!("{prefix}{column} {} {lo_text} AND {hi_text} ", op.sql(negated)),
                    params,
                    idx,
                ))
            }

            Operator::In => {
                let mut params = Vec::new();
                let mut slots = Vec::new();
                for part in raw.split(':') {
                    let value = Value::normalize(part, column)?;
                    slots.push(self.operand(value, &mut idx, &mut params));
                }
                Ok((
                    format!("{prefix}{column} {}{}) ", op.sql(negated), slots.join(", ")),
                    params,
                    idx,
                ))
            }

            _ => {
                let value = Value::normalize(raw, column)?;
                let op_sql = op.sql(negated);
                if matches!(value, Value::Null) {
                    // The NULL keyword is never bound as a parameter. Under
                    // equality the condition degrades to the IS [NOT] NULL
                    // form SQL actually requires.
                    let text = match op_sql {
                        "=" => format!("{prefix}{column} IS NULL "),
                        "!=" => format!("{prefix}{column} IS NOT NULL "),
                        _ => format!("{prefix}{column} {op_sql} NULL "),
                    };
                    return Ok((text, vec![], idx));
                }
                let slot = self.placeholder.param(idx);
                idx += 1;
                Ok((
                    format!("{prefix}{column} {op_sql} {slot} "),
                    vec![value],
                    idx,
                ))
            }
        }
    }

    /// Emit the SQL text for one normalized value: a placeholder for
    /// bindable kinds, the bare keyword for the NULL literal.
    fn operand(&self, value: Value, idx: &mut usize, params: &mut Vec<Value>) -> String {
        if matches!(value, Value::Null) {
            return "NULL".to_string();
        }
        let slot = self.placeholder.param(*idx);
        *idx += 1;
        params.push(value);
        slot
    }

    /// Build the `ORDER BY` clause from a `$sort` directive value.
    fn order_by(&self, field: &FieldValue) -> Result<String, CompileError> {
        let FieldValue::Scalar(spec) = field else {
            return Err(CompileError::InvalidSort);
        };
        let mut segments = Vec::new();
        for part in spec.split(':') {
            if part.is_empty() {
                continue;
            }
            let (name, desc) = match part.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (part, false),
            };
            self.check_column(name)?;
            segments.push(if desc {
                format!("{name} DESC")
            } else {
                name.to_string()
            });
        }
        if segments.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("ORDER BY {}", segments.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Columns;

    fn compile(query: &QueryMap) -> CompiledQuery {
        Compiler::new().compile(query).unwrap()
    }

    #[test]
    fn empty_query_compiles_to_empty_result() {
        let result = compile(&QueryMap::new());
        assert_eq!(result.sql, "");
        assert!(result.values.is_empty());
    }

    #[test]
    fn implicit_equality() {
        let result = compile(&QueryMap::new().scalar("city", "Paris"));
        assert_eq!(result.sql, "WHERE city = $1 ");
        assert_eq!(result.values, vec![Value::Text("Paris".into())]);
    }

    #[test]
    fn numbers_bind_as_numeric_values() {
        let result = compile(&QueryMap::new().scalar("age", "34"));
        assert_eq!(result.sql, "WHERE age = $1 ");
        assert_eq!(result.values, vec![Value::Int(34)]);
    }

    #[test]
    fn like_then_equality() {
        let query = QueryMap::new()
            .op("name", "like", "%Jones")
            .scalar("city", "Paris");
        let result = compile(&query);
        assert_eq!(result.sql, "WHERE name LIKE $1 AND city = $2 ");
        assert_eq!(
            result.values,
            vec![Value::Text("%Jones".into()), Value::Text("Paris".into())]
        );
    }

    #[test]
    fn tween_emits_between_with_two_slots() {
        let result = compile(&QueryMap::new().op("age", "tween", "18:30"));
        assert_eq!(result.sql, "WHERE age BETWEEN $1 AND $2 ");
        assert_eq!(result.values, vec![Value::Int(18), Value::Int(30)]);
    }

    #[test]
    fn tween_requires_exactly_two_bounds() {
        let compiler = Compiler::new();
        for raw in ["18", "18:", ":30", "18:30:40", ""] {
            let query = QueryMap::new().op("age", "tween", raw);
            assert!(
                matches!(
                    compiler.compile(&query),
                    Err(CompileError::MissingValue { .. })
                ),
                "tween value {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn in_emits_one_slot_per_segment() {
        let result = compile(&QueryMap::new().op("status", "in", "a:b:c"));
        assert_eq!(result.sql, "WHERE status IN ($1, $2, $3) ");
        assert_eq!(
            result.values,
            vec![
                Value::Text("a".into()),
                Value::Text("b".into()),
                Value::Text("c".into())
            ]
        );
    }

    #[test]
    fn in_with_single_segment() {
        let result = compile(&QueryMap::new().op("status", "in", "active"));
        assert_eq!(result.sql, "WHERE status IN ($1) ");
        assert_eq!(result.values, vec![Value::Text("active".into())]);
    }

    #[test]
    fn in_with_empty_segment_is_missing_value() {
        let query = QueryMap::new().op("status", "in", "a::b");
        assert!(matches!(
            Compiler::new().compile(&query),
            Err(CompileError::MissingValue { .. })
        ));
    }

    #[test]
    fn negated_operators_select_the_inverse_row() {
        let result = compile(&QueryMap::new().op("age", "-lt", "30"));
        assert_eq!(result.sql, "WHERE age >= $1 ");

        let result = compile(&QueryMap::new().op("status", "-in", "a:b"));
        assert_eq!(result.sql, "WHERE status NOT IN ($1, $2) ");

        let result = compile(&QueryMap::new().op("name", "-like", "%x%"));
        assert_eq!(result.sql, "WHERE name NOT LIKE $1 ");

        let result = compile(&QueryMap::new().op("age", "-tween", "18:30"));
        assert_eq!(result.sql, "WHERE age NOT BETWEEN $1 AND $2 ");
    }

    #[test]
    fn is_ignores_the_value_and_binds_nothing() {
        let result = compile(&QueryMap::new().op("deleted_at", "is", "whatever"));
        assert_eq!(result.sql, "WHERE deleted_at IS NULL ");
        assert!(result.values.is_empty());

        let result = compile(&QueryMap::new().op("deleted_at", "-is", "whatever"));
        assert_eq!(result.sql, "WHERE deleted_at IS NOT NULL ");
        assert!(result.values.is_empty());
    }

    #[test]
    fn null_literal_under_equality_degrades_to_is_null() {
        let result = compile(&QueryMap::new().scalar("middle_name", "NULL"));
        assert_eq!(result.sql, "WHERE middle_name IS NULL ");
        assert!(result.values.is_empty());

        let result = compile(&QueryMap::new().op("middle_name", "ne", "NULL"));
        assert_eq!(result.sql, "WHERE middle_name IS NOT NULL ");
        assert!(result.values.is_empty());
    }

    #[test]
    fn null_literal_elsewhere_is_emitted_verbatim() {
        // Degenerate but well-defined: the keyword is written inline and
        // nothing is bound, keeping placeholder numbering contiguous.
        let result = compile(
            &QueryMap::new()
                .op("age", "gt", "NULL")
                .scalar("city", "Paris"),
        );
        assert_eq!(result.sql, "WHERE age > NULL AND city = $1 ");
        assert_eq!(result.values, vec![Value::Text("Paris".into())]);
    }

    #[test]
    fn null_handling_is_position_independent() {
        let result = compile(
            &QueryMap::new()
                .scalar("a", "NULL")
                .scalar("b", "1")
                .scalar("c", "NULL"),
        );
        assert_eq!(result.sql, "WHERE a IS NULL AND b = $1 AND c IS NULL ");
        assert_eq!(result.values, vec![Value::Int(1)]);
    }

    #[test]
    fn multiple_operators_per_column_compose_with_and() {
        let query = QueryMap::new().op("age", "gte", "18").op("age", "lte", "30");
        let result = compile(&query);
        assert_eq!(result.sql, "WHERE age >= $1 AND age <= $2 ");
        assert_eq!(result.values, vec![Value::Int(18), Value::Int(30)]);
    }

    #[test]
    fn placeholder_numbering_spans_the_whole_compilation() {
        let query = QueryMap::new()
            .op("age", "tween", "18:30")
            .op("status", "in", "a:b")
            .scalar("city", "Paris");
        let result = compile(&query);
        assert_eq!(
            result.sql,
            "WHERE age BETWEEN $1 AND $2 AND status IN ($3, $4) AND city = $5 "
        );
        assert_eq!(result.values.len(), 5);
    }

    #[test]
    fn sort_only_query() {
        let result = compile(&QueryMap::new().sort("-age:name"));
        assert_eq!(result.sql, "ORDER BY age DESC, name");
        assert!(result.values.is_empty());
    }

    #[test]
    fn sort_appends_after_filters() {
        let query = QueryMap::new().scalar("city", "Paris").sort("name");
        let result = compile(&query);
        assert_eq!(result.sql, "WHERE city = $1 ORDER BY name");
    }

    #[test]
    fn sort_appends_even_when_directive_comes_first() {
        let query = QueryMap::new().sort("name").scalar("city", "Paris");
        let result = compile(&query);
        assert_eq!(result.sql, "WHERE city = $1 ORDER BY name");
    }

    #[test]
    fn sort_skips_empty_segments() {
        let result = compile(&QueryMap::new().sort("name::-age:"));
        assert_eq!(result.sql, "ORDER BY name, age DESC");
    }

    #[test]
    fn sort_with_operator_object_is_invalid() {
        let query = QueryMap::new().op("$sort", "like", "name");
        assert_eq!(
            Compiler::new().compile(&query).unwrap_err(),
            CompileError::InvalidSort
        );
    }

    #[test]
    fn unknown_directives_are_skipped() {
        let query = QueryMap::new().scalar("$limit", "10").scalar("city", "Paris");
        let result = compile(&query);
        assert_eq!(result.sql, "WHERE city = $1 ");
    }

    #[test]
    fn allow_list_rejects_unknown_filter_column() {
        let compiler = Compiler::new().columns(Columns::names(&["a"]));

        let err = compiler
            .compile(&QueryMap::new().scalar("b", "1"))
            .unwrap_err();
        let CompileError::UnknownColumn { column } = err else {
            panic!("expected UnknownColumn, got different error variant")
        };
        assert_eq!(column, "b");

        let result = compiler.compile(&QueryMap::new().scalar("a", "1")).unwrap();
        assert_eq!(result.sql, "WHERE a = $1 ");
    }

    #[test]
    fn allow_list_covers_sort_columns() {
        let compiler = Compiler::new().columns(Columns::names(&["name"]));
        assert!(
            compiler
                .compile(&QueryMap::new().sort("name:-age"))
                .is_err()
        );
        let result = compiler.compile(&QueryMap::new().sort("-name")).unwrap();
        assert_eq!(result.sql, "ORDER BY name DESC");
    }

    #[test]
    fn failures_abort_without_partial_output() {
        // The second entry fails; nothing from the first may leak out.
        let query = QueryMap::new()
            .scalar("city", "Paris")
            .scalar("note", "it's");
        assert!(matches!(
            Compiler::new().compile(&query),
            Err(CompileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_operator_falls_back_to_equality_by_default() {
        let result = compile(&QueryMap::new().op("name", "foo", "x"));
        assert_eq!(result.sql, "WHERE name = $1 ");

        // The negation marker still toggles the fallback row.
        let result = compile(&QueryMap::new().op("name", "-foo", "x"));
        assert_eq!(result.sql, "WHERE name != $1 ");
    }

    #[test]
    fn strict_mode_rejects_unknown_operators() {
        let compiler = Compiler::new().strict_operators(true);
        let err = compiler
            .compile(&QueryMap::new().op("name", "foo", "x"))
            .unwrap_err();
        let CompileError::UnknownOperator { token } = err else {
            panic!("expected UnknownOperator, got different error variant")
        };
        assert_eq!(token, "foo");
    }

    #[test]
    fn custom_placeholder_symbol() {
        let compiler = Compiler::new().placeholder("?");
        let result = compiler
            .compile(&QueryMap::new().op("status", "in", "a:b"))
            .unwrap();
        assert_eq!(result.sql, "WHERE status IN (?1, ?2) ");
    }

    #[test]
    fn compilation_is_idempotent() {
        let query = QueryMap::new()
            .op("name", "like", "%Jones")
            .op("age", "tween", "18:30")
            .sort("-age");
        let compiler = Compiler::new();
        let first = compiler.compile(&query).unwrap();
        let second = compiler.compile(&query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn error_display() {
        let err = CompileError::UnknownColumn { column: "b".into() };
        assert!(format!("{err}").contains('b'));

        let err = CompileError::InvalidSort;
        assert!(format!("{err}").contains("$sort"));

        let err = CompileError::UnknownOperator { token: "gt3".into() };
        assert!(format!("{err}").contains("gt3"));
    }
}
