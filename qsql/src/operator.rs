//! The fixed URI-operator vocabulary and its SQL operator table.

/// URI-level filter operators.
///
/// Each token maps to a normal and a negated SQL operator; a leading `-` on
/// the token in the query string (`column[-like]=...`) selects the negated
/// row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operator {
    /// Equality, `=`. Implicit for bare `column=value` entries.
    Eq,
    /// Inequality, `!=`.
    Ne,
    /// Less than, `<`.
    Lt,
    /// Less than or equal, `<=`.
    Lte,
    /// Greater than, `>`.
    Gt,
    /// Greater than or equal, `>=`.
    Gte,
    /// Membership over a colon-delimited list, `IN (...)`.
    In,
    /// Pattern match, `LIKE`.
    Like,
    /// Range over a colon-delimited pair, `BETWEEN ... AND ...`.
    Tween,
    /// Null test, `IS NULL`. Ignores the supplied value entirely.
    Is,
}

impl Operator {
    /// Parse a URI operator token, e.g. `"gte"` or `"-like"`.
    ///
    /// Returns the operator and whether the negation marker was present, or
    /// `None` for a token outside the vocabulary. The compiler decides what
    /// an unknown token means: the documented default is a permissive
    /// fallback to `=`, with strict mode rejecting it instead.
    #[must_use]
    pub fn from_token(token: &str) -> Option<(Self, bool)> {
        let (token, negated) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        let op = match token {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "in" => Self::In,
            "like" => Self::Like,
            "tween" => Self::Tween,
            "is" => Self::Is,
            _ => return None,
        };
        Some((op, negated))
    }

    /// SQL operator text for this token.
    ///
    /// Negation toggles between a fixed pair per row: `lt` ↔ `>=`, `in` ↔
    /// `NOT IN (`, and so on. `In` carries its opening parenthesis; the
    /// compiler closes the list.
    #[must_use]
    pub const fn sql(self, negated: bool) -> &'static str {
        match (self, negated) {
            (Self::Eq, false) | (Self::Ne, true) => "=",
            (Self::Eq, true) | (Self::Ne, false) => "!=",
            (Self::Lt, false) | (Self::Gte, true) => "<",
            (Self::Lt, true) | (Self::Gte, false) => ">=",
            (Self::Gt, false) | (Self::Lte, true) => ">",
            (Self::Gt, true) | (Self::Lte, false) => "<=",
            (Self::In, false) => "IN (",
            (Self::In, true) => "NOT IN (",
            (Self::Like, false) => "LIKE",
            (Self::Like, true) => "NOT LIKE",
            (Self::Tween, false) => "BETWEEN",
            (Self::Tween, true) => "NOT BETWEEN",
            (Self::Is, false) => "IS",
            (Self::Is, true) => "IS NOT",
        }
    }
}
