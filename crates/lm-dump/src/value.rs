//! Scalar value decoding for dump literals.

/// A decoded scalar from one INSERT tuple position
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Decode a raw literal token (quotes still attached) into a value.
    ///
    /// - unquoted `NULL` (any case) is null
    /// - quoted strings are unescaped
    /// - unquoted numeric-looking tokens become Int (no dot) or Float
    /// - anything else passes through as text
    pub fn decode(raw: &str) -> SqlValue {
        let raw = raw.trim();

        if let Some((quote, inner)) = quoted_body(raw) {
            return SqlValue::Text(unescape(inner, quote));
        }

        if raw.eq_ignore_ascii_case("NULL") {
            return SqlValue::Null;
        }

        if is_numeric_token(raw) {
            if raw.contains('.') {
                if let Ok(f) = raw.parse::<f64>() {
                    return SqlValue::Float(f);
                }
            } else if let Ok(i) = raw.parse::<i64>() {
                return SqlValue::Int(i);
            }
        }

        SqlValue::Text(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(f) => Some(*f),
            SqlValue::Int(i) => Some(*i as f64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Render the value as an opaque identifier string, if non-null and
    /// non-empty. Legacy primary keys arrive as either ints or strings.
    pub fn as_id(&self) -> Option<String> {
        match self {
            SqlValue::Int(i) => Some(i.to_string()),
            SqlValue::Float(f) => Some(f.to_string()),
            SqlValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            SqlValue::Null => None,
        }
    }
}

/// Return the delimiter and body of a quoted literal, or None if `raw` is
/// not quoted
fn quoted_body(raw: &str) -> Option<(char, &str)> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return Some((first as char, &raw[1..raw.len() - 1]));
        }
    }
    None
}

/// A token is numeric-looking when it is an optional minus sign followed by
/// digits with at most one dot.
fn is_numeric_token(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    if body.is_empty() {
        return false;
    }
    let mut dots = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => {}
            '.' => dots += 1,
            _ => return false,
        }
    }
    dots <= 1 && body.chars().any(|c| c.is_ascii_digit())
}

/// Unescape a quoted literal body: backslash escapes plus doubled
/// delimiters.
///
/// Only the delimiting quote doubles; the other quote character is plain
/// text inside the literal. Unknown escape sequences pass the escaped
/// character through literally.
fn unescape(body: &str, quote: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else if c == quote {
            // Doubled delimiter inside a literal body collapses to one
            let mut peek = chars.clone();
            if peek.next() == Some(c) {
                chars = peek;
            }
            out.push(c);
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
