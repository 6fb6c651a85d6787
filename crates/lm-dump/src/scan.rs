//! Quote- and escape-aware scanning over raw dump text.
//!
//! Everything here works on byte offsets: string literals are skipped
//! atomically, so `(`, `)`, `,` and `;` inside quotes are never treated as
//! delimiters. Backslash escapes and doubled quotes are honored inside
//! single- and double-quoted literals; backtick identifiers have no escapes.

use crate::error::{DumpError, DumpResult};

/// One `INSERT INTO` statement reduced to its table, optional column list,
/// and raw (still-quoted) value tokens per tuple.
#[derive(Debug, Clone)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Option<Vec<String>>,
    pub tuples: Vec<Vec<String>>,
}

/// Split dump text into statements on top-level semicolons.
///
/// `--`, `#`, and `/* */` comments are skipped while scanning so a
/// semicolon inside a comment never splits a statement; the comment bytes
/// remain part of the surrounding slice.
pub fn split_statements(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => i = skip_quoted(bytes, i),
            b'-' if bytes.get(i + 1) == Some(&b'-')
                && bytes
                    .get(i + 2)
                    .is_none_or(|b| b.is_ascii_whitespace()) =>
            {
                i = skip_line(bytes, i);
            }
            b'#' => i = skip_line(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b';' => {
                push_statement(&mut out, &text[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    push_statement(&mut out, &text[start..]);

    out
}

fn push_statement<'a>(out: &mut Vec<&'a str>, stmt: &'a str) {
    if !stmt.trim().is_empty() {
        out.push(stmt);
    }
}

/// Skip a quoted region starting at the opening quote byte; returns the
/// index just past the closing quote (or the end of input if unterminated).
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' && quote != b'`' {
            i += 2;
            continue;
        }
        if b == quote {
            // Doubled quote stays inside the literal
            if quote != b'`' && bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_line(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Byte cursor over one statement
struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.s.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'-' if bytes.get(self.pos + 1) == Some(&b'-') => {
                    self.pos = skip_line(bytes, self.pos)
                }
                b'#' => self.pos = skip_line(bytes, self.pos),
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos = skip_block_comment(bytes, self.pos)
                }
                _ => break,
            }
        }
    }

    /// Consume a case-insensitive keyword as a whole word
    fn eat_keyword(&mut self, kw: &str) -> bool {
        self.skip_ws();
        // Byte-wise compare: a str slice could land inside a multi-byte
        // character when the statement carries non-ASCII text.
        let rest = &self.bytes()[self.pos..];
        if rest.len() >= kw.len() && rest[..kw.len()].eq_ignore_ascii_case(kw.as_bytes()) {
            let boundary = rest.get(kw.len());
            if boundary.is_none_or(|b| !b.is_ascii_alphanumeric() && *b != b'_') {
                self.pos += kw.len();
                return true;
            }
        }
        false
    }

    /// Read an identifier, stripping backticks or quotes. For qualified
    /// names (`db`.`table`) the last component wins.
    fn read_ident(&mut self) -> Option<String> {
        self.skip_ws();
        let mut name = self.read_ident_part()?;
        while self.peek() == Some(b'.') {
            self.pos += 1;
            name = self.read_ident_part()?;
        }
        Some(name)
    }

    fn read_ident_part(&mut self) -> Option<String> {
        let bytes = self.bytes();
        let start = self.pos;
        match bytes.get(start)? {
            b'`' | b'"' | b'\'' => {
                let end = skip_quoted(bytes, start);
                if end <= start + 2 {
                    return None;
                }
                self.pos = end;
                Some(self.s[start + 1..end - 1].to_string())
            }
            b if b.is_ascii_alphanumeric() || *b == b'_' => {
                let mut i = start;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                self.pos = i;
                Some(self.s[start..i].to_string())
            }
            _ => None,
        }
    }

    /// At an opening paren, return the inner text of the balanced group and
    /// advance past the closing paren.
    fn read_group(&mut self) -> DumpResult<&'a str> {
        self.skip_ws();
        let bytes = self.bytes();
        if self.peek() != Some(b'(') {
            return Err(DumpError::Malformed {
                message: format!("expected '(' at offset {} of statement", self.pos),
            });
        }
        let open = self.pos;
        let mut depth = 0usize;
        let mut i = open;

        while i < bytes.len() {
            match bytes[i] {
                b'\'' | b'"' | b'`' => i = skip_quoted(bytes, i),
                b'(' => {
                    depth += 1;
                    i += 1;
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = i + 1;
                        return Ok(&self.s[open + 1..i]);
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(DumpError::Malformed {
            message: "unterminated parenthesized group".to_string(),
        })
    }
}

/// Split a tuple body (or column list) on top-level commas
pub fn split_top_level(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => i = skip_quoted(bytes, i),
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push(&s[start..]);

    out
}

/// Parse one statement as an INSERT, or return None if it is anything else
pub fn parse_insert(stmt: &str) -> DumpResult<Option<InsertStatement>> {
    let mut cur = Cursor::new(stmt);
    if !cur.eat_keyword("INSERT") {
        return Ok(None);
    }
    // mysqldump may emit INSERT IGNORE under --insert-ignore
    cur.eat_keyword("IGNORE");
    if !cur.eat_keyword("INTO") {
        return Ok(None);
    }

    let Some(table) = cur.read_ident() else {
        return Ok(None);
    };

    cur.skip_ws();
    let columns = if cur.peek() == Some(b'(') {
        let body = cur.read_group()?;
        let cols: Vec<String> = split_top_level(body)
            .iter()
            .filter_map(|c| Cursor::new(c).read_ident())
            .collect();
        Some(cols)
    } else {
        None
    };

    if !cur.eat_keyword("VALUES") && !cur.eat_keyword("VALUE") {
        // INSERT ... SELECT and friends carry no inline rows
        return Ok(None);
    }

    let mut tuples = Vec::new();
    loop {
        cur.skip_ws();
        match cur.peek() {
            Some(b'(') => {
                let body = cur.read_group()?;
                let values = split_top_level(body)
                    .iter()
                    .map(|v| v.trim().to_string())
                    .collect();
                tuples.push(values);
            }
            Some(b',') => {
                cur.pos += 1;
            }
            _ => break,
        }
    }

    Ok(Some(InsertStatement {
        table,
        columns,
        tuples,
    }))
}

/// If `stmt` is `CREATE TABLE <table> (...)`, return the declared column
/// names in order; None for any other statement or table.
pub fn create_table_columns(stmt: &str, table: &str) -> Option<Vec<String>> {
    // Leading words a column definition can never start with
    const CONSTRAINT_KEYWORDS: &[&str] = &[
        "PRIMARY",
        "UNIQUE",
        "KEY",
        "CONSTRAINT",
        "FOREIGN",
        "INDEX",
        "FULLTEXT",
        "SPATIAL",
        "CHECK",
    ];

    let mut cur = Cursor::new(stmt);
    if !cur.eat_keyword("CREATE") || !cur.eat_keyword("TABLE") {
        return None;
    }
    if cur.eat_keyword("IF") {
        cur.eat_keyword("NOT");
        cur.eat_keyword("EXISTS");
    }

    let name = cur.read_ident()?;
    if !name.eq_ignore_ascii_case(table) {
        return None;
    }

    let body = cur.read_group().ok()?;
    let mut columns = Vec::new();
    for def in split_top_level(body) {
        let mut def_cur = Cursor::new(def);
        let trimmed = def.trim_start();
        let quoted = trimmed.starts_with('`') || trimmed.starts_with('"');
        let Some(first) = def_cur.read_ident() else {
            continue;
        };
        if !quoted && CONSTRAINT_KEYWORDS.contains(&first.to_uppercase().as_str()) {
            continue;
        }
        columns.push(first);
    }

    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
