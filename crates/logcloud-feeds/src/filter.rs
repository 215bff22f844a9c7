//! Filter expressions: a subset of the Cloud Logging query language.
//!
//! # Grammar
//!
//! ```text
//! expr       := and { "OR" and }
//! and        := unary { ["AND"] unary }        juxtaposition is an implicit AND
//! unary      := "NOT" unary | "-" unary | primary
//! primary    := "(" expr ")" | comparison
//! comparison := field op value
//! op         := "=" | "!=" | "<" | "<=" | ">" | ">=" | ":"
//! value      := bare-word | "\"" quoted "\""
//! ```
//!
//! # Fields
//!
//! | Field | Compared as |
//! |-------|-------------|
//! | `severity` | rank on the severity ladder |
//! | `timestamp` | RFC 3339 instant |
//! | `logName` | text |
//! | `textPayload` | text (only text payloads) |
//! | `jsonPayload.<path>` | text, numeric when both sides are numbers |
//! | `labels.<key>` | text, numeric when both sides are numbers |
//!
//! `:` is a case-insensitive substring test. A comparison against a field the
//! entry does not have is false, for `!=` too.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use logcloud_core::{Payload, RawEntry, Severity};
use serde_json::Value;

use crate::error::FilterError;

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare(Comparison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: Field,
    pub op: Op,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Severity,
    Timestamp,
    LogName,
    TextPayload,
    /// Path below `jsonPayload`, one segment per key.
    JsonPayload(Vec<String>),
    Label(String),
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "severity" => Some(Field::Severity),
            "timestamp" => Some(Field::Timestamp),
            "logName" => Some(Field::LogName),
            "textPayload" => Some(Field::TextPayload),
            _ => {
                if let Some(path) = name.strip_prefix("jsonPayload.") {
                    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
                    if segments.iter().any(String::is_empty) {
                        return None;
                    }
                    Some(Field::JsonPayload(segments))
                } else {
                    name.strip_prefix("labels.")
                        .filter(|k| !k.is_empty())
                        .map(|k| Field::Label(k.to_string()))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Has,
}

impl Op {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Op::Eq | Op::Has => ord == Ordering::Equal,
            Op::Ne => ord != Ordering::Equal,
            Op::Lt => ord == Ordering::Less,
            Op::Le => ord != Ordering::Greater,
            Op::Gt => ord == Ordering::Greater,
            Op::Ge => ord != Ordering::Less,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Filter {
    pub fn parse(src: &str) -> Result<Self, FilterError> {
        let mut parser = Parser { src, pos: 0 };
        let expr = parser.parse_or()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(FilterError::new(parser.pos, "unexpected input"));
        }
        Ok(Self { expr })
    }

    pub fn matches(&self, entry: &RawEntry) -> bool {
        self.expr.matches(entry)
    }
}

impl std::str::FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(s)
    }
}

impl Expr {
    fn matches(&self, entry: &RawEntry) -> bool {
        match self {
            Expr::And(a, b) => a.matches(entry) && b.matches(entry),
            Expr::Or(a, b) => a.matches(entry) || b.matches(entry),
            Expr::Not(e) => !e.matches(entry),
            Expr::Compare(c) => c.matches(entry),
        }
    }
}

impl Comparison {
    pub fn matches(&self, entry: &RawEntry) -> bool {
        match &self.field {
            Field::Severity => Severity::from_str_loose(&self.value)
                .is_some_and(|rhs| self.op.holds(entry.severity.cmp(&rhs))),
            Field::Timestamp => entry.timestamp.is_some_and(|ts| self.compare_time(ts)),
            Field::LogName => self.compare_text(&entry.log_name),
            Field::TextPayload => match &entry.payload {
                Payload::Text(text) => self.compare_text(text),
                _ => false,
            },
            Field::JsonPayload(path) => match &entry.payload {
                Payload::Map(map) => lookup(map, path).is_some_and(|v| self.compare_text(&v)),
                _ => false,
            },
            Field::Label(key) => entry
                .labels
                .get(key)
                .is_some_and(|v| self.compare_text(v)),
        }
    }

    fn compare_time(&self, ts: DateTime<Utc>) -> bool {
        if self.op == Op::Has {
            return ts.to_rfc3339().contains(&self.value);
        }
        DateTime::parse_from_rfc3339(&self.value)
            .map(|rhs| self.op.holds(ts.cmp(&rhs.with_timezone(&Utc))))
            .unwrap_or(false)
    }

    fn compare_text(&self, actual: &str) -> bool {
        if self.op == Op::Has {
            return actual.to_lowercase().contains(&self.value.to_lowercase());
        }
        let ordering = match (actual.parse::<f64>(), self.value.parse::<f64>()) {
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => Some(actual.cmp(self.value.as_str())),
        };
        ordering.is_some_and(|o| self.op.holds(o))
    }
}

/// Resolve a `jsonPayload` path to comparable text. `null` counts as absent.
fn lookup(map: &serde_json::Map<String, Value>, path: &[String]) -> Option<String> {
    let (first, rest) = path.split_first()?;
    let mut value = map.get(first)?;
    for key in rest {
        value = value.as_object()?.get(key)?;
    }
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

const KEYWORDS: [&str; 3] = ["AND", "OR", "NOT"];

fn is_field_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '-')
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// The keyword starting at the cursor, if any. A keyword must be followed
    /// by whitespace, `(`, or the end of input.
    fn keyword(&self) -> Option<&'static str> {
        let rest = &self.src[self.pos..];
        KEYWORDS.into_iter().find(|kw| match rest.strip_prefix(kw) {
            Some(after) => after
                .chars()
                .next()
                .map_or(true, |c| c.is_whitespace() || c == '('),
            None => false,
        })
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.keyword() == Some(kw) {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr, FilterError> {
        let mut lhs = self.parse_and()?;
        loop {
            self.skip_ws();
            if !self.eat_keyword("OR") {
                return Ok(lhs);
            }
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_and(&mut self) -> Result<Expr, FilterError> {
        let mut lhs = self.parse_unary()?;
        loop {
            self.skip_ws();
            if !self.eat_keyword("AND") {
                let stop = match self.peek() {
                    None | Some(')') => true,
                    Some(_) => self.keyword() == Some("OR"),
                };
                if stop {
                    return Ok(lhs);
                }
            }
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, FilterError> {
        self.skip_ws();
        let negated = if self.peek() == Some('-') {
            self.bump();
            true
        } else {
            self.eat_keyword("NOT")
        };
        if negated {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, FilterError> {
        self.skip_ws();
        match self.peek() {
            None => Err(FilterError::new(self.pos, "expected a comparison")),
            Some('(') => {
                self.bump();
                let inner = self.parse_or()?;
                self.skip_ws();
                if self.bump() != Some(')') {
                    return Err(FilterError::new(self.pos, "expected `)`"));
                }
                Ok(inner)
            }
            Some(_) => self.parse_comparison().map(Expr::Compare),
        }
    }

    fn parse_comparison(&mut self) -> Result<Comparison, FilterError> {
        let start = self.pos;
        while self.peek().is_some_and(is_field_char) {
            self.bump();
        }
        let name = &self.src[start..self.pos];
        if name.is_empty() {
            return Err(FilterError::new(start, "expected a field name"));
        }
        let field = Field::parse(name)
            .ok_or_else(|| FilterError::new(start, format!("unknown field `{name}`")))?;

        self.skip_ws();
        let op_start = self.pos;
        let op = self.parse_op().ok_or_else(|| {
            FilterError::new(op_start, format!("expected an operator after `{name}`"))
        })?;

        self.skip_ws();
        let value = self.parse_value()?;
        Ok(Comparison { field, op, value })
    }

    fn parse_op(&mut self) -> Option<Op> {
        const OPS: [(&str, Op); 7] = [
            (">=", Op::Ge),
            ("<=", Op::Le),
            ("!=", Op::Ne),
            ("=", Op::Eq),
            ("<", Op::Lt),
            (">", Op::Gt),
            (":", Op::Has),
        ];
        let rest = &self.src[self.pos..];
        let (text, op) = OPS.into_iter().find(|(text, _)| rest.starts_with(text))?;
        self.pos += text.len();
        Some(op)
    }

    fn parse_value(&mut self) -> Result<String, FilterError> {
        let start = self.pos;
        if self.peek() == Some('"') {
            self.bump();
            let mut out = String::new();
            loop {
                match self.bump() {
                    None => return Err(FilterError::new(start, "unterminated string")),
                    Some('"') => return Ok(out),
                    Some('\\') => match self.bump() {
                        Some(c) => out.push(c),
                        None => return Err(FilterError::new(start, "unterminated string")),
                    },
                    Some(c) => out.push(c),
                }
            }
        }
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && c != '(' && c != ')')
        {
            self.bump();
        }
        if self.pos == start {
            return Err(FilterError::new(start, "expected a value"));
        }
        Ok(self.src[start..self.pos].to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
