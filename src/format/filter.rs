//! Query-expression evaluation over JSON documents.
//!
//! The formatter only depends on the [`JsonFilter`] trait. Two engines are
//! provided: [`BuiltinFilter`], a small jq subset always available, and
//! `JaqFilter`, a complete jq implementation enabled with the `jq` feature.

use crate::constants;
use crate::error::Error;
use serde_json::{Map, Value};

/// Evaluates a query expression against a JSON value.
pub trait JsonFilter {
    /// Returns every value produced by `expression`, in output order.
    ///
    /// # Errors
    ///
    /// Returns a filter error if the expression is malformed or fails to evaluate.
    fn apply(&self, input: &Value, expression: &str) -> Result<Vec<Value>, Error>;
}

/// The engine compiled into this build.
#[must_use]
pub fn default_filter() -> Box<dyn JsonFilter> {
    #[cfg(feature = "jq")]
    {
        Box::new(JaqFilter)
    }
    #[cfg(not(feature = "jq"))]
    {
        Box::new(BuiltinFilter)
    }
}

/// Interprets in-band signals in a filter's output.
///
/// A string beginning with `HALT:` ends the sequence successfully; one
/// beginning with `STDERR:` turns into a filter error.
///
/// # Errors
///
/// Returns a filter error carrying the text after `STDERR:`.
pub fn apply_signals(values: Vec<Value>) -> Result<Vec<Value>, Error> {
    let mut kept = Vec::with_capacity(values.len());
    for value in values {
        if let Value::String(text) = &value {
            if text.starts_with(constants::SIGNAL_HALT) {
                break;
            }
            if let Some(message) = text.strip_prefix(constants::SIGNAL_STDERR) {
                return Err(Error::filter_error(message.trim().to_string()));
            }
        }
        kept.push(value);
    }
    Ok(kept)
}

/// Built-in jq subset.
///
/// Supports identity (`.`), field access (`.a.b`, `."a-b"`, `.["a"]`),
/// indexing (`.[0]`, `.[-1]`), iteration (`.[]`), pipes (`|`), object
/// construction (`{id, host: .address}`) and string, number, boolean and
/// null literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFilter;

impl JsonFilter for BuiltinFilter {
    fn apply(&self, input: &Value, expression: &str) -> Result<Vec<Value>, Error> {
        let expr = Parser::new(expression).parse()?;
        eval(&expr, input)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Pipe(Vec<Expr>),
    Path(Vec<Segment>),
    Object(Vec<(String, Expr)>),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(i64),
    Iterate,
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, Error> {
        let expr = self.parse_pipeline()?;
        self.skip_whitespace();
        if let Some(ch) = self.peek() {
            return Err(self.error(&format!("unexpected '{ch}'")));
        }
        Ok(expr)
    }

    fn error(&self, reason: &str) -> Error {
        Error::filter_error(format!(
            "cannot parse '{}' at position {}: {reason}",
            self.source, self.pos
        ))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        self.pos += 1;
        ch
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), Error> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn parse_pipeline(&mut self) -> Result<Expr, Error> {
        let mut terms = vec![self.parse_term()?];
        loop {
            self.skip_whitespace();
            if self.peek() != Some('|') {
                break;
            }
            self.pos += 1;
            terms.push(self.parse_term()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Pipe(terms)
        })
    }

    fn parse_term(&mut self) -> Result<Expr, Error> {
        self.skip_whitespace();
        match self.peek() {
            Some('.') => self.parse_path(),
            Some('{') => self.parse_object(),
            Some('"') => Ok(Expr::Literal(Value::String(self.parse_string()?))),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                Ok(Expr::Literal(Value::from(self.parse_integer()?)))
            }
            Some(ch) if is_ident_start(ch) => {
                let word = self.parse_ident();
                match word.as_str() {
                    "null" => Ok(Expr::Literal(Value::Null)),
                    "true" => Ok(Expr::Literal(Value::Bool(true))),
                    "false" => Ok(Expr::Literal(Value::Bool(false))),
                    _ => Err(self.error(&format!(
                        "'{word}' is not supported by the built-in filter engine"
                    ))),
                }
            }
            Some(ch) => Err(self.error(&format!("unexpected '{ch}'"))),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn parse_path(&mut self) -> Result<Expr, Error> {
        let mut segments = Vec::new();
        self.pos += 1; // leading '.'
        self.parse_segment_after_dot(&mut segments)?;

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    if !self.parse_segment_after_dot(&mut segments)? {
                        return Err(self.error("expected field name after '.'"));
                    }
                }
                Some('[') => segments.push(self.parse_bracket()?),
                _ => break,
            }
        }
        Ok(Expr::Path(segments))
    }

    /// Parses what may follow a '.', returning false if nothing did.
    fn parse_segment_after_dot(&mut self, segments: &mut Vec<Segment>) -> Result<bool, Error> {
        match self.peek() {
            Some(ch) if is_ident_start(ch) => {
                segments.push(Segment::Field(self.parse_ident()));
                Ok(true)
            }
            Some('"') => {
                segments.push(Segment::Field(self.parse_string()?));
                Ok(true)
            }
            Some('[') => {
                segments.push(self.parse_bracket()?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn parse_bracket(&mut self) -> Result<Segment, Error> {
        self.pos += 1; // '['
        self.skip_whitespace();
        let segment = match self.peek() {
            Some(']') => Segment::Iterate,
            Some('"') => Segment::Field(self.parse_string()?),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => Segment::Index(self.parse_integer()?),
            _ => return Err(self.error("expected index, string or ']'")),
        };
        self.expect(']')?;
        Ok(segment)
    }

    fn parse_object(&mut self) -> Result<Expr, Error> {
        self.pos += 1; // '{'
        let mut entries = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Expr::Object(entries));
        }

        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some('"') => self.parse_string()?,
                Some(ch) if is_ident_start(ch) => self.parse_ident(),
                _ => return Err(self.error("expected object key")),
            };
            self.skip_whitespace();
            let value = if self.peek() == Some(':') {
                self.pos += 1;
                self.parse_pipeline()?
            } else {
                Expr::Path(vec![Segment::Field(key.clone())])
            };
            entries.push((key, value));

            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some('}') => break,
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
        Ok(Expr::Object(entries))
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        self.pos += 1; // opening quote
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(ch) => text.push(ch),
                    None => return Err(self.error("unterminated string")),
                },
                Some(ch) => text.push(ch),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_integer(&mut self) -> Result<i64, Error> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| self.error(&format!("invalid number '{digits}'")))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn eval(expr: &Expr, input: &Value) -> Result<Vec<Value>, Error> {
    match expr {
        Expr::Literal(value) => Ok(vec![value.clone()]),
        Expr::Path(segments) => {
            let mut stream = vec![input.clone()];
            for segment in segments {
                let mut next = Vec::new();
                for value in &stream {
                    next.extend(apply_segment(segment, value)?);
                }
                stream = next;
            }
            Ok(stream)
        }
        Expr::Pipe(stages) => {
            let mut stream = vec![input.clone()];
            for stage in stages {
                let mut next = Vec::new();
                for value in &stream {
                    next.extend(eval(stage, value)?);
                }
                stream = next;
            }
            Ok(stream)
        }
        Expr::Object(entries) => {
            let mut objects = vec![Map::new()];
            for (key, value_expr) in entries {
                let values = eval(value_expr, input)?;
                let mut expanded = Vec::with_capacity(objects.len() * values.len());
                for object in &objects {
                    for value in &values {
                        let mut object = object.clone();
                        object.insert(key.clone(), value.clone());
                        expanded.push(object);
                    }
                }
                objects = expanded;
            }
            Ok(objects.into_iter().map(Value::Object).collect())
        }
    }
}

fn apply_segment(segment: &Segment, value: &Value) -> Result<Vec<Value>, Error> {
    match (segment, value) {
        (Segment::Field(_) | Segment::Index(_), Value::Null) => Ok(vec![Value::Null]),
        (Segment::Field(name), Value::Object(map)) => {
            Ok(vec![map.get(name).cloned().unwrap_or(Value::Null)])
        }
        (Segment::Index(index), Value::Array(items)) => {
            let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
            let position = if *index < 0 { len + index } else { *index };
            let item = usize::try_from(position)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or(Value::Null);
            Ok(vec![item])
        }
        (Segment::Iterate, Value::Array(items)) => Ok(items.clone()),
        (Segment::Iterate, Value::Object(map)) => Ok(map.values().cloned().collect()),
        (Segment::Field(name), other) => Err(Error::filter_error(format!(
            "cannot index {} with \"{name}\"",
            type_name(other)
        ))),
        (Segment::Index(_), other) => Err(Error::filter_error(format!(
            "cannot index {} with number",
            type_name(other)
        ))),
        (Segment::Iterate, other) => Err(Error::filter_error(format!(
            "cannot iterate over {}",
            type_name(other)
        ))),
    }
}

/// Full jq engine backed by `jaq`.
#[cfg(feature = "jq")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JaqFilter;

#[cfg(feature = "jq")]
impl JsonFilter for JaqFilter {
    fn apply(&self, input: &Value, expression: &str) -> Result<Vec<Value>, Error> {
        use jaq_core::load::{Arena, File, Loader};
        use jaq_core::{Compiler, Ctx, RcIter};
        use jaq_json::Val;

        let program = File {
            code: expression,
            path: (),
        };
        let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = Arena::default();
        let modules = loader.load(&arena, program).map_err(|errs| {
            Error::filter_error(format!("Parse error in jq expression: {errs:?}"))
        })?;
        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(|errs| {
                Error::filter_error(format!("Compile error in jq expression: {errs:?}"))
            })?;

        let inputs = RcIter::new(core::iter::empty());
        let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

        let mut results = Vec::new();
        for output in outputs {
            let val = output
                .map_err(|e| Error::filter_error(format!("Filter execution error: {e}")))?;
            results.push(serde_json::from_str(&val.to_string())?);
        }
        Ok(results)
    }
}
