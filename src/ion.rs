//! Reader for the subset of Ion text used by DynamoDB's Ion export.
//!
//! Supported: structs, lists, s-expressions, short and long strings, identifier and quoted
//! symbols, annotations (dropped), nulls (incl. typed nulls), bools, numbers (kept as text),
//! timestamps (kept as text), blobs/clobs (raw text), and line/block comments.

use crate::error::DecodeError;
use crate::record::{Record, Scalar};
use std::str::CharIndices;

#[derive(Clone, Debug, PartialEq)]
pub enum IonValue {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Symbol(String),
    Timestamp(String),
    Lob(String),
    List(Vec<IonValue>),
    Struct(Vec<(String, IonValue)>),
}

impl IonValue {
    /// First field named `name` when this is a struct.
    pub fn field(&self, name: &str) -> Option<&IonValue> {
        match self {
            IonValue::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            IonValue::Null => Some(Scalar::Null),
            IonValue::Bool(b) => Some(Scalar::Bool(*b)),
            IonValue::Number(n) => Some(Scalar::Number(n.clone())),
            IonValue::String(s) | IonValue::Symbol(s) | IonValue::Timestamp(s) | IonValue::Lob(s) => {
                Some(Scalar::String(s.clone()))
            }
            IonValue::List(_) | IonValue::Struct(_) => None,
        }
    }

    /// Flatten a struct's scalar fields into a record.
    pub fn to_record(&self) -> Option<Record> {
        let IonValue::Struct(fields) = self else { return None };
        let mut rec = Record::new();
        for (k, v) in fields {
            if let Some(s) = v.to_scalar() {
                rec.insert(k.clone(), s);
            }
        }
        Some(rec)
    }
}

/// Parse every top-level value in `text`.
pub fn parse_values(text: &str) -> Result<Vec<IonValue>, DecodeError> {
    let mut p = Parser { src: text, pos: 0 };
    let mut out = Vec::new();
    loop {
        p.skip_ws()?;
        if p.eof() {
            break;
        }
        out.push(p.value()?);
    }
    Ok(out)
}

const OPERATOR_CHARS: &str = "!#%&*+-./;<=>?@^`|~";

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn err(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::Ion { offset: self.pos, reason: reason.into() }
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + n).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn expect(&mut self, c: u8) -> Result<(), DecodeError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(format!("expected `{}`", c as char)))
        }
    }

    fn skip_ws(&mut self) -> Result<(), DecodeError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    match self.src[self.pos..].find('\n') {
                        Some(i) => self.pos += i + 1,
                        None => self.pos = self.src.len(),
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => match self.src[self.pos + 2..].find("*/") {
                    Some(i) => self.pos += i + 4,
                    None => return Err(self.err("unterminated block comment")),
                },
                _ => return Ok(()),
            }
        }
    }

    fn value(&mut self) -> Result<IonValue, DecodeError> {
        while self.try_annotation()? {}
        self.skip_ws()?;
        match self.peek() {
            None => Err(self.err("unexpected end of input")),
            Some(b'{') if self.peek_at(1) == Some(b'{') => self.lob(),
            Some(b'{') => self.structure(),
            Some(b'[') => self.list(),
            Some(b'(') => self.sexp(),
            Some(b'"') => Ok(IonValue::String(self.quoted(b'"')?)),
            Some(b'\'') if self.starts_with("'''") => Ok(IonValue::String(self.long_string()?)),
            Some(b'\'') => Ok(IonValue::Symbol(self.quoted(b'\'')?)),
            Some(c) if is_ident_start(c) => self.keyword_or_symbol(),
            Some(b'+') if self.starts_with("+inf") => {
                self.pos += 4;
                Ok(IonValue::Number("+inf".into()))
            }
            Some(b'-') if self.starts_with("-inf") => {
                self.pos += 4;
                Ok(IonValue::Number("-inf".into()))
            }
            Some(c) if c.is_ascii_digit() || c == b'-' => self.number_or_timestamp(),
            Some(c) => Err(self.err(format!("unexpected character `{}`", c as char))),
        }
    }

    /// Consume `name::` if present; otherwise leave the position untouched.
    fn try_annotation(&mut self) -> Result<bool, DecodeError> {
        self.skip_ws()?;
        let save = self.pos;
        match self.peek() {
            Some(c) if is_ident_start(c) => {
                self.ident();
            }
            Some(b'\'') if !self.starts_with("'''") => {
                self.quoted(b'\'')?;
            }
            _ => return Ok(false),
        }
        self.skip_ws()?;
        if self.starts_with("::") {
            self.pos += 2;
            Ok(true)
        } else {
            self.pos = save;
            Ok(false)
        }
    }

    fn ident(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn keyword_or_symbol(&mut self) -> Result<IonValue, DecodeError> {
        let word = self.ident();
        Ok(match word {
            "null" => {
                // typed null: null.string, null.struct, ...
                if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(c) if is_ident_start(c)) {
                    self.pos += 1;
                    self.ident();
                }
                IonValue::Null
            }
            "true" => IonValue::Bool(true),
            "false" => IonValue::Bool(false),
            "nan" => IonValue::Number("nan".into()),
            other => IonValue::Symbol(other.to_string()),
        })
    }

    fn number_or_timestamp(&mut self) -> Result<IonValue, DecodeError> {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || b"._+-:".contains(&c)) {
            self.pos += 1;
        }
        let token = &src[start..self.pos];
        let unsigned = token.strip_prefix('-').unwrap_or(token);
        if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
            self.pos = start;
            return Err(self.err(format!("malformed number `{}`", token)));
        }
        let bytes = token.as_bytes();
        let looks_like_date = bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && (bytes[4] == b'-' || bytes[4] == b'T');
        if looks_like_date {
            return Ok(IonValue::Timestamp(token.to_string()));
        }
        Ok(IonValue::Number(token.replace('_', "")))
    }

    fn quoted(&mut self, quote: u8) -> Result<String, DecodeError> {
        self.expect(quote)?;
        let src = self.src;
        let mut out = String::new();
        let mut chars = src[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                c if c as u32 == quote as u32 => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => self.escape(&mut chars, &mut out)?,
                '\n' if quote == b'"' => return Err(self.err("newline in string")),
                other => out.push(other),
            }
        }
        Err(self.err("unterminated string"))
    }

    /// Decode the escape following a backslash. Short and long strings share these rules.
    fn escape(&self, chars: &mut CharIndices<'_>, out: &mut String) -> Result<(), DecodeError> {
        let (_, esc) = chars.next().ok_or_else(|| self.err("unterminated escape"))?;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\n' => {}
            'x' | 'u' | 'U' => {
                let width = match esc { 'x' => 2, 'u' => 4, _ => 8 };
                let mut code = 0u32;
                for _ in 0..width {
                    let (_, h) = chars.next().ok_or_else(|| self.err("truncated escape"))?;
                    let d = h.to_digit(16).ok_or_else(|| self.err("bad hex escape"))?;
                    code = code * 16 + d;
                }
                out.push(char::from_u32(code).ok_or_else(|| self.err("invalid code point"))?);
            }
            other => out.push(other),
        }
        Ok(())
    }

    /// One or more adjacent `'''...'''` segments, concatenated.
    fn long_string(&mut self) -> Result<String, DecodeError> {
        let src = self.src;
        let mut out = String::new();
        while self.starts_with("'''") {
            self.pos += 3;
            let end = src[self.pos..].find("'''").ok_or_else(|| self.err("unterminated long string"))?;
            let mut chars = src[self.pos..self.pos + end].char_indices();
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => self.escape(&mut chars, &mut out)?,
                    other => out.push(other),
                }
            }
            self.pos += end + 3;
            let save = self.pos;
            self.skip_ws()?;
            if !self.starts_with("'''") {
                self.pos = save;
            }
        }
        Ok(out)
    }

    fn lob(&mut self) -> Result<IonValue, DecodeError> {
        self.pos += 2;
        let end = self.src[self.pos..].find("}}").ok_or_else(|| self.err("unterminated lob"))?;
        let inner = self.src[self.pos..self.pos + end].trim().to_string();
        self.pos += end + 2;
        Ok(IonValue::Lob(inner))
    }

    fn field_name(&mut self) -> Result<String, DecodeError> {
        match self.peek() {
            Some(b'"') => self.quoted(b'"'),
            Some(b'\'') if self.starts_with("'''") => self.long_string(),
            Some(b'\'') => self.quoted(b'\''),
            Some(c) if is_ident_start(c) => Ok(self.ident().to_string()),
            _ => Err(self.err("expected field name")),
        }
    }

    fn structure(&mut self) -> Result<IonValue, DecodeError> {
        self.expect(b'{')?;
        let mut fields = Vec::new();
        loop {
            self.skip_ws()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(IonValue::Struct(fields));
            }
            let name = self.field_name()?;
            self.skip_ws()?;
            self.expect(b':')?;
            let value = self.value()?;
            fields.push((name, value));
            self.skip_ws()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                _ => return Err(self.err("expected `,` or `}` in struct")),
            }
        }
    }

    fn list(&mut self) -> Result<IonValue, DecodeError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws()?;
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(IonValue::List(items));
            }
            items.push(self.value()?);
            self.skip_ws()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {}
                _ => return Err(self.err("expected `,` or `]` in list")),
            }
        }
    }

    fn sexp(&mut self) -> Result<IonValue, DecodeError> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws()?;
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Ok(IonValue::List(items));
                }
                Some(c) if OPERATOR_CHARS.as_bytes().contains(&c) && !self.starts_operand() => {
                    let start = self.pos;
                    while matches!(self.peek(), Some(c) if OPERATOR_CHARS.as_bytes().contains(&c)) {
                        self.pos += 1;
                    }
                    items.push(IonValue::Symbol(self.src[start..self.pos].to_string()));
                }
                _ => items.push(self.value()?),
            }
        }
    }

    /// Inside an s-expression, `-` may start a number and `/` a comment.
    fn starts_operand(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(b'-'), Some(d)) if d.is_ascii_digit() => true,
            (Some(b'/'), Some(b'/')) | (Some(b'/'), Some(b'*')) => true,
            _ => self.starts_with("+inf") || self.starts_with("-inf"),
        }
    }
}
