//! PHP `serialize()` / `unserialize()` bridge.
//!
//! Grammar handled:
//!
//! ```text
//! N;                       null
//! b:0; | b:1;              bool
//! i:<int>;                 integer
//! d:<float>;               float
//! s:<bytes>:"<raw>";       string, length counted in bytes
//! a:<n>:{<key><value>...}  array, keys are i: or s: values
//! O:<len>:"<class>":<n>:{<key><value>...}   object, decoded without its class
//! ```
//!
//! JSON arrays serialize as PHP lists (`0..n` integer keys) and JSON objects
//! as associative arrays with string keys. On the way back, an array whose
//! keys are exactly `0..n` in order becomes a JSON array; anything else
//! becomes an object with stringified keys.

use std::fmt::Write as _;

use serde_json::{Map, Number, Value};

use super::{SerializeError, Serializer};

#[derive(Debug, Clone, Copy, Default)]
pub struct PhpSerializer;

impl Serializer for PhpSerializer {
    fn serialize(&self, value: &Value) -> Result<String, SerializeError> {
        let mut out = String::new();
        write_value(&mut out, value);
        Ok(out)
    }

    fn unserialize(&self, data: &str) -> Result<Value, SerializeError> {
        Parser::new(data.as_bytes()).parse_document()
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => {
            let _ = write!(out, "b:{};", u8::from(*b));
        }
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            let _ = write!(out, "a:{}:{{", items.len());
            for (i, item) in items.iter().enumerate() {
                let _ = write!(out, "i:{i};");
                write_value(out, item);
            }
            out.push('}');
        }
        Value::Object(map) => {
            let _ = write!(out, "a:{}:{{", map.len());
            for (key, item) in map {
                write_string(out, key);
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "i:{i};");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "i:{u};");
    } else if let Some(f) = n.as_f64() {
        let _ = write!(out, "d:{f};");
    }
}

fn write_string(out: &mut String, s: &str) {
    let _ = write!(out, "s:{}:\"{s}\";", s.len());
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

enum Key {
    Int(i64),
    Str(String),
}

/// Deepest array/object nesting accepted before the input is rejected.
const MAX_DEPTH: usize = 512;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn parse_document(mut self) -> Result<Value, SerializeError> {
        let value = self.parse_value()?;
        if self.pos != self.input.len() {
            return Err(self.error("trailing data after value"));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value, SerializeError> {
        match self.next()? {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                let flag = match self.next()? {
                    b'0' => false,
                    b'1' => true,
                    _ => return Err(self.error("bool must be 0 or 1")),
                };
                self.expect(b';')?;
                Ok(Value::Bool(flag))
            }
            b'i' => {
                self.expect(b':')?;
                Ok(Value::from(self.integer_until(b';')?))
            }
            b'd' => {
                self.expect(b':')?;
                let text = self.text_until(b';')?;
                let f: f64 = text
                    .parse()
                    .map_err(|_| self.error("invalid float"))?;
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| SerializeError::Unsupported(format!("non-finite float {text}")))
            }
            b's' => {
                self.expect(b':')?;
                Ok(Value::String(self.string_body()?))
            }
            b'a' => {
                self.expect(b':')?;
                self.array_body()
            }
            b'O' => {
                self.expect(b':')?;
                // Class name is dropped.
                self.string_literal(b':')?;
                self.array_body()
            }
            _ => Err(self.error("unknown type tag")),
        }
    }

    fn parse_key(&mut self) -> Result<Key, SerializeError> {
        match self.next()? {
            b'i' => {
                self.expect(b':')?;
                Ok(Key::Int(self.integer_until(b';')?))
            }
            b's' => {
                self.expect(b':')?;
                Ok(Key::Str(self.string_body()?))
            }
            _ => Err(self.error("array key must be an integer or string")),
        }
    }

    /// `<n>:{<key><value>...}` after the `a:` tag.
    fn array_body(&mut self) -> Result<Value, SerializeError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let count = self.length_until(b':')?;
        self.expect(b'{')?;
        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = self.parse_key()?;
            let value = self.parse_value()?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        self.depth -= 1;
        Ok(into_json(entries))
    }

    /// `<len>:"<raw>";` after the `s:` tag.
    fn string_body(&mut self) -> Result<String, SerializeError> {
        let s = self.string_literal(b';')?;
        Ok(s)
    }

    /// `<len>:"<raw>"` followed by `terminator`.
    fn string_literal(&mut self, terminator: u8) -> Result<String, SerializeError> {
        let len = self.length_until(b':')?;
        self.expect(b'"')?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| self.error("string length exceeds input"))?;
        let raw = &self.input[self.pos..end];
        let s = std::str::from_utf8(raw)
            .map_err(|_| self.error("string is not valid UTF-8"))?
            .to_owned();
        self.pos = end;
        self.expect(b'"')?;
        self.expect(terminator)?;
        Ok(s)
    }

    fn integer_until(&mut self, terminator: u8) -> Result<i64, SerializeError> {
        let text = self.text_until(terminator)?;
        text.parse().map_err(|_| self.error("invalid integer"))
    }

    fn length_until(&mut self, terminator: u8) -> Result<usize, SerializeError> {
        let text = self.text_until(terminator)?;
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error("invalid length"));
        }
        text.parse().map_err(|_| self.error("invalid length"))
    }

    /// Consume bytes up to and including `terminator`, returning the text before it.
    fn text_until(&mut self, terminator: u8) -> Result<&'a str, SerializeError> {
        let input = self.input;
        let start = self.pos;
        let rel = input[start..]
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| self.error("unterminated token"))?;
        self.pos = start + rel + 1;
        std::str::from_utf8(&input[start..start + rel]).map_err(|_| self.error("invalid token"))
    }

    fn next(&mut self) -> Result<u8, SerializeError> {
        let b = *self
            .input
            .get(self.pos)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, want: u8) -> Result<(), SerializeError> {
        if self.next()? != want {
            return Err(SerializeError::Malformed {
                offset: self.pos - 1,
                reason: format!("expected '{}'", want as char),
            });
        }
        Ok(())
    }

    fn error(&self, reason: &str) -> SerializeError {
        SerializeError::Malformed {
            offset: self.pos,
            reason: reason.into(),
        }
    }
}

fn into_json(entries: Vec<(Key, Value)>) -> Value {
    let is_list = entries
        .iter()
        .enumerate()
        .all(|(i, (key, _))| matches!(key, Key::Int(k) if usize::try_from(*k) == Ok(i)));
    if is_list {
        return Value::Array(entries.into_iter().map(|(_, v)| v).collect());
    }
    let mut map = Map::with_capacity(entries.len());
    for (key, value) in entries {
        let key = match key {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s,
        };
        map.insert(key, value);
    }
    Value::Object(map)
}
