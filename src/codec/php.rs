//! Decoder for PHP `serialize()` output.
//!
//! Maps the serialized value model onto JSON: arrays with keys `0..n` in order
//! become JSON arrays, every other array and every object becomes a JSON object
//! with string keys. Non-finite floats become `null` since JSON cannot carry them.
//! String lengths are byte counts; bytes that are not UTF-8 are replaced with
//! U+FFFD after the string has been sliced out.

use super::Payload;
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Number, Value};

const MAX_DEPTH: usize = 256;

/// Decode a complete serialized value. Trailing input is rejected.
pub fn from_str(input: &str) -> Result<Payload> {
    from_slice(input.as_bytes())
}

pub fn from_slice(input: &[u8]) -> Result<Payload> {
    let mut parser = Parser { input, pos: 0 };
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos != input.len() {
        return Err(parser.error("trailing characters after value"));
    }
    Ok(value)
}

enum ArrayKey {
    Int(i64),
    Str(String),
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        let tag = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        match tag {
            b'N' => {
                self.expect(b"N;")?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b"b:")?;
                let raw = self.read_until(b';')?;
                match raw {
                    b"0" => Ok(Value::Bool(false)),
                    b"1" => Ok(Value::Bool(true)),
                    _ => Err(self.error("invalid boolean")),
                }
            }
            b'i' => {
                self.expect(b"i:")?;
                let n = self.read_int(b';')?;
                Ok(Value::Number(n.into()))
            }
            b'd' => {
                self.expect(b"d:")?;
                self.parse_float()
            }
            b's' => {
                self.expect(b"s:")?;
                Ok(Value::String(self.parse_string_body()?))
            }
            b'a' => {
                self.expect(b"a:")?;
                let count = self.read_len(b':')?;
                self.expect(b"{")?;
                let entries = self.parse_entries(count, depth)?;
                self.expect(b"}")?;
                Ok(array_to_json(entries))
            }
            b'O' => {
                self.expect(b"O:")?;
                let name_len = self.read_len(b':')?;
                self.expect(b"\"")?;
                self.take(name_len)?;
                self.expect(b"\":")?;
                let count = self.read_len(b':')?;
                self.expect(b"{")?;
                let entries = self.parse_entries(count, depth)?;
                self.expect(b"}")?;
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(property_name(key), value);
                }
                Ok(Value::Object(map))
            }
            b'r' | b'R' => Err(self.error("references are not supported")),
            b'C' => Err(self.error("custom-serialized objects are not supported")),
            other => Err(self.error(format!("unknown type tag '{}'", other as char))),
        }
    }

    fn parse_entries(&mut self, count: usize, depth: usize) -> Result<Vec<(ArrayKey, Value)>> {
        // Bound the preallocation by what the input could possibly hold.
        let mut entries = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            let key = match self.peek() {
                Some(b'i') => {
                    self.expect(b"i:")?;
                    ArrayKey::Int(self.read_int(b';')?)
                }
                Some(b's') => {
                    self.expect(b"s:")?;
                    ArrayKey::Str(self.parse_string_body()?)
                }
                _ => return Err(self.error("array key must be an integer or string")),
            };
            let value = self.parse_value(depth + 1)?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// `<len>:"<bytes>";` after the `s:` tag.
    fn parse_string_body(&mut self) -> Result<String> {
        let len = self.read_len(b':')?;
        self.expect(b"\"")?;
        let bytes = self.take(len)?;
        self.expect(b"\";")?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn parse_float(&mut self) -> Result<Value> {
        let raw = self.read_until(b';')?;
        let text = std::str::from_utf8(raw).map_err(|_| self.error("invalid float"))?;
        match text {
            "INF" | "-INF" | "NAN" => Ok(Value::Null),
            _ => {
                let f: f64 = text.parse().map_err(|_| self.error("invalid float"))?;
                Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
            }
        }
    }

    fn read_int(&mut self, terminator: u8) -> Result<i64> {
        let raw = self.read_until(terminator)?;
        std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| self.error("invalid integer"))
    }

    fn read_len(&mut self, terminator: u8) -> Result<usize> {
        let raw = self.read_until(terminator)?;
        std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| self.error("invalid length"))
    }

    /// Consume up to and including `terminator`, returning the bytes before it.
    fn read_until(&mut self, terminator: u8) -> Result<&'a [u8]> {
        let input = self.input;
        let rest = &input[self.pos..];
        let idx = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| self.error(format!("expected '{}'", terminator as char)))?;
        self.pos += idx + 1;
        Ok(&rest[..idx])
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(self.error("string length exceeds input"));
        }
        let input = self.input;
        let bytes = &input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn expect(&mut self, token: &[u8]) -> Result<()> {
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", String::from_utf8_lossy(token))))
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\r' | b'\t')) {
            self.pos += 1;
        }
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::decode_with_context(
            msg,
            ErrorContext::new()
                .with_details(format!("offset {}", self.pos))
                .with_source("php_decoder"),
        )
    }
}

fn array_to_json(entries: Vec<(ArrayKey, Value)>) -> Value {
    let is_list = entries
        .iter()
        .enumerate()
        .all(|(i, (key, _))| matches!(key, ArrayKey::Int(n) if *n == i as i64));
    if is_list {
        return Value::Array(entries.into_iter().map(|(_, v)| v).collect());
    }
    let mut map = Map::with_capacity(entries.len());
    for (key, value) in entries {
        let key = match key {
            ArrayKey::Int(n) => n.to_string(),
            ArrayKey::Str(s) => s,
        };
        map.insert(key, value);
    }
    Value::Object(map)
}

/// Protected and private members are serialized as `\0*\0name` and `\0Class\0name`.
fn property_name(key: ArrayKey) -> String {
    match key {
        ArrayKey::Int(n) => n.to_string(),
        ArrayKey::Str(s) => match s.rfind('\0') {
            Some(idx) => s[idx + 1..].to_string(),
            None => s,
        },
    }
}
