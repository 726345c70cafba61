//! PHP `serialize()` record handler.
//!
//! The wire format is implemented here directly: scalars are tagged
//! (`N;`, `b:1;`, `i:42;`, `d:3.5;`, `s:5:"hello";`) and arrays carry an
//! entry count plus serialized key/value pairs (`a:1:{s:3:"foo";i:1;}`).
//! String payloads are length-prefixed raw bytes, so no quoting or
//! escaping is involved. Lists are written with integer indices and come
//! back as digit-keyed maps, which output normalization reclassifies as
//! lists again.
//!
//! Before decoding, lines starting with `#` (after leading blanks) are
//! stripped; serialized records stored in files sometimes carry such
//! comment headers.

use crate::codec::{normalize_input, normalize_output, RecordBuilder, RecordHandler, RecordParser};
use crate::error::{Error, Result};
use crate::map::RecordMap;
use crate::value::Value;

const FORMAT: &str = "PHP";

/// The builtin PHP-serialize codec.
///
/// Registered by default under `application/vnd.php.serialized`.
///
/// Comment stripping happens on the raw bytes, before any decoding, so
/// it cannot tell a real comment line from a `\n#` sequence inside a
/// string payload. A record containing such a string builds fine but
/// fails to parse back: the stripped bytes no longer match the string's
/// length prefix. Records with embedded newline-then-`#` strings are
/// outside what this format can round-trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpHandler;

impl RecordBuilder for PhpHandler {
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        let record = normalize_input(data)?;
        let mut out = Vec::new();
        encode_map(&record, &mut out);
        Ok(out)
    }
}

impl RecordParser for PhpHandler {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        let stripped = strip_comment_lines(sequence);
        let mut decoder = Decoder::new(&stripped);
        let value = decoder.parse_value()?;

        let Value::Map(data) = value else {
            return Err(Error::Malformed {
                format: FORMAT,
                detail: format!(
                    "expected an array at the top level, got {}",
                    value.type_name()
                ),
            });
        };

        normalize_output(&data)
    }
}

impl RecordHandler for PhpHandler {}

fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"N;"),
        Value::Bool(true) => out.extend_from_slice(b"b:1;"),
        Value::Bool(false) => out.extend_from_slice(b"b:0;"),
        Value::Integer(i) => {
            out.extend_from_slice(format!("i:{};", i).as_bytes());
        }
        Value::Float(f) => {
            out.extend_from_slice(format!("d:{};", f).as_bytes());
        }
        Value::String(s) => encode_string(s, out),
        Value::List(list) => {
            out.extend_from_slice(format!("a:{}:{{", list.len()).as_bytes());
            for (index, item) in list.iter().enumerate() {
                out.extend_from_slice(format!("i:{};", index).as_bytes());
                encode_value(item, out);
            }
            out.push(b'}');
        }
        Value::Map(map) => encode_map(map, out),
    }
}

fn encode_map(map: &RecordMap, out: &mut Vec<u8>) {
    out.extend_from_slice(format!("a:{}:{{", map.len()).as_bytes());
    for (key, item) in map.iter() {
        encode_string(key, out);
        encode_value(item, out);
    }
    out.push(b'}');
}

fn encode_string(s: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(format!("s:{}:\"", s.len()).as_bytes());
    out.extend_from_slice(s.as_bytes());
    out.extend_from_slice(b"\";");
}

/// Removes lines whose first non-blank character is `#`.
fn strip_comment_lines(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());

    for line in input.split_inclusive(|&b| b == b'\n') {
        let trimmed = line
            .iter()
            .position(|&b| b != b' ' && b != b'\t')
            .map(|start| &line[start..])
            .unwrap_or(&[]);
        if trimmed.first() != Some(&b'#') {
            out.extend_from_slice(line);
        }
    }

    out
}

/// Maximum array nesting the decoder accepts. The decoder recurses per
/// array level, so untrusted input must not control the stack depth.
const MAX_DEPTH: usize = 128;

/// Recursive-descent decoder over a serialized byte sequence.
///
/// Trailing bytes after a complete top-level value are ignored, matching
/// the tolerance of PHP's own `unserialize()`.
struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Decoder {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn fail(&self, detail: impl std::fmt::Display) -> Error {
        Error::Malformed {
            format: FORMAT,
            detail: format!("{} at offset {}", detail, self.pos),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, expected: &[u8]) -> Result<()> {
        let end = self.pos + expected.len();
        if self.input.get(self.pos..end) == Some(expected) {
            self.pos = end;
            Ok(())
        } else {
            Err(self.fail(format!(
                "expected {:?}",
                String::from_utf8_lossy(expected)
            )))
        }
    }

    /// Consumes bytes up to (and including) the delimiter, returning the
    /// bytes before it.
    fn take_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte == delimiter {
                let token = &self.input[start..self.pos];
                self.pos += 1;
                return Ok(token);
            }
            self.pos += 1;
        }
        Err(self.fail(format!("unterminated token, expected {:?}", delimiter as char)))
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b'N') => {
                self.expect(b"N;")?;
                Ok(Value::Null)
            }
            Some(b'b') => {
                self.expect(b"b:")?;
                let flag = self.take_until(b';')?;
                match flag {
                    b"0" => Ok(Value::Bool(false)),
                    b"1" => Ok(Value::Bool(true)),
                    _ => Err(self.fail("invalid boolean")),
                }
            }
            Some(b'i') => {
                self.expect(b"i:")?;
                let token = self.take_until(b';')?;
                let text = std::str::from_utf8(token).map_err(|e| self.fail(e))?;
                let number: i64 = text.parse().map_err(|e| self.fail(e))?;
                Ok(Value::Integer(number))
            }
            Some(b'd') => {
                self.expect(b"d:")?;
                let token = self.take_until(b';')?;
                let text = std::str::from_utf8(token).map_err(|e| self.fail(e))?;
                Ok(Value::Float(parse_float(text).ok_or_else(|| {
                    self.fail("invalid float")
                })?))
            }
            Some(b's') => self.parse_string().map(Value::String),
            Some(b'a') => self.parse_array(),
            Some(other) => Err(self.fail(format!("unknown type tag {:?}", other as char))),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect(b"s:")?;
        let length = self.parse_length()?;
        self.expect(b":\"")?;

        let end = self
            .pos
            .checked_add(length)
            .ok_or_else(|| self.fail("string length out of range"))?;
        let bytes = self
            .input
            .get(self.pos..end)
            .ok_or_else(|| self.fail("string payload truncated"))?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| self.fail(e))?
            .to_string();
        self.pos = end;

        self.expect(b"\";")?;
        Ok(text)
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.fail("nesting too deep"));
        }

        self.expect(b"a:")?;
        let count = self.parse_length()?;
        self.expect(b":{")?;

        // count comes off the wire; do not preallocate from it
        let mut map = RecordMap::new();
        for _ in 0..count {
            let key = match self.peek() {
                Some(b'i') => {
                    self.expect(b"i:")?;
                    let token = self.take_until(b';')?;
                    let text = std::str::from_utf8(token).map_err(|e| self.fail(e))?;
                    let index: i64 = text.parse().map_err(|e| self.fail(e))?;
                    index.to_string()
                }
                Some(b's') => self.parse_string()?,
                _ => return Err(self.fail("invalid array key")),
            };
            let value = self.parse_value()?;
            map.insert(key, value);
        }

        self.expect(b"}")?;
        self.depth -= 1;
        Ok(Value::Map(map))
    }

    fn parse_length(&mut self) -> Result<usize> {
        let token = self.take_until(b':')?;
        // put the delimiter back; callers expect() the ":" themselves
        self.pos -= 1;
        let text = std::str::from_utf8(token).map_err(|e| self.fail(e))?;
        text.parse().map_err(|e| self.fail(e))
    }
}

/// Parses a float token, accepting PHP's uppercase spellings for the
/// special values (`NAN`, `INF`, `-INF`).
fn parse_float(text: &str) -> Option<f64> {
    if text.eq_ignore_ascii_case("nan") {
        Some(f64::NAN)
    } else if text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("infinity") {
        Some(f64::INFINITY)
    } else if text.eq_ignore_ascii_case("-inf") || text.eq_ignore_ascii_case("-infinity") {
        Some(f64::NEG_INFINITY)
    } else {
        text.parse().ok()
    }
}
