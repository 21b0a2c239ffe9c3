//! Wire - canonical CBOR primitives shared by every binary codec.
//!
//! Encoding always goes through [`ciborium`], which emits preferred
//! (shortest) integer and length headers. Decoding is byte-exact: the
//! input is parsed, re-encoded, and rejected unless the two byte
//! strings are identical. Map keys must additionally be unsigned
//! integers in strictly ascending order.
//!
//! ```text
//! bytes ──from_reader──▶ Value ──into_writer──▶ bytes'
//!                          │                      │
//!                          └──── bytes == bytes' ─┘  else Error::Codec
//! ```

pub mod transport;

pub use transport::{Base64Transport, Transport};

use crate::error::{Error, Result};
use ciborium::Value;

/// Serialize a value tree. Output is canonical by construction.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| Error::codec(format!("CBOR serialization failed: {e}")))?;
    Ok(buf)
}

/// Parse a value tree, accepting only its canonical encoding.
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let value: Value = ciborium::from_reader(bytes).map_err(|e| Error::codec(format!("CBOR deserialization failed: {e}")))?;
    if to_bytes(&value)? != bytes {
        return Err(Error::codec("non-canonical CBOR encoding"));
    }
    Ok(value)
}

pub fn uint(n: impl Into<u64>) -> Value { Value::Integer(Into::<u64>::into(n).into()) }

pub fn tagged(tag: u64, value: Value) -> Value { Value::Tag(tag, Box::new(value)) }

/// Build a map from integer keys. Callers pass keys in ascending order.
pub fn map(entries: Vec<(u64, Value)>) -> Value {
    Value::Map(entries.into_iter().map(|(k, v)| (uint(k), v)).collect())
}

/// Strip the expected semantic tag.
pub fn untag(value: Value, tag: u64) -> Result<Value> {
    match value {
        Value::Tag(t, inner) if t == tag => Ok(*inner),
        Value::Tag(t, _) => Err(Error::codec(format!("expected tag {tag}, found tag {t}"))),
        _ => Err(Error::codec(format!("expected tag {tag}"))),
    }
}

pub fn as_u64(value: &Value, field: &str) -> Result<u64> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| Error::codec(format!("{field}: expected unsigned integer"))),
        _ => Err(Error::codec(format!("{field}: expected unsigned integer"))),
    }
}

pub fn as_u32(value: &Value, field: &str) -> Result<u32> {
    u32::try_from(as_u64(value, field)?).map_err(|_| Error::codec(format!("{field}: out of range")))
}

pub fn as_bool(value: &Value, field: &str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(Error::codec(format!("{field}: expected bool"))),
    }
}

pub fn into_bytes(value: Value, field: &str) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(Error::codec(format!("{field}: expected byte string"))),
    }
}

pub fn into_text(value: Value, field: &str) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(Error::codec(format!("{field}: expected text string"))),
    }
}

pub fn into_array(value: Value, field: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(a) => Ok(a),
        _ => Err(Error::codec(format!("{field}: expected array"))),
    }
}

/// Field-by-field reader over an integer-keyed map.
///
/// Every key must be consumed; [`MapReader::finish`] rejects leftovers.
#[derive(Debug)]
pub struct MapReader {
    what: &'static str,
    entries: Vec<(u64, Option<Value>)>,
}

impl MapReader {
    pub fn new(value: Value, what: &'static str) -> Result<Self> {
        let Value::Map(raw) = value else {
            return Err(Error::codec(format!("{what}: expected map")));
        };
        let mut entries: Vec<(u64, Option<Value>)> = Vec::with_capacity(raw.len());
        for (k, v) in raw {
            let key = as_u64(&k, what)?;
            if entries.last().is_some_and(|(prev, _)| *prev >= key) {
                return Err(Error::codec(format!("{what}: map keys not in canonical order")));
            }
            entries.push((key, Some(v)));
        }
        Ok(Self { what, entries })
    }

    pub fn take(&mut self, key: u64) -> Option<Value> {
        self.entries.iter_mut().find(|(k, _)| *k == key).and_then(|(_, v)| v.take())
    }

    pub fn require(&mut self, key: u64) -> Result<Value> {
        let what = self.what;
        self.take(key).ok_or_else(|| Error::codec(format!("{what}: missing key {key}")))
    }

    pub fn finish(self) -> Result<()> {
        match self.entries.iter().find(|(_, v)| v.is_some()) {
            Some((k, _)) => Err(Error::codec(format!("{}: unexpected key {k}", self.what))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_canonical_uint() {
        let value = from_bytes(&[0x18, 0x2c]).unwrap();
        assert_eq!(as_u64(&value, "n").unwrap(), 44);
    }

    #[test]
    fn test_rejects_overlong_uint() {
        // 44 encoded with a two-byte argument instead of one
        let err = from_bytes(&[0x19, 0x00, 0x2c]).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        assert!(from_bytes(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn test_map_reader_rejects_unordered_keys() {
        let value = Value::Map(vec![(uint(2u64), Value::Bool(true)), (uint(1u64), Value::Bool(false))]);
        assert!(MapReader::new(value, "test").is_err());
    }

    #[test]
    fn test_map_reader_rejects_unknown_keys() {
        let mut reader = MapReader::new(map(vec![(1, Value::Bool(true)), (9, Value::Null)]), "test").unwrap();
        assert!(reader.require(1).is_ok());
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_untag_wrong_tag() {
        assert!(untag(tagged(304, Value::Null), 303).is_err());
        assert_eq!(untag(tagged(304, Value::Null), 304).unwrap(), Value::Null);
    }
}
