//! Binary codec for derivation paths (`crypto-keypath`, tag 304).
//!
//! ```text
//! {
//!   1: [index, hardened, index, hardened, ...],   ; always present
//!   2: source-fingerprint,                        ; uint32, optional
//!   3: depth                                      ; uint8, optional
//! }
//! ```

use super::{DerivationPath, DerivationStep};
use crate::core::tags;
use crate::error::{Error, Result};
use crate::wire::{self, MapReader};
use ciborium::Value;

const COMPONENTS: u64 = 1;
const SOURCE_FINGERPRINT: u64 = 2;
const DEPTH: u64 = 3;

impl DerivationPath {
    pub fn to_cbor_value(&self) -> Value {
        let components = self
            .steps
            .iter()
            .flat_map(|s| [wire::uint(s.index()), Value::Bool(s.is_hardened())])
            .collect();
        let mut entries = vec![(COMPONENTS, Value::Array(components))];
        if let Some(fp) = self.source_fingerprint {
            entries.push((SOURCE_FINGERPRINT, wire::uint(fp)));
        }
        if let Some(depth) = self.depth {
            entries.push((DEPTH, wire::uint(depth)));
        }
        wire::map(entries)
    }

    pub fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "keypath")?;
        let components = wire::into_array(map.require(COMPONENTS)?, "keypath components")?;
        if components.len() % 2 != 0 {
            return Err(Error::codec("keypath components: expected index/hardened pairs"));
        }
        let steps = components
            .chunks_exact(2)
            .map(|pair| {
                let index = wire::as_u32(&pair[0], "keypath index")?;
                let hardened = wire::as_bool(&pair[1], "keypath hardened flag")?;
                DerivationStep::new(index, hardened).map_err(|e| Error::codec(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let source_fingerprint = map.take(SOURCE_FINGERPRINT).map(|v| wire::as_u32(&v, "keypath fingerprint")).transpose()?;
        let depth = map
            .take(DEPTH)
            .map(|v| u8::try_from(wire::as_u64(&v, "keypath depth")?).map_err(|_| Error::codec("keypath depth: out of range")))
            .transpose()?;
        map.finish()?;
        Ok(Self { steps, source_fingerprint, depth })
    }

    pub fn to_tagged_value(&self) -> Value { wire::tagged(tags::KEYPATH, self.to_cbor_value()) }

    pub fn from_tagged_value(value: Value) -> Result<Self> { Self::from_cbor_value(wire::untag(value, tags::KEYPATH)?) }

    pub fn encode_cbor(&self) -> Result<Vec<u8>> { wire::to_bytes(&self.to_cbor_value()) }

    pub fn encode_tagged_cbor(&self) -> Result<Vec<u8>> { wire::to_bytes(&self.to_tagged_value()) }

    /// Decode the untagged form. Non-canonical input fails with [`Error::Codec`].
    pub fn decode_cbor(bytes: &[u8]) -> Result<Self> { Self::from_cbor_value(wire::from_bytes(bytes)?) }

    pub fn decode_tagged_cbor(bytes: &[u8]) -> Result<Self> { Self::from_tagged_value(wire::from_bytes(bytes)?) }
}
