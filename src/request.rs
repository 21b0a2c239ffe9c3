//! Requests - seed, key and PSBT-signature requests (`crypto-request`).
//!
//! # Layout
//!
//! | Key | Field | Encoding |
//! |-----|-------|----------|
//! | 1 | id | `#6.37(bytes16)` |
//! | 2 | body | `#6.500` seed / `#6.501` key / `#6.502` PSBT signature |
//! | 3 | description | text, omitted when empty |
//!
//! Key request body: `{1: is-private, 2: #6.304(path), 3: #6.305(use-info), 4: is-derivable}`.

use crate::core::tags;
use crate::error::{Error, Result};
use crate::hdkey::KeyType;
use crate::path::DerivationPath;
use crate::use_info::UseInfo;
use crate::wire::{self, MapReader, Transport};
use ciborium::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequestBody {
    digest: [u8; 32],
}

impl SeedRequestBody {
    pub fn new(digest: [u8; 32]) -> Self { Self { digest } }
    pub fn digest(&self) -> &[u8; 32] { &self.digest }

    fn to_tagged_value(&self) -> Value {
        wire::tagged(tags::SEED_REQUEST, wire::map(vec![(1, wire::tagged(tags::SEED_DIGEST, Value::Bytes(self.digest.to_vec())))]))
    }

    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "seed request")?;
        let digest = wire::into_bytes(wire::untag(map.require(1)?, tags::SEED_DIGEST)?, "seed digest")?;
        map.finish()?;
        let digest = digest.try_into().map_err(|d: Vec<u8>| Error::codec(format!("seed digest: expected 32 bytes, got {}", d.len())))?;
        Ok(Self { digest })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRequestBody {
    key_type: KeyType,
    path: DerivationPath,
    use_info: UseInfo,
    is_derivable: bool,
}

impl KeyRequestBody {
    pub fn new(key_type: KeyType, path: DerivationPath, use_info: UseInfo, is_derivable: bool) -> Self {
        Self { key_type, path, use_info, is_derivable }
    }

    pub fn key_type(&self) -> KeyType { self.key_type }
    pub fn path(&self) -> &DerivationPath { &self.path }
    pub fn use_info(&self) -> UseInfo { self.use_info }
    pub fn is_derivable(&self) -> bool { self.is_derivable }

    fn to_tagged_value(&self) -> Value {
        wire::tagged(tags::KEY_REQUEST, wire::map(vec![
            (1, Value::Bool(self.key_type.is_private())),
            (2, self.path.to_tagged_value()),
            (3, self.use_info.to_tagged_value()),
            (4, Value::Bool(self.is_derivable)),
        ]))
    }

    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "key request")?;
        let is_private = wire::as_bool(&map.require(1)?, "key request is-private")?;
        let path = DerivationPath::from_tagged_value(map.require(2)?)?;
        let use_info = UseInfo::from_tagged_value(map.require(3)?)?;
        let is_derivable = wire::as_bool(&map.require(4)?, "key request is-derivable")?;
        map.finish()?;
        let key_type = if is_private { KeyType::Private } else { KeyType::Public };
        Ok(Self { key_type, path, use_info, is_derivable })
    }
}

/// Placeholder payload: PSBT-signature requests carry no fields yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PsbtSignatureRequestBody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Seed(SeedRequestBody),
    Key(KeyRequestBody),
    PsbtSignature(PsbtSignatureRequestBody),
}

impl RequestBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RequestBody::Seed(_) => "seed request",
            RequestBody::Key(_) => "key request",
            RequestBody::PsbtSignature(_) => "PSBT signature request",
        }
    }

    fn to_tagged_value(&self) -> Value {
        match self {
            RequestBody::Seed(body) => body.to_tagged_value(),
            RequestBody::Key(body) => body.to_tagged_value(),
            RequestBody::PsbtSignature(_) => wire::tagged(tags::PSBT_SIGNATURE_REQUEST, Value::Map(vec![])),
        }
    }

    fn from_tagged_value(value: Value) -> Result<Self> {
        let Value::Tag(tag, inner) = value else {
            return Err(Error::codec("request body: expected tagged value"));
        };
        match tag {
            tags::SEED_REQUEST => Ok(RequestBody::Seed(SeedRequestBody::from_cbor_value(*inner)?)),
            tags::KEY_REQUEST => Ok(RequestBody::Key(KeyRequestBody::from_cbor_value(*inner)?)),
            tags::PSBT_SIGNATURE_REQUEST => {
                MapReader::new(*inner, "PSBT signature request")?.finish()?;
                Ok(RequestBody::PsbtSignature(PsbtSignatureRequestBody))
            }
            other => Err(Error::codec(format!("request body: unknown tag {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    id: Uuid,
    description: String,
    body: RequestBody,
}

impl Request {
    pub fn new(body: RequestBody, description: impl Into<String>, id: Uuid) -> Self {
        Self { id, description: description.into(), body }
    }

    /// Request with a fresh random id and no description.
    pub fn with_body(body: RequestBody) -> Self { Self::new(body, "", Uuid::new_v4()) }

    pub fn id(&self) -> Uuid { self.id }
    pub fn description(&self) -> &str { &self.description }
    pub fn body(&self) -> &RequestBody { &self.body }

    pub fn key_request(&self) -> Option<&KeyRequestBody> {
        match &self.body { RequestBody::Key(body) => Some(body), _ => None }
    }

    pub fn seed_request(&self) -> Option<&SeedRequestBody> {
        match &self.body { RequestBody::Seed(body) => Some(body), _ => None }
    }

    pub fn to_cbor_value(&self) -> Value {
        let mut entries = vec![
            (1, wire::tagged(tags::UUID, Value::Bytes(self.id.as_bytes().to_vec()))),
            (2, self.body.to_tagged_value()),
        ];
        if !self.description.is_empty() {
            entries.push((3, Value::Text(self.description.clone())));
        }
        wire::map(entries)
    }

    pub fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "request")?;
        let id = decode_uuid(map.require(1)?)?;
        let body = RequestBody::from_tagged_value(map.require(2)?)?;
        let description = match map.take(3) {
            Some(v) => {
                let text = wire::into_text(v, "request description")?;
                if text.is_empty() {
                    return Err(Error::codec("request description: empty text must be omitted"));
                }
                text
            }
            None => String::new(),
        };
        map.finish()?;
        Ok(Self { id, description, body })
    }

    pub fn encode_cbor(&self) -> Result<Vec<u8>> { wire::to_bytes(&self.to_cbor_value()) }
    pub fn decode_cbor(bytes: &[u8]) -> Result<Self> { Self::from_cbor_value(wire::from_bytes(bytes)?) }

    pub fn to_wire_with(&self, transport: &impl Transport) -> Result<String> {
        Ok(transport.seal(tags::kind::REQUEST, &self.encode_cbor()?))
    }

    pub fn from_wire_with(transport: &impl Transport, text: &str) -> Result<Self> {
        Self::decode_cbor(&transport.open(tags::kind::REQUEST, text)?)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_with(&wire::Base64Transport).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Request {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> { Self::from_wire_with(&wire::Base64Transport, text) }
}

pub(crate) fn decode_uuid(value: Value) -> Result<Uuid> {
    let bytes = wire::into_bytes(wire::untag(value, tags::UUID)?, "id")?;
    Uuid::from_slice(&bytes).map_err(|e| Error::codec(format!("id: {e}")))
}
