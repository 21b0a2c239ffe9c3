//! Responses - answers to requests (`crypto-response`).
//!
//! `{1: #6.37(uuid), 2: body}` where body is one of:
//!
//! | Tag | Body |
//! |-----|------|
//! | 300 | seed `{1: bytes}` |
//! | 303 | hdkey |
//! | 310 | signed PSBT bytes |

use crate::core::tags;
use crate::error::{Error, Result};
use crate::hdkey::{HdKey, Seed};
use crate::request::decode_uuid;
use crate::wire::{self, MapReader, Transport};
use ciborium::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Seed(Seed),
    Key(HdKey),
    PsbtSignature(Vec<u8>),
}

impl ResponseBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResponseBody::Seed(_) => "seed response",
            ResponseBody::Key(_) => "key response",
            ResponseBody::PsbtSignature(_) => "PSBT signature response",
        }
    }

    fn to_tagged_value(&self) -> Value {
        match self {
            ResponseBody::Seed(seed) => {
                wire::tagged(tags::SEED, wire::map(vec![(1, Value::Bytes(seed.as_bytes().to_vec()))]))
            }
            ResponseBody::Key(key) => key.to_tagged_value(),
            ResponseBody::PsbtSignature(psbt) => wire::tagged(tags::PSBT, Value::Bytes(psbt.clone())),
        }
    }

    fn from_tagged_value(value: Value) -> Result<Self> {
        let Value::Tag(tag, inner) = value else {
            return Err(Error::codec("response body: expected tagged value"));
        };
        match tag {
            tags::SEED => {
                let mut map = MapReader::new(*inner, "seed")?;
                let bytes = wire::into_bytes(map.require(1)?, "seed bytes")?;
                map.finish()?;
                Ok(ResponseBody::Seed(Seed::new(bytes).map_err(|e| Error::codec(e.to_string()))?))
            }
            tags::HDKEY => Ok(ResponseBody::Key(HdKey::from_cbor_value(*inner)?)),
            tags::PSBT => Ok(ResponseBody::PsbtSignature(wire::into_bytes(*inner, "psbt")?)),
            other => Err(Error::codec(format!("response body: unknown tag {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    id: Uuid,
    body: ResponseBody,
}

impl Response {
    pub fn new(body: ResponseBody, id: Uuid) -> Self { Self { id, body } }

    pub fn id(&self) -> Uuid { self.id }
    pub fn body(&self) -> &ResponseBody { &self.body }

    pub fn key(&self) -> Option<&HdKey> {
        match &self.body { ResponseBody::Key(key) => Some(key), _ => None }
    }

    pub fn seed(&self) -> Option<&Seed> {
        match &self.body { ResponseBody::Seed(seed) => Some(seed), _ => None }
    }

    pub fn to_cbor_value(&self) -> Value {
        wire::map(vec![
            (1, wire::tagged(tags::UUID, Value::Bytes(self.id.as_bytes().to_vec()))),
            (2, self.body.to_tagged_value()),
        ])
    }

    pub fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "response")?;
        let id = decode_uuid(map.require(1)?)?;
        let body = ResponseBody::from_tagged_value(map.require(2)?)?;
        map.finish()?;
        Ok(Self { id, body })
    }

    pub fn encode_cbor(&self) -> Result<Vec<u8>> { wire::to_bytes(&self.to_cbor_value()) }
    pub fn decode_cbor(bytes: &[u8]) -> Result<Self> { Self::from_cbor_value(wire::from_bytes(bytes)?) }

    pub fn to_wire_with(&self, transport: &impl Transport) -> Result<String> {
        Ok(transport.seal(tags::kind::RESPONSE, &self.encode_cbor()?))
    }

    pub fn from_wire_with(transport: &impl Transport, text: &str) -> Result<Self> {
        Self::decode_cbor(&transport.open(tags::kind::RESPONSE, text)?)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_with(&wire::Base64Transport).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Response {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> { Self::from_wire_with(&wire::Base64Transport, text) }
}
