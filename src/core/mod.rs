//! Shared constants: attribute names and CBOR tags.

pub mod names;
pub mod tags;
