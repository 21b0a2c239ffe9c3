//! Transport - turns a CBOR payload into a single self-describing string.
//!
//! The envelope format is a collaborator: request/response objects only
//! decide the CBOR layout and the type name. [`Base64Transport`] is the
//! in-process default: `<kind>:<base64url-nopad(cbor)>`.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine as _};

pub trait Transport {
    /// Wrap `cbor` as a wire string of the given type name.
    fn seal(&self, kind: &str, cbor: &[u8]) -> String;

    /// Unwrap a wire string, requiring the given type name.
    fn open(&self, kind: &str, text: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Transport;

impl Transport for Base64Transport {
    fn seal(&self, kind: &str, cbor: &[u8]) -> String { format!("{kind}:{}", BASE64.encode(cbor)) }

    fn open(&self, kind: &str, text: &str) -> Result<Vec<u8>> {
        let (found, body) = text
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::parse(format!("expected '{kind}:<payload>'")))?;
        if !found.eq_ignore_ascii_case(kind) {
            return Err(Error::validation(format!("expected a {kind}, found a {found}")));
        }
        BASE64.decode(body).map_err(|e| Error::parse(format!("{kind} payload: {e}")))
    }
}
