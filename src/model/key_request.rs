//! Key request / response flow.
//!
//! ```text
//! full-address-derivation-path ─┐
//! key-request-type ─────────────┤
//! key-request-id ───────────────┼──▶ key-request ──┐
//! key-request-description ──────┤                  ├──▶ key-response ──▶ derived-key ──▶ derived-key-base58
//! asset, network, is-derivable ─┘     source-key ──┘
//! ```
//!
//! The description, type, id and path cells read only the *assigned*
//! request (and response), never their derived values, so the graph
//! stays acyclic at evaluation time.

use super::derivation::PathCells;
use super::master::MasterCells;
use super::{parse_text, parse_uuid};
use crate::attribute::{Attribute, Graph, Handle};
use crate::core::names::key_request as names;
use crate::core::names::{DERIVED_KEY, DERIVED_KEY_BASE58, SOURCE_KEY};
use crate::error::{Error, Result};
use crate::hdkey::{HdKey, KeyType};
use crate::path::DerivationPath;
use crate::request::{KeyRequestBody, Request, RequestBody};
use crate::response::{Response, ResponseBody};
use crate::use_info::UseInfo;
use uuid::Uuid;

pub struct KeyRequestCells {
    pub description: Handle<String>,
    pub key_type: Handle<KeyType>,
    pub id: Handle<Uuid>,
    pub source_key: Handle<HdKey>,
    pub derivation_path: Handle<DerivationPath>,
    pub request: Handle<Request>,
    pub response: Handle<Response>,
    pub derived_key: Handle<HdKey>,
    pub derived_key_base58: Handle<HdKey>,
}

/// The key payload of `request`, or a validation error naming what was found instead.
pub fn key_body(request: &Request) -> Result<&KeyRequestBody> {
    match request.body() {
        RequestBody::Key(body) => Ok(body),
        other @ (RequestBody::Seed(_) | RequestBody::PsbtSignature(_)) => {
            Err(Error::validation(format!("expected a key request, found a {}", other.kind_name())))
        }
    }
}

/// The derived key carried by `response`.
pub fn response_key(response: &Response) -> Result<&HdKey> {
    match response.body() {
        ResponseBody::Key(key) => Ok(key),
        other @ (ResponseBody::Seed(_) | ResponseBody::PsbtSignature(_)) => {
            Err(Error::validation(format!("expected a key response, found a {}", other.kind_name())))
        }
    }
}

fn parse_key_request(text: &str) -> Result<Request> {
    let request: Request = text.parse()?;
    key_body(&request)?;
    Ok(request)
}

fn parse_key_response(text: &str) -> Result<Response> {
    let response: Response = text.parse()?;
    response_key(&response)?;
    Ok(response)
}

impl KeyRequestCells {
    pub(super) fn setup(graph: &mut Graph, master: &MasterCells, paths: &PathCells) -> Self {
        let description = graph.register(Attribute::new(
            names::DESCRIPTION,
            "TEXT",
            "An informational note about the request.",
            |s: &String| s.clone(),
            parse_text,
        ));
        let key_type: Handle<KeyType> = graph.register(Attribute::textual(names::TYPE, "ENUM private | public", "The type of key to be derived."));
        let id = graph.register(Attribute::new(names::ID, "UUID", "The ID of the request and response.", |id: &Uuid| id.to_string(), parse_uuid));
        let source_key: Handle<HdKey> = graph.register(Attribute::textual(SOURCE_KEY, "HDKEY", "The BIP-32 HD key from which to derive another."));
        let derivation_path: Handle<DerivationPath> =
            graph.register(Attribute::textual(names::DERIVATION_PATH, "BIP32_PATH", "The requested derivation steps."));
        let request = graph.register(Attribute::new(
            names::REQUEST,
            "REQUEST",
            "A request for a key with the given derivation.",
            |r: &Request| r.to_string(),
            parse_key_request,
        ));
        let response = graph.register(Attribute::new(
            names::RESPONSE,
            "RESPONSE",
            "A response containing the requested key.",
            |r: &Response| r.to_string(),
            parse_key_response,
        ));
        let derived_key: Handle<HdKey> = graph.register(Attribute::textual(DERIVED_KEY, "HDKEY", "The derived key."));
        let derived_key_base58 = graph.register(Attribute::output_only(
            DERIVED_KEY_BASE58,
            "BASE58",
            "The derived key in Base58 format.",
            |k: &HdKey| k.to_base58(),
        ));

        graph.document("key-request-description <- [key-request]");
        graph.document("key-request-description (default: empty)");
        description.derive_from(request.clone(), |request| {
            Ok(Some(request.assigned_value().map(|r| r.description().to_string()).unwrap_or_default()))
        });

        graph.document("key-request-type <- [key-request]");
        graph.document("key-request-type (default: private)");
        key_type.derive_from(request.clone(), |request| match request.assigned_value() {
            Some(r) => Ok(Some(key_body(&r)?.key_type())),
            None => Ok(Some(KeyType::Private)),
        });

        graph.document("key-request-id <- [key-request]");
        graph.document("key-request-id <- [key-response]");
        graph.document("key-request-id (default: unique)");
        id.derive_from((request.clone(), response.clone()), |(request, response)| {
            let id = match (request.assigned_value(), response.assigned_value()) {
                (Some(r), _) => r.id(),
                (None, Some(r)) => r.id(),
                (None, None) => Uuid::new_v4(),
            };
            Ok(Some(id))
        });

        graph.document("source-key <- [master-key]");
        source_key.derive_from(master.master_key.clone(), |master_key| master_key.optional_value());

        graph.document("key-request-derivation-path <- [key-request]");
        graph.document("key-request-derivation-path <- [full-address-derivation-path]");
        derivation_path.derive_from((request.clone(), paths.full_address.clone()), |(request, full_address)| {
            match request.assigned_value() {
                Some(r) => Ok(Some(key_body(&r)?.path().clone())),
                None => full_address.optional_value(),
            }
        });

        graph.document(
            "key-request <- [key-request-derivation-path, key-request-type, key-request-id, key-request-description, asset, network, is-derivable]",
        );
        request.derive_from(
            (
                derivation_path.clone(),
                key_type.clone(),
                id.clone(),
                description.clone(),
                master.asset.clone(),
                master.network.clone(),
                master.is_derivable.clone(),
            ),
            |(path, key_type, id, description, asset, network, is_derivable)| {
                let Some(path) = path.optional_value()? else {
                    return Ok(None);
                };
                let use_info = UseInfo::new(asset.value()?, network.value()?);
                let body = KeyRequestBody::new(key_type.value()?, path, use_info, is_derivable.value()?);
                Ok(Some(Request::new(RequestBody::Key(body), description.value()?, id.value()?)))
            },
        );

        graph.document("key-response <- [key-request, source-key]");
        response.derive_from((request.clone(), source_key.clone()), |(request, source_key)| {
            let (Some(request), Some(source_key)) = (request.optional_value()?, source_key.optional_value()?) else {
                return Ok(None);
            };
            let body = key_body(&request)?;
            if let Some(fingerprint) = body.path().source_fingerprint() {
                if fingerprint != source_key.fingerprint() {
                    tracing::warn!(
                        "key-response: request fingerprint {:08x} differs from source key {:08x}",
                        fingerprint,
                        source_key.fingerprint()
                    );
                    return Err(Error::validation("source key does not match request"));
                }
            }
            let derived = source_key.derive(body.key_type(), body.path(), body.is_derivable())?;
            Ok(Some(Response::new(ResponseBody::Key(derived), request.id())))
        });

        graph.document("derived-key <- [key-response]");
        derived_key.derive_from(response.clone(), |response| {
            response.optional_value()?.map(|r| response_key(&r).cloned()).transpose()
        });

        graph.document("derived-key-base58 <- [derived-key]");
        derived_key_base58.derive_from(derived_key.clone(), |derived_key| derived_key.optional_value());

        Self { description, key_type, id, source_key, derivation_path, request, response, derived_key, derived_key_base58 }
    }
}
