//! Seed request / response flow.
//!
//! A seed request names a seed by its SHA-256 digest; the response
//! carries the seed itself and is only produced when the digests agree.

use super::master::MasterCells;
use super::{parse_text, parse_uuid};
use crate::attribute::{Attribute, Graph, Handle};
use crate::core::names::seed_request as names;
use crate::error::{Error, Result};
use crate::hdkey::Seed;
use crate::request::{Request, RequestBody, SeedRequestBody};
use crate::response::{Response, ResponseBody};
use uuid::Uuid;

pub struct SeedRequestCells {
    pub description: Handle<String>,
    pub id: Handle<Uuid>,
    pub request: Handle<Request>,
    pub response: Handle<Response>,
}

pub fn seed_body(request: &Request) -> Result<&SeedRequestBody> {
    match request.body() {
        RequestBody::Seed(body) => Ok(body),
        other @ (RequestBody::Key(_) | RequestBody::PsbtSignature(_)) => {
            Err(Error::validation(format!("expected a seed request, found a {}", other.kind_name())))
        }
    }
}

pub fn response_seed(response: &Response) -> Result<&Seed> {
    match response.body() {
        ResponseBody::Seed(seed) => Ok(seed),
        other @ (ResponseBody::Key(_) | ResponseBody::PsbtSignature(_)) => {
            Err(Error::validation(format!("expected a seed response, found a {}", other.kind_name())))
        }
    }
}

fn parse_seed_request(text: &str) -> Result<Request> {
    let request: Request = text.parse()?;
    seed_body(&request)?;
    Ok(request)
}

fn parse_seed_response(text: &str) -> Result<Response> {
    let response: Response = text.parse()?;
    response_seed(&response)?;
    Ok(response)
}

impl SeedRequestCells {
    pub(super) fn setup(graph: &mut Graph, master: &MasterCells) -> Self {
        let description = graph.register(Attribute::new(
            names::DESCRIPTION,
            "TEXT",
            "An informational note about the seed request.",
            |s: &String| s.clone(),
            parse_text,
        ));
        let id = graph.register(Attribute::new(names::ID, "UUID", "The ID of the seed request and response.", |id: &Uuid| id.to_string(), parse_uuid));
        let request = graph.register(Attribute::new(
            names::REQUEST,
            "REQUEST",
            "A request for the seed with the given digest.",
            |r: &Request| r.to_string(),
            parse_seed_request,
        ));
        let response = graph.register(Attribute::new(
            names::RESPONSE,
            "RESPONSE",
            "A response containing the requested seed.",
            |r: &Response| r.to_string(),
            parse_seed_response,
        ));

        graph.document("seed-request-description <- [seed-request]");
        graph.document("seed-request-description (default: empty)");
        description.derive_from(request.clone(), |request| {
            Ok(Some(request.assigned_value().map(|r| r.description().to_string()).unwrap_or_default()))
        });

        graph.document("seed-request-id <- [seed-request]");
        graph.document("seed-request-id <- [seed-response]");
        graph.document("seed-request-id (default: unique)");
        id.derive_from((request.clone(), response.clone()), |(request, response)| {
            let id = match (request.assigned_value(), response.assigned_value()) {
                (Some(r), _) => r.id(),
                (None, Some(r)) => r.id(),
                (None, None) => Uuid::new_v4(),
            };
            Ok(Some(id))
        });

        graph.document("seed-request <- [seed-digest, seed-request-id, seed-request-description]");
        request.derive_from(
            (master.seed_digest.clone(), id.clone(), description.clone()),
            |(digest, id, description)| {
                let Some(digest) = digest.optional_value()? else {
                    return Ok(None);
                };
                let body = RequestBody::Seed(SeedRequestBody::new(digest));
                Ok(Some(Request::new(body, description.value()?, id.value()?)))
            },
        );

        graph.document("seed-response <- [seed-request, seed]");
        response.derive_from((request.clone(), master.seed.clone()), |(request, seed)| {
            let (Some(request), Some(seed)) = (request.optional_value()?, seed.optional_value()?) else {
                return Ok(None);
            };
            if seed_body(&request)?.digest() != &seed.digest() {
                tracing::warn!("seed-response: seed digest differs from the requested digest");
                return Err(Error::validation("seed does not match request"));
            }
            Ok(Some(Response::new(ResponseBody::Seed(seed), request.id())))
        });

        Self { description, id, request, response }
    }
}
