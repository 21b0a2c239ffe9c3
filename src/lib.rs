//! hdkey-model: BIP-32 key requests and responses built from a lazy attribute graph.
//!
//! # Architecture
//!
//! ```text
//! Model (entry point)
//!   │
//!   ├── Graph ── owns every Attribute<T> cell
//!   │     └── rules pull from declared Inputs, memoised per cell
//!   │
//!   ├── DerivationPath ── text grammar + canonical CBOR (tag 304)
//!   │
//!   ├── HdKey / Seed ── bitcoin::bip32 key math
//!   │
//!   └── Request / Response ── tagged payloads sealed by a Transport
//! ```
//!
//! # Cell operations
//!
//! | Operation | Method | Description |
//! |-----------|--------|-------------|
//! | assign | `cell.assign(text)` | Parse and pin a value |
//! | value | `cell.value()` | Assigned or derived value, else `Error::Logic` |
//! | optional | `cell.optional_value()` | Same resolution, `None` when unobtainable |
//! | has | `cell.has_value()` | Whether a value is obtainable |
//!
//! # Features
//!
//! - `cli` (default) - the `hdkey` binary and `tracing-subscriber` setup
//!
//! # Usage
//!
//! ```ignore
//! use hdkey_model::Model;
//!
//! let model = Model::new();
//! model.assign("bip39-words", "abandon abandon ... about")?;
//! model.assign("address-index", "0")?;
//!
//! // Derived public key for m/44'/0'/0'/0/0
//! model.assign("key-request-type", "public")?;
//! let key = model.key.derived_key.value()?;
//! ```

pub mod attribute;
pub mod config;
pub mod core;
pub mod error;
pub mod hdkey;
pub mod model;
pub mod path;
pub mod request;
pub mod response;
pub mod use_info;
pub mod wire;

#[cfg(feature = "cli")]
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================
pub use attribute::{Attribute, AttributeInfo, Graph, Handle, Inputs};
pub use config::Config;
pub use error::{Error, Result};
pub use hdkey::{HdKey, KeyType, Seed};
pub use model::{ChainType, Model};
pub use path::{DerivationPath, DerivationStep, HARDENED_BIT};
pub use request::{KeyRequestBody, PsbtSignatureRequestBody, Request, RequestBody, SeedRequestBody};
pub use response::{Response, ResponseBody};
pub use use_info::{Asset, Network, UseInfo};
pub use wire::{Base64Transport, Transport};
