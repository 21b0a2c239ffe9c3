//! Error taxonomy shared by the path codec, the wire objects and the attribute graph.

/// Errors surfaced by every layer of the crate.
///
/// `Clone` so a failed derivation can be cached and replayed to later queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed text or an unparseable field.
    #[error("parse error: {0}")]
    Parse(String),

    /// Structurally invalid or non-canonical binary encoding.
    #[error("codec error: {0}")]
    Codec(String),

    /// Cross-field inconsistency (fingerprint mismatch, wrong payload kind).
    #[error("validation error: {0}")]
    Validation(String),

    /// A value was demanded from a cell with neither an assignment nor a derivation.
    #[error("logic error: {0}")]
    Logic(String),

    /// A derivation rule re-entered a cell that is still resolving.
    #[error("cycle detected while resolving '{0}'")]
    Cycle(String),

    /// The key-math collaborator refused the derivation.
    #[error("derivation failed: {0}")]
    Derivation(String),

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(msg: impl Into<String>) -> Self { Self::Parse(msg.into()) }
    pub fn codec(msg: impl Into<String>) -> Self { Self::Codec(msg.into()) }
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

impl From<bitcoin::bip32::Error> for Error {
    fn from(e: bitcoin::bip32::Error) -> Self { Self::Derivation(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_category() {
        assert_eq!(Error::parse("bad").to_string(), "parse error: bad");
        assert_eq!(Error::Cycle("seed".into()).to_string(), "cycle detected while resolving 'seed'");
    }

    #[test]
    fn test_clone_preserves_equality() {
        let e = Error::validation("source key does not match request");
        assert_eq!(e.clone(), e);
    }
}
