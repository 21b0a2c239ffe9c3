//! Derivation paths - BIP-32 steps plus optional origin metadata.
//!
//! # Text grammar
//!
//! ```text
//! path    = [head ("/" step)*] | step ("/" step)*
//! head    = ("m" | fingerprint) ["#" depth]
//! step    = digits ["'" | "h"]
//! ```
//!
//! | Text | Steps | Fingerprint | Depth |
//! |------|-------|-------------|-------|
//! | `m/44'/0'/0'/0/1` | 5 | - | - |
//! | `d34db33f/84h/0h/0h` | 3 | `0xd34db33f` | - |
//! | `d34db33f#3` | 0 | `0xd34db33f` | 3 |
//! | `0/7` | 2 | - | - |
//!
//! A head token of exactly eight hex digits is always read as a
//! fingerprint, including all-decimal ones like `12345678`, since that is
//! how such a fingerprint prints. An unanchored path whose first index
//! has eight digits must be written with `m/` in front. Canonical output
//! always carries a head and uses `'`.

mod cbor;

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Bit 31 of a raw BIP-32 child number marks a hardened step.
pub const HARDENED_BIT: u32 = 0x8000_0000;

static STEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)(['h])?$").expect("valid step regex"));
static HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(m|[0-9a-fA-F]{8})(?:#([0-9]+))?$").expect("valid head regex"));

/// One hierarchy level: a 31-bit child index and a hardened flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationStep {
    index: u32,
    hardened: bool,
}

impl DerivationStep {
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index & HARDENED_BIT != 0 {
            return Err(Error::parse(format!("child index {index} collides with the hardened bit")));
        }
        Ok(Self { index, hardened })
    }

    pub fn normal(index: u32) -> Result<Self> { Self::new(index, false) }
    pub fn hardened(index: u32) -> Result<Self> { Self::new(index, true) }

    pub fn index(&self) -> u32 { self.index }
    pub fn is_hardened(&self) -> bool { self.hardened }
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.index, if self.hardened { "'" } else { "" })
    }
}

impl FromStr for DerivationStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = STEP.captures(s).ok_or_else(|| Error::parse(format!("invalid path segment '{s}'")))?;
        let index: u32 = caps[1].parse().map_err(|_| Error::parse(format!("child index out of range in '{s}'")))?;
        Self::new(index, caps.get(2).is_some())
    }
}

impl From<DerivationStep> for bitcoin::bip32::ChildNumber {
    fn from(step: DerivationStep) -> Self {
        if step.hardened {
            Self::Hardened { index: step.index }
        } else {
            Self::Normal { index: step.index }
        }
    }
}

/// Ordered steps (root to leaf) with optional source fingerprint and depth.
///
/// A path may be partial: fingerprint and depth with no concrete steps,
/// as reported by a signer that only knows where a key sits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    steps: Vec<DerivationStep>,
    source_fingerprint: Option<u32>,
    depth: Option<u8>,
}

impl DerivationPath {
    pub fn new(steps: Vec<DerivationStep>, source_fingerprint: Option<u32>, depth: Option<u8>) -> Self {
        Self { steps, source_fingerprint, depth }
    }

    /// Just the fingerprint of a master key.
    pub fn from_fingerprint(source_fingerprint: u32) -> Self {
        Self { source_fingerprint: Some(source_fingerprint), ..Default::default() }
    }

    pub fn steps(&self) -> &[DerivationStep] { &self.steps }
    pub fn source_fingerprint(&self) -> Option<u32> { self.source_fingerprint }
    pub fn depth(&self) -> Option<u8> { self.depth }

    /// Explicit depth when set, otherwise the number of steps.
    pub fn effective_depth(&self) -> usize {
        self.depth.map_or(self.steps.len(), usize::from)
    }

    #[must_use]
    pub fn with_source_fingerprint(mut self, fingerprint: Option<u32>) -> Self {
        self.source_fingerprint = fingerprint;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: Option<u8>) -> Self {
        self.depth = depth;
        self
    }

    /// Concatenate `other`'s steps onto this path.
    ///
    /// The result keeps this path's fingerprint. An explicit depth on this
    /// path advances by the number of appended steps (saturating at 255).
    /// `other`'s fingerprint and depth are discarded.
    #[must_use]
    pub fn append(&self, other: &DerivationPath) -> Self {
        let added = u8::try_from(other.steps.len()).unwrap_or(u8::MAX);
        let mut steps = self.steps.clone();
        steps.extend_from_slice(&other.steps);
        Self {
            steps,
            source_fingerprint: self.source_fingerprint,
            depth: self.depth.map(|d| d.saturating_add(added)),
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source_fingerprint {
            Some(fp) => write!(f, "{fp:08x}")?,
            None => f.write_str("m")?,
        }
        if let Some(depth) = self.depth {
            write!(f, "#{depth}")?;
        }
        for step in &self.steps {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::parse("empty derivation path"));
        }
        let mut tokens = s.split('/');
        let first = tokens.next().unwrap_or_default();

        let mut path = DerivationPath::default();
        let mut relative_head = None;
        match HEAD.captures(first) {
            Some(caps) => {
                if &caps[1] != "m" {
                    let fp = u32::from_str_radix(&caps[1], 16).map_err(|e| Error::parse(format!("fingerprint: {e}")))?;
                    path.source_fingerprint = Some(fp);
                }
                if let Some(depth) = caps.get(2) {
                    let depth = depth.as_str().parse::<u8>().map_err(|_| Error::parse(format!("depth out of range in '{first}'")))?;
                    path.depth = Some(depth);
                }
            }
            None => relative_head = Some(first),
        }

        path.steps = relative_head
            .into_iter()
            .chain(tokens)
            .map(DerivationStep::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> DerivationPath { s.parse().unwrap() }

    #[test]
    fn test_round_trip_canonical() {
        for s in ["m", "m/44'/0'/0'/0/1", "d34db33f/84'/0'/0'", "d34db33f#3", "m#5/0/1", "0badf00d#4/1'/2"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }

    #[test]
    fn test_h_marker_canonicalises_to_apostrophe() {
        assert_eq!(parse("m/44h/0h/0h/0/1").to_string(), "m/44'/0'/0'/0/1");
    }

    #[test]
    fn test_relative_path_gets_head() {
        let p = parse("0/7");
        assert_eq!(p.steps().len(), 2);
        assert_eq!(p.source_fingerprint(), None);
        assert_eq!(p.to_string(), "m/0/7");
    }

    #[test]
    fn test_decimal_fingerprint_head() {
        let p = parse("12345678/0");
        assert_eq!(p.source_fingerprint(), Some(0x1234_5678));
        assert_eq!(p.steps().len(), 1);
        assert_eq!(p.to_string(), "12345678/0");

        let unanchored = parse("m/12345678/0");
        assert_eq!(unanchored.source_fingerprint(), None);
        assert_eq!(unanchored.steps().len(), 2);
    }

    #[test]
    fn test_fingerprint_head() {
        let p = parse("D34DB33F/44'");
        assert_eq!(p.source_fingerprint(), Some(0xd34d_b33f));
        assert_eq!(p.to_string(), "d34db33f/44'");
    }

    #[test]
    fn test_rejects_malformed() {
        for s in ["", "m/", "m//0", "m/x", "m/1''", "m/-1", "m/1H", "m/2147483648", "m/4294967296", "m#256", "m/0#1"] {
            assert!(matches!(s.parse::<DerivationPath>(), Err(Error::Parse(_))), "{s} should fail");
        }
    }

    #[test]
    fn test_max_index() {
        let p = parse("m/2147483647'");
        assert_eq!(p.steps()[0].index(), HARDENED_BIT - 1);
        assert!(p.steps()[0].is_hardened());
    }

    #[test]
    fn test_step_rejects_hardened_bit() {
        assert!(DerivationStep::normal(HARDENED_BIT).is_err());
        assert!(DerivationStep::hardened(HARDENED_BIT | 5).is_err());
    }

    #[test]
    fn test_effective_depth() {
        assert_eq!(parse("m/44'/0'/0'").effective_depth(), 3);
        assert_eq!(parse("d34db33f#5").effective_depth(), 5);
        assert_eq!(parse("m#1/0/0/0").effective_depth(), 1);
        assert_eq!(DerivationPath::default().effective_depth(), 0);
    }

    #[test]
    fn test_append_keeps_left_metadata() {
        let account = parse("d34db33f/44'/0'/0'");
        let tail = parse("0badf00d#9/0/5");
        let full = account.append(&tail);
        assert_eq!(full.to_string(), "d34db33f/44'/0'/0'/0/5");
        assert_eq!(full.depth(), None);
        assert_eq!(full.effective_depth(), 5);
    }

    #[test]
    fn test_append_advances_explicit_depth() {
        let partial = parse("d34db33f#3");
        let full = partial.append(&parse("0/1"));
        assert_eq!(full.depth(), Some(5));
        assert_eq!(full.to_string(), "d34db33f#5/0/1");
    }

    #[test]
    fn test_append_saturates_depth() {
        let p = parse("m#254").append(&parse("0/1/2"));
        assert_eq!(p.depth(), Some(255));
    }

    #[test]
    fn test_append_leaves_operands_untouched() {
        let left = parse("m/1");
        let right = parse("m/2");
        let _ = left.append(&right);
        assert_eq!(left.to_string(), "m/1");
        assert_eq!(right.to_string(), "m/2");
    }

    #[test]
    fn test_child_number_conversion() {
        use bitcoin::bip32::ChildNumber;
        let step = DerivationStep::hardened(44).unwrap();
        assert_eq!(ChildNumber::from(step), ChildNumber::Hardened { index: 44 });
    }
}
