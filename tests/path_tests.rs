//! Derivation Path Integration Tests
//!
//! ## Test Categories
//!
//! 1. **Golden Tests** - Known path → known bytes and text
//! 2. **Round Trips** - Text and binary forms reproduce the same path
//! 3. **Canonical Rejection** - Non-minimal or reordered encodings fail
//! 4. **Append** - Metadata retention when concatenating paths

use hdkey_model::{DerivationPath, DerivationStep, Error};

fn path(text: &str) -> DerivationPath {
    text.parse().expect("valid path")
}

// ============================================================================
// 1. GOLDEN TESTS - Known Values (Regression Detection)
// ============================================================================

mod golden_tests {
    use super::*;

    /// Golden test: BCR-2020-007 example `d34db33f/44'/0'/0'`
    #[test]
    fn golden_keypath_bytes() {
        let bytes = path("d34db33f/44'/0'/0'").encode_cbor().expect("encode");
        assert_eq!(hex::encode(&bytes), "a20186182cf500f500f5021ad34db33f");
    }

    /// Golden test: tagged form is the same payload behind tag 304
    #[test]
    fn golden_tagged_keypath_bytes() {
        let bytes = path("d34db33f/44'/0'/0'").encode_tagged_cbor().expect("encode");
        assert_eq!(hex::encode(&bytes), "d90130a20186182cf500f500f5021ad34db33f");
    }

    /// Golden test: depth-only partial path
    #[test]
    fn golden_partial_path_bytes() {
        let bytes = path("d34db33f#1").encode_cbor().expect("encode");
        // {1: [], 2: 0xd34db33f, 3: 1}
        assert_eq!(hex::encode(&bytes), "a30180021ad34db33f0301");
    }

    #[test]
    fn golden_text_forms() {
        assert_eq!(path("m/44h/0h/0h/0/1").to_string(), "m/44'/0'/0'/0/1");
        assert_eq!(path("44'/0'").to_string(), "m/44'/0'");
        assert_eq!(path("D34DB33F").to_string(), "d34db33f");
    }
}

// ============================================================================
// 2. ROUND TRIPS
// ============================================================================

mod round_trip_tests {
    use super::*;

    fn samples() -> Vec<DerivationPath> {
        vec![
            DerivationPath::default(),
            path("m/44'/0'/0'/0/1"),
            path("d34db33f/84'/0'/0'"),
            path("d34db33f#3"),
            path("m#5/0/1"),
            path("m/2147483647'/2147483647"),
            DerivationPath::new(vec![DerivationStep::normal(7).expect("step")], None, Some(0)),
        ]
    }

    #[test]
    fn text_round_trip() {
        for p in samples() {
            assert_eq!(path(&p.to_string()), p, "{p}");
        }
    }

    #[test]
    fn binary_round_trip() {
        for p in samples() {
            let plain = p.encode_cbor().expect("encode");
            let tagged = p.encode_tagged_cbor().expect("encode");
            assert_eq!(DerivationPath::decode_cbor(&plain).expect("decode"), p);
            assert_eq!(DerivationPath::decode_tagged_cbor(&tagged).expect("decode"), p);
        }
    }

    /// A fingerprint with no hex letters prints as eight decimal digits and
    /// must read back as a fingerprint, not as a child index.
    #[test]
    fn decimal_fingerprint_round_trip() {
        let p = DerivationPath::from_fingerprint(0x1234_5678).append(&path("m/0"));
        assert_eq!(p.to_string(), "12345678/0");
        assert_eq!(path(&p.to_string()), p);
        assert_eq!(path("m/12345678/0").steps().len(), 2);
    }

    #[test]
    fn effective_depth_follows_explicit_depth() {
        for p in samples() {
            let expected = p.depth().map_or(p.steps().len(), usize::from);
            assert_eq!(p.effective_depth(), expected);
        }
    }
}

// ============================================================================
// 3. CANONICAL REJECTION - Anti-Malleability
// ============================================================================

mod canonical_tests {
    use super::*;

    fn rejects(hex_bytes: &str) {
        let bytes = hex::decode(hex_bytes).expect("hex");
        let result = DerivationPath::decode_cbor(&bytes);
        assert!(matches!(result, Err(Error::Codec(_))), "{hex_bytes} decoded to {result:?}");
    }

    #[test]
    fn rejects_non_minimal_index() {
        // 0 as 0x18 0x00
        rejects("a20186182cf51800f500f5021ad34db33f");
    }

    #[test]
    fn rejects_non_minimal_array_length() {
        // array(6) as 0x98 0x06
        rejects("a2019806182cf500f500f5021ad34db33f");
    }

    #[test]
    fn rejects_indefinite_map() {
        rejects("bf0186182cf500f500f5021ad34db33fff");
    }

    #[test]
    fn rejects_reordered_keys() {
        rejects("a2021ad34db33f0186182cf500f500f5");
    }

    #[test]
    fn rejects_unknown_key() {
        rejects("a2018009f5");
    }

    #[test]
    fn rejects_depth_out_of_range() {
        // depth 256
        rejects("a2018003190100");
    }

    #[test]
    fn rejects_tagged_without_tag() {
        let bytes = hex::decode("a20186182cf500f500f5021ad34db33f").expect("hex");
        assert!(matches!(DerivationPath::decode_tagged_cbor(&bytes), Err(Error::Codec(_))));
    }

    #[test]
    fn text_rejects_malformed() {
        for s in ["m/44''", "m/a", "x/0", "m/0/", "m/4294967296", "m/2147483648'"] {
            assert!(matches!(s.parse::<DerivationPath>(), Err(Error::Parse(_))), "{s}");
        }
    }
}

// ============================================================================
// 4. APPEND
// ============================================================================

mod append_tests {
    use super::*;

    #[test]
    fn append_keeps_left_fingerprint() {
        let full = path("73c5da0a/44'/0'/0'").append(&path("0badf00d/0/0"));
        assert_eq!(full.source_fingerprint(), Some(0x73c5_da0a));
        assert_eq!(full.to_string(), "73c5da0a/44'/0'/0'/0/0");
    }

    #[test]
    fn append_advances_left_depth() {
        let full = path("73c5da0a#3").append(&path("m#9/1/2"));
        assert_eq!(full.depth(), Some(5));
        assert_eq!(full.effective_depth(), 5);
    }

    #[test]
    fn append_onto_unanchored_path() {
        let full = path("m").append(&path("d34db33f/1'"));
        assert_eq!(full.source_fingerprint(), None);
        assert_eq!(full.to_string(), "m/1'");
    }
}
