#![forbid(unsafe_code)]

//! Property-based invariant tests for the [`Address`] value type:
//!
//! 1. Equality is exactly element-wise sequence equality.
//! 2. Extending an address always produces a distinct address.
//! 3. Canonical encoding round-trips through request decoding for any
//!    address made of valid child keys.
//! 4. `parent()` undoes `child()`.

use proptest::prelude::*;

use formwire::Address;

/// Valid child-key segments: non-empty, no separator, no leading `#`.
fn segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z][a-z0-9_-]{0,7}", 0..6)
}

proptest! {
    #[test]
    fn equality_is_elementwise(a in segments(), b in segments()) {
        let left = Address::new(a.clone());
        let right = Address::new(b.clone());
        prop_assert_eq!(left == right, a == b);
    }

    #[test]
    fn extension_is_never_equal(a in segments(), extra in "[a-z]{1,4}") {
        let base = Address::new(a);
        let extended = base.child(extra);
        prop_assert_ne!(base.clone(), extended.clone());
        prop_assert_eq!(extended.parent(), Some(base));
    }

    #[test]
    fn canonical_round_trips_through_request_decoding(
        a in proptest::collection::vec("[a-z][a-z0-9_-]{0,7}", 1..6),
    ) {
        let addr = Address::new(a);
        let decoded = Address::from_request(&addr.canonical()).expect("canonical is decodable");
        prop_assert_eq!(decoded, addr);
    }

    #[test]
    fn segment_count_matches_len(a in segments()) {
        let addr = Address::new(a.clone());
        prop_assert_eq!(addr.len(), a.len());
        prop_assert_eq!(addr.is_root(), a.is_empty());
    }
}
