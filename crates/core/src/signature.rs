//! Payment signatures
//!
//! The payment gateway authenticates requests with an MD5 digest over the
//! request fields. Fields are sorted by name, each value is percent-encoded
//! with URI-component rules, the pairs are joined with `&`, and the merchant
//! passphrase (when one is configured) is appended as a final `passphrase`
//! field before hashing.

use std::collections::BTreeMap;

use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use subtle::ConstantTimeEq;

/// Name of the field carrying the signature itself; never signed.
pub const SIGNATURE_FIELD: &str = "signature";

/// Characters left untouched by URI-component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the canonical string that gets hashed.
///
/// Keys are ordered by byte value, so the result does not depend on the order
/// the fields were supplied in. An empty passphrase is treated as absent.
pub fn canonicalize<I, K, V>(params: I, passphrase: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_owned(), value.as_ref().to_owned()))
        .collect();

    let mut canonical = sorted
        .iter()
        .map(|(key, value)| format!("{key}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if let Some(passphrase) = passphrase.filter(|passphrase| !passphrase.is_empty()) {
        canonical.push_str("&passphrase=");
        canonical.push_str(&encode(passphrase));
    }

    canonical
}

/// Sign a set of request fields, returning a lowercase hex MD5 digest.
pub fn sign<I, K, V>(params: I, passphrase: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    format!(
        "{:x}",
        Md5::digest(canonicalize(params, passphrase).as_bytes())
    )
}

/// Check a received signature against the other fields of a request.
///
/// Any `signature` field present in `params` is excluded from the digest.
/// Comparison is case-insensitive on the hex digits and constant-time.
pub fn verify<I, K, V>(params: I, passphrase: Option<&str>, signature: &str) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let unsigned = params
        .into_iter()
        .filter(|(key, _)| key.as_ref() != SIGNATURE_FIELD);

    let expected = sign(unsigned, passphrase);
    let received = signature.trim().to_ascii_lowercase();

    expected.as_bytes().ct_eq(received.as_bytes()).into()
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("merchant_id", "10000100"),
            ("amount", "160.00"),
            ("item_name", "Still Water 500ml"),
        ]
    }

    #[test]
    fn canonicalize_sorts_keys_and_encodes_values() {
        assert_eq!(
            canonicalize(payment_fields(), None),
            "amount=160.00&item_name=Still%20Water%20500ml&merchant_id=10000100"
        );
    }

    #[test]
    fn canonicalize_appends_encoded_passphrase() {
        assert_eq!(
            canonicalize([("amount", "1.00")], Some("salt & pepper")),
            "amount=1.00&passphrase=salt%20%26%20pepper"
        );
    }

    #[test]
    fn empty_passphrase_is_treated_as_absent() {
        assert_eq!(
            sign(payment_fields(), Some("")),
            sign(payment_fields(), None)
        );
    }

    #[test]
    fn uri_component_reserved_characters_are_preserved() {
        assert_eq!(
            canonicalize([("note", "a-b_c.d!e~f*g'h(i)j")], None),
            "note=a-b_c.d!e~f*g'h(i)j"
        );
        assert_eq!(
            canonicalize([("url", "https://shop.test/a?b=c")], None),
            "url=https%3A%2F%2Fshop.test%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn empty_input_hashes_the_empty_string() {
        assert_eq!(sign(Vec::<(&str, &str)>::new(), None), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn signature_is_lowercase_hex_md5() {
        let signature = sign(payment_fields(), Some("jt7NOE43FZPn"));

        assert_eq!(signature.len(), 32);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "expected lowercase hex, got {signature}"
        );
    }

    #[test]
    fn insertion_order_does_not_change_signature() {
        let mut reversed = payment_fields();
        reversed.reverse();

        assert_eq!(
            sign(payment_fields(), Some("pass")),
            sign(reversed, Some("pass"))
        );
    }

    #[test]
    fn any_change_alters_signature() {
        let original = sign(payment_fields(), Some("pass"));

        let changed_value = sign(
            [
                ("merchant_id", "10000100"),
                ("amount", "160.01"),
                ("item_name", "Still Water 500ml"),
            ],
            Some("pass"),
        );

        let mut added = payment_fields();
        added.push(("m_payment_id", "42"));

        assert_ne!(original, changed_value);
        assert_ne!(original, sign(added, Some("pass")));
        assert_ne!(original, sign(payment_fields(), Some("other")));
        assert_ne!(original, sign(payment_fields(), None));
    }

    #[test]
    fn verify_ignores_signature_field_and_case() {
        let signature = sign(payment_fields(), Some("pass"));

        let mut received = payment_fields();
        received.push(("signature", "ignored"));

        assert!(verify(received.clone(), Some("pass"), &signature));
        assert!(verify(received, Some("pass"), &signature.to_uppercase()));
    }

    #[test]
    fn verify_rejects_tampered_fields() {
        let signature = sign(payment_fields(), Some("pass"));

        assert!(!verify(
            [("merchant_id", "10000100"), ("amount", "1.00"), ("item_name", "Still Water 500ml")],
            Some("pass"),
            &signature
        ));
        assert!(!verify(payment_fields(), Some("pass"), "not-a-signature"));
    }
}
