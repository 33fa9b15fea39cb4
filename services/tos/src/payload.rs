use http::Method;
use tossign_core::hash::hex_sha256;
use tossign_core::Body;

use crate::constants::{EMPTY_STRING_SHA256, UNSIGNED_PAYLOAD};

/// Resolve the payload hash of a request.
///
/// Rules are evaluated in order:
///
/// 1. a non-empty raw body is hashed with SHA-256
/// 2. PUT or POST with a form data or file body is `UNSIGNED-PAYLOAD`
/// 3. anything else is the SHA-256 of the empty string
pub fn hash_payload(method: &Method, body: &Body) -> String {
    match body {
        Body::Raw(bs) if !bs.is_empty() => hex_sha256(bs),
        Body::FormData | Body::File if *method == Method::PUT || *method == Method::POST => {
            UNSIGNED_PAYLOAD.to_string()
        }
        _ => EMPTY_STRING_SHA256.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Method::GET, Body::None, EMPTY_STRING_SHA256; "get without body")]
    #[test_case(Method::HEAD, Body::None, EMPTY_STRING_SHA256; "head without body")]
    #[test_case(Method::PUT, Body::raw("hello"), "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"; "put raw")]
    #[test_case(Method::GET, Body::raw("hello"), "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"; "get raw")]
    #[test_case(Method::PUT, Body::raw(""), EMPTY_STRING_SHA256; "put empty raw")]
    #[test_case(Method::POST, Body::FormData, UNSIGNED_PAYLOAD; "post form data")]
    #[test_case(Method::PUT, Body::File, UNSIGNED_PAYLOAD; "put file")]
    #[test_case(Method::GET, Body::File, EMPTY_STRING_SHA256; "get file")]
    #[test_case(Method::DELETE, Body::FormData, EMPTY_STRING_SHA256; "delete form data")]
    fn test_hash_payload(method: Method, body: Body, expected: &str) {
        assert_eq!(hash_payload(&method, &body), expected);
    }

    #[test]
    fn test_empty_string_sha256() {
        assert_eq!(hex_sha256(b""), EMPTY_STRING_SHA256);
    }
}
