use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use http::HeaderName;
use percent_encoding::utf8_percent_encode;
use tossign_core::time::{format_date, format_iso8601, DateTime};
use tossign_core::{QueryParam, RequestDescriptor, Result};

use crate::constants::*;
use crate::policy::{HeaderScope, SigningPolicy};

/// Timestamp is the signing instant, captured once per signing call.
///
/// Both the `x-tos-date` header and the credential scope are read from the
/// same value so they can never straddle midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    amz_date: String,
    date_stamp: String,
}

impl Timestamp {
    /// Capture the given instant.
    pub fn new(time: DateTime) -> Self {
        Self {
            amz_date: format_iso8601(time),
            date_stamp: format_date(time),
        }
    }

    /// `YYYYMMDDTHHMMSSZ`
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    /// `YYYYMMDD`
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }
}

/// CanonicalRequest is the byte exact form of a request that gets hashed.
///
/// Its [`Display`] output is the canonical request string:
///
/// ```text
/// GET
/// /
///
/// host:example.tos-cn-beijing.example.com
/// x-tos-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// x-tos-date:20240101T000000Z
///
/// host;x-tos-content-sha256;x-tos-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    host: String,
    canonical_uri: String,
    canonical_query: String,
    canonical_headers: String,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    pub(crate) fn build(
        req: &RequestDescriptor,
        headers: &HeaderSet,
        payload_hash: &str,
        policy: &SigningPolicy,
    ) -> Self {
        Self {
            method: req.method.as_str().to_string(),
            host: req.host.clone(),
            canonical_uri: canonical_uri(&req.path, policy.preserve_encoded_slash),
            canonical_query: canonical_query(req.enabled_query()),
            canonical_headers: headers.canonical_headers(),
            signed_headers: headers.signed_headers(),
            payload_hash: payload_hash.to_string(),
        }
    }

    /// Upper-cased method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Host the request was canonicalized for.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Encoded path.
    pub fn canonical_uri(&self) -> &str {
        &self.canonical_uri
    }

    /// Sorted and encoded query string.
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    /// `name:value\n` for every signed header.
    pub fn canonical_headers(&self) -> &str {
        &self.canonical_headers
    }

    /// Signed header names joined with `;`.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Payload hash or `UNSIGNED-PAYLOAD`.
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.canonical_uri)?;
        writeln!(f, "{}", self.canonical_query)?;
        // Every canonical header line ends with `\n` already.
        writeln!(f, "{}", self.canonical_headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Canonicalize a request for header based signing.
///
/// `host`, `x-tos-date` and `x-tos-content-sha256` are always signed with the
/// computed values, replacing whatever the request carried for them. The
/// security token is signed when given.
pub fn canonicalize(
    req: &RequestDescriptor,
    timestamp: &Timestamp,
    payload_hash: &str,
    security_token: Option<&str>,
    policy: &SigningPolicy,
) -> Result<CanonicalRequest> {
    let mut headers = HeaderSet::collect(req, &policy.header_scope)?;
    headers.upsert(http::header::HOST.as_str(), &req.host);
    headers.upsert(X_TOS_DATE, timestamp.amz_date());
    headers.upsert(X_TOS_CONTENT_SHA256, payload_hash);
    if let Some(token) = security_token {
        headers.upsert(X_TOS_SECURITY_TOKEN, token);
    }

    Ok(CanonicalRequest::build(req, &headers, payload_hash, policy))
}

/// Encode the request path.
///
/// An empty path is `/`.
pub fn canonical_uri(path: &str, preserve_encoded_slash: bool) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let set = if preserve_encoded_slash {
        &TOS_PATH_RESERVED_SET
    } else {
        &TOS_URI_ENCODE_SET
    };
    utf8_percent_encode(path, set).to_string()
}

/// Build the canonical query string from enabled params.
///
/// Params are sorted by raw key and raw value, then keys and values are
/// encoded independently. Duplicate keys are kept.
pub fn canonical_query<'a>(params: impl IntoIterator<Item = &'a QueryParam>) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .into_iter()
        .filter(|p| !p.disabled)
        .map(|p| (p.key.as_str(), p.value.as_deref().unwrap_or_default()))
        .collect();
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &TOS_QUERY_ENCODE_SET),
                utf8_percent_encode(v, &TOS_QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// HeaderSet is the sorted set of headers going into the canonical request.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    /// Collect enabled headers with a value that `scope` selects.
    ///
    /// Every enabled header name is validated, selected or not.
    pub(crate) fn collect(req: &RequestDescriptor, scope: &HeaderScope) -> Result<Self> {
        let mut set: BTreeMap<String, String> = BTreeMap::new();

        for entry in req.enabled_headers() {
            let Some(value) = entry.value.as_deref() else {
                continue;
            };
            // HeaderName is always lowercase.
            let name = HeaderName::from_bytes(entry.key.as_bytes())?;
            if !scope.matches(name.as_str()) {
                continue;
            }

            let value = normalize_header_value(value);
            match set.get_mut(name.as_str()) {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => {
                    set.insert(name.as_str().to_string(), value);
                }
            }
        }

        Ok(Self(set))
    }

    pub(crate) fn upsert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub(crate) fn signed_headers(&self) -> String {
        self.0.keys().map(String::as_str).collect::<Vec<_>>().join(";")
    }

    fn canonical_headers(&self) -> String {
        let mut s = String::with_capacity(256);
        for (name, value) in &self.0 {
            s.push_str(name);
            s.push(':');
            s.push_str(value);
            s.push('\n');
        }
        s
    }
}

/// Collapse whitespace runs into one space and trim both ends.
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
