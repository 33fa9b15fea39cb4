use std::fmt::{Debug, Formatter};
use std::mem;
use std::str::FromStr;

use bytes::Bytes;
use http::header;
use http::uri::{Authority, PathAndQuery};
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// A query parameter of the request about to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Parameter name, not percent encoded.
    pub key: String,
    /// Parameter value, not percent encoded. `None` is signed as an empty value.
    pub value: Option<String>,
    /// Disabled parameters are neither sent nor signed.
    pub disabled: bool,
}

impl QueryParam {
    /// Create an enabled query parameter.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            disabled: false,
        }
    }
}

/// A header of the request about to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Header name in any case.
    pub key: String,
    /// Header value. Headers without value are never signed.
    pub value: Option<String>,
    /// Disabled headers are neither sent nor signed.
    pub disabled: bool,
}

impl HeaderEntry {
    /// Create an enabled header.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            disabled: false,
        }
    }
}

/// Body of the request about to be signed.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body.
    #[default]
    None,
    /// Raw bytes known at signing time.
    Raw(Bytes),
    /// Multipart form data assembled by the transport.
    FormData,
    /// File or stream content that is only read while sending.
    File,
}

impl Body {
    /// Create a raw body.
    pub fn raw(content: impl Into<Bytes>) -> Self {
        Body::Raw(content.into())
    }

    /// Name of this body mode, as used in logs.
    pub fn mode(&self) -> &'static str {
        match self {
            Body::None => "none",
            Body::Raw(_) => "raw",
            Body::FormData => "formdata",
            Body::File => "file",
        }
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Raw(bs) => write!(f, "Raw({} bytes)", bs.len()),
            _ => f.write_str(self.mode()),
        }
    }
}

/// RequestDescriptor is the transport independent view of a request to sign.
///
/// Query parameters and headers keep their input order and their disabled
/// flags. Canonicalization decides what is signed; the descriptor only
/// records what the caller has.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method, always upper-cased.
    pub method: Method,
    /// Host (authority) the request is sent to.
    pub host: String,
    /// URL path as it will appear on the wire.
    pub path: String,
    /// Query parameters in input order.
    pub query: Vec<QueryParam>,
    /// Headers in input order.
    pub headers: Vec<HeaderEntry>,
    /// Request body.
    pub body: Body,
}

impl RequestDescriptor {
    /// Create a new descriptor without query, headers or body.
    ///
    /// The method is upper-cased. An empty host is rejected.
    pub fn new(method: &str, host: impl Into<String>, path: impl Into<String>) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
        let host = host.into();
        if host.is_empty() {
            return Err(Error::request_invalid("request host is empty"));
        }

        Ok(Self {
            method,
            host,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::None,
        })
    }

    /// Create a descriptor from an absolute url like `https://bucket.tos-cn-beijing.volces.com/key?acl`.
    pub fn from_url(method: &str, url: &str) -> Result<Self> {
        let uri = Uri::from_str(url)?;
        let authority = uri
            .authority()
            .ok_or_else(|| Error::request_invalid(format!("url without host: {url}")))?;

        let mut req = Self::new(method, authority_host(authority), uri.path())?;
        req.query = parse_query(uri.query());
        Ok(req)
    }

    /// Build a descriptor from `http::request::Parts`.
    ///
    /// The host is taken from the uri authority, falling back to the `Host` header
    /// for origin-form uris. `body` tells how the payload is transmitted since
    /// `Parts` never carries it.
    ///
    /// Header values that are not valid UTF-8 are carried without value.
    pub fn from_parts(parts: &http::request::Parts, body: Body) -> Result<Self> {
        let host = match parts.uri.authority() {
            Some(authority) => authority_host(authority),
            None => parts
                .headers
                .get(header::HOST)
                .ok_or_else(|| {
                    Error::request_invalid("request without authority is invalid for signing")
                })?
                .to_str()?
                .to_string(),
        };

        let mut req = Self::new(parts.method.as_str(), host, parts.uri.path())?;
        req.query = parse_query(parts.uri.query());
        req.headers = parts
            .headers
            .iter()
            .map(|(k, v)| HeaderEntry {
                key: k.as_str().to_string(),
                value: std::str::from_utf8(v.as_bytes()).ok().map(str::to_string),
                disabled: false,
            })
            .collect();
        req.body = body;

        Ok(req)
    }

    /// Append an enabled query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push(QueryParam::new(key, value));
        self
    }

    /// Append a query parameter as is, including disabled ones.
    pub fn with_query_param(mut self, param: QueryParam) -> Self {
        self.query.push(param);
        self
    }

    /// Append an enabled header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderEntry::new(key, value));
        self
    }

    /// Append a header entry as is, including disabled ones.
    pub fn with_header_entry(mut self, entry: HeaderEntry) -> Self {
        self.headers.push(entry);
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Iterate over enabled query parameters in input order.
    pub fn enabled_query(&self) -> impl Iterator<Item = &QueryParam> {
        self.query.iter().filter(|q| !q.disabled)
    }

    /// Iterate over enabled headers in input order.
    pub fn enabled_headers(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.headers.iter().filter(|h| !h.disabled)
    }

    /// Get the first enabled header value by name, case-insensitively.
    pub fn header_get(&self, name: &str) -> Option<&str> {
        self.enabled_headers()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .and_then(|h| h.value.as_deref())
    }

    /// Write a header set onto `parts`, overwriting existing values of the same name.
    pub fn apply_headers(parts: &mut http::request::Parts, headers: &HeaderMap) {
        for (name, value) in headers.iter() {
            parts.headers.insert(name.clone(), value.clone());
        }
    }

    /// Append already percent encoded `k=v` pairs to the uri query of `parts`.
    pub fn append_query(parts: &mut http::request::Parts, pairs: &[(String, String)]) -> Result<()> {
        if pairs.is_empty() {
            return Ok(());
        }

        let mut uri_parts = mem::take(&mut parts.uri).into_parts();
        let paq = uri_parts
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let mut s = paq.path().to_string();
        s.push('?');
        if let Some(q) = paq.query().filter(|q| !q.is_empty()) {
            s.push_str(q);
            s.push('&');
        }
        for (i, (k, v)) in pairs.iter().enumerate() {
            if i > 0 {
                s.push('&');
            }
            s.push_str(k);
            s.push('=');
            s.push_str(v);
        }

        uri_parts.path_and_query = Some(PathAndQuery::from_str(&s)?);
        parts.uri = Uri::from_parts(uri_parts)?;
        Ok(())
    }
}

/// Host and port of `authority`, userinfo is never part of it.
fn authority_host(authority: &Authority) -> String {
    match authority.port() {
        Some(port) => format!("{}:{}", authority.host(), port.as_str()),
        None => authority.host().to_string(),
    }
}

fn parse_query(query: Option<&str>) -> Vec<QueryParam> {
    query
        .map(|v| {
            form_urlencoded::parse(v.as_bytes())
                .map(|(k, v)| QueryParam::new(k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}
