use std::time::Duration;

use async_trait::async_trait;
use http::header::HOST;
use http::request::Parts;
use http::{HeaderMap, Method};
use log::debug;
use percent_encoding::utf8_percent_encode;
use tossign_core::time::{now, DateTime};
use tossign_core::{
    Body, Context, Error, QueryParam, RequestDescriptor, Result, SignRequest, SigningCredential,
};

use crate::canonical::{canonicalize, CanonicalRequest, HeaderSet, Timestamp};
use crate::config::Config;
use crate::constants::*;
use crate::credential::Credential;
use crate::payload::hash_payload;
use crate::policy::{HeaderScope, SigningPolicy};
use crate::project::project;
use crate::signature::{credential_scope, sign};

/// RequestSigner that implements TOS4-HMAC-SHA256.
///
/// Every call captures a fresh timestamp and runs canonicalization, payload
/// hashing, signing and header projection again. Nothing is cached between
/// calls, so retries after a delay must sign again.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    policy: SigningPolicy,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for TOS4-HMAC-SHA256 with the default policy.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            policy: SigningPolicy::default(),

            time: None,
        }
    }

    /// Create a signer from [`Config`].
    ///
    /// `region` is required, `service` defaults to `tos`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let region = config
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("region is required for signing"))?;
        let service = config.service.as_deref().unwrap_or(DEFAULT_SERVICE);
        if service.is_empty() {
            return Err(Error::config_invalid("service must not be empty"));
        }

        let header_scope = match config.signed_header_prefix.as_deref() {
            None => HeaderScope::default(),
            Some(prefix) => HeaderScope::prefix(prefix),
        };
        let policy = SigningPolicy {
            header_scope,
            preserve_encoded_slash: config.preserve_encoded_slash.unwrap_or(true),
        };

        Ok(Self::new(service, region).with_policy(policy))
    }

    /// Replace the signing policy.
    pub fn with_policy(mut self, policy: SigningPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Region of the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service of the credential scope.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Policy used for canonicalization.
    pub fn policy(&self) -> &SigningPolicy {
        &self.policy
    }

    /// Sign a request, returning the headers to attach to it.
    pub fn sign(&self, req: &RequestDescriptor, cred: &Credential) -> Result<HeaderMap> {
        self.sign_at(req, cred, self.time.unwrap_or_else(now))
    }

    /// Sign a request as of `time`.
    pub fn sign_at(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        time: DateTime,
    ) -> Result<HeaderMap> {
        self.validate(cred)?;

        let payload_hash = hash_payload(&req.method, &req.body);
        self.build_headers(req, cred, time, &payload_hash)
    }

    /// Presign a request, returning the encoded query pairs to append to its url.
    pub fn presign(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        expires_in: Duration,
    ) -> Result<Vec<(String, String)>> {
        self.presign_at(req, cred, expires_in, self.time.unwrap_or_else(now))
    }

    /// Presign a request as of `time`.
    ///
    /// The payload is never hashed and only `host` plus the headers selected by
    /// the policy are signed, since neither the date nor the payload hash is
    /// sent as a header.
    pub fn presign_at(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        expires_in: Duration,
        time: DateTime,
    ) -> Result<Vec<(String, String)>> {
        self.validate(cred)?;

        let expires = expires_in.as_secs();
        if expires == 0 || expires > MAX_PRESIGN_EXPIRES_SECS {
            return Err(Error::request_invalid(format!(
                "presign expiry must be between 1 and {MAX_PRESIGN_EXPIRES_SECS} seconds, got {expires}"
            )));
        }

        let timestamp = Timestamp::new(time);
        let scope = credential_scope(&timestamp, &self.region, &self.service);

        let mut headers = HeaderSet::collect(req, &self.policy.header_scope)?;
        headers.remove(X_TOS_DATE);
        headers.remove(X_TOS_CONTENT_SHA256);
        headers.remove(X_TOS_SECURITY_TOKEN);
        headers.upsert(HOST.as_str(), &req.host);

        let mut params = vec![
            (X_TOS_ALGORITHM, ALGORITHM.to_string()),
            (X_TOS_CREDENTIAL, format!("{}/{}", cred.access_key_id, scope)),
            (X_TOS_DATE_QUERY, timestamp.amz_date().to_string()),
            (X_TOS_EXPIRES, expires.to_string()),
            (X_TOS_SIGNED_HEADERS, headers.signed_headers()),
        ];
        if let Some(token) = &cred.security_token {
            params.push((X_TOS_SECURITY_TOKEN_QUERY, token.clone()));
        }

        let mut signed_req = req.clone();
        signed_req
            .query
            .extend(params.iter().map(|(k, v)| QueryParam::new(*k, v.as_str())));

        let creq = CanonicalRequest::build(&signed_req, &headers, UNSIGNED_PAYLOAD, &self.policy);
        let (_, signature) = sign(
            &creq,
            &cred.secret_access_key,
            &timestamp,
            &self.region,
            &self.service,
        );
        params.push((X_TOS_SIGNATURE, signature));

        Ok(params
            .into_iter()
            .map(|(k, v)| {
                (
                    utf8_percent_encode(k, &TOS_QUERY_ENCODE_SET).to_string(),
                    utf8_percent_encode(&v, &TOS_QUERY_ENCODE_SET).to_string(),
                )
            })
            .collect())
    }

    fn validate(&self, cred: &Credential) -> Result<()> {
        if !cred.is_valid() {
            return Err(Error::config_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        if self.region.is_empty() {
            return Err(Error::config_invalid("region must not be empty"));
        }
        if self.service.is_empty() {
            return Err(Error::config_invalid("service must not be empty"));
        }

        Ok(())
    }

    /// Headers selected for signing must be valid UTF-8, the rest are ignored.
    fn check_signed_header_values(&self, parts: &Parts) -> Result<()> {
        for (name, value) in parts.headers.iter() {
            if self.policy.header_scope.matches(name.as_str())
                && std::str::from_utf8(value.as_bytes()).is_err()
            {
                return Err(Error::request_invalid(format!(
                    "value of signed header {name} is not valid utf-8"
                )));
            }
        }

        Ok(())
    }

    fn build_headers(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        time: DateTime,
        payload_hash: &str,
    ) -> Result<HeaderMap> {
        let timestamp = Timestamp::new(time);
        let creq = canonicalize(
            req,
            &timestamp,
            payload_hash,
            cred.security_token.as_deref(),
            &self.policy,
        )?;
        let (ctx, signature) = sign(
            &creq,
            &cred.secret_access_key,
            &timestamp,
            &self.region,
            &self.service,
        );

        project(&creq, &ctx, &signature, cred)
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::config_invalid("credential is required for signing"));
        };
        self.validate(cred)?;

        let time = self.time.unwrap_or_else(now);

        // Parts never carries the body. Uploads are signed as unsigned payload
        // unless the caller has put a hash into the headers.
        let body = if req.method == Method::PUT || req.method == Method::POST {
            Body::File
        } else {
            Body::None
        };
        self.check_signed_header_values(req)?;
        let descriptor = RequestDescriptor::from_parts(req, body)?;
        debug!(
            "signing request: {} {}{}",
            descriptor.method, descriptor.host, descriptor.path
        );

        if let Some(expires_in) = expires_in {
            let query = self.presign_at(&descriptor, cred, expires_in, time)?;
            return RequestDescriptor::append_query(req, &query);
        }

        let payload_hash = match descriptor.header_get(X_TOS_CONTENT_SHA256) {
            Some(v) => v.to_string(),
            None => hash_payload(&descriptor.method, &descriptor.body),
        };
        let headers = self.build_headers(&descriptor, cred, time, &payload_hash)?;
        RequestDescriptor::apply_headers(req, &headers);

        Ok(())
    }
}
