use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderValue};
use tossign_core::Result;

use crate::canonical::CanonicalRequest;
use crate::constants::*;
use crate::credential::Credential;
use crate::signature::SigningContext;

/// Build the `Authorization` header value.
pub fn authorization(
    creq: &CanonicalRequest,
    ctx: &SigningContext,
    access_key_id: &str,
    signature: &str,
) -> String {
    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ctx.algorithm(),
        access_key_id,
        ctx.credential_scope(),
        creq.signed_headers(),
        signature
    )
}

/// Project a signature into the headers the outgoing request must carry.
///
/// The returned map holds `host`, `x-tos-date`, `x-tos-content-sha256`,
/// `authorization` and, for temporary keys, `x-tos-security-token`. Callers
/// insert every entry, overwriting existing values.
pub fn project(
    creq: &CanonicalRequest,
    ctx: &SigningContext,
    signature: &str,
    cred: &Credential,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(5);

    headers.insert(HOST, HeaderValue::from_str(creq.host())?);
    headers.insert(X_TOS_DATE, HeaderValue::from_str(ctx.amz_date())?);
    headers.insert(
        X_TOS_CONTENT_SHA256,
        HeaderValue::from_str(creq.payload_hash())?,
    );

    if let Some(token) = &cred.security_token {
        let mut value = HeaderValue::from_str(token)?;
        // Token must not leak through debug output.
        value.set_sensitive(true);
        headers.insert(X_TOS_SECURITY_TOKEN, value);
    }

    let mut value = HeaderValue::from_str(&authorization(
        creq,
        ctx,
        &cred.access_key_id,
        signature,
    ))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);

    Ok(headers)
}
