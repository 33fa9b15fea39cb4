use log::debug;
use tossign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};

use crate::canonical::{CanonicalRequest, Timestamp};
use crate::constants::{ALGORITHM, REQUEST_TERMINATOR};

/// SigningContext carries everything derived from the canonical request before
/// the final HMAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    amz_date: String,
    credential_scope: String,
    string_to_sign: String,
}

impl SigningContext {
    /// Always `TOS4-HMAC-SHA256`.
    pub fn algorithm(&self) -> &'static str {
        ALGORITHM
    }

    /// Signing time as `YYYYMMDDTHHMMSSZ`.
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    /// `date/region/service/request`
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// The string the signature is computed over.
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }
}

/// Build the credential scope: `20240101/cn-beijing/tos/request`.
pub fn credential_scope(timestamp: &Timestamp, region: &str, service: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        timestamp.date_stamp(),
        region,
        service,
        REQUEST_TERMINATOR
    )
}

/// Build the string to sign.
///
/// ```text
/// TOS4-HMAC-SHA256
/// 20240101T000000Z
/// 20240101/cn-beijing/tos/request
/// <hex sha256 of canonical request>
/// ```
pub fn string_to_sign(creq: &CanonicalRequest, timestamp: &Timestamp, scope: &str) -> String {
    let encoded_req = hex_sha256(creq.to_string().as_bytes());
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp.amz_date(),
        scope,
        encoded_req
    )
}

/// Derive the signing key.
///
/// The secret is used as is, intermediate keys stay raw bytes.
pub fn generate_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), REQUEST_TERMINATOR.as_bytes())
}

/// Sign a canonical request.
///
/// Returns the signing context and the hex signature. The signing key lives
/// only inside this call.
pub fn sign(
    creq: &CanonicalRequest,
    secret_access_key: &str,
    timestamp: &Timestamp,
    region: &str,
    service: &str,
) -> (SigningContext, String) {
    debug!("calculated canonical request: {creq}");

    let scope = credential_scope(timestamp, region, service);
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(creq, timestamp, &scope);
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key =
        generate_signing_key(secret_access_key, timestamp.date_stamp(), region, service);
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    (
        SigningContext {
            amz_date: timestamp.amz_date().to_string(),
            credential_scope: scope,
            string_to_sign,
        },
        signature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::constants::EMPTY_STRING_SHA256;
    use crate::policy::SigningPolicy;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tossign_core::RequestDescriptor;

    fn timestamp() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_credential_scope() {
        assert_eq!(
            credential_scope(&timestamp(), "cn-beijing", "tos"),
            "20240101/cn-beijing/tos/request"
        );
    }

    #[test]
    fn test_generate_signing_key() {
        let key = generate_signing_key("TOSsecretKeyExample", "20240101", "cn-beijing", "tos");
        assert_eq!(key.len(), 32);
        assert_eq!(
            key,
            generate_signing_key("TOSsecretKeyExample", "20240101", "cn-beijing", "tos")
        );
        assert_ne!(
            key,
            generate_signing_key("TOSsecretKeyExample", "20240102", "cn-beijing", "tos")
        );
    }

    #[test]
    fn test_sign() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let req = RequestDescriptor::new("GET", "example.tos-cn-beijing.example.com", "/")?;
        let ts = timestamp();
        let creq = canonicalize(&req, &ts, EMPTY_STRING_SHA256, None, &SigningPolicy::default())?;

        let (ctx, signature) = sign(&creq, "TOSsecretKeyExample", &ts, "cn-beijing", "tos");

        assert_eq!(ctx.algorithm(), "TOS4-HMAC-SHA256");
        assert_eq!(ctx.amz_date(), "20240101T000000Z");
        assert_eq!(ctx.credential_scope(), "20240101/cn-beijing/tos/request");
        assert_eq!(
            ctx.string_to_sign(),
            "TOS4-HMAC-SHA256\n20240101T000000Z\n20240101/cn-beijing/tos/request\nbb964069cbdd4ecaf614c945412926ccd198847e3188a6b4db1ef2bdd02156e6"
        );
        assert_eq!(
            signature,
            "2a1da93c4528d8504827398f60b38d07ad5f317436e71765d4ca904953771392"
        );
        Ok(())
    }
}
