use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in tos.
pub const X_TOS_DATE: &str = "x-tos-date";
pub const X_TOS_CONTENT_SHA256: &str = "x-tos-content-sha256";
pub const X_TOS_SECURITY_TOKEN: &str = "x-tos-security-token";

// Query params used in presigned urls.
pub const X_TOS_ALGORITHM: &str = "X-Tos-Algorithm";
pub const X_TOS_CREDENTIAL: &str = "X-Tos-Credential";
pub const X_TOS_DATE_QUERY: &str = "X-Tos-Date";
pub const X_TOS_EXPIRES: &str = "X-Tos-Expires";
pub const X_TOS_SIGNED_HEADERS: &str = "X-Tos-SignedHeaders";
pub const X_TOS_SECURITY_TOKEN_QUERY: &str = "X-Tos-Security-Token";
pub const X_TOS_SIGNATURE: &str = "X-Tos-Signature";

// Env values used in tos.
pub const TOS_ACCESS_KEY: &str = "TOS_ACCESS_KEY";
pub const TOS_SECRET_KEY: &str = "TOS_SECRET_KEY";
pub const TOS_SECURITY_TOKEN: &str = "TOS_SECURITY_TOKEN";
pub const TOS_REGION: &str = "TOS_REGION";
pub const TOS_SERVICE: &str = "TOS_SERVICE";

pub const ALGORITHM: &str = "TOS4-HMAC-SHA256";
pub const REQUEST_TERMINATOR: &str = "request";
pub const DEFAULT_SERVICE: &str = "tos";
pub const DEFAULT_SIGNED_HEADER_PREFIX: &str = "x-tos-";

pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";
/// Hex encoded SHA-256 of the empty string.
pub const EMPTY_STRING_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Longest validity accepted for presigned urls: 7 days.
pub const MAX_PRESIGN_EXPIRES_SECS: u64 = 604_800;

/// AsciiSet for paths that are already encoded on the wire.
///
/// Only the sub-delims left alone by most url encoders are escaped. Existing
/// escapes such as `%2F` are kept as is.
pub static TOS_PATH_RESERVED_SET: AsciiSet = CONTROLS
    .add(b'(')
    .add(b')')
    .add(b'!')
    .add(b'*')
    .add(b'\'');

/// AsciiSet for raw paths.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~' and the separator '/'.
pub static TOS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for query keys and values.
///
/// Same as [`TOS_URI_ENCODE_SET`] but `/` is escaped too.
pub static TOS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
