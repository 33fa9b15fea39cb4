//! Volcengine TOS signing implementation for tossign.
//!
//! This crate signs requests to TOS with `TOS4-HMAC-SHA256`, a SigV4 style
//! scheme. A request goes through four pure stages:
//!
//! 1. [`canonicalize`] builds the [`CanonicalRequest`]
//! 2. [`hash_payload`] resolves the payload hash
//! 3. [`sign`] derives the signing key and computes the signature
//! 4. [`project`] produces the headers to attach
//!
//! [`RequestSigner`] composes them and implements
//! [`SignRequest`](tossign_core::SignRequest) for `http::request::Parts`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tossign_core::{Body, RequestDescriptor, Result};
//! use tossign_tos::{Credential, RequestSigner};
//!
//! # fn example() -> Result<()> {
//! let signer = RequestSigner::new("tos", "cn-beijing");
//! let cred = Credential::new("access_key_id", "secret_access_key", None);
//!
//! let req = RequestDescriptor::from_url(
//!     "PUT",
//!     "https://bucket.tos-cn-beijing.volces.com/hello.txt",
//! )?
//! .with_header("x-tos-meta-owner", "alice")
//! .with_body(Body::raw("hello"));
//!
//! let headers = signer.sign(&req, &cred)?;
//! assert!(headers.contains_key("authorization"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing `http` requests
//!
//! ```no_run
//! use tossign_core::{Context, OsEnv, Result, Signer};
//! use tossign_tos::{Config, DefaultCredentialProvider, RequestSigner};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = Config::new().from_env(&ctx);
//!
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::from_config(&config)?,
//! );
//!
//! let mut parts = http::Request::get("https://bucket.tos-cn-beijing.volces.com/hello.txt")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential Sources
//!
//! - [`StaticCredentialProvider`]: fixed keys
//! - [`EnvCredentialProvider`]: `TOS_ACCESS_KEY`, `TOS_SECRET_KEY`, `TOS_SECURITY_TOKEN`
//! - [`ConfigCredentialProvider`]: a [`Config`], completed from env
//! - [`DefaultCredentialProvider`]: the chain used when nothing else is configured

mod constants;
pub use constants::{EMPTY_STRING_SHA256, UNSIGNED_PAYLOAD};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod policy;
pub use policy::{HeaderScope, SigningPolicy};

mod canonical;
pub use canonical::{canonical_query, canonical_uri, canonicalize, CanonicalRequest, Timestamp};

mod payload;
pub use payload::hash_payload;

mod signature;
pub use signature::{
    credential_scope, generate_signing_key, sign, string_to_sign, SigningContext,
};

mod project;
pub use project::{authorization, project};

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;
