use std::fmt::{Debug, Formatter};

use super::constants::*;
use tossign_core::{utils::Redact, Context};

/// Config carries all the configuration for Volcengine TOS services.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TOS_ACCESS_KEY`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TOS_SECRET_KEY`]
    pub secret_access_key: Option<String>,
    /// `security_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TOS_SECURITY_TOKEN`]
    pub security_token: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TOS_REGION`]
    pub region: Option<String>,
    /// `service` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TOS_SERVICE`]
    /// - default to `tos`
    pub service: Option<String>,
    /// Extra headers starting with this prefix are signed.
    ///
    /// Default to `x-tos-`. An empty prefix signs the required headers only.
    pub signed_header_prefix: Option<String>,
    /// Keep `%2F` and other escapes of the path intact when canonicalizing.
    ///
    /// Default to `true`. With `false` the path is treated as raw text and
    /// encoded as a whole.
    pub preserve_encoded_slash: Option<bool>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set security_token
    pub fn with_security_token(mut self, security_token: impl Into<String>) -> Self {
        self.security_token = Some(security_token.into());
        self
    }

    /// Set region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set service
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set signed_header_prefix
    pub fn with_signed_header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.signed_header_prefix = Some(prefix.into());
        self
    }

    /// Set preserve_encoded_slash
    pub fn with_preserve_encoded_slash(mut self, preserve: bool) -> Self {
        self.preserve_encoded_slash = Some(preserve);
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are left untouched.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(TOS_ACCESS_KEY) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TOS_SECRET_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TOS_SECURITY_TOKEN) {
            self.security_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TOS_REGION) {
            self.region.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TOS_SERVICE) {
            self.service.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id.as_ref().map(Redact::from))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(Redact::from),
            )
            .field(
                "security_token",
                &self.security_token.as_ref().map(Redact::from),
            )
            .field("region", &self.region)
            .field("service", &self.service)
            .field("signed_header_prefix", &self.signed_header_prefix)
            .field("preserve_encoded_slash", &self.preserve_encoded_slash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tossign_core::StaticEnv;

    #[test]
    fn test_from_env_fills_unset_fields() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (TOS_ACCESS_KEY.to_string(), "env_access_key".to_string()),
                (TOS_SECRET_KEY.to_string(), "env_secret_key".to_string()),
                (TOS_REGION.to_string(), "cn-shanghai".to_string()),
                (TOS_SERVICE.to_string(), "tos".to_string()),
            ]),
        });

        let config = Config::new().with_region("cn-beijing").from_env(&ctx);

        assert_eq!(config.access_key_id.as_deref(), Some("env_access_key"));
        assert_eq!(config.secret_access_key.as_deref(), Some("env_secret_key"));
        assert_eq!(config.security_token, None);
        // Explicit values win over env.
        assert_eq!(config.region.as_deref(), Some("cn-beijing"));
        assert_eq!(config.service.as_deref(), Some("tos"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new()
            .with_access_key_id("AKLTZmE1NDc2YjE4NWY")
            .with_secret_access_key("TOSsecretKeyExample")
            .with_security_token("security_token_value")
            .with_region("cn-beijing");

        let output = format!("{config:?}");
        assert!(!output.contains("AKLTZmE1NDc2YjE4NWY"));
        assert!(!output.contains("TOSsecretKeyExample"));
        assert!(!output.contains("security_token_value"));
        assert!(output.contains("cn-beijing"));
    }
}
