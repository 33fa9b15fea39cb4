use crate::constants::DEFAULT_SIGNED_HEADER_PREFIX;

/// HeaderScope decides which headers beyond the required set get signed.
///
/// `host`, `x-tos-date`, `x-tos-content-sha256` and, with temporary keys,
/// `x-tos-security-token` are signed under every scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderScope {
    /// Sign the required headers only.
    Required,
    /// Also sign every header whose lowercased name starts with the prefix.
    Prefix(String),
}

impl HeaderScope {
    /// Build a prefix scope, the prefix is lowercased.
    ///
    /// An empty prefix would select every header, it yields [`HeaderScope::Required`].
    pub fn prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return HeaderScope::Required;
        }
        HeaderScope::Prefix(prefix.to_ascii_lowercase())
    }

    /// Check if a lowercased header name is selected by this scope.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            HeaderScope::Required => false,
            HeaderScope::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

impl Default for HeaderScope {
    fn default() -> Self {
        HeaderScope::Prefix(DEFAULT_SIGNED_HEADER_PREFIX.to_string())
    }
}

/// SigningPolicy carries the canonicalization choices that servers may disagree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPolicy {
    /// Which optional headers are signed.
    pub header_scope: HeaderScope,
    /// Keep escapes like `%2F` already present in the path.
    pub preserve_encoded_slash: bool,
}

impl Default for SigningPolicy {
    fn default() -> Self {
        Self {
            header_scope: HeaderScope::default(),
            preserve_encoded_slash: true,
        }
    }
}

impl SigningPolicy {
    /// Set the header scope.
    pub fn with_header_scope(mut self, scope: HeaderScope) -> Self {
        self.header_scope = scope;
        self
    }

    /// Set whether existing path escapes are preserved.
    pub fn with_preserve_encoded_slash(mut self, preserve: bool) -> Self {
        self.preserve_encoded_slash = preserve;
        self
    }
}
