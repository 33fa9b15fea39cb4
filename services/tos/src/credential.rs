use std::fmt::{Debug, Formatter};

use tossign_core::{utils::Redact, SigningCredential};

/// Credential for tos.
///
/// Region and service are scope parameters of [`crate::RequestSigner`], not part
/// of the credential.
#[derive(Clone, Default)]
pub struct Credential {
    /// Access key id for tos
    pub access_key_id: String,
    /// Secret access key for tos
    pub secret_access_key: String,
    /// Security token for tos, issued together with temporary keys.
    pub security_token: Option<String>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        security_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            security_token,
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field(
                "security_token",
                &self.security_token.as_ref().map(Redact::from),
            )
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}
