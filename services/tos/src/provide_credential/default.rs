use crate::provide_credential::EnvCredentialProvider;
use crate::Credential;
use async_trait::async_trait;
use tossign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider will try to load credential from different sources.
///
/// Resolution order:
///
/// 1. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tossign_tos::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::new()
    ///     .push_front(StaticCredentialProvider::new("access_key_id", "secret_access_key"));
    /// ```
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::StaticCredentialProvider;
    use std::collections::HashMap;
    use tossign_core::StaticEnv;

    #[tokio::test]
    async fn test_default_loader_without_env() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv::default());

        let loader = DefaultCredentialProvider::new();
        let credential = loader.provide_credential(&ctx).await?;

        assert!(credential.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_default_loader_with_env() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (TOS_ACCESS_KEY.to_string(), "access_key_id".to_string()),
                (TOS_SECRET_KEY.to_string(), "secret_access_key".to_string()),
            ]),
        });

        let loader = DefaultCredentialProvider::new();
        let credential = loader
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");

        assert_eq!("access_key_id", credential.access_key_id);
        assert_eq!("secret_access_key", credential.secret_access_key);
        Ok(())
    }

    #[tokio::test]
    async fn test_default_loader_push_front() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (TOS_ACCESS_KEY.to_string(), "env_access_key".to_string()),
                (TOS_SECRET_KEY.to_string(), "env_secret_key".to_string()),
            ]),
        });

        let loader = DefaultCredentialProvider::new()
            .push_front(StaticCredentialProvider::new("static_access_key", "static_secret_key"));
        let credential = loader
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");

        assert_eq!("static_access_key", credential.access_key_id);
        Ok(())
    }
}
