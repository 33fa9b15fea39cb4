use crate::{constants::*, Credential};
use async_trait::async_trait;
use tossign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads TOS credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `TOS_ACCESS_KEY`: The TOS access key ID
/// - `TOS_SECRET_KEY`: The TOS secret access key
/// - `TOS_SECURITY_TOKEN`: The TOS security token (optional)
///
/// Empty values count as missing.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let access_key_id = envs.get(TOS_ACCESS_KEY).filter(|v| !v.is_empty());
        let secret_access_key = envs.get(TOS_SECRET_KEY).filter(|v| !v.is_empty());

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.clone(),
                secret_access_key: sk.clone(),
                security_token: envs
                    .get(TOS_SECURITY_TOKEN)
                    .filter(|v| !v.is_empty())
                    .cloned(),
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tossign_core::{OsEnv, StaticEnv};

    fn context(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let ctx = context(&[
            (TOS_ACCESS_KEY, "test_access_key"),
            (TOS_SECRET_KEY, "test_secret_key"),
        ]);

        let provider = EnvCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "test_access_key");
        assert_eq!(cred.secret_access_key, "test_secret_key");
        assert!(cred.security_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_with_security_token() -> anyhow::Result<()> {
        let ctx = context(&[
            (TOS_ACCESS_KEY, "test_access_key"),
            (TOS_SECRET_KEY, "test_secret_key"),
            (TOS_SECURITY_TOKEN, "test_security_token"),
        ]);

        let provider = EnvCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.security_token, Some("test_security_token".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_missing_credentials() -> anyhow::Result<()> {
        let provider = EnvCredentialProvider::new();

        let cred = provider.provide_credential(&Context::new()).await?;
        assert!(cred.is_none());

        // Only access key ID
        let cred = provider
            .provide_credential(&context(&[(TOS_ACCESS_KEY, "test_access_key")]))
            .await?;
        assert!(cred.is_none());

        // Empty secret key
        let cred = provider
            .provide_credential(&context(&[
                (TOS_ACCESS_KEY, "test_access_key"),
                (TOS_SECRET_KEY, ""),
            ]))
            .await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[test]
    fn test_env_credential_provider_os_env() {
        temp_env::with_vars(
            vec![
                (TOS_ACCESS_KEY, Some("os_access_key")),
                (TOS_SECRET_KEY, Some("os_secret_key")),
                (TOS_SECURITY_TOKEN, None),
            ],
            || {
                tokio::runtime::Runtime::new()
                    .expect("runtime must be created")
                    .block_on(async {
                        let ctx = Context::new().with_env(OsEnv);
                        let cred = EnvCredentialProvider::new()
                            .provide_credential(&ctx)
                            .await
                            .expect("load must succeed")
                            .expect("credential must be loaded");
                        assert_eq!(cred.access_key_id, "os_access_key");
                        assert_eq!(cred.secret_access_key, "os_secret_key");
                        assert!(cred.security_token.is_none());
                    })
            },
        );
    }
}
