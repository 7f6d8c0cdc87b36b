use anyhow::{Context, Result};
use azubi_client::AzubiClient;
use azubi_core::ClientConfig;
use std::path::Path;

pub mod report;
pub mod status;
pub mod subjects;

/// A client logged in for the duration of one command.
pub struct Session {
    client: AzubiClient,
}

impl Session {
    pub async fn open(
        config_path: Option<&Path>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => ClientConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
                .with_env_overrides(),
            None => ClientConfig::load().context("Failed to load config")?,
        };
        let username =
            username.context("No username given. Pass --username or set AZUBIHEFT_USERNAME")?;
        let password =
            password.context("No password given. Pass --password or set AZUBIHEFT_PASSWORD")?;

        let mut client = AzubiClient::new(&config);
        client
            .login(username, password)
            .await
            .with_context(|| format!("Login to {} failed", config.base_url))?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &AzubiClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut AzubiClient {
        &mut self.client
    }

    pub async fn close(mut self) {
        if let Err(err) = self.client.logout().await {
            tracing::warn!("Logout failed: {}", err);
        }
    }
}
