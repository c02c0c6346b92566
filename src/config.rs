//! Configuration for jau-passkey

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PasskeyConfig {
    /// User pool app client id, sent with every challenge response
    pub client_id: String,

    /// User pool id, e.g. `us-west-2_abc123`
    #[serde(default)]
    pub user_pool_id: Option<String>,

    /// Overrides the region parsed from the user pool id
    #[serde(default)]
    pub region: Option<String>,

    /// Overrides the regional identity provider endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

pub struct PasskeyConfigBuilder {
    config: PasskeyConfig,
}

impl PasskeyConfig {
    pub fn builder() -> PasskeyConfigBuilder {
        PasskeyConfigBuilder {
            config: PasskeyConfig::default(),
        }
    }

    /// Explicit region, else the user pool id prefix
    pub fn region(&self) -> Option<String> {
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            return Some(region.to_string());
        }
        self.user_pool_id
            .as_deref()
            .and_then(|id| id.split_once('_'))
            .map(|(region, _)| region.to_string())
            .filter(|region| !region.is_empty())
    }

    pub fn endpoint(&self) -> Result<String, config::ConfigError> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            return Ok(endpoint.to_string());
        }
        let region = self.region().ok_or_else(|| {
            config::ConfigError::Message(
                "either an endpoint, a region or a user pool id is required".into(),
            )
        })?;
        Ok(format!("https://cognito-idp.{}.amazonaws.com/", region))
    }

    /// Load configuration from environment and files
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = config::Config::builder()
            .add_source(config::Config::try_from(&PasskeyConfig::default())?)
            .add_source(config::Environment::with_prefix("JAU_PASSKEY"));

        if std::path::Path::new("jau-passkey.toml").exists() {
            config = config.add_source(config::File::with_name("jau-passkey"));
        }

        let config: PasskeyConfig = config.build()?.try_deserialize()?;
        if config.client_id.is_empty() {
            return Err(config::ConfigError::NotFound("client_id".into()));
        }
        Ok(config)
    }
}

impl PasskeyConfigBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    pub fn user_pool_id(mut self, user_pool_id: impl Into<String>) -> Self {
        self.config.user_pool_id = Some(user_pool_id.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn build(self) -> PasskeyConfig {
        self.config
    }
}
