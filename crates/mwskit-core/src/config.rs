use crate::error::ConfigError;
use crate::marketplace::MarketplaceId;
use crate::signing::Credentials;

pub const APPLICATION_NAME: &str = "mwskit";
pub const DEFAULT_APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_SELLER_ID: &str = "MWS_SELLER_ID";
pub const ENV_MARKETPLACE_ID: &str = "MWS_MARKETPLACE_ID";
pub const ENV_ACCESS_KEY_ID: &str = "MWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "MWS_SECRET_ACCESS_KEY";
pub const ENV_AUTH_TOKEN: &str = "MWS_AUTH_TOKEN";
pub const ENV_APPLICATION_VERSION: &str = "MWS_APPLICATION_VERSION";

/// Seller identity and credentials. Validated once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    seller_id: String,
    marketplace: MarketplaceId,
    credentials: Credentials,
    auth_token: Option<String>,
    application_name: String,
    application_version: String,
}

impl ClientConfig {
    pub fn new(
        seller_id: &str,
        marketplace_id: &str,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Result<Self, ConfigError> {
        let seller_id = required("seller_id", seller_id)?;
        let marketplace = MarketplaceId::parse(required("marketplace_id", marketplace_id)?)?;
        let access_key_id = required("access_key_id", access_key_id)?;
        let secret_access_key = required("secret_access_key", secret_access_key)?;

        Ok(Self {
            seller_id: seller_id.to_owned(),
            marketplace,
            credentials: Credentials::new(access_key_id, secret_access_key),
            auth_token: None,
            application_name: String::from(APPLICATION_NAME),
            application_version: String::from(DEFAULT_APPLICATION_VERSION),
        })
    }

    /// Blank tokens are ignored.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn with_application_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        if !version.trim().is_empty() {
            self.application_version = version;
        }
        self
    }

    /// Reads the configuration from `MWS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).unwrap_or_default();

        let mut config = Self::new(
            &value(ENV_SELLER_ID),
            &value(ENV_MARKETPLACE_ID),
            &value(ENV_ACCESS_KEY_ID),
            &value(ENV_SECRET_ACCESS_KEY),
        )?;
        if let Some(token) = lookup(ENV_AUTH_TOKEN) {
            config = config.with_auth_token(token);
        }
        if let Some(version) = lookup(ENV_APPLICATION_VERSION) {
            config = config.with_application_version(version);
        }
        Ok(config)
    }

    pub fn seller_id(&self) -> &str {
        &self.seller_id
    }

    pub fn marketplace(&self) -> MarketplaceId {
        self.marketplace
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Value of the `x-amazon-user-agent` header.
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.application_name, self.application_version)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(trimmed)
}
