use config::{Config, Environment, File};
use serde::Deserialize;

use crate::config::{PusherConfig, ServerConfig};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub pusher: PusherConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PRICE_PUSHER").separator("__"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        app.pusher.validate()?;
        Ok(app)
    }
}
