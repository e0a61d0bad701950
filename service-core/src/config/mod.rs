use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "dev".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        // ENVIRONMENT wins over APP__ENVIRONMENT.
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }

        Ok(config)
    }

    /// Production mode turns every optional service setting into a required one.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("prod")
    }
}
