use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config/Config.toml`, `ODSS_*` environment variables,
    /// and `config/Config.json`, on top of built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML file. Missing files fall back to defaults.
    ///
    /// Nested keys are addressed in the environment with `__`, e.g.
    /// `ODSS_STRATEGY__DEPRECIATION_RATE=0.15`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(path).extract()?;
        Ok(config)
    }

    fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("ODSS_").split("__"))
            .join(Json::file("config/Config.json"))
    }
}
