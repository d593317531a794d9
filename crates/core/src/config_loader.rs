use crate::config::Config;
use crate::error::ArbError;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration bundle from `./config.json`, overlaid with any
    /// `ARB_`-prefixed environment variables. Fails descriptively at startup
    /// if the file is missing or malformed, per the `ConfigSource` contract.
    ///
    /// # Errors
    ///
    /// Returns `ArbError::ConfigMissing` if `./config.json` does not exist,
    /// or `ArbError::ConfigMalformed` if it exists but cannot be parsed into
    /// a `Config`.
    pub fn load() -> Result<Config, ArbError> {
        Self::load_from("config.json")
    }

    /// Same as [`Self::load`] but against an arbitrary path, for tests.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, ArbError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArbError::ConfigMissing {
                path: path.display().to_string(),
            });
        }

        Figment::new()
            .merge(Json::file(path))
            .merge(Env::prefixed("ARB_"))
            .extract()
            .map_err(|source| ArbError::ConfigMalformed {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_config_missing() {
        let err = ConfigLoader::load_from("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ArbError::ConfigMissing { .. }));
    }

    #[test]
    fn malformed_file_is_config_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = ConfigLoader::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ArbError::ConfigMalformed { .. }));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"symbols": ["BTCUSDT"]}}"#).unwrap();
        let config = ConfigLoader::load_from(file.path()).unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT".to_string()]);
        assert_eq!(config.fees, 0.04);
        assert_eq!(config.max_pos_usd, 1000.0);
        assert_eq!(config.check_interval_sec, 1);
    }
}
