use eyre::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the settings file looked up in the working directory
pub const FILE_NAME: &str = "infra.toml";

/// Overrides the SNS endpoint from the settings file
pub const SNS_ENDPOINT_ENV: &str = "INFRA_SNS_ENDPOINT";

/// Settings is the structure of infra.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// [sns]
    /// endpoint = "https://1234abcd.ngrok.io/testTopic"
    #[serde(default)]
    pub sns: SnsSection,

    /// [synth]
    /// out = "cdk.out"
    #[serde(default)]
    pub synth: SynthSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnsSection {
    /// HTTP(S) subscriber of the sample topic
    ///
    /// Usually a temporary tunnel to a locally running app, so there is no default.
    pub endpoint: Option<Url>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthSection {
    /// Directory for rendered templates, stdout if not set
    pub out: Option<PathBuf>,
}

impl Settings {
    /// Load settings from an explicit file, or from infra.toml in the current dir
    ///
    /// An explicitly passed file must exist. A missing infra.toml means defaults.
    /// Environment variables are applied on top.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_path(path)?,

            None => {
                let path = PathBuf::from(FILE_NAME);

                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    log::debug!("No {FILE_NAME} found, using defaults");
                    Self::default()
                }
            }
        };

        settings.apply_env(&Self::env_vars()?)?;
        Ok(settings)
    }

    /// Read the variables settings can be overridden with
    ///
    /// Only the known variables are read, the rest of the environment may hold anything.
    fn env_vars() -> eyre::Result<HashMap<String, String>> {
        match std::env::var(SNS_ENDPOINT_ENV) {
            Ok(value) => Ok(HashMap::from([(SNS_ENDPOINT_ENV.to_string(), value)])),
            Err(std::env::VarError::NotPresent) => Ok(HashMap::new()),
            Err(err) => Err(err).wrap_err(format!("Failed to read {SNS_ENDPOINT_ENV}")),
        }
    }

    /// Read and parse a settings file
    pub fn from_path(path: &Path) -> eyre::Result<Self> {
        let toml_string =
            fs::read_to_string(path).wrap_err(format!("Failed to read {path:?}"))?;

        let settings =
            Self::parse(&toml_string).wrap_err(format!("Failed to parse TOML in {path:?}"))?;

        log::info!("Loaded settings from {path:?}");
        Ok(settings)
    }

    pub fn parse(toml_string: &str) -> eyre::Result<Self> {
        toml::from_str(toml_string).wrap_err("Invalid settings")
    }

    /// Override values with the ones found in environment variables
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> eyre::Result<()> {
        if let Some(endpoint) = vars.get(SNS_ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            let endpoint = Url::parse(endpoint)
                .wrap_err_with(|| format!("{SNS_ENDPOINT_ENV} is not a valid URL: {endpoint}"))?;

            log::debug!("SNS endpoint is taken from {SNS_ENDPOINT_ENV}");
            self.sns.endpoint = Some(endpoint);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn sections_are_parsed() {
        let settings = Settings::parse(
            r#"
            [sns]
            endpoint = "https://1234abcd.ngrok.io/testTopic"

            [synth]
            out = "cdk.out"
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.sns.endpoint.unwrap().as_str(),
            "https://1234abcd.ngrok.io/testTopic"
        );

        assert_eq!(settings.synth.out, Some(PathBuf::from("cdk.out")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("[sns]\nendpont = \"https://example.com\"").is_err());
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(Settings::parse("[sns]\nendpoint = \"not a url\"").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut settings =
            Settings::parse("[sns]\nendpoint = \"https://from-file.example.com/\"").unwrap();

        let vars = HashMap::from([(
            SNS_ENDPOINT_ENV.to_string(),
            "https://from-env.example.com/topic".to_string(),
        )]);

        settings.apply_env(&vars).unwrap();

        assert_eq!(
            settings.sns.endpoint.unwrap().as_str(),
            "https://from-env.example.com/topic"
        );
    }

    #[test]
    fn empty_env_is_ignored() {
        let mut settings = Settings::default();
        let vars = HashMap::from([(SNS_ENDPOINT_ENV.to_string(), String::new())]);
        settings.apply_env(&vars).unwrap();
        assert_eq!(settings.sns.endpoint, None);
    }

    #[test]
    fn invalid_env_is_an_error() {
        let mut settings = Settings::default();
        let vars = HashMap::from([(SNS_ENDPOINT_ENV.to_string(), "nope".to_string())]);
        let err = settings.apply_env(&vars).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("{SNS_ENDPOINT_ENV} is not a valid URL: nope")
        );

        assert_eq!(err.root_cause().to_string(), "relative URL without a base");
    }

    // The only test touching the process environment, other tests pass variables explicitly
    #[cfg(unix)]
    #[test]
    fn environment_with_non_unicode_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let garbage = OsStr::from_bytes(b"\xff\xfe");

        std::env::set_var("INFRA_TEST_NON_UNICODE", garbage);
        let unrelated = Settings::load(None);
        std::env::set_var(SNS_ENDPOINT_ENV, garbage);
        let endpoint = Settings::load(None);
        std::env::remove_var(SNS_ENDPOINT_ENV);
        std::env::remove_var("INFRA_TEST_NON_UNICODE");

        assert_eq!(unrelated.unwrap(), Settings::default());

        assert_eq!(
            endpoint.unwrap_err().to_string(),
            format!("Failed to read {SNS_ENDPOINT_ENV}")
        );
    }
}
